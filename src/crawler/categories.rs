//! Category selection for crawl cycles.

use rand::Rng;

use crate::config::{CategoryOrder, ConfigError};

/// Supplies the category for the next crawl cycle.
pub trait CategoryProvider: Send {
    fn next_category(&mut self) -> String;
}

/// Category provider backed by a fixed list.
#[derive(Debug, Clone)]
pub struct CategoryList {
    names: Vec<String>,
    order: CategoryOrder,
    cursor: usize,
}

impl CategoryList {
    /// Build from configured names. Blank names are dropped; at least one
    /// must remain.
    pub fn new(names: Vec<String>, order: CategoryOrder) -> Result<Self, ConfigError> {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        if names.is_empty() {
            return Err(ConfigError::NoCategories);
        }

        Ok(Self {
            names,
            order,
            cursor: 0,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl CategoryProvider for CategoryList {
    fn next_category(&mut self) -> String {
        let index = match self.order {
            CategoryOrder::Random => rand::rng().random_range(0..self.names.len()),
            CategoryOrder::RoundRobin => {
                let index = self.cursor % self.names.len();
                self.cursor = index + 1;
                index
            }
        };
        self.names[index].clone()
    }
}

//! Diesel-based item repository.
//!
//! Items are keyed by the marketplace source identifier through the
//! `item_sources` table, whose primary key keeps each source id attached to
//! at most one item.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use super::models::{ItemRecord, ItemSourceRecord, NewItem, NewItemSource};
use super::pool::{DbPool, DieselError, SqliteConn};
use super::store::ItemStore;
use super::util::{format_timestamp, parse_datetime, to_diesel_error};
use crate::models::{Item, ItemSource, ItemUpsert};
use crate::schema::{item_sources, items};

/// Diesel-based item repository with compile-time query checking.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a new item repository with an existing pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert or update the item matched by `upsert.source_id`.
    ///
    /// Returns the store-assigned item id, which is stable across updates.
    pub async fn upsert(&self, upsert: &ItemUpsert<'_>) -> Result<String, DieselError> {
        self.upsert_at(upsert, Utc::now()).await
    }

    /// Same as [`upsert`](Self::upsert) with an explicit `updated_at`.
    pub async fn upsert_at(
        &self,
        upsert: &ItemUpsert<'_>,
        now: DateTime<Utc>,
    ) -> Result<String, DieselError> {
        let images = serde_json::to_string(upsert.images).map_err(to_diesel_error)?;
        let updated_at = format_timestamp(now);
        let mut conn = self.pool.get().await?;

        conn.transaction(|conn| {
            Box::pin(async move {
                let existing: Option<String> = item_sources::table
                    .find(upsert.source_id)
                    .select(item_sources::item_id)
                    .first(conn)
                    .await
                    .optional()?;

                match existing {
                    Some(id) => {
                        diesel::update(items::table.find(id.as_str()))
                            .set((
                                items::title.eq(upsert.title),
                                items::link.eq(upsert.link),
                                items::images.eq(images.as_str()),
                                items::updated_at.eq(updated_at.as_str()),
                            ))
                            .execute(conn)
                            .await?;
                        Ok(id)
                    }
                    None => {
                        let id = Uuid::new_v4().to_string();
                        diesel::insert_into(items::table)
                            .values(NewItem {
                                id: &id,
                                title: upsert.title,
                                link: upsert.link,
                                images: &images,
                                updated_at: &updated_at,
                            })
                            .execute(conn)
                            .await?;
                        diesel::insert_into(item_sources::table)
                            .values(NewItemSource {
                                source_id: upsert.source_id,
                                source: upsert.source,
                                item_id: &id,
                            })
                            .execute(conn)
                            .await?;
                        Ok(id)
                    }
                }
            })
        })
        .await
    }

    /// Get an item by its store-assigned id.
    pub async fn get(&self, id: &str) -> Result<Option<Item>, DieselError> {
        let mut conn = self.pool.get().await?;

        let record = items::table
            .find(id)
            .first::<ItemRecord>(&mut conn)
            .await
            .optional()?;

        match record {
            Some(record) => {
                let sources = item_sources::table
                    .filter(item_sources::item_id.eq(&record.id))
                    .order(item_sources::source_id.asc())
                    .load::<ItemSourceRecord>(&mut conn)
                    .await?;
                Ok(Some(Self::record_to_item(record, sources)))
            }
            None => Ok(None),
        }
    }

    /// Find the item a marketplace source id is attached to.
    pub async fn find_by_source(&self, source_id: &str) -> Result<Option<Item>, DieselError> {
        let item_id: Option<String> = {
            let mut conn = self.pool.get().await?;
            item_sources::table
                .find(source_id)
                .select(item_sources::item_id)
                .first(&mut conn)
                .await
                .optional()?
        };

        match item_id {
            Some(id) => self.get(&id).await,
            None => Ok(None),
        }
    }

    /// Find the item id matching an exact title and link.
    ///
    /// Several items can share a title and link under different source ids;
    /// the most recently updated one wins.
    pub async fn find_id_by_title_link(
        &self,
        title: &str,
        link: &str,
    ) -> Result<Option<String>, DieselError> {
        let mut conn = self.pool.get().await?;
        item_id_by_title_link(&mut conn, title, link).await
    }

    /// Count all items.
    pub async fn count(&self) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;

        items::table.count().get_result(&mut conn).await
    }

    fn record_to_item(record: ItemRecord, sources: Vec<ItemSourceRecord>) -> Item {
        Item {
            images: serde_json::from_str(&record.images).unwrap_or_default(),
            updated_at: parse_datetime(&record.updated_at),
            sources: sources
                .into_iter()
                .map(|s| ItemSource {
                    id: s.source_id,
                    source: s.source,
                })
                .collect(),
            id: record.id,
            title: record.title,
            link: record.link,
        }
    }
}

/// Id of the most recently updated item with exactly this title and link.
pub(super) async fn item_id_by_title_link(
    conn: &mut SqliteConn,
    title: &str,
    link: &str,
) -> Result<Option<String>, DieselError> {
    items::table
        .filter(items::title.eq(title))
        .filter(items::link.eq(link))
        .order(items::updated_at.desc())
        .select(items::id)
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl ItemStore for DieselItemRepository {
    async fn upsert_item(&self, item: &ItemUpsert<'_>) -> Result<String, DieselError> {
        self.upsert(item).await
    }
}

//! snapprice - marketplace price crawler.
//!
//! Crawls search-result pages for a rotating set of categories, keeps one
//! canonical record per listing, and records at most one price sample per
//! item per freshness window.

pub mod config;
pub mod crawler;
pub mod models;
pub mod repository;
pub mod schema;
pub mod scrapers;
pub mod utils;

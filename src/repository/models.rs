//! Diesel ORM models for database tables.

use diesel::prelude::*;

use crate::schema;

/// Item record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ItemRecord {
    pub id: String,
    pub title: String,
    pub link: String,
    pub images: String,
    pub updated_at: String,
}

/// New item for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::items)]
pub struct NewItem<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub link: &'a str,
    pub images: &'a str,
    pub updated_at: &'a str,
}

/// Item provenance record from the database.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::item_sources)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ItemSourceRecord {
    pub source_id: String,
    pub source: String,
    pub item_id: String,
}

/// New item provenance for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::item_sources)]
pub struct NewItemSource<'a> {
    pub source_id: &'a str,
    pub source: &'a str,
    pub item_id: &'a str,
}

/// Price sample record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceRecord {
    pub id: i32,
    pub item_id: String,
    pub date: String,
    pub currency: String,
    pub price: f64,
}

/// New price sample for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::prices)]
pub struct NewPrice<'a> {
    pub item_id: &'a str,
    pub date: &'a str,
    pub currency: &'a str,
    pub price: f64,
}

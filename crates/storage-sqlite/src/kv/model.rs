//! Database model for persisted key-value items.

use chrono::NaiveDateTime;
use diesel::prelude::*;

/// One stored item. Values are opaque strings (JSON blobs in practice).
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::kv_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KvItemDB {
    pub item_key: String,
    pub item_value: String,
    pub updated_at: NaiveDateTime,
}

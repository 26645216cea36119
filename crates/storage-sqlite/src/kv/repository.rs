use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::KvItemDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::kv_items::dsl::*;
use qrpass_core::errors::Result;
use qrpass_core::storage::KeyValueStoreTrait;

pub struct KeyValueRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl KeyValueRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        KeyValueRepository { pool, writer }
    }
}

#[async_trait]
impl KeyValueStoreTrait for KeyValueRepository {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let value = kv_items
            .filter(item_key.eq(key))
            .select(item_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let item = KvItemDB {
            item_key: key.to_string(),
            item_value: value.to_string(),
            updated_at: Utc::now().naive_utc(),
        };
        self.writer
            .exec(move |conn| {
                diesel::replace_into(kv_items)
                    .values(&item)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}

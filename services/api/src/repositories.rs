//! Gateways between the CRUD service and the relational store
//!
//! A gateway is the narrow per-table interface the services talk to. Every
//! mutating call that targets an existing row reports absence from the same
//! atomic operation that performs the write, so there is no window between
//! an existence check and the write.

use std::sync::Arc;

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::PgPool;

use crate::models::Entity;

pub mod memory;
pub mod postgres;

pub use memory::{MemoryGateway, MemoryStore};
pub use postgres::PgGateway;

/// Single-column update applied by [`Gateway::patch`]
#[derive(Debug, Clone)]
pub struct FieldPatch {
    /// Column name in the table
    pub column: &'static str,
    /// Key in the JSON representation
    pub field: &'static str,
    pub value: Option<String>,
}

/// Row-level persistence for one entity type
#[async_trait]
pub trait Gateway<E: Entity>: Send + Sync {
    /// All rows, ordered by id
    async fn list(&self) -> DatabaseResult<Vec<E>>;

    async fn find(&self, id: i64) -> DatabaseResult<Option<E>>;

    /// Store a new row under a fresh id. Any id on `entity` is ignored.
    async fn insert(&self, entity: &E) -> DatabaseResult<E>;

    /// Overwrite every column of row `id`; `None` when the row is absent
    async fn replace(&self, id: i64, entity: &E) -> DatabaseResult<Option<E>>;

    /// Overwrite one column of row `id`; `None` when the row is absent
    async fn patch(&self, id: i64, patch: &FieldPatch) -> DatabaseResult<Option<E>>;

    /// Remove row `id`; `false` when the row is absent
    async fn delete(&self, id: i64) -> DatabaseResult<bool>;
}

/// Backend the gateways are built on
#[derive(Clone)]
pub enum Store {
    Postgres(PgPool),
    Memory(MemoryStore),
}

impl Store {
    /// Gateway for `E` on this backend
    pub fn gateway<E: Entity>(&self) -> Arc<dyn Gateway<E>> {
        match self {
            Store::Postgres(pool) => Arc::new(PgGateway::<E>::new(pool.clone())),
            Store::Memory(store) => Arc::new(MemoryGateway::<E>::new(store.clone())),
        }
    }
}

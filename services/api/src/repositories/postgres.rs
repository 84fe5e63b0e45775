//! PostgreSQL gateway

use std::marker::PhantomData;

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::debug;

use super::{FieldPatch, Gateway};
use crate::models::Entity;

/// Gateway over the table described by `E`
pub struct PgGateway<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> PgGateway<E> {
    /// Create a new gateway
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    fn returning() -> String {
        std::iter::once("id")
            .chain(E::COLUMNS.iter().copied())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn insert_sql() -> String {
        let placeholders = (1..=E::COLUMNS.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            E::TABLE,
            E::COLUMNS.join(", "),
            placeholders,
            Self::returning()
        )
    }

    fn replace_sql() -> String {
        let assignments = E::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
            E::TABLE,
            assignments,
            E::COLUMNS.len() + 1,
            Self::returning()
        )
    }

    fn patch_sql(column: &str) -> String {
        format!(
            "UPDATE {} SET {} = $1 WHERE id = $2 RETURNING {}",
            E::TABLE,
            column,
            Self::returning()
        )
    }
}

#[async_trait]
impl<E: Entity> Gateway<E> for PgGateway<E> {
    async fn list(&self) -> DatabaseResult<Vec<E>> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", Self::returning(), E::TABLE);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        rows.iter()
            .map(|row| E::from_row(row).map_err(|e| DatabaseError::Codec(e.to_string())))
            .collect()
    }

    async fn find(&self, id: i64) -> DatabaseResult<Option<E>> {
        debug!("Finding {} by ID: {}", E::NAME, id);

        let sql = format!("SELECT {} FROM {} WHERE id = $1", Self::returning(), E::TABLE);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        row.map(|row| E::from_row(&row).map_err(|e| DatabaseError::Codec(e.to_string())))
            .transpose()
    }

    async fn insert(&self, entity: &E) -> DatabaseResult<E> {
        let sql = Self::insert_sql();
        let row = entity
            .bind_columns(sqlx::query(&sql))
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        E::from_row(&row).map_err(|e| DatabaseError::Codec(e.to_string()))
    }

    async fn replace(&self, id: i64, entity: &E) -> DatabaseResult<Option<E>> {
        let sql = Self::replace_sql();
        let row = entity
            .bind_columns(sqlx::query(&sql))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        row.map(|row| E::from_row(&row).map_err(|e| DatabaseError::Codec(e.to_string())))
            .transpose()
    }

    async fn patch(&self, id: i64, patch: &FieldPatch) -> DatabaseResult<Option<E>> {
        let sql = Self::patch_sql(patch.column);
        let row = sqlx::query(&sql)
            .bind(&patch.value)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        row.map(|row| E::from_row(&row).map_err(|e| DatabaseError::Codec(e.to_string())))
            .transpose()
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }
}

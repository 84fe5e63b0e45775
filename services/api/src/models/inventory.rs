//! Inventory model

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Postgres, Row, query::Query};

use super::{Entity, EntityRef};

pub const TABLE: &str = "inventories";

/// Photo column targeted by `PATCH /api/inventories/{id}/photo`
pub const PHOTO_COLUMN: &str = "photo_url";
pub const PHOTO_FIELD: &str = "photoUrl";

/// Stock record for a single apartment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    #[serde(default)]
    pub id: Option<i64>,
    pub apartment: Option<EntityRef>,
    #[serde(default)]
    pub stock: i32,
    pub status: Option<String>,
    pub photo_url: Option<String>,
}

impl Entity for Inventory {
    const NAME: &'static str = "Inventory";
    const RESOURCE: &'static str = "inventories";
    const TABLE: &'static str = TABLE;
    const COLUMNS: &'static [&'static str] = &["apartment_id", "stock", "status", PHOTO_COLUMN];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn bind_columns<'q>(
        &'q self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(self.apartment.map(|r| r.id))
            .bind(self.stock)
            .bind(&self.status)
            .bind(&self.photo_url)
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            apartment: EntityRef::from_column(row.try_get("apartment_id")?),
            stock: row.try_get("stock")?,
            status: row.try_get("status")?,
            photo_url: row.try_get(PHOTO_COLUMN)?,
        })
    }
}

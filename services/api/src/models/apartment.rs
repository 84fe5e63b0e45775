//! Apartment model

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Postgres, Row, query::Query};

use super::{EmptyList, Entity, ResourcePolicy};

pub const TABLE: &str = "apartments";

/// Apartment listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    #[serde(default)]
    pub id: Option<i64>,
    pub location: String,
    pub price: f64,
    pub size: i32,
    pub features: Option<String>,
    /// Main photo for the listing card
    pub photo_url: Option<String>,
    pub available: Option<bool>,
}

impl Entity for Apartment {
    const NAME: &'static str = "Apartment";
    const RESOURCE: &'static str = "apartments";
    const TABLE: &'static str = TABLE;
    const COLUMNS: &'static [&'static str] = &[
        "location",
        "price",
        "size",
        "features",
        "photo_url",
        "available",
    ];
    const POLICY: ResourcePolicy = ResourcePolicy {
        empty_list: EmptyList::Ok,
        reject_null_payload: true,
    };

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
            .bind(&self.location)
            .bind(self.price)
            .bind(self.size)
            .bind(&self.features)
            .bind(&self.photo_url)
            .bind(self.available)
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            location: row.try_get("location")?,
            price: row.try_get("price")?,
            size: row.try_get("size")?,
            features: row.try_get("features")?,
            photo_url: row.try_get("photo_url")?,
            available: row.try_get("available")?,
        })
    }
}

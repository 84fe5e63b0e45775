//! Booking model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Postgres, Row, query::Query};

use super::{Entity, EntityRef};

pub const TABLE: &str = "bookings";

/// A user's booking of an apartment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default)]
    pub id: Option<i64>,
    pub user: Option<EntityRef>,
    pub apartment: Option<EntityRef>,
    pub booking_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

impl Entity for Booking {
    const NAME: &'static str = "Booking";
    const RESOURCE: &'static str = "bookings";
    const TABLE: &'static str = TABLE;
    const COLUMNS: &'static [&'static str] = &["user_id", "apartment_id", "booking_date", "status"];

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
            .bind(self.user.map(|r| r.id))
            .bind(self.apartment.map(|r| r.id))
            .bind(self.booking_date)
            .bind(&self.status)
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user: EntityRef::from_column(row.try_get("user_id")?),
            apartment: EntityRef::from_column(row.try_get("apartment_id")?),
            booking_date: row.try_get("booking_date")?,
            status: row.try_get("status")?,
        })
    }
}

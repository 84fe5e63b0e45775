//! Payment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Postgres, Row, query::Query};

use super::{Entity, EntityRef};

pub const TABLE: &str = "payments";

/// Payment made against a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default)]
    pub id: Option<i64>,
    pub booking: Option<EntityRef>,
    pub amount: Option<f64>,
    pub payment_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

impl Entity for Payment {
    const NAME: &'static str = "Payment";
    const RESOURCE: &'static str = "payments";
    const TABLE: &'static str = TABLE;
    const COLUMNS: &'static [&'static str] = &["booking_id", "amount", "payment_date", "status"];

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
            .bind(self.booking.map(|r| r.id))
            .bind(self.amount)
            .bind(self.payment_date)
            .bind(&self.status)
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            booking: EntityRef::from_column(row.try_get("booking_id")?),
            amount: row.try_get("amount")?,
            payment_date: row.try_get("payment_date")?,
            status: row.try_get("status")?,
        })
    }
}

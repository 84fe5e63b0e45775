//! Installment plan model

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Postgres, Row, query::Query};

use super::{Entity, EntityRef};

pub const TABLE: &str = "installment_plans";

/// Installment schedule attached to a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    #[serde(default)]
    pub id: Option<i64>,
    pub payment: Option<EntityRef>,
    #[serde(default)]
    pub installments: i32,
    #[serde(default)]
    pub monthly_amount: f64,
    pub schedule: Option<String>,
}

impl Entity for InstallmentPlan {
    const NAME: &'static str = "InstallmentPlan";
    const RESOURCE: &'static str = "installment-plans";
    const TABLE: &'static str = TABLE;
    const COLUMNS: &'static [&'static str] =
        &["payment_id", "installments", "monthly_amount", "schedule"];

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
            .bind(self.payment.map(|r| r.id))
            .bind(self.installments)
            .bind(self.monthly_amount)
            .bind(&self.schedule)
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            payment: EntityRef::from_column(row.try_get("payment_id")?),
            installments: row.try_get("installments")?,
            monthly_amount: row.try_get("monthly_amount")?,
            schedule: row.try_get("schedule")?,
        })
    }
}

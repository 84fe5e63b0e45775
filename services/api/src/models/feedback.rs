//! Feedback model

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Postgres, Row, query::Query};

use super::{Entity, EntityRef};

pub const TABLE: &str = "feedbacks";

/// Rating and comment left by a user about an apartment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub id: Option<i64>,
    pub user: Option<EntityRef>,
    pub apartment: Option<EntityRef>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

impl Entity for Feedback {
    const NAME: &'static str = "Feedback";
    const RESOURCE: &'static str = "feedbacks";
    const TABLE: &'static str = TABLE;
    const COLUMNS: &'static [&'static str] = &["user_id", "apartment_id", "rating", "comment"];

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
            .bind(self.rating)
            .bind(&self.comment)
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user: EntityRef::from_column(row.try_get("user_id")?),
            apartment: EntityRef::from_column(row.try_get("apartment_id")?),
            rating: row.try_get("rating")?,
            comment: row.try_get("comment")?,
        })
    }
}

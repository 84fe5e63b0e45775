//! User model
//!
//! Passwords and roles are plain read/write fields here. Nothing in this
//! service hashes or checks them.

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Postgres, Row, query::Query};

use super::Entity;

pub const TABLE: &str = "users";

/// User account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl Entity for User {
    const NAME: &'static str = "User";
    const RESOURCE: &'static str = "users";
    const TABLE: &'static str = TABLE;
    const COLUMNS: &'static [&'static str] = &["username", "email", "password", "role"];

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
            .bind(&self.username)
            .bind(&self.email)
            .bind(&self.password)
            .bind(&self.role)
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            role: row.try_get("role")?,
        })
    }
}

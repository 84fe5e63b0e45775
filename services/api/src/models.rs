//! Entity models and the metadata that drives the generic CRUD layer
//!
//! Every entity is a passive record identified by a store-assigned `i64`.
//! Relations are weak references: the referencing row only records the id
//! of its target, and what happens on delete is decided by [`RELATIONS`].

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Postgres, query::Query};

pub mod apartment;
pub mod booking;
pub mod feedback;
pub mod installment_plan;
pub mod inventory;
pub mod payment;
pub mod user;

pub use apartment::Apartment;
pub use booking::Booking;
pub use feedback::Feedback;
pub use installment_plan::InstallmentPlan;
pub use inventory::Inventory;
pub use payment::Payment;
pub use user::User;

/// Reference to another row, serialized as `{"id": N}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
}

impl EntityRef {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    /// Lift a nullable foreign-key column into an optional reference
    pub fn from_column(id: Option<i64>) -> Option<Self> {
        id.map(Self::new)
    }
}

/// What `GET /collection` answers when the table is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyList {
    /// 200 with `[]`
    Ok,
    /// 204 without a body
    NoContent,
}

/// Per-resource behaviour switches for the generic service and handlers
#[derive(Debug, Clone, Copy)]
pub struct ResourcePolicy {
    pub empty_list: EmptyList,
    /// Reject a `null` create payload with `InvalidInput`
    pub reject_null_payload: bool,
}

impl ResourcePolicy {
    /// Behaviour shared by every resource except apartments
    pub const STANDARD: Self = Self {
        empty_list: EmptyList::NoContent,
        reject_null_payload: false,
    };
}

/// Action taken on referencing rows when their target is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// The delete fails while references exist
    Restrict,
    /// Referencing rows are deleted too
    Cascade,
    /// The reference is cleared
    SetNull,
}

/// A foreign key from one table to another
#[derive(Debug, Clone, Copy)]
pub struct Relation {
    pub from_table: &'static str,
    /// Foreign-key column in `from_table`
    pub column: &'static str,
    /// Key of the reference in the JSON representation
    pub field: &'static str,
    pub to_table: &'static str,
    pub on_delete: OnDelete,
    /// At most one referencing row per target (one-to-one)
    pub unique: bool,
}

/// Every relation in the schema. The migrations declare the same policies.
pub const RELATIONS: &[Relation] = &[
    Relation {
        from_table: booking::TABLE,
        column: "user_id",
        field: "user",
        to_table: user::TABLE,
        on_delete: OnDelete::Restrict,
        unique: false,
    },
    Relation {
        from_table: booking::TABLE,
        column: "apartment_id",
        field: "apartment",
        to_table: apartment::TABLE,
        on_delete: OnDelete::Restrict,
        unique: false,
    },
    Relation {
        from_table: payment::TABLE,
        column: "booking_id",
        field: "booking",
        to_table: booking::TABLE,
        on_delete: OnDelete::Restrict,
        unique: false,
    },
    Relation {
        from_table: installment_plan::TABLE,
        column: "payment_id",
        field: "payment",
        to_table: payment::TABLE,
        on_delete: OnDelete::Cascade,
        unique: false,
    },
    Relation {
        from_table: inventory::TABLE,
        column: "apartment_id",
        field: "apartment",
        to_table: apartment::TABLE,
        on_delete: OnDelete::Cascade,
        unique: true,
    },
    Relation {
        from_table: feedback::TABLE,
        column: "user_id",
        field: "user",
        to_table: user::TABLE,
        on_delete: OnDelete::SetNull,
        unique: false,
    },
    Relation {
        from_table: feedback::TABLE,
        column: "apartment_id",
        field: "apartment",
        to_table: apartment::TABLE,
        on_delete: OnDelete::SetNull,
        unique: false,
    },
];

/// Relations whose foreign key lives in `table`
pub fn relations_from(table: &str) -> impl Iterator<Item = &'static Relation> + '_ {
    RELATIONS.iter().filter(move |r| r.from_table == table)
}

/// Relations that point at `table`
pub fn relations_to(table: &str) -> impl Iterator<Item = &'static Relation> + '_ {
    RELATIONS.iter().filter(move |r| r.to_table == table)
}

/// Table metadata, row mapping and policy for one entity type
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// Human readable name used in messages
    const NAME: &'static str;
    /// Path segment under `/api`
    const RESOURCE: &'static str;
    const TABLE: &'static str;
    /// Writable columns, in bind order. The `id` column is implicit.
    const COLUMNS: &'static [&'static str];
    const POLICY: ResourcePolicy = ResourcePolicy::STANDARD;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: Option<i64>);

    /// Bind the values of [`Entity::COLUMNS`] in order
    fn bind_columns<'q>(
        &'q self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments>;

    /// Decode a row selected as `id` followed by [`Entity::COLUMNS`]
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_relations_match_columns<E: Entity>() {
        for relation in relations_from(E::TABLE) {
            assert!(
                E::COLUMNS.contains(&relation.column),
                "{} has no column {}",
                E::TABLE,
                relation.column
            );
        }
    }

    #[test]
    fn relation_columns_exist() {
        assert_relations_match_columns::<Apartment>();
        assert_relations_match_columns::<User>();
        assert_relations_match_columns::<Booking>();
        assert_relations_match_columns::<Payment>();
        assert_relations_match_columns::<InstallmentPlan>();
        assert_relations_match_columns::<Inventory>();
        assert_relations_match_columns::<Feedback>();
    }

    #[test]
    fn only_apartments_answer_empty_lists_with_ok() {
        assert_eq!(Apartment::POLICY.empty_list, EmptyList::Ok);
        assert!(Apartment::POLICY.reject_null_payload);
        for policy in [
            User::POLICY,
            Booking::POLICY,
            Payment::POLICY,
            InstallmentPlan::POLICY,
            Inventory::POLICY,
            Feedback::POLICY,
        ] {
            assert_eq!(policy.empty_list, EmptyList::NoContent);
            assert!(!policy.reject_null_payload);
        }
    }

    #[test]
    fn inventory_is_one_to_one_with_apartment() {
        let relation = relations_from(inventory::TABLE)
            .find(|r| r.to_table == apartment::TABLE)
            .expect("inventory relation");
        assert!(relation.unique);
        assert_eq!(relation.on_delete, OnDelete::Cascade);
    }

    #[test]
    fn entity_ref_uses_id_object() {
        let json = serde_json::to_value(EntityRef::new(7)).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7 }));
        assert_eq!(EntityRef::from_column(None), None);
    }
}

//! In-memory store
//!
//! Holds every table behind one lock so that relation checks, cascades and
//! the write itself happen in a single critical section. Rows are kept in
//! their JSON representation, which lets one store serve every entity type.

use std::{
    collections::{BTreeMap, HashMap},
    marker::PhantomData,
    sync::Arc,
};

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::{FieldPatch, Gateway};
use crate::models::{Entity, OnDelete, Relation, relations_from, relations_to};

type Table = BTreeMap<i64, Value>;

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<&'static str, Table>,
    sequences: HashMap<&'static str, i64>,
}

impl Tables {
    fn table(&self, name: &str) -> Option<&Table> {
        self.rows.get(name)
    }

    fn contains(&self, name: &str, id: i64) -> bool {
        self.table(name).is_some_and(|t| t.contains_key(&id))
    }

    fn next_id(&mut self, name: &'static str) -> i64 {
        let seq = self.sequences.entry(name).or_insert(0);
        *seq += 1;
        *seq
    }

    /// Check the outgoing references of `row`, about to be stored as `id`
    fn check_references(&self, table: &str, id: Option<i64>, row: &Value) -> DatabaseResult<()> {
        for relation in relations_from(table) {
            let Some(target) = reference(row, relation) else {
                continue;
            };
            if !self.contains(relation.to_table, target) {
                return Err(DatabaseError::ForeignKey(format!(
                    "{}.{} references missing {} row {}",
                    relation.from_table, relation.column, relation.to_table, target
                )));
            }
            if relation.unique {
                let taken = self.table(table).is_some_and(|rows| {
                    rows.iter().any(|(other_id, other)| {
                        Some(*other_id) != id && reference(other, relation) == Some(target)
                    })
                });
                if taken {
                    return Err(DatabaseError::UniqueViolation(format!(
                        "{}.{} already holds {}",
                        relation.from_table, relation.column, target
                    )));
                }
            }
        }
        Ok(())
    }

    /// Ids in `relation.from_table` whose reference points at `id`
    fn dependents(&self, relation: &Relation, id: i64) -> Vec<i64> {
        self.table(relation.from_table)
            .map(|rows| {
                rows.iter()
                    .filter(|(_, row)| reference(row, relation) == Some(id))
                    .map(|(dependent, _)| *dependent)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Walk the delete policies reachable from one row without touching
    /// any table. Fails on the first restricting reference.
    fn plan_delete(&self, table: &'static str, id: i64, plan: &mut DeletePlan) -> DatabaseResult<()> {
        if plan.removed.contains(&(table, id)) {
            return Ok(());
        }
        plan.removed.push((table, id));

        for relation in relations_to(table) {
            let dependents = self.dependents(relation, id);
            if dependents.is_empty() {
                continue;
            }

            match relation.on_delete {
                OnDelete::Restrict => {
                    return Err(DatabaseError::ForeignKey(format!(
                        "{} row {} is still referenced by {}.{}",
                        table, id, relation.from_table, relation.column
                    )));
                }
                OnDelete::Cascade => {
                    for dependent in dependents {
                        self.plan_delete(relation.from_table, dependent, plan)?;
                    }
                }
                OnDelete::SetNull => {
                    plan.cleared.extend(
                        dependents
                            .into_iter()
                            .map(|dependent| (relation.from_table, dependent, relation.field)),
                    );
                }
            }
        }
        Ok(())
    }

    /// Remove a row and apply the delete policy of every relation pointing at it.
    /// Nothing is written unless the whole cascade is allowed.
    fn delete_row(&mut self, table: &'static str, id: i64) -> DatabaseResult<bool> {
        if !self.contains(table, id) {
            return Ok(false);
        }

        let mut plan = DeletePlan::default();
        self.plan_delete(table, id, &mut plan)?;

        for (from_table, dependent, field) in plan.cleared {
            if let Some(row) = self.rows.get_mut(from_table).and_then(|rows| rows.get_mut(&dependent)) {
                row[field] = Value::Null;
            }
        }
        for (from_table, removed) in plan.removed {
            if let Some(rows) = self.rows.get_mut(from_table) {
                rows.remove(&removed);
            }
        }
        debug!("Deleted {} row {} and its dependents", table, id);
        Ok(true)
    }
}

/// Rows a delete removes and references it clears, in the order found
#[derive(Debug, Default)]
struct DeletePlan {
    removed: Vec<(&'static str, i64)>,
    cleared: Vec<(&'static str, i64, &'static str)>,
}

fn reference(row: &Value, relation: &Relation) -> Option<i64> {
    row.get(relation.field)?.get("id")?.as_i64()
}

/// Shared in-memory backing for every [`MemoryGateway`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Gateway over one table of a [`MemoryStore`]
pub struct MemoryGateway<E> {
    store: MemoryStore,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> MemoryGateway<E> {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    fn encode(entity: &E, id: i64) -> DatabaseResult<Value> {
        let mut entity = entity.clone();
        entity.set_id(Some(id));
        serde_json::to_value(entity).map_err(|e| DatabaseError::Codec(e.to_string()))
    }

    fn decode(row: &Value) -> DatabaseResult<E> {
        E::deserialize(row).map_err(|e| DatabaseError::Codec(e.to_string()))
    }
}

#[async_trait]
impl<E: Entity> Gateway<E> for MemoryGateway<E> {
    async fn list(&self) -> DatabaseResult<Vec<E>> {
        let tables = self.store.inner.read().await;
        tables
            .table(E::TABLE)
            .map(|rows| rows.values().map(Self::decode).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn find(&self, id: i64) -> DatabaseResult<Option<E>> {
        debug!("Finding {} by ID: {}", E::NAME, id);
        let tables = self.store.inner.read().await;
        tables
            .table(E::TABLE)
            .and_then(|rows| rows.get(&id))
            .map(Self::decode)
            .transpose()
    }

    async fn insert(&self, entity: &E) -> DatabaseResult<E> {
        let mut tables = self.store.inner.write().await;

        let provisional = Self::encode(entity, 0)?;
        tables.check_references(E::TABLE, None, &provisional)?;

        let id = tables.next_id(E::TABLE);
        let row = Self::encode(entity, id)?;
        let stored = Self::decode(&row)?;
        tables.rows.entry(E::TABLE).or_default().insert(id, row);
        Ok(stored)
    }

    async fn replace(&self, id: i64, entity: &E) -> DatabaseResult<Option<E>> {
        let mut tables = self.store.inner.write().await;
        if !tables.contains(E::TABLE, id) {
            return Ok(None);
        }

        let row = Self::encode(entity, id)?;
        tables.check_references(E::TABLE, Some(id), &row)?;

        let stored = Self::decode(&row)?;
        tables.rows.entry(E::TABLE).or_default().insert(id, row);
        Ok(Some(stored))
    }

    async fn patch(&self, id: i64, patch: &FieldPatch) -> DatabaseResult<Option<E>> {
        let mut tables = self.store.inner.write().await;
        let Some(row) = tables.rows.get_mut(E::TABLE).and_then(|rows| rows.get_mut(&id)) else {
            return Ok(None);
        };

        row[patch.field] = patch.value.clone().map_or(Value::Null, Value::String);
        Self::decode(row).map(Some)
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let mut tables = self.store.inner.write().await;
        tables.delete_row(E::TABLE, id)
    }
}

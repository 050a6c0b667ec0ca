//! In-memory store used by unit tests.

#![allow(clippy::unwrap_used, clippy::cast_possible_truncation)]

use crate::models::{RowId, TargetTable};
use crate::storage::RemediationStore;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Mutex;

type Rows = BTreeMap<i64, (Option<String>, String)>;

/// In-memory store keyed by table name.
#[derive(Default)]
pub struct MemoryStore {
    pub tables: Mutex<BTreeMap<String, Rows>>,
    pub mutations: Mutex<Vec<(String, i64)>>,
    pub fail_after: Option<usize>,
}

impl MemoryStore {
    pub fn with_rows(table: &str, rows: &[(i64, Option<&str>)]) -> Self {
        let store = Self::default();
        store.insert(table, rows);
        store
    }

    pub fn insert(&self, table: &str, rows: &[(i64, Option<&str>)]) {
        let mut tables = self.tables.lock().unwrap();
        let entry = tables.entry(table.to_string()).or_default();
        for (id, payload) in rows {
            entry.insert(*id, (payload.map(str::to_string), "contract".to_string()));
        }
    }

    pub fn ids(&self, table: &str) -> Vec<i64> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map(|rows| rows.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn field(&self, table: &str, id: i64) -> Option<String> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .and_then(|rows| rows.get(&id))
            .map(|(_, field)| field.clone())
    }

    fn record(&self, table: &str, id: RowId) -> Result<()> {
        let mut mutations = self.mutations.lock().unwrap();
        if self.fail_after.is_some_and(|limit| mutations.len() >= limit) {
            return Err(Error::Database {
                operation: "commit".to_string(),
                cause: "connection lost".to_string(),
            });
        }
        mutations.push((table.to_string(), id.get()));
        Ok(())
    }
}

impl RemediationStore for MemoryStore {
    fn for_each_payload(
        &self,
        target: &TargetTable,
        visit: &mut dyn FnMut(RowId, Option<&str>),
    ) -> Result<u64> {
        let tables = self.tables.lock().unwrap();
        let Some(rows) = tables.get(&target.table) else {
            return Ok(0);
        };
        for (id, (payload, _)) in rows {
            visit(RowId::new(*id), payload.as_deref());
        }
        Ok(rows.len() as u64)
    }

    fn delete_row(&self, target: &TargetTable, id: RowId) -> Result<()> {
        self.record(&target.table, id)?;
        if let Some(rows) = self.tables.lock().unwrap().get_mut(&target.table) {
            rows.remove(&id.get());
        }
        Ok(())
    }

    fn clear_field(&self, target: &TargetTable, _column: &str, id: RowId) -> Result<()> {
        self.record(&target.table, id)?;
        if let Some(row) = self
            .tables
            .lock()
            .unwrap()
            .get_mut(&target.table)
            .and_then(|rows| rows.get_mut(&id.get()))
        {
            row.1.clear();
        }
        Ok(())
    }
}

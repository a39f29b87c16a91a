// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Factory and cache for transition tables.
//!
//! Tables are keyed by `(width, parity, constraint id)`. A cache builds each
//! key once and hands out shared [`Arc`]s, so samplers on the same cache reuse
//! each other's work. Construction holds the cache lock: concurrent sessions
//! on one cache serialize their builds, sessions on independent caches do not
//! interfere.

use crate::error::{Result, SweepError};
use crate::geometry::Parity;
use crate::memo::transitions::{RowConstraint, TransitionTable};
use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Key identifying one transition table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableKey {
    pub width: usize,
    pub parity: Parity,
    pub constraint: Option<String>,
}

impl TableKey {
    pub fn new(width: usize, parity: Parity, constraint: Option<&RowConstraint>) -> Self {
        Self {
            width,
            parity,
            constraint: constraint.map(|c| c.id().to_string()),
        }
    }
}

static GLOBAL: Lazy<TableCache> = Lazy::new(TableCache::new);

/// Width-keyed cache of transition tables.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: Mutex<HashMap<TableKey, Arc<TransitionTable>>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    pub fn global() -> &'static TableCache {
        &GLOBAL
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TableKey, Arc<TransitionTable>>>> {
        self.tables
            .lock()
            .map_err(|_| SweepError::invariant("transition table cache lock poisoned"))
    }

    /// The table for the key, building it on first use.
    pub fn table(
        &self,
        width: usize,
        parity: Parity,
        constraint: Option<&RowConstraint>,
    ) -> Result<Arc<TransitionTable>> {
        let key = TableKey::new(width, parity, constraint);
        let mut tables = self.lock()?;
        if let Some(table) = tables.get(&key) {
            return Ok(Arc::clone(table));
        }
        debug!("[TableCache] building {:?}", key);
        let table = Arc::new(TransitionTable::build(width, parity, constraint)?);
        tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// The table for an already built key.
    pub fn lookup(&self, key: &TableKey) -> Result<Arc<TransitionTable>> {
        self.lock()?.get(key).cloned().ok_or_else(|| {
            SweepError::configuration(format!("transition table {:?} has not been built", key))
        })
    }

    pub fn len(&self) -> usize {
        self.lock().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached table.
    pub fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }
}

//! In-memory document store with an optional JSON snapshot.
//!
//! All data lives behind a single [`tokio::sync::RwLock`]. Reads take the
//! shared lock; mutations run against a draft copy under the write lock and
//! only replace the live data once the draft has been persisted, so a failed
//! mutation or a failed snapshot write leaves the store untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info};

use crate::config::HrConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Conversation, Employee, WeekId, WeeklyRecord};

/// Everything the store holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    /// Catalog and settings, seeded from the YAML configuration.
    pub config: HrConfig,
    /// Employees keyed by id.
    #[serde(default)]
    pub employees: BTreeMap<String, Employee>,
    /// Weekly records keyed by ISO week.
    #[serde(default)]
    pub weekly_records: BTreeMap<WeekId, WeeklyRecord>,
    /// Conversations keyed by employee id.
    #[serde(default)]
    pub conversations: BTreeMap<String, Conversation>,
}

impl StoreData {
    /// Creates empty data around a configuration.
    pub fn new(config: HrConfig) -> Self {
        Self {
            config,
            employees: BTreeMap::new(),
            weekly_records: BTreeMap::new(),
            conversations: BTreeMap::new(),
        }
    }

    /// Looks up an employee.
    pub fn employee(&self, id: &str) -> EngineResult<&Employee> {
        self.employees
            .get(id)
            .ok_or_else(|| EngineError::EmployeeNotFound { id: id.to_string() })
    }

    /// Finds an employee by email, trimmed and case-insensitive.
    pub fn employee_by_email(&self, email: &str) -> Option<&Employee> {
        let email = email.trim();
        self.employees
            .values()
            .find(|e| e.email.trim().eq_ignore_ascii_case(email))
    }

    /// The weekly records holding data for an employee, stripped down to
    /// that employee's week.
    pub fn records_for(&self, employee_id: &str) -> Vec<WeeklyRecord> {
        self.weekly_records
            .values()
            .filter_map(|record| {
                let week = record.employees.get(employee_id)?;
                let mut own = WeeklyRecord::new(record.week_id);
                own.employees.insert(employee_id.to_string(), week.clone());
                Some(own)
            })
            .collect()
    }
}

/// The shared store.
#[derive(Debug)]
pub struct Store {
    data: RwLock<StoreData>,
    snapshot: Option<PathBuf>,
}

impl Store {
    /// Creates a store that keeps everything in memory.
    pub fn in_memory(config: HrConfig) -> Self {
        Self {
            data: RwLock::new(StoreData::new(config)),
            snapshot: None,
        }
    }

    /// Opens a store backed by a JSON snapshot.
    ///
    /// An existing snapshot is loaded as is (its catalog wins over `config`);
    /// otherwise the store starts empty with `config` and the snapshot is
    /// written on the first mutation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StorageError`] if the snapshot exists but
    /// cannot be read or parsed.
    pub async fn open(config: HrConfig, path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let data: StoreData =
                    serde_json::from_slice(&bytes).map_err(|e| EngineError::StorageError {
                        message: format!("failed to parse snapshot {}: {}", path.display(), e),
                    })?;
                info!(
                    path = %path.display(),
                    employees = data.employees.len(),
                    weeks = data.weekly_records.len(),
                    "Loaded store snapshot"
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No snapshot found, starting empty");
                StoreData::new(config)
            }
            Err(e) => {
                return Err(EngineError::StorageError {
                    message: format!("failed to read snapshot {}: {}", path.display(), e),
                });
            }
        };

        Ok(Self {
            data: RwLock::new(data),
            snapshot: Some(path),
        })
    }

    /// Takes the shared lock.
    pub async fn read(&self) -> RwLockReadGuard<'_, StoreData> {
        self.data.read().await
    }

    /// Applies a mutation atomically and persists the result.
    ///
    /// The closure works on a draft; if it fails, or the snapshot cannot be
    /// written, the live data is left as it was.
    pub async fn mutate<T, F>(&self, apply: F) -> EngineResult<T>
    where
        F: FnOnce(&mut StoreData) -> EngineResult<T>,
    {
        let mut guard = self.data.write().await;
        let mut draft = guard.clone();
        let output = apply(&mut draft)?;
        if let Some(path) = &self.snapshot {
            write_snapshot(path, &draft).await?;
        }
        *guard = draft;
        Ok(output)
    }
}

fn storage_error(path: &Path, error: impl std::fmt::Display) -> EngineError {
    EngineError::StorageError {
        message: format!("failed to write snapshot {}: {}", path.display(), error),
    }
}

async fn write_snapshot(path: &Path, data: &StoreData) -> EngineResult<()> {
    let bytes = serde_json::to_vec_pretty(data).map_err(|e| storage_error(path, e))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| storage_error(path, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| storage_error(path, e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Snapshot written");
    Ok(())
}

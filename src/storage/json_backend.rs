//! Filesystem-backed JSON persistence, one file per plan.

use std::{
    fs::{self, File, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use fs2::FileExt;
use uuid::Uuid;

use crate::{domain::SavingsPlan, errors::StoreError};

use super::{ensure_schema_support, PlanStore, Result};

const PLAN_EXTENSION: &str = "json";
const LOCK_EXTENSION: &str = "lock";
const PLANS_DIR: &str = "plans";
const TMP_SUFFIX: &str = "tmp";

/// Stores each plan as `<root>/plans/<PLAN-CODE>.json`.
///
/// New plans are published with a hard link so an existing code is never
/// overwritten. Updates hold an exclusive advisory lock on the sidecar
/// `<PLAN-CODE>.lock` while the stored version is re-read, compared and the
/// staged file renamed into place. The lock is taken per open file, so it
/// serializes saves across handles, threads and processes sharing a directory.
#[derive(Debug)]
pub struct JsonPlanStore {
    plans_dir: PathBuf,
}

/// Held for the duration of one compare-and-swap; unlocked on drop.
struct PlanFileLock {
    file: File,
}

impl Drop for PlanFileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl JsonPlanStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let plans_dir = root.into().join(PLANS_DIR);
        fs::create_dir_all(&plans_dir)?;
        Ok(Self { plans_dir })
    }

    pub fn plans_dir(&self) -> &Path {
        &self.plans_dir
    }

    /// `None` for codes that could escape the plans directory.
    pub fn plan_path(&self, plan_code: &str) -> Option<PathBuf> {
        let safe = !plan_code.is_empty()
            && plan_code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        safe.then(|| self.plans_dir.join(format!("{}.{}", plan_code, PLAN_EXTENSION)))
    }

    fn require_path(&self, plan_code: &str) -> Result<PathBuf> {
        self.plan_path(plan_code).ok_or_else(|| StoreError::Missing(plan_code.to_string()))
    }

    fn lock_plan(&self, plan_code: &str) -> Result<PlanFileLock> {
        let path = self.plans_dir.join(format!("{}.{}", plan_code, LOCK_EXTENSION));
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;
        file.lock_exclusive().map_err(|err| {
            StoreError::Unavailable(format!("lock {}: {err}", path.display()))
        })?;
        Ok(PlanFileLock { file })
    }

    fn staging_path(&self, path: &Path) -> PathBuf {
        let mut tmp = path.to_path_buf();
        let ext = format!("{}.{}.{}", PLAN_EXTENSION, Uuid::new_v4().simple(), TMP_SUFFIX);
        tmp.set_extension(ext);
        tmp
    }
}

impl PlanStore for JsonPlanStore {
    fn insert(&self, plan: &SavingsPlan) -> Result<()> {
        let path = self.require_path(plan.plan_code())?;
        let tmp = self.staging_path(&path);
        write_file(&tmp, &serialize_plan(plan)?)?;
        let published = fs::hard_link(&tmp, &path);
        let _ = fs::remove_file(&tmp);
        match published {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                Err(StoreError::DuplicateCode(plan.plan_code().to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn contains(&self, plan_code: &str) -> Result<bool> {
        Ok(self
            .plan_path(plan_code)
            .map(|path| path.is_file())
            .unwrap_or(false))
    }

    fn load(&self, plan_code: &str) -> Result<Option<SavingsPlan>> {
        let Some(path) = self.plan_path(plan_code) else {
            return Ok(None);
        };
        match fs::read_to_string(&path) {
            Ok(data) => {
                let plan = load_plan_from_str(&data)?;
                Ok(Some(plan))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, plan: &mut SavingsPlan, expected_version: u64) -> Result<()> {
        let path = self.require_path(plan.plan_code())?;
        let _lock = self.lock_plan(plan.plan_code())?;

        let current = match fs::read_to_string(&path) {
            Ok(data) => load_plan_from_str(&data)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::Missing(plan.plan_code().to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        if current.version() != expected_version {
            return Err(StoreError::VersionConflict {
                plan_code: plan.plan_code().to_string(),
                expected: expected_version,
                found: current.version(),
            });
        }

        let mut staged = plan.clone();
        staged.stamp_version(expected_version + 1);
        let tmp = self.staging_path(&path);
        write_file(&tmp, &serialize_plan(&staged)?)?;
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        plan.stamp_version(expected_version + 1);
        Ok(())
    }

    fn list_codes(&self) -> Result<Vec<String>> {
        if !self.plans_dir.exists() {
            return Ok(Vec::new());
        }
        let mut codes = Vec::new();
        for entry in fs::read_dir(&self.plans_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(PLAN_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                codes.push(stem.to_string());
            }
        }
        codes.sort();
        Ok(codes)
    }
}

/// Parses a plan snapshot, enforcing the schema guard and logging integrity issues.
pub fn load_plan_from_str(data: &str) -> Result<SavingsPlan> {
    let mut plan: SavingsPlan = serde_json::from_str(data)?;
    ensure_schema_support(&plan)?;
    let issues = plan.integrity_issues();
    if !issues.is_empty() {
        for issue in &issues {
            tracing::warn!(plan_code = %plan.plan_code(), %issue, "plan snapshot inconsistency");
        }
        plan.resync_total();
    }
    Ok(plan)
}

fn serialize_plan(plan: &SavingsPlan) -> Result<String> {
    Ok(serde_json::to_string_pretty(plan)?)
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

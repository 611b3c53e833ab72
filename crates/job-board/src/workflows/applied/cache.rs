use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::workflows::application::domain::JobId;

/// Local fallback copy of the applied-jobs set.
pub trait AppliedJobsCache: Send + Sync {
    fn get(&self) -> Result<BTreeSet<JobId>, CacheError>;
    fn set(&self, jobs: &BTreeSet<JobId>) -> Result<(), CacheError>;

    /// Adds `jobs` to whatever is already cached.
    fn merge(&self, jobs: &BTreeSet<JobId>) -> Result<(), CacheError> {
        let mut cached = self.get()?;
        cached.extend(jobs.iter().cloned());
        self.set(&cached)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to access applied jobs cache at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("applied jobs cache at {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("applied jobs cache unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
pub struct InMemoryAppliedJobsCache {
    jobs: Mutex<BTreeSet<JobId>>,
}

impl InMemoryAppliedJobsCache {
    pub fn with_jobs(jobs: impl IntoIterator<Item = JobId>) -> Self {
        Self {
            jobs: Mutex::new(jobs.into_iter().collect()),
        }
    }
}

impl AppliedJobsCache for InMemoryAppliedJobsCache {
    fn get(&self) -> Result<BTreeSet<JobId>, CacheError> {
        let guard = self
            .jobs
            .lock()
            .map_err(|err| CacheError::Unavailable(err.to_string()))?;
        Ok(guard.clone())
    }

    fn set(&self, jobs: &BTreeSet<JobId>) -> Result<(), CacheError> {
        let mut guard = self
            .jobs
            .lock()
            .map_err(|err| CacheError::Unavailable(err.to_string()))?;
        *guard = jobs.clone();
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    #[serde(rename = "appliedJobs", default)]
    applied_jobs: BTreeSet<JobId>,
}

/// JSON file cache, `{"appliedJobs": [...]}`. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileAppliedJobsCache {
    path: PathBuf,
}

impl FileAppliedJobsCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl AppliedJobsCache for FileAppliedJobsCache {
    fn get(&self) -> Result<BTreeSet<JobId>, CacheError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(err) => return Err(self.io_error(err)),
        };

        let file: CacheFile = serde_json::from_str(&raw).map_err(|source| CacheError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        Ok(file.applied_jobs)
    }

    fn set(&self, jobs: &BTreeSet<JobId>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let file = CacheFile {
            applied_jobs: jobs.clone(),
        };
        let body = serde_json::to_string_pretty(&file).map_err(|source| CacheError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, body).map_err(|err| self.io_error(err))
    }
}

//! File-backed document store
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/students/<id>.json   one document per student
//! <data_dir>/students/<id>.lock   present only while a save is in flight
//! ```
//!
//! The catalog is read from a separate TOML file. A save takes the
//! student's lock file (`create_new`), re-reads the stored version, writes
//! to a temp file and renames it into place, then releases the lock. A
//! writer that finds the version moved gets `ConcurrentModification`.
//!
//! The lock file holds the owner's pid and creation time. A lock older than
//! the store's stale threshold is treated as left behind by a crashed writer
//! and is broken. A younger lock on an unchanged document is reported as a
//! `Storage` error naming the lock file.

use super::Persistence;
use crate::core::catalog::Catalog;
use crate::core::error::{EngineError, EngineResult, Entity};
use crate::core::models::{Course, Student};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Age after which a student lock is assumed abandoned
pub const STALE_LOCK_AFTER: Duration = Duration::from_secs(30);

/// Student documents as JSON files plus a TOML catalog
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
    catalog_file: PathBuf,
    stale_lock_after: Duration,
}

/// Held while a student document is being rewritten; removes the lock on drop
struct LockGuard {
    path: PathBuf,
}

/// Owner of a lock file held by another writer
#[derive(Debug, Clone, Copy)]
struct LockHolder {
    pid: Option<u32>,
    age: Duration,
}

enum Lock {
    Acquired(LockGuard),
    Held(LockHolder),
}

fn since_epoch(time: SystemTime) -> Duration {
    time.duration_since(UNIX_EPOCH).unwrap_or_default()
}

impl LockHolder {
    /// Read the owner line; falls back to the file's mtime if it is unreadable
    fn read(path: &Path) -> Self {
        let content = fs::read_to_string(path).unwrap_or_default();
        let mut fields = content.split_whitespace();
        let pid = fields.next().and_then(|f| f.parse().ok());
        let created = fields
            .next()
            .and_then(|f| f.parse().ok())
            .map(Duration::from_secs)
            .or_else(|| {
                fs::metadata(path)
                    .and_then(|m| m.modified())
                    .ok()
                    .map(since_epoch)
            });
        let now = since_epoch(SystemTime::now());
        Self {
            pid,
            age: created.map_or(Duration::ZERO, |c| now.saturating_sub(c)),
        }
    }
}

impl fmt::Display for LockHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "pid {pid}, held {}s", self.age.as_secs()),
            None => write!(f, "unknown owner, held {}s", self.age.as_secs()),
        }
    }
}

impl LockGuard {
    /// Take the lock, or report who holds it
    fn acquire(path: PathBuf) -> EngineResult<Lock> {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                let guard = Self { path };
                writeln!(
                    file,
                    "{} {}",
                    std::process::id(),
                    since_epoch(SystemTime::now()).as_secs()
                )?;
                Ok(Lock::Acquired(guard))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Ok(Lock::Held(LockHolder::read(&path)))
            }
            Err(e) => Err(EngineError::Storage(format!(
                "failed to create lock {}: {e}",
                path.display()
            ))),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            crate::error!(
                target: "store",
                "Failed to release lock {}: {e}",
                self.path.display()
            );
        }
    }
}

impl JsonStore {
    /// Create a store rooted at `data_dir` reading the catalog from `catalog_file`
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, catalog_file: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            catalog_file: catalog_file.into(),
            stale_lock_after: STALE_LOCK_AFTER,
        }
    }

    /// Override the age at which a leftover lock is broken
    #[must_use]
    pub fn with_stale_lock_after(mut self, after: Duration) -> Self {
        self.stale_lock_after = after;
        self
    }

    /// Directory holding the student documents
    #[must_use]
    pub fn students_dir(&self) -> PathBuf {
        self.data_dir.join("students")
    }

    /// Path of the catalog file
    #[must_use]
    pub fn catalog_file(&self) -> &Path {
        &self.catalog_file
    }

    fn document_path(&self, id: &str) -> EngineResult<PathBuf> {
        check_id(id)?;
        Ok(self.students_dir().join(format!("{id}.json")))
    }

    fn lock_path(&self, id: &str) -> PathBuf {
        self.students_dir().join(format!("{id}.lock"))
    }

    /// Take a student's lock, breaking it first if its holder is stale
    fn lock(&self, id: &str) -> EngineResult<Lock> {
        let path = self.lock_path(id);
        match LockGuard::acquire(path.clone())? {
            Lock::Held(holder) if holder.age >= self.stale_lock_after => {
                crate::warn!(
                    target: "store",
                    "Breaking stale lock {} ({holder})",
                    path.display()
                );
                match fs::remove_file(&path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
                LockGuard::acquire(path)
            }
            lock => Ok(lock),
        }
    }

    fn read_document(path: &Path) -> EngineResult<Option<Student>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EngineError::Storage(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn write_document(path: &Path, student: &Student) -> EngineResult<()> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(student)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// Ids become file names, so only a conservative character set is allowed
fn check_id(id: &str) -> EngineResult<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(EngineError::Storage(format!("invalid student id '{id}'")))
    }
}

impl Persistence for JsonStore {
    fn load_student(&self, id: &str) -> EngineResult<Student> {
        let path = self.document_path(id)?;
        crate::debug!(target: "store", "Loading {}", path.display());
        Self::read_document(&path)?.ok_or_else(|| EngineError::student_not_found(id))
    }

    fn load_course(&self, id: &str) -> EngineResult<Course> {
        self.list_courses()?
            .into_iter()
            .find(|c| c.code == id)
            .ok_or_else(|| EngineError::course_not_found(id))
    }

    fn list_courses(&self) -> EngineResult<Vec<Course>> {
        let content = fs::read_to_string(&self.catalog_file).map_err(|e| {
            EngineError::Storage(format!(
                "failed to read catalog {}: {e}",
                self.catalog_file.display()
            ))
        })?;
        Catalog::parse_courses(&content)
    }

    fn save_student(&self, student: &Student) -> EngineResult<u64> {
        let path = self.document_path(&student.id)?;

        let _guard = match self.lock(&student.id)? {
            Lock::Acquired(guard) => guard,
            Lock::Held(holder) => {
                let found_version = Self::read_document(&path)?.map_or(0, |s| s.version);
                if found_version != student.version {
                    return Err(EngineError::ConcurrentModification {
                        student_id: student.id.clone(),
                        expected_version: student.version,
                        found_version,
                    });
                }
                return Err(EngineError::Storage(format!(
                    "student '{}' is locked by {} ({holder}); remove it if no other writer is running",
                    student.id,
                    self.lock_path(&student.id).display()
                )));
            }
        };

        let stored =
            Self::read_document(&path)?.ok_or_else(|| EngineError::student_not_found(&student.id))?;
        if stored.version != student.version {
            return Err(EngineError::ConcurrentModification {
                student_id: student.id.clone(),
                expected_version: student.version,
                found_version: stored.version,
            });
        }

        let mut next = student.clone();
        next.version += 1;
        Self::write_document(&path, &next)?;

        crate::debug!(
            target: "store",
            "Wrote {} at version {}",
            path.display(),
            next.version
        );
        Ok(next.version)
    }

    fn create_student(&self, mut student: Student) -> EngineResult<Student> {
        let path = self.document_path(&student.id)?;
        fs::create_dir_all(self.students_dir())?;

        let Lock::Acquired(_guard) = self.lock(&student.id)? else {
            return Err(EngineError::AlreadyExists {
                entity: Entity::Student,
                id: student.id,
            });
        };
        if path.exists() {
            return Err(EngineError::AlreadyExists {
                entity: Entity::Student,
                id: student.id,
            });
        }

        student.version = 0;
        Self::write_document(&path, &student)?;
        crate::info!(target: "store", "Created student '{}'", student.id);
        Ok(student)
    }

    fn list_students(&self) -> EngineResult<Vec<Student>> {
        let dir = self.students_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut students = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(student) = Self::read_document(&path)? {
                    students.push(student);
                }
            }
        }
        students.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(students)
    }
}

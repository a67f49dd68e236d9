//! In-process store for tests and embedding

use super::Persistence;
use crate::core::error::{EngineError, EngineResult, Entity};
use crate::core::models::{Course, Student};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Students behind a lock plus a fixed catalog
#[derive(Debug, Default)]
pub struct MemoryStore {
    courses: Vec<Course>,
    students: RwLock<BTreeMap<String, Student>>,
}

impl MemoryStore {
    /// Create a store with the given catalog and no students
    #[must_use]
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            courses,
            students: RwLock::new(BTreeMap::new()),
        }
    }
}

fn poisoned<T>(_: PoisonError<T>) -> EngineError {
    EngineError::Storage("student map lock poisoned".to_string())
}

impl Persistence for MemoryStore {
    fn load_student(&self, id: &str) -> EngineResult<Student> {
        self.students
            .read()
            .map_err(poisoned)?
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::student_not_found(id))
    }

    fn load_course(&self, id: &str) -> EngineResult<Course> {
        self.courses
            .iter()
            .find(|c| c.code == id)
            .cloned()
            .ok_or_else(|| EngineError::course_not_found(id))
    }

    fn list_courses(&self) -> EngineResult<Vec<Course>> {
        Ok(self.courses.clone())
    }

    fn save_student(&self, student: &Student) -> EngineResult<u64> {
        let mut students = self.students.write().map_err(poisoned)?;
        let stored = students
            .get_mut(&student.id)
            .ok_or_else(|| EngineError::student_not_found(&student.id))?;

        if stored.version != student.version {
            return Err(EngineError::ConcurrentModification {
                student_id: student.id.clone(),
                expected_version: student.version,
                found_version: stored.version,
            });
        }

        let mut next = student.clone();
        next.version += 1;
        *stored = next;
        crate::debug!(
            target: "store",
            "Saved student '{}' at version {}",
            student.id,
            stored.version
        );
        Ok(stored.version)
    }

    fn create_student(&self, mut student: Student) -> EngineResult<Student> {
        let mut students = self.students.write().map_err(poisoned)?;
        if students.contains_key(&student.id) {
            return Err(EngineError::AlreadyExists {
                entity: Entity::Student,
                id: student.id,
            });
        }
        student.version = 0;
        students.insert(student.id.clone(), student.clone());
        Ok(student)
    }

    fn list_students(&self) -> EngineResult<Vec<Student>> {
        Ok(self
            .students
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Semester;

    fn store() -> MemoryStore {
        MemoryStore::new(vec![Course::new(
            "CS101".into(),
            "Programming".into(),
            4,
            Semester::Term1,
            1,
        )])
    }

    #[test]
    fn test_create_and_load() {
        let store = store();
        store
            .create_student(Student::new("s1".into(), "Sam".into(), String::new(), 2024))
            .unwrap();
        assert_eq!(store.load_student("s1").unwrap().name, "Sam");
        assert!(matches!(
            store.load_student("s2"),
            Err(EngineError::NotFound { .. })
        ));
        assert!(matches!(
            store.create_student(Student::new("s1".into(), "Other".into(), String::new(), 2024)),
            Err(EngineError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn test_save_bumps_version() {
        let store = store();
        let created = store
            .create_student(Student::new("s1".into(), "Sam".into(), String::new(), 2024))
            .unwrap();
        assert_eq!(store.save_student(&created).unwrap(), 1);
        assert_eq!(store.load_student("s1").unwrap().version, 1);
    }

    #[test]
    fn test_stale_writer_is_rejected() {
        let store = store();
        store
            .create_student(Student::new("s1".into(), "Sam".into(), String::new(), 2024))
            .unwrap();

        let mut first = store.load_student("s1").unwrap();
        let mut second = store.load_student("s1").unwrap();

        first.name = "Samuel".into();
        store.save_student(&first).unwrap();

        second.program = "BSc".into();
        let err = store.save_student(&second).unwrap_err();
        assert_eq!(
            err,
            EngineError::ConcurrentModification {
                student_id: "s1".into(),
                expected_version: 0,
                found_version: 1,
            }
        );
        let stored = store.load_student("s1").unwrap();
        assert_eq!(stored.name, "Samuel");
        assert!(stored.program.is_empty());
    }

    #[test]
    fn test_load_course() {
        let store = store();
        assert_eq!(store.load_course("CS101").unwrap().credits, 4);
        assert!(store.load_course("CS999").is_err());
    }
}

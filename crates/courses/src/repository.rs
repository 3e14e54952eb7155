use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Deserialize;

use coursebook_core::{DomainError, DomainResult, Entity, IdSequence};

use crate::course::{seed_courses, Course, CourseId, CourseName};

/// How a newly created course gets its id.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdAssignment {
    /// Counter that never goes backwards; deleted ids are never reused.
    #[default]
    Monotonic,
    /// `collection length + 1`. Can duplicate a live id after a deletion.
    LengthPlusOne,
}

/// Ordered collection of courses.
///
/// Lookups match the first course with the given id; `list` preserves insertion
/// order.
pub trait CourseRepository: Send + Sync {
    fn list(&self) -> DomainResult<Vec<Course>>;
    fn get(&self, id: CourseId) -> DomainResult<Course>;
    fn create(&self, name: CourseName) -> DomainResult<Course>;
    /// Rename in place and return the updated record.
    fn update(&self, id: CourseId, name: CourseName) -> DomainResult<Course>;
    /// Remove and return the record as it was.
    fn delete(&self, id: CourseId) -> DomainResult<Course>;
}

impl<S> CourseRepository for Arc<S>
where
    S: CourseRepository + ?Sized,
{
    fn list(&self) -> DomainResult<Vec<Course>> {
        (**self).list()
    }

    fn get(&self, id: CourseId) -> DomainResult<Course> {
        (**self).get(id)
    }

    fn create(&self, name: CourseName) -> DomainResult<Course> {
        (**self).create(name)
    }

    fn update(&self, id: CourseId, name: CourseName) -> DomainResult<Course> {
        (**self).update(id, name)
    }

    fn delete(&self, id: CourseId) -> DomainResult<Course> {
        (**self).delete(id)
    }
}

#[derive(Debug)]
struct State {
    courses: Vec<Course>,
    ids: IdSequence,
}

impl State {
    fn position(&self, id: CourseId) -> DomainResult<usize> {
        self.courses
            .iter()
            .position(|c| c.id() == id)
            .ok_or(DomainError::NotFound)
    }
}

/// Process-memory course store. One writer at a time, many readers.
#[derive(Debug)]
pub struct InMemoryCourseRepository {
    inner: RwLock<State>,
    assignment: IdAssignment,
}

impl InMemoryCourseRepository {
    /// Repository holding the four seed courses.
    pub fn seeded(assignment: IdAssignment) -> Self {
        Self::with_courses(seed_courses(), assignment)
    }

    pub fn with_courses(courses: Vec<Course>, assignment: IdAssignment) -> Self {
        let last = courses.iter().map(|c| c.id().get()).max().unwrap_or(0);
        Self {
            inner: RwLock::new(State {
                courses,
                ids: IdSequence::starting_after(last),
            }),
            assignment,
        }
    }

    pub fn assignment(&self) -> IdAssignment {
        self.assignment
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, State>> {
        self.inner
            .read()
            .map_err(|_| DomainError::unavailable("course store lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, State>> {
        self.inner
            .write()
            .map_err(|_| DomainError::unavailable("course store lock poisoned"))
    }
}

impl Default for InMemoryCourseRepository {
    fn default() -> Self {
        Self::seeded(IdAssignment::default())
    }
}

impl CourseRepository for InMemoryCourseRepository {
    fn list(&self) -> DomainResult<Vec<Course>> {
        Ok(self.read()?.courses.clone())
    }

    fn get(&self, id: CourseId) -> DomainResult<Course> {
        let state = self.read()?;
        let idx = state.position(id)?;
        Ok(state.courses[idx].clone())
    }

    fn create(&self, name: CourseName) -> DomainResult<Course> {
        let mut state = self.write()?;
        let id = match self.assignment {
            IdAssignment::Monotonic => state.ids.next_id()?,
            IdAssignment::LengthPlusOne => {
                let id = u32::try_from(state.courses.len() + 1)
                    .map_err(|_| DomainError::unavailable("id space exhausted"))?;
                state.ids.observe(id);
                id
            }
        };

        let course = Course::new(CourseId::new(id), name);
        state.courses.push(course.clone());
        tracing::debug!(course_id = id, "course created");
        Ok(course)
    }

    fn update(&self, id: CourseId, name: CourseName) -> DomainResult<Course> {
        let mut state = self.write()?;
        let idx = state.position(id)?;
        let course = &mut state.courses[idx];
        course.rename(name);
        Ok(course.clone())
    }

    fn delete(&self, id: CourseId) -> DomainResult<Course> {
        let mut state = self.write()?;
        let idx = state.position(id)?;
        let removed = state.courses.remove(idx);
        tracing::debug!(course_id = id.get(), "course deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> CourseName {
        CourseName::parse(s).unwrap()
    }

    #[test]
    fn seeded_repository_lists_four_courses_in_order() {
        let repo = InMemoryCourseRepository::default();
        let ids: Vec<u32> = repo.list().unwrap().iter().map(|c| c.id().get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn create_appends_with_next_id() {
        let repo = InMemoryCourseRepository::default();
        let created = repo.create(name("course5")).unwrap();
        assert_eq!(created.id(), CourseId::new(5));
        assert_eq!(created.name().as_str(), "course5");

        let all = repo.list().unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all.last(), Some(&created));
    }

    #[test]
    fn get_missing_is_not_found() {
        let repo = InMemoryCourseRepository::default();
        assert_eq!(repo.get(CourseId::new(99)).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn update_renames_in_place() {
        let repo = InMemoryCourseRepository::default();
        let updated = repo.update(CourseId::new(2), name("databases")).unwrap();
        assert_eq!(updated.name().as_str(), "databases");

        let all = repo.list().unwrap();
        assert_eq!(all[1], updated);
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn update_missing_is_not_found() {
        let repo = InMemoryCourseRepository::default();
        let err = repo.update(CourseId::new(42), name("databases")).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn delete_returns_prior_record_and_removes_it() {
        let repo = InMemoryCourseRepository::default();
        let removed = repo.delete(CourseId::new(1)).unwrap();
        assert_eq!(removed.id(), CourseId::new(1));
        assert_eq!(removed.name().as_str(), "course1");

        assert_eq!(repo.get(CourseId::new(1)).unwrap_err(), DomainError::NotFound);
        assert_eq!(repo.delete(CourseId::new(1)).unwrap_err(), DomainError::NotFound);
        assert_eq!(repo.list().unwrap().len(), 3);
    }

    #[test]
    fn monotonic_ids_are_not_reused_after_delete() {
        let repo = InMemoryCourseRepository::seeded(IdAssignment::Monotonic);
        repo.delete(CourseId::new(4)).unwrap();
        let created = repo.create(name("course5")).unwrap();
        assert_eq!(created.id(), CourseId::new(5));
    }

    #[test]
    fn length_plus_one_reproduces_duplicate_ids() {
        let repo = InMemoryCourseRepository::seeded(IdAssignment::LengthPlusOne);
        repo.delete(CourseId::new(1)).unwrap();
        let created = repo.create(name("again")).unwrap();
        assert_eq!(created.id(), CourseId::new(4));

        let dupes = repo
            .list()
            .unwrap()
            .iter()
            .filter(|c| c.id() == CourseId::new(4))
            .count();
        assert_eq!(dupes, 2);
        // first match wins
        assert_eq!(repo.get(CourseId::new(4)).unwrap().name().as_str(), "course4");
    }

    #[test]
    fn empty_repository_starts_at_one() {
        let repo = InMemoryCourseRepository::with_courses(Vec::new(), IdAssignment::Monotonic);
        assert_eq!(repo.create(name("first")).unwrap().id(), CourseId::new(1));
    }

    #[test]
    fn shared_through_arc() {
        let repo: Arc<dyn CourseRepository> = Arc::new(InMemoryCourseRepository::default());
        let clone = Arc::clone(&repo);
        clone.create(name("course5")).unwrap();
        assert_eq!(repo.list().unwrap().len(), 5);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Create,
            Delete(u32),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![Just(Op::Create), (1u32..12).prop_map(Op::Delete)]
        }

        proptest! {
            /// Property: with monotonic assignment, every created id is larger than all
            /// ids seen before, and live ids stay unique.
            #[test]
            fn monotonic_ids_strictly_increase(ops in proptest::collection::vec(op(), 0..40)) {
                let repo = InMemoryCourseRepository::seeded(IdAssignment::Monotonic);
                let mut highest = 4u32;
                for op in ops {
                    match op {
                        Op::Create => {
                            let before = repo.list().unwrap().len();
                            let created = repo.create(name("generated")).unwrap();
                            prop_assert!(created.id().get() > highest);
                            highest = created.id().get();
                            prop_assert_eq!(repo.list().unwrap().len(), before + 1);
                        }
                        Op::Delete(id) => {
                            let _ = repo.delete(CourseId::new(id));
                        }
                    }
                }

                let mut ids: Vec<u32> = repo.list().unwrap().iter().map(|c| c.id().get()).collect();
                let total = ids.len();
                ids.sort_unstable();
                ids.dedup();
                prop_assert_eq!(ids.len(), total);
            }
        }
    }
}

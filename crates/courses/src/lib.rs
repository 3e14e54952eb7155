//! Courses domain module.
//!
//! Business rules for course records, implemented as plain domain logic (no HTTP):
//! the `Course` entity, request validation, and the in-memory repository that owns
//! the collection.

pub mod course;
pub mod repository;
pub mod validation;

pub use course::{seed_courses, Course, CourseId, CourseName, MIN_NAME_LEN};
pub use repository::{CourseRepository, IdAssignment, InMemoryCourseRepository};
pub use validation::{validate_course, CourseRequest};

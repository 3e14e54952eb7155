use serde::Serialize;

use coursebook_core::{DomainError, DomainResult, Entity, ValueObject};

coursebook_core::numeric_id!(
    /// Course identifier (positive, assigned by the repository).
    CourseId
);

/// Minimum length of a course name, counted in characters after trimming.
pub const MIN_NAME_LEN: usize = 3;

/// A validated course name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CourseName(String);

impl ValueObject for CourseName {}

impl CourseName {
    /// Trim `raw` and check it against the name rules.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("\"name\" is not allowed to be empty"));
        }
        if trimmed.chars().count() < MIN_NAME_LEN {
            return Err(DomainError::validation(format!(
                "\"name\" length must be at least {MIN_NAME_LEN} characters long"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for CourseName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A course record. Serializes as `{"id": .., "name": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    id: CourseId,
    name: CourseName,
}

impl Course {
    pub fn new(id: CourseId, name: CourseName) -> Self {
        Self { id, name }
    }

    pub fn name(&self) -> &CourseName {
        &self.name
    }

    /// Replace the name, keeping identity.
    pub fn rename(&mut self, name: CourseName) {
        self.name = name;
    }
}

impl Entity for Course {
    type Id = CourseId;

    fn id(&self) -> CourseId {
        self.id
    }
}

/// The four records every process starts with: `course1` through `course4`.
pub fn seed_courses() -> Vec<Course> {
    (1..=4u32)
        .map(|n| {
            Course::new(
                CourseId::new(n),
                CourseName(format!("course{n}")),
            )
        })
        .collect()
}

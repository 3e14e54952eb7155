//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**. They are immutable and compared by their
/// attribute values; to "modify" one, build a new one.
///
/// Constructors of value objects are where validation lives: once a value object
/// exists, it is known to satisfy its rules.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct CourseName(String);
///
/// impl ValueObject for CourseName {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

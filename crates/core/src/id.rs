//! Strongly-typed numeric identifiers and sequential id allocation.

use crate::error::{DomainError, DomainResult};

/// Declare a positive-integer identifier newtype.
///
/// The generated type serializes as a bare `u32`, displays as the bare number and
/// parses from decimal text. Zero is rejected by `FromStr`. Serde is reached through
/// this crate, so callers need no `serde` dependency of their own.
///
/// ```ignore
/// coursebook_core::numeric_id!(
///     /// Identifier of a course.
///     CourseId
/// );
/// ```
#[macro_export]
macro_rules! numeric_id {
    ($(#[$meta:meta])* $t:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $t(u32);

        impl $t {
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl $crate::__serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::__serde::Serializer,
            {
                serializer.serialize_u32(self.0)
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: $crate::__serde::Deserializer<'de>,
            {
                <u32 as $crate::__serde::Deserialize<'de>>::deserialize(deserializer).map(Self)
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u32> for $t {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u32 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value: u32 = s.parse().map_err(|e| {
                    $crate::DomainError::invalid_id(format!("{}: {}", stringify!($t), e))
                })?;
                if value == 0 {
                    return Err($crate::DomainError::invalid_id(format!(
                        "{}: must be positive",
                        stringify!($t)
                    )));
                }
                Ok(Self(value))
            }
        }
    };
}

/// Monotonic allocator for positive integer ids.
///
/// Never hands out the same value twice, regardless of what happens to the
/// entities that were given earlier values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    last: u32,
}

impl IdSequence {
    /// Sequence whose first allocated id is 1.
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Sequence whose first allocated id is `last + 1`.
    pub fn starting_after(last: u32) -> Self {
        Self { last }
    }

    /// The most recently allocated (or seeded) value.
    pub fn last(&self) -> u32 {
        self.last
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> DomainResult<u32> {
        let next = self
            .last
            .checked_add(1)
            .ok_or_else(|| DomainError::unavailable("id space exhausted"))?;
        self.last = next;
        Ok(next)
    }

    /// Make sure later allocations stay above `id`.
    pub fn observe(&mut self, id: u32) {
        self.last = self.last.max(id);
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

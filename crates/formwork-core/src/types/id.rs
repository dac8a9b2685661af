use serde::{Deserialize, Serialize, Serializer, de::Deserializer};
use std::{
    fmt::{self, Debug, Display},
    str::FromStr,
    sync::{LazyLock, Mutex},
};
use thiserror::Error as ThisError;
use ulid::Ulid;

///
/// GENERATOR is lazily initiated with a Mutex
/// it has to keep state so ids stay strictly monotonic per process
///

static GENERATOR: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::new()));

fn next_ulid() -> Ulid {
    let mut generator = GENERATOR.lock().expect("id generator mutex poisoned");

    generator.next()
}

///
/// Generator
///
/// Monotonic ULID generation; increments within the same millisecond so a
/// deleted id can never be handed out again by a later allocation.
///

struct Generator {
    previous: Ulid,
}

impl Generator {
    const fn new() -> Self {
        Self {
            previous: Ulid::nil(),
        }
    }

    fn next(&mut self) -> Ulid {
        let fresh = Ulid::new();

        // same millisecond, or time went backward: increment instead of
        // taking the fresh value so the sequence stays strictly increasing
        let next = if fresh > self.previous {
            fresh
        } else {
            self.previous.increment().unwrap_or(fresh)
        };
        self.previous = next;

        next
    }
}

///
/// IdError
///

#[derive(Debug, ThisError)]
pub enum IdError {
    #[error("invalid id string")]
    InvalidString,
}

macro_rules! declare_id {
    ( $( $(#[$attr:meta])* $name:ident ),* $(,)? ) => {
        $(
            $(#[$attr])*
            #[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
            #[repr(transparent)]
            pub struct $name(Ulid);

            impl $name {
                /// Allocate a fresh id from the process-wide monotonic generator.
                #[must_use]
                pub fn generate() -> Self {
                    Self(next_ulid())
                }

                #[must_use]
                pub const fn nil() -> Self {
                    Self(Ulid::nil())
                }
            }

            impl Debug for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!(stringify!($name), "({})"), self.0)
                }
            }

            impl Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    Display::fmt(&self.0, f)
                }
            }

            impl FromStr for $name {
                type Err = IdError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Ulid::from_string(s)
                        .map(Self)
                        .map_err(|_| IdError::InvalidString)
                }
            }

            impl Serialize for $name {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.serialize_str(&self.to_string())
                }
            }

            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let s = String::deserialize(deserializer)?;
                    s.parse()
                        .map_err(|_| serde::de::Error::custom(format!("invalid id: {s}")))
                }
            }
        )*
    };
}

declare_id! {
    ///
    /// FieldId
    /// Stable identity of one field; immutable once assigned.
    ///
    FieldId,

    ///
    /// FormId
    /// Identity of a persisted form snapshot.
    ///
    FormId,
}

///
/// TESTS
///

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

///
/// Timestamp
/// (in milliseconds since the Unix epoch)
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(u64::MIN);

    /// Construct from milliseconds.
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Current wall-clock timestamp in milliseconds.
    ///
    /// Clocks before the Unix epoch collapse to `EPOCH`.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn now() -> Self {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);

        Self(ms)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

///
/// TESTS
///

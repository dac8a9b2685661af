use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Debug, Display},
    sync::OnceLock,
};
use time::{Date as TimeDate, Duration as TimeDuration, Month, format_description::FormatItem};

static FORMAT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();

///
/// Date
///
/// Calendar date stored as whole days relative to 1970-01-01.
/// The ISO `YYYY-MM-DD` text form is the only supported interchange shape;
/// anything that fails to parse is simply not a date.
///

#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Date(i32);

impl Date {
    pub const EPOCH: Self = Self(0);

    const fn epoch_date() -> TimeDate {
        // Safe: constant valid date
        match TimeDate::from_calendar_date(1970, Month::January, 1) {
            Ok(d) => d,
            Err(_) => unreachable!(),
        }
    }

    #[must_use]
    pub fn new_checked(y: i32, m: u8, d: u8) -> Option<Self> {
        let month = Month::try_from(m).ok()?;
        let date = TimeDate::from_calendar_date(y, month, d).ok()?;

        Some(Self::from_time_date(date))
    }

    /// Parse an ISO `YYYY-MM-DD` string into a `Date`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let format =
            FORMAT.get_or_init(|| time::format_description::parse("[year]-[month]-[day]").unwrap());

        TimeDate::parse(s, format).ok().map(Self::from_time_date)
    }

    /// Current wall-clock date in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self::from_time_date(time::OffsetDateTime::now_utc().date())
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Returns the year component (e.g. 2025)
    #[must_use]
    pub fn year(self) -> i32 {
        self.to_time_date().year()
    }

    /// Returns the month component (1–12)
    #[must_use]
    pub fn month(self) -> u8 {
        self.to_time_date().month().into()
    }

    /// Returns the day-of-month component (1–31)
    #[must_use]
    pub fn day(self) -> u8 {
        self.to_time_date().day()
    }

    /// Whole calendar years elapsed from `self` to `later`.
    ///
    /// Counts completed years only; the count ticks up on the anniversary
    /// day itself. Negative when `later` precedes `self`.
    #[must_use]
    pub fn years_until(self, later: Self) -> i32 {
        let from = self.to_time_date();
        let to = later.to_time_date();

        let mut years = to.year() - from.year();
        let from_md = (u8::from(from.month()), from.day());
        let to_md = (u8::from(to.month()), to.day());
        if to_md < from_md {
            years -= 1;
        }

        years
    }

    #[expect(clippy::cast_possible_truncation)]
    fn from_time_date(date: TimeDate) -> Self {
        let epoch = Self::epoch_date();
        let days = (date - epoch).whole_days();

        Self(days as i32)
    }

    fn to_time_date(self) -> TimeDate {
        let epoch = Self::epoch_date();
        let delta = TimeDuration::days(self.0.into());
        epoch.checked_add(delta).unwrap_or({
            if self.0 >= 0 {
                TimeDate::MAX
            } else {
                TimeDate::MIN
            }
        })
    }
}

impl Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date({self})")
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.to_time_date();
        let month: u8 = d.month().into();
        write!(f, "{:04}-{:02}-{:02}", d.year(), month, d.day())
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}")))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_round_trip() {
        let date = Date::new_checked(2024, 10, 19).unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 10);
        assert_eq!(date.day(), 19);
    }

    #[test]
    fn invalid_date_parse_returns_none() {
        assert!(Date::parse("2025-13-40").is_none());
        assert!(Date::parse("not-a-date").is_none());
        assert!(Date::new_checked(2025, 2, 30).is_none());
    }

    #[test]
    fn ordering_and_equality_work() {
        let d1 = Date::new_checked(2020, 1, 1).unwrap();
        let d2 = Date::new_checked(2021, 1, 1).unwrap();
        assert!(d1 < d2);
        assert_eq!(d1, d1);
    }

    #[test]
    fn display_formats_as_iso_date() {
        let date = Date::new_checked(2025, 10, 19).unwrap();
        assert_eq!(format!("{date}"), "2025-10-19");
    }

    #[test]
    fn years_until_ticks_on_the_anniversary() {
        let born = Date::parse("2000-06-15").unwrap();

        let day_before = Date::new_checked(2025, 6, 14).unwrap();
        let birthday = Date::new_checked(2025, 6, 15).unwrap();
        let day_after = Date::new_checked(2025, 6, 16).unwrap();

        assert_eq!(born.years_until(day_before), 24);
        assert_eq!(born.years_until(birthday), 25);
        assert_eq!(born.years_until(day_after), 25);
    }

    #[test]
    fn years_until_is_negative_for_future_starts() {
        let later = Date::parse("2030-01-01").unwrap();
        let earlier = Date::parse("2020-01-01").unwrap();
        assert_eq!(later.years_until(earlier), -10);
    }

    #[test]
    fn serde_round_trips_iso_text() {
        let date = Date::parse("1999-12-31").unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"1999-12-31\"");

        let back: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }
}

//! # TIC Horodate
//!
//! Standard mode groups may carry a timestamp formatted as `SAAMMJJhhmmss`:
//!
//! - `S`: season, `E` (summer) or `H` (winter), in lowercase when the meter
//!   clock runs in degraded mode, or a space when no season is known
//! - `AAMMJJ`: two digit year (20AA), month and day
//! - `hhmmss`: local time
//!
//! Parsing uses `nom` for the fixed layout and `chrono` to reject impossible dates.

use crate::error::TicError;
use chrono::{NaiveDate, NaiveDateTime};
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::one_of,
    combinator::{all_consuming, map_res},
    sequence::tuple,
    IResult,
};
use serde::Serialize;
use std::fmt;

/// Season flag of a horodate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Season {
    Summer,
    Winter,
    Unknown,
}

/// A decoded TIC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Horodate {
    pub season: Season,
    /// Set when the meter reports its clock as degraded.
    pub degraded: bool,
    pub datetime: NaiveDateTime,
}

impl Horodate {
    /// Parses a `SAAMMJJhhmmss` horodate.
    pub fn parse(raw: &str) -> Result<Self, TicError> {
        let (_, (flag, (year, month, day, hour, minute, second))) =
            all_consuming(horodate_fields)(raw)
                .map_err(|e| TicError::InvalidHorodate(format!("{raw:?}: {e:?}")))?;

        let (season, degraded) = match flag {
            'E' => (Season::Summer, false),
            'e' => (Season::Summer, true),
            'H' => (Season::Winter, false),
            'h' => (Season::Winter, true),
            _ => (Season::Unknown, false),
        };

        let datetime = NaiveDate::from_ymd_opt(2000 + year as i32, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .ok_or_else(|| TicError::InvalidHorodate(format!("{raw:?}: out of range")))?;

        Ok(Horodate {
            season,
            degraded,
            datetime,
        })
    }
}

impl fmt::Display for Horodate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let season = match self.season {
            Season::Summer => "summer",
            Season::Winter => "winter",
            Season::Unknown => "unknown season",
        };
        write!(f, "{} ({season}", self.datetime)?;
        if self.degraded {
            write!(f, ", degraded clock")?;
        }
        write!(f, ")")
    }
}

type HorodateFields = (char, (u32, u32, u32, u32, u32, u32));

fn horodate_fields(input: &str) -> IResult<&str, HorodateFields> {
    tuple((
        one_of("EeHh "),
        tuple((
            two_digits, two_digits, two_digits, two_digits, two_digits, two_digits,
        )),
    ))(input)
}

fn two_digits(input: &str) -> IResult<&str, u32> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_digit()),
        |s: &str| s.parse::<u32>(),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_winter_horodate() {
        let h = Horodate::parse("H081225223518").unwrap();
        assert_eq!(h.season, Season::Winter);
        assert!(!h.degraded);
        assert_eq!(h.datetime.year(), 2008);
        assert_eq!(h.datetime.month(), 12);
        assert_eq!(h.datetime.day(), 25);
        assert_eq!(h.datetime.hour(), 22);
        assert_eq!(h.datetime.minute(), 35);
        assert_eq!(h.datetime.second(), 18);
    }

    #[test]
    fn test_parse_degraded_and_unknown_season() {
        let h = Horodate::parse("e240701120000").unwrap();
        assert_eq!(h.season, Season::Summer);
        assert!(h.degraded);

        let h = Horodate::parse(" 240701120000").unwrap();
        assert_eq!(h.season, Season::Unknown);
    }

    #[test]
    fn test_reject_invalid_horodate() {
        assert!(Horodate::parse("X081225223518").is_err());
        assert!(Horodate::parse("H08122522351").is_err());
        assert!(Horodate::parse("H0812252235189").is_err());
        assert!(Horodate::parse("H081325223518").is_err());
        assert!(Horodate::parse("H08122A223518").is_err());
    }
}

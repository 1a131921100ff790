//! Best-effort natural-language date parsing.
//!
//! Supports:
//! - Absolute: RFC 3339, `2026-11-02`, `2026-11-02 14:00`, `11/15`, `1/2/2027`
//! - Month names: `April 15`, `Apr 15, 2027`, `3rd of March`
//! - Relative days: `tonight`, `yesterday`, `friday`, `next friday`,
//!   `last monday`, `in 3 days`, `end of week`
//! - Bare times on the reference day: `5pm`, `9:30 a.m.`, `15:30`, `noon`
//!
//! Relative day offsets keep the reference time of day. Absolute dates
//! without a time resolve to midnight UTC.

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday,
};

use super::DateParser;
use crate::error::DateParseError;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Rule-based [`DateParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalDateParser;

impl NaturalDateParser {
    pub fn new() -> Self {
        Self
    }
}

impl DateParser for NaturalDateParser {
    fn parse(&self, text: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DateParseError> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Err(DateParseError::new(text));
        }

        parse_absolute(strip_filler(text))
            .or_else(|| parse_relative(&normalized, now))
            .or_else(|| parse_month_day(&normalized, now))
            .or_else(|| parse_numeric(&normalized, now))
            .or_else(|| parse_clock(&normalized).map(|t| now.date_naive().and_time(t).and_utc()))
            .ok_or_else(|| DateParseError::new(text))
    }
}

const FILLER: [&str; 5] = ["on", "by", "at", "the", "due"];

/// Drop leading filler words ("by", "due", ...), keeping the original case.
///
/// The last word is never dropped.
fn strip_filler(text: &str) -> &str {
    let mut rest = text.trim();
    while let Some((first, tail)) = rest.split_once(char::is_whitespace) {
        if !FILLER.iter().any(|f| first.eq_ignore_ascii_case(f)) {
            break;
        }
        rest = tail.trim_start();
    }
    rest
}

/// Lowercase, collapse whitespace, drop a trailing period and filler prefixes.
fn normalize(text: &str) -> String {
    let lower = strip_filler(text).trim_end_matches('.').to_lowercase();
    lower.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_absolute(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(start_of_day)
}

fn parse_relative(s: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let today = now.date_naive();
    match s {
        "today" => return Some(now),
        "tonight" => return today.and_hms_opt(20, 0, 0).map(|t| t.and_utc()),
        "tomorrow" => return Some(now + Duration::days(1)),
        "yesterday" => return Some(now - Duration::days(1)),
        "end of day" | "end of the day" => return end_of_day(today),
        "end of week" | "end of the week" => {
            let to_sunday = 6 - i64::from(today.weekday().num_days_from_monday());
            return end_of_day(today + Duration::days(to_sunday));
        }
        "end of month" | "end of the month" => {
            let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
            let last = first.checked_add_months(Months::new(1))? - Duration::days(1);
            return end_of_day(last);
        }
        _ => {}
    }

    let words: Vec<&str> = s.split_whitespace().collect();
    match words.as_slice() {
        [day] | ["this", day] if weekday(day).is_some() => {
            let target = weekday(day)?;
            Some(now + Duration::days(days_until(today.weekday(), target)))
        }
        ["next", day] if weekday(day).is_some() => {
            let target = weekday(day)?;
            let days = match days_until(today.weekday(), target) {
                0 => 7,
                n => n,
            };
            Some(now + Duration::days(days))
        }
        ["last", day] if weekday(day).is_some() => {
            let target = weekday(day)?;
            let days = match days_until(target, today.weekday()) {
                0 => 7,
                n => n,
            };
            Some(now - Duration::days(days))
        }
        [direction @ ("next" | "this" | "last"), period] => {
            let sign = match *direction {
                "next" => 1,
                "last" => -1,
                _ => 0,
            };
            match *period {
                "week" => Some(now + Duration::weeks(sign)),
                "month" => shift_months(now, sign),
                "year" => shift_months(now, sign * 12),
                _ => None,
            }
        }
        ["in", amount, unit] => {
            let n = number(amount)?;
            let delta = match unit.trim_end_matches('s') {
                "minute" => Duration::try_minutes(n)?,
                "hour" => Duration::try_hours(n)?,
                "day" => Duration::try_days(n)?,
                "week" => Duration::try_weeks(n)?,
                "month" => return shift_months(now, n),
                _ => return None,
            };
            now.checked_add_signed(delta)
        }
        _ => None,
    }
}

/// `April 15`, `apr. 15, 2027`, `15 april`, `3rd of march 2027`.
fn parse_month_day(s: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let cleaned = s.replace(',', " ");
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|w| *w != "of")
        .collect();

    let (month, day, year) = match words.as_slice() {
        [m, d] if month_number(m).is_some() => (month_number(m)?, ordinal(d)?, None),
        [m, d, y] if month_number(m).is_some() => (month_number(m)?, ordinal(d)?, Some(y)),
        [d, m] => (month_number(m)?, ordinal(d)?, None),
        [d, m, y] => (month_number(m)?, ordinal(d)?, Some(y)),
        _ => return None,
    };

    let year = match year {
        Some(y) => y.parse::<i32>().ok()?,
        None => now.year(),
    };
    NaiveDate::from_ymd_opt(year, month, day).and_then(start_of_day)
}

/// US-style `M/D` or `M/D/Y`.
fn parse_numeric(s: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = s.split('/').collect();
    let (month, day, year) = match parts.as_slice() {
        [m, d] => (m.parse().ok()?, d.parse().ok()?, now.year()),
        [m, d, y] => {
            let y: i32 = y.parse().ok()?;
            (m.parse().ok()?, d.parse().ok()?, if y < 100 { 2000 + y } else { y })
        }
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day).and_then(start_of_day)
}

/// `5pm`, `9:30 a.m.`, `12am`, `15:30`, `noon`, `midnight`.
fn parse_clock(s: &str) -> Option<NaiveTime> {
    match s {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        _ => {}
    }

    let compact: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();

    let (clock, meridiem) = if let Some(rest) = compact.strip_suffix("am") {
        (rest, Some(false))
    } else if let Some(rest) = compact.strip_suffix("pm") {
        (rest, Some(true))
    } else {
        (compact.as_str(), None)
    };

    let (hour, minute): (u32, u32) = match clock.split_once(':') {
        Some((h, m)) if m.len() == 2 => (h.parse().ok()?, m.parse().ok()?),
        Some(_) => return None,
        // a bare number is only a time with am/pm
        None if meridiem.is_some() => (clock.parse().ok()?, 0),
        None => return None,
    };

    let hour = match meridiem {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            }
        }
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn weekday(word: &str) -> Option<Weekday> {
    match word {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Days from `from` forward to the next `to` (0 when equal).
fn days_until(from: Weekday, to: Weekday) -> i64 {
    let from = i64::from(from.num_days_from_monday());
    let to = i64::from(to.num_days_from_monday());
    (to - from).rem_euclid(7)
}

fn month_number(word: &str) -> Option<u32> {
    let month = match word.trim_end_matches('.') {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn ordinal(word: &str) -> Option<u32> {
    let digits = word
        .strip_suffix("st")
        .or_else(|| word.strip_suffix("nd"))
        .or_else(|| word.strip_suffix("rd"))
        .or_else(|| word.strip_suffix("th"))
        .unwrap_or(word);
    digits.parse().ok()
}

fn number(word: &str) -> Option<i64> {
    let n = match word {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        digits => return digits.parse().ok(),
    };
    Some(n)
}

fn shift_months(now: DateTime<Utc>, months: i64) -> Option<DateTime<Utc>> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        now.checked_add_months(magnitude)
    } else {
        now.checked_sub_months(magnitude)
    }
}

fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|t| t.and_utc())
}

fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(23, 59, 59).map(|t| t.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Wednesday 2026-10-14 10:00 UTC
    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 10, 0, 0).unwrap()
    }

    fn parse(text: &str) -> Result<DateTime<Utc>, DateParseError> {
        NaturalDateParser::new().parse(text, reference())
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn absolute_formats() {
        assert_eq!(parse("2026-11-02").unwrap(), at(2026, 11, 2, 0, 0, 0));
        assert_eq!(parse("2026-11-02 14:00").unwrap(), at(2026, 11, 2, 14, 0, 0));
        assert_eq!(
            parse("2026-11-02T14:00:00+02:00").unwrap(),
            at(2026, 11, 2, 12, 0, 0)
        );
    }

    #[test]
    fn absolute_formats_after_filler_words() {
        assert_eq!(parse("by 2026-11-02").unwrap(), at(2026, 11, 2, 0, 0, 0));
        assert_eq!(
            parse("Due 2026-11-02T14:00:00Z").unwrap(),
            at(2026, 11, 2, 14, 0, 0)
        );
        assert_eq!(parse("on the 2026-11-02 09:15").unwrap(), at(2026, 11, 2, 9, 15, 0));
    }

    #[test]
    fn weekdays() {
        assert_eq!(parse("Friday").unwrap(), at(2026, 10, 16, 10, 0, 0));
        assert_eq!(parse("on friday").unwrap(), at(2026, 10, 16, 10, 0, 0));
        // same weekday as the reference day resolves to today
        assert_eq!(parse("wednesday").unwrap(), reference());
        assert_eq!(parse("next wednesday").unwrap(), at(2026, 10, 21, 10, 0, 0));
        assert_eq!(parse("next friday").unwrap(), at(2026, 10, 16, 10, 0, 0));
        assert_eq!(parse("last monday").unwrap(), at(2026, 10, 12, 10, 0, 0));
    }

    #[test]
    fn relative_periods() {
        assert_eq!(parse("in 3 days").unwrap(), at(2026, 10, 17, 10, 0, 0));
        assert_eq!(parse("in two hours").unwrap(), at(2026, 10, 14, 12, 0, 0));
        assert_eq!(parse("in an hour").unwrap(), at(2026, 10, 14, 11, 0, 0));
        assert_eq!(parse("next month").unwrap(), at(2026, 11, 14, 10, 0, 0));
        assert_eq!(parse("last week").unwrap(), at(2026, 10, 7, 10, 0, 0));
        assert_eq!(parse("tonight").unwrap(), at(2026, 10, 14, 20, 0, 0));
        assert_eq!(parse("yesterday").unwrap(), at(2026, 10, 13, 10, 0, 0));
    }

    #[test]
    fn end_of_periods() {
        assert_eq!(parse("end of day").unwrap(), at(2026, 10, 14, 23, 59, 59));
        assert_eq!(parse("the end of the week").unwrap(), at(2026, 10, 18, 23, 59, 59));
        assert_eq!(parse("end of month").unwrap(), at(2026, 10, 31, 23, 59, 59));
    }

    #[test]
    fn month_names() {
        assert_eq!(parse("April 15, 2027").unwrap(), at(2027, 4, 15, 0, 0, 0));
        assert_eq!(parse("Apr. 15").unwrap(), at(2026, 4, 15, 0, 0, 0));
        assert_eq!(parse("3rd of March").unwrap(), at(2026, 3, 3, 0, 0, 0));
        assert!(parse("February 30").is_err());
    }

    #[test]
    fn numeric_dates() {
        assert_eq!(parse("11/15").unwrap(), at(2026, 11, 15, 0, 0, 0));
        assert_eq!(parse("1/2/27").unwrap(), at(2027, 1, 2, 0, 0, 0));
        assert!(parse("13/40").is_err());
    }

    #[test]
    fn clock_times_land_on_reference_day() {
        assert_eq!(parse("5pm").unwrap(), at(2026, 10, 14, 17, 0, 0));
        assert_eq!(parse("9:30 a.m.").unwrap(), at(2026, 10, 14, 9, 30, 0));
        assert_eq!(parse("12am").unwrap(), at(2026, 10, 14, 0, 0, 0));
        assert_eq!(parse("12 pm").unwrap(), at(2026, 10, 14, 12, 0, 0));
        assert_eq!(parse("15:30").unwrap(), at(2026, 10, 14, 15, 30, 0));
        assert_eq!(parse("noon").unwrap(), at(2026, 10, 14, 12, 0, 0));
        assert_eq!(parse("midnight").unwrap(), at(2026, 10, 14, 0, 0, 0));
    }

    #[test]
    fn failures_are_signalled() {
        assert!(parse("").is_err());
        assert!(parse("in 99999999999999 days").is_err());
        assert!(parse("whenever").is_err());
        assert!(parse("13pm").is_err());
        assert!(parse("25:00").is_err());
        assert!(parse("5").is_err());

        let err = parse("someday").unwrap_err();
        assert_eq!(err.text, "someday");
    }
}

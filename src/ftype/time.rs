//! Absolute and relative time values with nanosecond resolution

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Timelike};

use crate::config::LocalTimePolicy;
use crate::error::FtypeError;

/// Wall-clock layout accepted for absolute times, before the optional
/// `.<fraction>` suffix
pub const ABSOLUTE_FORMAT: &str = "%b %d, %Y %H:%M:%S";

/// Seconds plus nanoseconds.
///
/// Negative values carry the sign on both components, so the derived
/// ordering (seconds first, then nanoseconds) holds across zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct NsTime {
    pub secs: i64,
    pub nsecs: i32,
}

impl NsTime {
    pub fn new(secs: i64, nsecs: i32) -> Self {
        Self { secs, nsecs }
    }

    pub fn is_negative(&self) -> bool {
        self.secs < 0 || self.nsecs < 0
    }
}

/// Read 1 to 9 fractional digits as a nanosecond count, right-aligned:
/// `"5"` is 500000000, `"000000001"` is 1.
pub(crate) fn parse_nsecs(digits: &str) -> Option<i32> {
    if digits.is_empty() || digits.len() > 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i32 = digits.parse().ok()?;
    let scale = 10_i32.pow(9 - digits.len() as u32);
    Some(value * scale)
}

/// `[-][<seconds>][.<fraction>]`; a missing seconds part means zero.
pub(crate) fn relative_from_text(s: &str) -> Result<NsTime, FtypeError> {
    let fail = || FtypeError::InvalidRelativeTime(s.to_owned());

    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (secs_text, fraction) = match body.split_once('.') {
        Some((secs, fraction)) => (secs, Some(fraction)),
        None => (body, None),
    };

    let secs: i64 = if secs_text.is_empty() {
        if fraction.is_none() {
            return Err(fail());
        }
        0
    } else {
        if !secs_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(fail());
        }
        secs_text.parse().map_err(|_| fail())?
    };

    let nsecs = match fraction {
        None | Some("") => 0,
        Some(digits) => parse_nsecs(digits).ok_or_else(fail)?,
    };

    Ok(if negative {
        NsTime::new(-secs, -nsecs)
    } else {
        NsTime::new(secs, nsecs)
    })
}

/// `<month> <day>, <year> <H>:<M>:<S>[.<fraction>]`, read as local time.
pub(crate) fn absolute_from_text(s: &str, policy: LocalTimePolicy) -> Result<NsTime, FtypeError> {
    let fail = || FtypeError::InvalidAbsoluteTime(s.to_owned());

    let (wall_clock, fraction) = match s.split_once('.') {
        Some((wall_clock, fraction)) => (wall_clock, Some(fraction)),
        None => (s, None),
    };

    let naive = NaiveDateTime::parse_from_str(wall_clock, ABSOLUTE_FORMAT).map_err(|_| fail())?;

    // unlike relative times, a '.' must be followed by at least one digit
    let nsecs = match fraction {
        None => 0,
        Some(digits) => parse_nsecs(digits).ok_or_else(fail)?,
    };

    // chrono reads second 60 as a leap second and stamps it like :59;
    // it belongs to the first second of the next minute instead
    let leap = i64::from(naive.nanosecond() >= 1_000_000_000);

    let local = resolve_local(naive.and_local_timezone(Local), policy, s)?;
    Ok(NsTime::new(local.timestamp() + leap, nsecs))
}

/// Pick the instant a local wall-clock time refers to.
pub(crate) fn resolve_local<Tz: TimeZone>(
    result: LocalResult<DateTime<Tz>>,
    policy: LocalTimePolicy,
    text: &str,
) -> Result<DateTime<Tz>, FtypeError> {
    match result {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, latest) => match policy {
            LocalTimePolicy::Reject => Err(FtypeError::AmbiguousLocalTime(text.to_owned())),
            LocalTimePolicy::Earliest => Ok(earliest),
            LocalTimePolicy::Latest => Ok(latest),
        },
        LocalResult::None => Err(FtypeError::NonexistentLocalTime(text.to_owned())),
    }
}

pub(crate) fn absolute_to_text(t: NsTime) -> String {
    let nsecs = u32::try_from(t.nsecs).ok();
    match nsecs.and_then(|ns| Local.timestamp_opt(t.secs, ns).earliest()) {
        Some(dt) => dt.format("%b %e, %Y %H:%M:%S%.9f").to_string(),
        None => format!("{}.{:09}", t.secs, t.nsecs),
    }
}

pub(crate) fn relative_to_text(t: NsTime) -> String {
    let sign = if t.is_negative() { "-" } else { "" };
    format!("{sign}{}.{:09}", t.secs.unsigned_abs(), t.nsecs.unsigned_abs())
}

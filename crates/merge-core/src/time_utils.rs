use std::sync::OnceLock;

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use regex::Regex;
use thiserror::Error;

/// `strftime` pattern of a workout's local wall-clock timestamp.
pub const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Failures of the zone and timestamp helpers in this module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// The identifier is not in the IANA zone database.
    #[error("invalid timezone '{0}'. Use IANA timezone identifiers (e.g. 'America/Los_Angeles', 'Europe/London')")]
    UnknownZone(String),

    /// A local timestamp did not match `YYYY-MM-DD HH:MM:SS`.
    #[error("invalid timestamp format: expected 'YYYY-MM-DD HH:MM:SS' (e.g. '2023-10-01 08:30:00'), got '{value}': {detail}")]
    InvalidLocalTimestamp { value: String, detail: String },

    /// The wall-clock time was skipped by a DST transition in this zone.
    #[error("local time '{timestamp}' does not exist in timezone '{zone}' (skipped by a daylight-saving transition)")]
    NonexistentLocalTime { timestamp: String, zone: String },

    /// An absolute timestamp was unparseable or lacked a UTC designator.
    #[error("invalid timestamp format: expected ISO 8601 with a UTC designator (e.g. '2023-10-01T00:30:00Z'), got '{value}': {detail}")]
    InvalidUtcTimestamp { value: String, detail: String },
}

// ── ZoneResolver ──────────────────────────────────────────────────────────────

/// Resolves IANA identifiers against the bundled zone database.
pub struct ZoneResolver;

impl ZoneResolver {
    /// Look up `name` exactly as given (case-sensitive, no trimming).
    pub fn resolve(name: &str) -> Result<Tz, TimeError> {
        name.parse::<Tz>()
            .map_err(|_| TimeError::UnknownZone(name.to_string()))
    }
}

// ── TemporalNormalizer ────────────────────────────────────────────────────────

/// A local reading pinned to the UTC timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedInstant {
    /// The absolute instant.
    pub utc: DateTime<Utc>,
    /// The UTC civil date the record counts against.
    pub attribution_date: NaiveDate,
    /// `true` when the local civil date differs from `attribution_date`.
    pub crossed_day_boundary: bool,
}

/// Converts wall-clock readings to UTC and parses absolute timestamps.
///
/// Ambiguous local times (the repeated hour when clocks fall back) resolve to
/// the earlier of the two instants, i.e. the offset in force before the
/// transition. Local times inside a spring-forward gap are rejected.
pub struct TemporalNormalizer;

impl TemporalNormalizer {
    /// Parse a strict `YYYY-MM-DD HH:MM:SS` reading with no offset or zone.
    pub fn parse_local(timestamp: &str) -> Result<NaiveDateTime, TimeError> {
        if !local_pattern().is_match(timestamp) {
            return Err(TimeError::InvalidLocalTimestamp {
                value: timestamp.to_string(),
                detail: "does not match the expected pattern".to_string(),
            });
        }

        let naive = NaiveDateTime::parse_from_str(timestamp, LOCAL_TIMESTAMP_FORMAT).map_err(
            |e| TimeError::InvalidLocalTimestamp {
                value: timestamp.to_string(),
                detail: e.to_string(),
            },
        )?;

        if is_leap_second(naive.nanosecond()) {
            return Err(TimeError::InvalidLocalTimestamp {
                value: timestamp.to_string(),
                detail: LEAP_SECOND_DETAIL.to_string(),
            });
        }
        Ok(naive)
    }

    /// Attach `tz` to a naive reading.
    pub fn localize(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>, TimeError> {
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt),
            LocalResult::Ambiguous(earliest, _latest) => Ok(earliest),
            LocalResult::None => Err(TimeError::NonexistentLocalTime {
                timestamp: naive.format(LOCAL_TIMESTAMP_FORMAT).to_string(),
                zone: tz.name().to_string(),
            }),
        }
    }

    /// Convert a local reading in `tz` to UTC and work out its attribution.
    pub fn normalize(timestamp: &str, tz: Tz) -> Result<NormalizedInstant, TimeError> {
        let naive = Self::parse_local(timestamp)?;
        let local = Self::localize(naive, tz)?;
        let utc = local.with_timezone(&Utc);

        let local_date = naive.date();
        let utc_date = utc.date_naive();

        Ok(NormalizedInstant {
            utc,
            attribution_date: utc_date,
            crossed_day_boundary: local_date != utc_date,
        })
    }

    /// Parse an ISO 8601 / RFC 3339 timestamp that must carry a zero offset
    /// (`Z` or `+00:00`).
    pub fn parse_utc(timestamp: &str) -> Result<DateTime<Utc>, TimeError> {
        let parsed = DateTime::parse_from_rfc3339(timestamp).map_err(|e| {
            TimeError::InvalidUtcTimestamp {
                value: timestamp.to_string(),
                detail: e.to_string(),
            }
        })?;

        if parsed.offset().local_minus_utc() != 0 {
            return Err(TimeError::InvalidUtcTimestamp {
                value: timestamp.to_string(),
                detail: format!("offset {} is not UTC", parsed.offset()),
            });
        }

        if is_leap_second(parsed.nanosecond()) {
            return Err(TimeError::InvalidUtcTimestamp {
                value: timestamp.to_string(),
                detail: LEAP_SECOND_DETAIL.to_string(),
            });
        }

        Ok(parsed.with_timezone(&Utc))
    }
}

/// Canonical string form of an instant: ISO 8601 with a `Z` designator.
/// Sub-second digits only appear when non-zero.
pub fn format_instant(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

const LEAP_SECOND_DETAIL: &str = "second must be between 00 and 59";

/// chrono stores second 60 as a nanosecond count of one second or more.
fn is_leap_second(nanosecond: u32) -> bool {
    nanosecond >= 1_000_000_000
}

fn local_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").expect("regex is valid")
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

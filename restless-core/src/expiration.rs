//! Cache freshness computed from response headers.
//!
//! First match wins:
//!
//! 1. `Cache-Control` containing `no-store` - [`Expiration::DoNotCache`]
//! 2. `Cache-Control` together with `Date` - `Date + max-age`, or
//!    [`Expiration::NoExpirationSignal`] when there is no `max-age`
//! 3. `Expires` - its timestamp
//! 4. otherwise - [`Expiration::NoExpirationSignal`]
//!
//! There is no `s-maxage`, `must-revalidate`, heuristic freshness or request
//! side `Cache-Control`. Responses without a signal are cacheable forever.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use http::HeaderMap;
use http::header::{CACHE_CONTROL, DATE, EXPIRES};
use regex::Regex;

static MAX_AGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*max-age=([0-9]+)").expect("valid max-age pattern"));

/// Caching decision for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// The response must never be stored.
    DoNotCache,
    /// Cacheable, with no expiration time.
    NoExpirationSignal,
    /// Cacheable until the given instant.
    ExpiresAt(DateTime<Utc>),
}

impl Expiration {
    /// Evaluates response headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cache_control = header_str(headers, CACHE_CONTROL);
        if cache_control.is_some_and(|value| value.contains("no-store")) {
            return Expiration::DoNotCache;
        }

        let date = header_str(headers, DATE);
        match (cache_control, date) {
            (Some(cache_control), Some(date)) => {
                let Some(max_age) = max_age(cache_control) else {
                    return Expiration::NoExpirationSignal;
                };
                match parse_http_date(date) {
                    Some(date) => Expiration::ExpiresAt(
                        date.checked_add_signed(max_age)
                            .unwrap_or(DateTime::<Utc>::MAX_UTC),
                    ),
                    None => Expiration::NoExpirationSignal,
                }
            }
            _ => match header_str(headers, EXPIRES).and_then(parse_http_date) {
                Some(expires) => Expiration::ExpiresAt(expires),
                None => Expiration::NoExpirationSignal,
            },
        }
    }

    /// Whether the response may be stored at all.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, Expiration::DoNotCache)
    }

    /// Expiration instant, if there is one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Expiration::ExpiresAt(at) => Some(*at),
            _ => None,
        }
    }

    /// True only when an expiration instant exists and lies strictly before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| at < now)
    }
}

fn header_str(headers: &HeaderMap, name: http::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Extracts `max-age` seconds; the last occurrence wins.
fn max_age(cache_control: &str) -> Option<TimeDelta> {
    let captures = MAX_AGE.captures(cache_control)?;
    let seconds = captures.get(1)?.as_str();
    let seconds = seconds.parse::<i64>().unwrap_or(i64::MAX);
    Some(TimeDelta::try_seconds(seconds).unwrap_or(TimeDelta::MAX))
}

/// Obsolete RFC 850 form, two-digit year: `Sunday, 06-Nov-94 08:49:37 GMT`.
const RFC_850: &str = "%A, %d-%b-%y %H:%M:%S GMT";
/// ANSI C `asctime()` form, always GMT: `Sun Nov  6 08:49:37 1994`.
const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

/// Parses an HTTP date.
///
/// Accepts IMF-fixdate (and anything else RFC 2822), the obsolete RFC 850 and
/// asctime forms, and RFC 3339.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(value, RFC_850) {
        return Some(date.and_utc());
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(value, ASCTIME) {
        return Some(date.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .ok()
}

/// Formats an instant as an IMF-fixdate, the form used in `Date` and `Expires`.
pub fn format_http_date(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

// TuskTsk - Configuration Language Toolkit
//
// Copyright (c) 2025 TuskTsk authors and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Lenient conversion from [`ConfigValue`] to Rust types.
//!
//! Conversions never fail loudly: `None` means "use the caller's default".
//!
//! | Target | Accepts |
//! |---|---|
//! | `bool` | bools, numbers (non-zero is true), strings `true/yes/1/on/enabled` or `false/no/0/off/disabled` (any case); other non-empty strings are true |
//! | integers | any number that fits exactly, bools as 0/1, numeric strings |
//! | floats | any number, bools, numeric strings |
//! | `String` | any non-null value, composites as JSON |
//! | `Vec<T>` | arrays whose every element converts |
//! | date/time | RFC 3339, `YYYY-MM-DD[ HH:MM:SS]`, unix seconds |
//! | `Duration` | ISO 8601 (`PT1H30M`), `[d.]hh:mm[:ss[.f]]`, seconds |

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::value::{ConfigMap, ConfigValue};

const TRUE_WORDS: &[&str] = &["true", "yes", "1", "on", "enabled"];
const FALSE_WORDS: &[&str] = &["false", "no", "0", "off", "disabled"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Types that can be read out of a configuration value.
pub trait FromConfigValue: Sized {
    /// Convert, or `None` if the value has an incompatible shape.
    fn from_config_value(value: &ConfigValue) -> Option<Self>;
}

/// Enums readable by case-insensitive variant name.
///
/// ```
/// use tusk_pnt::ConfigEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Level { Debug, Info }
///
/// impl ConfigEnum for Level {
///     const VARIANTS: &'static [(&'static str, Self)] = &[("debug", Level::Debug), ("info", Level::Info)];
/// }
///
/// assert_eq!(Level::from_name("INFO"), Some(Level::Info));
/// assert_eq!(Level::from_name("trace"), None);
/// ```
pub trait ConfigEnum: Sized + Copy + 'static {
    /// Variant names and values.
    const VARIANTS: &'static [(&'static str, Self)];

    /// Look up a variant by name, ignoring ASCII case and surrounding blanks.
    fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::VARIANTS
            .iter()
            .find(|(variant, _)| variant.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}

/// Parse a boolean word. Empty text is false; unknown words are true.
pub fn parse_bool(text: &str) -> bool {
    let text = text.trim();
    if TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(text)) {
        true
    } else if FALSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(text)) {
        false
    } else {
        !text.is_empty()
    }
}

/// Parse a date/time in one of the accepted formats, as UTC.
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
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
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a duration: ISO 8601, time span, or a plain number of seconds.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let text = text.trim();
    if let Some(body) = text.strip_prefix('P').or_else(|| text.strip_prefix('p')) {
        return parse_iso_duration(body);
    }
    if text.contains(':') {
        return parse_time_span(text);
    }
    seconds(text.parse::<f64>().ok()?)
}

fn seconds(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok()
}

fn parse_iso_duration(body: &str) -> Option<Duration> {
    let (date_part, time_part) = match body.split_once(['T', 't']) {
        Some((date, time)) => (date, Some(time)),
        None => (body, None),
    };

    let mut total = 0.0;
    let mut components = 0;

    if !date_part.is_empty() {
        let days = date_part.strip_suffix(['D', 'd'])?;
        total += days.parse::<f64>().ok()? * 86_400.0;
        components += 1;
    }

    if let Some(mut rest) = time_part {
        while !rest.is_empty() {
            let unit_at = rest.find(|c: char| c.is_ascii_alphabetic())?;
            let amount: f64 = rest[..unit_at].parse().ok()?;
            let scale = match rest[unit_at..].chars().next()? {
                'H' | 'h' => 3_600.0,
                'M' | 'm' => 60.0,
                'S' | 's' => 1.0,
                _ => return None,
            };
            total += amount * scale;
            components += 1;
            rest = &rest[unit_at + 1..];
        }
    }

    if components == 0 {
        return None;
    }
    seconds(total)
}

fn parse_time_span(text: &str) -> Option<Duration> {
    let parts: Vec<&str> = text.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    let (days, hours) = match parts[0].split_once('.') {
        Some((d, h)) => (d.parse::<u64>().ok()?, h.parse::<u64>().ok()?),
        None => (0, parts[0].parse::<u64>().ok()?),
    };
    let minutes: u64 = parts[1].parse().ok()?;
    let secs: f64 = match parts.get(2) {
        Some(s) => s.parse().ok()?,
        None => 0.0,
    };
    if minutes >= 60 || !(0.0..60.0).contains(&secs) {
        return None;
    }

    let whole = days
        .checked_mul(86_400)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes * 60)?;
    Duration::from_secs(whole).checked_add(seconds(secs)?)
}

/// Integral value of a finite double without a fractional part.
fn integral(d: f64) -> Option<i128> {
    if d.is_finite() && d.fract() == 0.0 && d.abs() < 1e38 {
        Some(d as i128)
    } else {
        None
    }
}

impl FromConfigValue for bool {
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Bool(b) => Some(*b),
            ConfigValue::Int(n) => Some(*n != 0),
            ConfigValue::Long(n) => Some(*n != 0),
            ConfigValue::Double(d) => Some(*d != 0.0),
            ConfigValue::String(s) => Some(parse_bool(s)),
            ConfigValue::Null | ConfigValue::Array(_) | ConfigValue::Object(_) => None,
        }
    }
}

macro_rules! impl_from_config_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromConfigValue for $t {
                fn from_config_value(value: &ConfigValue) -> Option<Self> {
                    match value {
                        ConfigValue::Int(n) => <$t>::try_from(*n).ok(),
                        ConfigValue::Long(n) => <$t>::try_from(*n).ok(),
                        ConfigValue::Double(d) => integral(*d).and_then(|n| <$t>::try_from(n).ok()),
                        ConfigValue::Bool(b) => Some(if *b { 1 } else { 0 }),
                        ConfigValue::String(s) => {
                            let s = s.trim();
                            s.parse::<$t>().ok().or_else(|| {
                                s.parse::<f64>().ok().and_then(integral).and_then(|n| <$t>::try_from(n).ok())
                            })
                        }
                        ConfigValue::Null | ConfigValue::Array(_) | ConfigValue::Object(_) => None,
                    }
                }
            }
        )*
    };
}

impl_from_config_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromConfigValue for f64 {
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            ConfigValue::String(s) => s.trim().parse().ok(),
            other => other.as_f64(),
        }
    }
}

impl FromConfigValue for f32 {
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        f64::from_config_value(value).map(|d| d as f32)
    }
}

impl FromConfigValue for String {
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Null => None,
            ConfigValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl FromConfigValue for ConfigValue {
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromConfigValue for ConfigMap {
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl<T: FromConfigValue> FromConfigValue for Vec<T> {
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        value.as_array()?.iter().map(T::from_config_value).collect()
    }
}

impl FromConfigValue for DateTime<Utc> {
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::String(s) => parse_datetime(s),
            other => DateTime::from_timestamp(other.as_i64()?, 0),
        }
    }
}

impl FromConfigValue for DateTime<FixedOffset> {
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        if let ConfigValue::String(s) = value {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
                return Some(dt);
            }
        }
        DateTime::<Utc>::from_config_value(value).map(|dt| dt.fixed_offset())
    }
}

impl FromConfigValue for NaiveDateTime {
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        DateTime::<Utc>::from_config_value(value).map(|dt| dt.naive_utc())
    }
}

impl FromConfigValue for NaiveDate {
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        DateTime::<Utc>::from_config_value(value).map(|dt| dt.date_naive())
    }
}

impl FromConfigValue for Duration {
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::String(s) => parse_duration(s),
            ConfigValue::Int(n) => u64::try_from(*n).ok().map(Duration::from_secs),
            ConfigValue::Long(n) => u64::try_from(*n).ok().map(Duration::from_secs),
            ConfigValue::Double(d) => seconds(*d),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn s(text: &str) -> ConfigValue {
        ConfigValue::String(text.to_string())
    }

    // ==================== Booleans ====================

    #[test]
    fn test_bool_words() {
        for word in ["yes", "On", "1", "TRUE", "enabled"] {
            assert_eq!(bool::from_config_value(&s(word)), Some(true), "{}", word);
        }
        for word in ["no", "Off", "0", "false", "DISABLED"] {
            assert_eq!(bool::from_config_value(&s(word)), Some(false), "{}", word);
        }
    }

    #[test]
    fn test_bool_fallbacks() {
        assert_eq!(bool::from_config_value(&s("anything")), Some(true));
        assert_eq!(bool::from_config_value(&s("")), Some(false));
        assert_eq!(bool::from_config_value(&ConfigValue::Int(0)), Some(false));
        assert_eq!(bool::from_config_value(&ConfigValue::Long(3)), Some(true));
        assert_eq!(bool::from_config_value(&ConfigValue::Null), None);
    }

    // ==================== Numbers ====================

    #[test]
    fn test_integer_widths() {
        assert_eq!(i32::from_config_value(&ConfigValue::Long(42)), Some(42));
        assert_eq!(i32::from_config_value(&ConfigValue::Long(i64::MAX)), None);
        assert_eq!(u8::from_config_value(&ConfigValue::Int(-1)), None);
        assert_eq!(u16::from_config_value(&ConfigValue::Int(5432)), Some(5432));
    }

    #[test]
    fn test_integer_from_double_and_string() {
        assert_eq!(i64::from_config_value(&ConfigValue::Double(3.0)), Some(3));
        assert_eq!(i64::from_config_value(&ConfigValue::Double(3.5)), None);
        assert_eq!(i32::from_config_value(&s(" 8080 ")), Some(8080));
        assert_eq!(i32::from_config_value(&s("1e3")), Some(1000));
        assert_eq!(i32::from_config_value(&s("port")), None);
        assert_eq!(u32::from_config_value(&ConfigValue::Bool(true)), Some(1));
    }

    #[test]
    fn test_floats() {
        assert_eq!(f64::from_config_value(&ConfigValue::Int(2)), Some(2.0));
        assert_eq!(f64::from_config_value(&s("2.5")), Some(2.5));
        assert_eq!(f32::from_config_value(&ConfigValue::Double(0.5)), Some(0.5));
        assert_eq!(f64::from_config_value(&ConfigValue::Array(vec![])), None);
    }

    // ==================== Strings and composites ====================

    #[test]
    fn test_string_from_anything_but_null() {
        assert_eq!(String::from_config_value(&ConfigValue::Int(5)), Some("5".to_string()));
        assert_eq!(String::from_config_value(&ConfigValue::Bool(false)), Some("false".to_string()));
        assert_eq!(String::from_config_value(&ConfigValue::Null), None);
    }

    #[test]
    fn test_vec_is_all_or_nothing() {
        let ok = ConfigValue::Array(vec![ConfigValue::Int(1), s("2")]);
        assert_eq!(Vec::<i32>::from_config_value(&ok), Some(vec![1, 2]));

        let bad = ConfigValue::Array(vec![ConfigValue::Int(1), s("two")]);
        assert_eq!(Vec::<i32>::from_config_value(&bad), None);

        assert_eq!(Vec::<i32>::from_config_value(&ConfigValue::Int(1)), None);
    }

    // ==================== Date and time ====================

    #[test]
    fn test_datetime_formats() {
        let rfc = DateTime::<Utc>::from_config_value(&s("2024-03-01T12:30:00Z")).unwrap();
        assert_eq!((rfc.year(), rfc.month(), rfc.hour(), rfc.minute()), (2024, 3, 12, 30));

        let plain = DateTime::<Utc>::from_config_value(&s("2024-03-01 12:30:00")).unwrap();
        assert_eq!(plain, rfc);

        let date = NaiveDate::from_config_value(&s("2024-03-01")).unwrap();
        assert_eq!(date.day(), 1);

        let epoch = DateTime::<Utc>::from_config_value(&ConfigValue::Long(0)).unwrap();
        assert_eq!(epoch.year(), 1970);
    }

    #[test]
    fn test_datetime_keeps_offset() {
        let dt = DateTime::<FixedOffset>::from_config_value(&s("2024-03-01T12:00:00+02:00")).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_durations() {
        assert_eq!(parse_duration("PT1H30M"), Some(Duration::from_secs(5400)));
        assert_eq!(parse_duration("P1DT2S"), Some(Duration::from_secs(86_402)));
        assert_eq!(parse_duration("00:05:00"), Some(Duration::from_secs(300)));
        assert_eq!(parse_duration("1.02:00:00"), Some(Duration::from_secs(93_600)));
        assert_eq!(parse_duration("00:00:01.5"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_duration("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("PT"), None);
        assert_eq!(parse_duration("00:75"), None);
        assert_eq!(parse_duration("-5"), None);
    }

    #[test]
    fn test_duration_from_numbers() {
        assert_eq!(Duration::from_config_value(&ConfigValue::Int(10)), Some(Duration::from_secs(10)));
        assert_eq!(Duration::from_config_value(&ConfigValue::Int(-1)), None);
        assert_eq!(Duration::from_config_value(&ConfigValue::Double(0.25)), Some(Duration::from_millis(250)));
    }

    // ==================== Enums ====================

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Mode {
        Fast,
        Safe,
    }

    impl ConfigEnum for Mode {
        const VARIANTS: &'static [(&'static str, Self)] = &[("fast", Mode::Fast), ("safe", Mode::Safe)];
    }

    #[test]
    fn test_enum_names_ignore_case() {
        assert_eq!(Mode::from_name("SAFE"), Some(Mode::Safe));
        assert_eq!(Mode::from_name(" fast "), Some(Mode::Fast));
        assert_eq!(Mode::from_name("turbo"), None);
    }
}

use crate::utils::error::{LaunchError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, FixedOffset, Locale, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_LOCALE: &str = "en_US";

// Tried in order after RFC 3339.
const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

static UTC_OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])(\d{2}):?(\d{2})$").expect("valid utc offset regex"));

/// Which offset a launch date is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBasis {
    /// 使用字串本身的時區（即發射場當地日期）
    #[default]
    SourceOffset,
    Fixed(FixedOffset),
}

/// Turns raw launch dates into long-form display dates ("May 30, 2020").
///
/// Locale and time basis are explicit so output does not depend on the host
/// environment. The year used for filtering and sorting comes from
/// [`DateFormatter::year_of`], which reads the raw string in the same basis as
/// the display text.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    locale: Locale,
    pattern: String,
    basis: TimeBasis,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(Locale::en_US)
    }
}

impl DateFormatter {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            pattern: default_pattern(locale).to_string(),
            basis: TimeBasis::SourceOffset,
        }
    }

    /// Builds a formatter from a POSIX locale name such as `en_US` or `fr_FR`.
    pub fn from_locale_name(name: &str) -> Result<Self> {
        let locale = Locale::try_from(name).map_err(|_| LaunchError::InvalidConfigValueError {
            field: "locale".to_string(),
            value: name.to_string(),
            reason: "Unknown locale name".to_string(),
        })?;
        Ok(Self::new(locale))
    }

    pub fn with_time_basis(mut self, basis: TimeBasis) -> Self {
        self.basis = basis;
        self
    }

    /// 自訂 strftime 格式，格式錯誤會在這裡就被拒絕
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(LaunchError::InvalidConfigValueError {
                field: "date_pattern".to_string(),
                value: pattern.to_string(),
                reason: "Invalid strftime pattern".to_string(),
            });
        }
        self.pattern = pattern.to_string();
        Ok(self)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn time_basis(&self) -> TimeBasis {
        self.basis
    }

    pub fn parse(&self, raw: &str) -> Result<DateTime<FixedOffset>> {
        let trimmed = raw.trim();

        let parsed = match DateTime::parse_from_rfc3339(trimmed) {
            Ok(date) => date,
            Err(rfc_err) => match OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(trimmed, fmt).ok())
            {
                Some(date) => date,
                None => {
                    let naive = NAIVE_FORMATS
                        .iter()
                        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                        .or_else(|| {
                            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                                .ok()
                                .and_then(|date| date.and_hms_opt(0, 0, 0))
                        })
                        .ok_or_else(|| LaunchError::date_parse(raw, rfc_err.to_string()))?;
                    self.localize(raw, naive)?
                }
            },
        };

        Ok(match self.basis {
            TimeBasis::SourceOffset => parsed,
            TimeBasis::Fixed(offset) => parsed.with_timezone(&offset),
        })
    }

    pub fn format(&self, raw: &str) -> Result<String> {
        let date = self.parse(raw)?;
        Ok(self.format_datetime(&date))
    }

    pub fn format_datetime(&self, date: &DateTime<FixedOffset>) -> String {
        date.format_localized(&self.pattern, self.locale).to_string()
    }

    pub fn year_of(&self, raw: &str) -> Result<i32> {
        Ok(self.parse(raw)?.year())
    }

    // 沒有時區的字串：SourceOffset 時視為 UTC
    fn localize(&self, raw: &str, naive: NaiveDateTime) -> Result<DateTime<FixedOffset>> {
        match self.basis {
            TimeBasis::SourceOffset => Ok(naive.and_utc().fixed_offset()),
            TimeBasis::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| LaunchError::date_parse(raw, "ambiguous local time")),
        }
    }
}

/// Long-form date order for a locale. Unlisted locales get day, month, year.
pub fn default_pattern(locale: Locale) -> &'static str {
    match locale {
        Locale::en_US | Locale::en_CA | Locale::en_PH => "%B %-d, %Y",
        Locale::en_GB
        | Locale::en_AU
        | Locale::en_NZ
        | Locale::en_IE
        | Locale::en_IN
        | Locale::en_ZA
        | Locale::en_SG => "%-d %B %Y",
        Locale::de_DE
        | Locale::de_AT
        | Locale::de_CH
        | Locale::de_BE
        | Locale::de_LU
        | Locale::de_LI => "%-d. %B %Y",
        Locale::ja_JP | Locale::zh_CN | Locale::zh_TW | Locale::zh_HK | Locale::zh_SG => {
            "%Y年%-m月%-d日"
        }
        Locale::ko_KR => "%Y년 %-m월 %-d일",
        _ => "%-d %B %Y",
    }
}

/// Parses `+09:00`, `-0530`, `Z` or `UTC` into a fixed offset.
pub fn parse_utc_offset(value: &str) -> std::result::Result<FixedOffset, String> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| "Offset out of range".to_string());
    }

    let caps = UTC_OFFSET_RE
        .captures(trimmed)
        .ok_or_else(|| "Expected an offset like +09:00 or -0530".to_string())?;

    let hours: i32 = caps[2].parse().map_err(|_| "Invalid hours".to_string())?;
    let minutes: i32 = caps[3].parse().map_err(|_| "Invalid minutes".to_string())?;
    if hours > 23 || minutes > 59 {
        return Err("Offset out of range".to_string());
    }

    let seconds = (hours * 3600 + minutes * 60) * if &caps[1] == "-" { -1 } else { 1 };
    FixedOffset::east_opt(seconds).ok_or_else(|| "Offset out of range".to_string())
}

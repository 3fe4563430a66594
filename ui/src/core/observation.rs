//! The row shape the aggregation core works on.

use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime,
};

use super::measurement::Measurement;

/// Identity and time of the build a value was measured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStamp {
    pub id: i64,
    pub timestamp: Option<PrimitiveDateTime>,
}

impl BuildStamp {
    pub fn new(id: i64, raw_timestamp: &str) -> Self {
        Self {
            id,
            timestamp: parse_build_timestamp(raw_timestamp),
        }
    }
}

/// One value placed on a chart: which series it belongs to, which category it
/// is grouped under, and what was measured.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub series: String,
    pub category: String,
    pub value: Measurement,
    pub build: BuildStamp,
}

impl Observation {
    pub fn new(
        series: impl Into<String>,
        category: impl Into<String>,
        value: Measurement,
        build: BuildStamp,
    ) -> Self {
        Self {
            series: series.into(),
            category: category.into(),
            value,
            build,
        }
    }
}

/// Parse a build timestamp. The database stores `YYYY-MM-DD HH:MM:SS`
/// (optionally with fractional seconds); RFC3339 is accepted as well and
/// normalised to UTC.
pub fn parse_build_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let plain = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let fractional =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]");
    let date_only = format_description!("[year]-[month]-[day]");

    PrimitiveDateTime::parse(raw, &plain)
        .or_else(|_| PrimitiveDateTime::parse(raw, &fractional))
        .ok()
        .or_else(|| {
            OffsetDateTime::parse(raw, &Rfc3339).ok().map(|ts| {
                let utc = ts.to_offset(time::UtcOffset::UTC);
                PrimitiveDateTime::new(utc.date(), utc.time())
            })
        })
        .or_else(|| {
            time::Date::parse(raw, &date_only)
                .ok()
                .map(|date| date.midnight())
        })
}

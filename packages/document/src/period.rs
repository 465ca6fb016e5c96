//! Reporting period detection from file names.
//!
//! Reports are named after the week they cover, but every vendor names
//! them differently. When no period can be read from the name, the
//! caller's reference date decides; nothing here reads the clock.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use dsp_quality_models::ReportPeriod;
use regex::Regex;

static SCORECARD_WEEK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)week\s*(\d+)").expect("valid regex"));
static SCORECARD_KW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)KW[_\s]*(\d+)").expect("valid regex"));
static MENTOR_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(20\d{2})[-_]?(\d{2})[-_]?(\d{2})").expect("valid regex")
});
static MENTOR_KW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)KW\s*(\d{1,2})[-_\s]?(20\d{2})?").expect("valid regex")
});
static GENERIC_WEEK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:week|kw|wk)[-_\s]*(\d{1,2})").expect("valid regex")
});
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20\d{2}").expect("valid regex"));

/// ISO week and week-based year of `date`.
#[must_use]
pub fn period_of(date: NaiveDate) -> ReportPeriod {
    let iso = date.iso_week();
    ReportPeriod::new(iso.week(), iso.year())
}

/// First plausible year (`20xx`) in a file name.
#[must_use]
pub fn year_from_file_name(file_name: &str) -> Option<i32> {
    YEAR_RE
        .find(file_name)
        .and_then(|m| m.as_str().parse().ok())
}

fn capture_week(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .filter(|week| (1..=53).contains(week))
}

/// Period of a scorecard PDF, e.g. `DSU1_Week12_2025.pdf` or
/// `Scorecard KW_07.pdf`.
#[must_use]
pub fn scorecard_period(file_name: &str, reference: NaiveDate) -> ReportPeriod {
    let fallback = period_of(reference);
    let week = capture_week(&SCORECARD_WEEK_RE, file_name)
        .or_else(|| capture_week(&SCORECARD_KW_RE, file_name));

    week.map_or_else(
        || {
            log::debug!("No week in scorecard name '{file_name}', using {fallback}");
            fallback
        },
        |week| {
            ReportPeriod::new(
                week,
                year_from_file_name(file_name).unwrap_or(fallback.year),
            )
        },
    )
}

/// Period of a mentor export.
///
/// Mentor exports carry the date of the Sunday before the reporting week;
/// the period is the ISO week of the following Monday. Names without a
/// date may carry `KW nn` with an optional year.
#[must_use]
pub fn mentor_period(file_name: &str, reference: NaiveDate) -> ReportPeriod {
    let dated = MENTOR_DATE_RE.captures(file_name).and_then(|caps| {
        let year = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2)?.as_str().parse().ok()?;
        let day = caps.get(3)?.as_str().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)?.succ_opt()
    });
    if let Some(monday) = dated {
        return period_of(monday);
    }

    let fallback = period_of(reference);
    if let Some(caps) = MENTOR_KW_RE.captures(file_name) {
        let week = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|week| (1..=53).contains(week));
        if let Some(week) = week {
            let year = caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .or_else(|| year_from_file_name(file_name))
                .unwrap_or(fallback.year);
            return ReportPeriod::new(week, year);
        }
    }

    log::debug!("No period in mentor name '{file_name}', using {fallback}");
    fallback
}

/// Period of any other report (`week`, `kw` or `wk` followed by digits).
#[must_use]
pub fn generic_period(file_name: &str, reference: NaiveDate) -> ReportPeriod {
    let fallback = period_of(reference);
    capture_week(&GENERIC_WEEK_RE, file_name).map_or(fallback, |week| {
        ReportPeriod::new(
            week,
            year_from_file_name(file_name).unwrap_or(fallback.year),
        )
    })
}

//! Weekly storage keys: `<category>_data_week_<week>_<year>`.

use dsp_quality_models::{ReportCategory, ReportPeriod};

use crate::{Repository, StoreError};

const fn key_prefix(category: ReportCategory) -> &'static str {
    match category {
        ReportCategory::Scorecard => "scorecard",
        ReportCategory::Mentor => "mentor",
        ReportCategory::CustomerContact => "customer_contact",
        ReportCategory::Concessions => "concessions",
    }
}

/// Storage key of a category's report for a period.
#[must_use]
pub fn week_key(category: ReportCategory, period: ReportPeriod) -> String {
    format!(
        "{}_data_week_{}_{}",
        key_prefix(category),
        period.week,
        period.year
    )
}

/// Recovers the category and period from a weekly storage key.
#[must_use]
pub fn parse_week_key(key: &str) -> Option<(ReportCategory, ReportPeriod)> {
    ReportCategory::ALL.into_iter().find_map(|category| {
        let rest = key
            .strip_prefix(key_prefix(category))?
            .strip_prefix("_data_week_")?;
        let (week, year) = rest.split_once('_')?;
        Some((
            category,
            ReportPeriod::new(week.parse().ok()?, year.parse().ok()?),
        ))
    })
}

/// Periods stored for a category, newest first.
///
/// # Errors
///
/// * If the repository keys cannot be listed
pub fn available_periods(
    repo: &dyn Repository,
    category: ReportCategory,
) -> Result<Vec<ReportPeriod>, StoreError> {
    let mut periods: Vec<ReportPeriod> = repo
        .keys()?
        .iter()
        .filter_map(|key| parse_week_key(key))
        .filter(|(c, _)| *c == category)
        .map(|(_, period)| period)
        .collect();
    periods.sort_by_key(|p| std::cmp::Reverse((p.year, p.week)));
    Ok(periods)
}

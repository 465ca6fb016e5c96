//! Assembly of extractor outputs into [`ScoreCardData`].

use dsp_quality_models::{CompanyKpi, DriverKpi, ReportPeriod, ScoreCardData};

use crate::fields::{extract_overall_status, rank_note};

/// Raw outputs of the scorecard extractors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScorecardFields {
    /// Station code.
    pub location: Option<String>,
    /// Headline score.
    pub overall_score: Option<f64>,
    /// Station rank.
    pub rank: Option<u32>,
    /// Rank change since last week.
    pub rank_change: Option<i32>,
    /// Company KPI lines.
    pub company_kpis: Vec<CompanyKpi>,
    /// Driver table rows, already deduplicated.
    pub driver_kpis: Vec<DriverKpi>,
    /// Recommended focus areas.
    pub focus_areas: Vec<String>,
}

/// Builds the scorecard record.
///
/// Missing fields stay missing; only the overall status is derived, with a
/// missing score reported as `Fair`. No cross-field consistency is checked.
#[must_use]
pub fn normalize(fields: ScorecardFields, period: ReportPeriod) -> ScoreCardData {
    ScoreCardData {
        week: period.week,
        year: period.year,
        location: fields.location,
        overall_score: fields.overall_score,
        overall_status: extract_overall_status(fields.overall_score),
        rank: fields.rank,
        rank_note: rank_note(fields.rank_change),
        company_kpis: fields.company_kpis,
        driver_kpis: fields.driver_kpis,
        recommended_focus_areas: fields.focus_areas.into_iter().take(3).collect(),
        is_sample_data: Some(false),
    }
}

/// Returns `true` if the record has a period, a location, and at least one
/// company and one driver KPI. Advisory only.
#[must_use]
pub fn is_valid_scorecard(data: &ScoreCardData) -> bool {
    let valid = data.week > 0
        && data.year > 0
        && data.location.as_deref().is_some_and(|l| !l.is_empty())
        && !data.company_kpis.is_empty()
        && !data.driver_kpis.is_empty();

    if !valid {
        log::debug!(
            "Scorecard for {} is incomplete",
            ReportPeriod::new(data.week, data.year)
        );
    }
    valid
}

#[cfg(test)]
mod tests {
    use dsp_quality_models::{KpiStatus, OverallStatus};

    use super::*;

    fn kpi() -> CompanyKpi {
        CompanyKpi {
            name: "DCR".to_owned(),
            value: 99.0,
            target: 98.0,
            unit: "%".to_owned(),
            status: KpiStatus::Fantastic,
        }
    }

    #[test]
    fn missing_fields_pass_through() {
        let data = normalize(ScorecardFields::default(), ReportPeriod::new(7, 2025));
        assert_eq!(data.week, 7);
        assert_eq!(data.location, None);
        assert_eq!(data.overall_score, None);
        assert_eq!(data.overall_status, OverallStatus::Fair);
        assert_eq!(data.rank, None);
        assert_eq!(data.rank_note, "");
        assert!(data.company_kpis.is_empty());
        assert_eq!(data.is_sample_data, Some(false));
        assert!(!is_valid_scorecard(&data));
    }

    #[test]
    fn complete_record_is_valid() {
        let fields = ScorecardFields {
            location: Some("DSU1".to_owned()),
            overall_score: Some(96.4),
            rank: Some(4),
            rank_change: Some(-1),
            company_kpis: vec![kpi()],
            driver_kpis: vec![DriverKpi {
                name: "A1B2C3D4E5F6G7".to_owned(),
                metrics: vec![],
            }],
            focus_areas: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        };
        let data = normalize(fields, ReportPeriod::new(7, 2025));
        assert_eq!(data.overall_status, OverallStatus::Fantastic);
        assert_eq!(data.rank_note, "Down 1 places from last week");
        assert_eq!(data.recommended_focus_areas.len(), 3);
        assert!(is_valid_scorecard(&data));
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scorecard PDF extraction.
//!
//! The weekly scorecard is a short PDF: page 1 carries the station summary,
//! page 2 the headline score, company KPIs, and recommended focus areas,
//! and the following pages the driver table. Every extractor degrades to
//! `None` or a documented default, so [`extract_scorecard`] always returns
//! a record.

pub mod company;
pub mod fields;
pub mod focus;
pub mod normalize;
pub mod structure;

use dsp_quality_models::{FocusAreaProvenance, PdfPage, ReportPeriod, ScoreCardData};

pub use company::{determine_status, extract_company_kpis};
pub use fields::{
    extract_location, extract_overall_score, extract_overall_status, extract_rank,
    extract_rank_change, rank_note,
};
pub use focus::extract_focus_areas_from_structure;
pub use normalize::{ScorecardFields, is_valid_scorecard, normalize};
pub use structure::{extract_driver_kpis, validate_driver_extraction};

/// Result of a scorecard extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorecardExtraction {
    /// Normalized record.
    pub data: ScoreCardData,
    /// Stage that produced the focus areas.
    pub focus_provenance: FocusAreaProvenance,
    /// Whether the driver table looks like a real one.
    pub drivers_plausible: bool,
}

fn join_pages<'a>(pages: impl Iterator<Item = &'a PdfPage>) -> String {
    pages
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts a scorecard from its pages.
///
/// Score and rank are looked up on page 2 first, then page 1. Company KPIs
/// come from page 2, or from the whole document if page 2 has none.
#[must_use]
pub fn extract_scorecard(pages: &[PdfPage], period: ReportPeriod) -> ScorecardExtraction {
    let all_text = join_pages(pages.iter());
    let summary_text = join_pages(pages.get(1).into_iter().chain(pages.first()));

    let mut company_kpis = pages
        .get(1)
        .map(|p| extract_company_kpis(&p.text))
        .unwrap_or_default();
    if company_kpis.is_empty() {
        company_kpis = extract_company_kpis(&all_text);
    }

    let drivers: Vec<_> = pages
        .iter()
        .flat_map(|p| extract_driver_kpis(&p.items))
        .collect();
    let driver_kpis = dsp_quality_models::deduplicate_drivers(drivers);
    let drivers_plausible = validate_driver_extraction(&driver_kpis);

    let focus = extract_focus_areas_from_structure(pages);

    let fields = ScorecardFields {
        location: extract_location(&all_text),
        overall_score: extract_overall_score(&summary_text),
        rank: extract_rank(&summary_text),
        rank_change: extract_rank_change(&summary_text),
        company_kpis,
        driver_kpis,
        focus_areas: focus.areas,
    };

    let data = normalize(fields, period);
    log::info!(
        "Extracted scorecard {period}: score {:?}, {} company KPIs, {} drivers",
        data.overall_score,
        data.company_kpis.len(),
        data.driver_kpis.len()
    );

    ScorecardExtraction {
        data,
        focus_provenance: focus.provenance,
        drivers_plausible,
    }
}

#[cfg(test)]
mod tests {
    use dsp_quality_document::pdf::page_from_text;
    use dsp_quality_models::OverallStatus;

    use super::*;

    fn sample_pages() -> Vec<PdfPage> {
        let page1 = "DSP Scorecard  DSU1\nWeek 12 2025\nRank at (DSU1): 4\nUp 2 places from last week";
        let page2 = "Overall Score: 87.3%\nDCR: 98.9 %\nDNR DPMO: 1800\nFICO: 790";
        let page3 = [
            "Transporter ID    Delivered    DCR    DNR DPMO    POD    CC    CE    DEX",
            "A1B2C3D4E5F6G7    1203    99.2 %    1500    98.5 %    96 %    0    94 %",
            "A2B2C3D4E5F6G7    980    98.1 %    0    99 %    97 %    1    96 %",
            "A3B2C3D4E5F6G7    1100    99.6 %    2100    97 %    99 %    0    95 %",
            "A1B2C3D4E5F6G7    1203    99.2 %    1500    98.5 %    96 %    0    94 %",
        ]
        .join("\n");
        vec![
            page_from_text(1, page1),
            page_from_text(2, page2),
            page_from_text(3, &page3),
        ]
    }

    #[test]
    fn extracts_full_scorecard() {
        let extraction = extract_scorecard(&sample_pages(), ReportPeriod::new(12, 2025));
        let data = &extraction.data;

        assert_eq!(data.week, 12);
        assert_eq!(data.location.as_deref(), Some("DSU1"));
        assert_eq!(data.overall_score, Some(87.3));
        assert_eq!(data.overall_status, OverallStatus::Great);
        assert_eq!(data.rank, Some(4));
        assert_eq!(data.rank_note, "Up 2 places from last week");
        assert_eq!(data.company_kpis.len(), 3);
        assert_eq!(data.driver_kpis.len(), 3);
        assert_eq!(data.driver_kpis[0].metrics.len(), 7);
        assert!(!extraction.drivers_plausible);
        assert!(!data.recommended_focus_areas.is_empty());
        assert!(data.recommended_focus_areas.len() <= 3);
        assert!(is_valid_scorecard(data));
    }

    #[test]
    fn extraction_is_deterministic() {
        let pages = sample_pages();
        let period = ReportPeriod::new(12, 2025);
        let a = serde_json::to_string(&extract_scorecard(&pages, period).data).unwrap();
        let b = serde_json::to_string(&extract_scorecard(&pages, period).data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_document_still_yields_a_record() {
        let extraction = extract_scorecard(&[], ReportPeriod::new(1, 2025));
        assert_eq!(extraction.data.overall_score, None);
        assert_eq!(extraction.data.overall_status, OverallStatus::Fair);
        assert_eq!(extraction.focus_provenance, FocusAreaProvenance::Default);
        assert_eq!(extraction.data.recommended_focus_areas.len(), 3);
    }
}

//! Recommended focus areas.
//!
//! The scorecard prints its improvement recommendations near the bottom of
//! page 2, but the layout varies. Extraction is a cascade of decreasing
//! confidence; each stage runs only if the previous one found nothing:
//!
//! 1. items below a focus-area header in the bottom 70% of page 2
//! 2. vertical clusters of items in the bottom 40% of page 2
//! 3. known KPI names in the page 2 text
//! 4. known KPI names in the page 1 text
//! 5. a fixed default list
//!
//! The result records which stage produced it.

use std::sync::LazyLock;

use dsp_quality_models::{FocusAreaProvenance, FocusAreas, PdfPage, PositionalItem};
use regex::Regex;

use crate::structure::{ROW_THRESHOLD, group_rows};

/// At most this many focus areas are reported.
pub const MAX_FOCUS_AREAS: usize = 3;

/// Reported when nothing could be extracted.
pub const DEFAULT_FOCUS_AREAS: [&str; 3] = ["Contact Compliance", "DNR DPMO", "Photo-On-Delivery"];

/// KPI names searched for in the raw page text.
pub const KNOWN_KPIS: [&str; 9] = [
    "DNR DPMO",
    "Delivered Not Received",
    "Delivery Completion Rate",
    "Contact Compliance",
    "Photo-On-Delivery",
    "Safe Driving",
    "Working Hours Compliance",
    "Mentor Adoption",
    "Customer Escalation",
];

/// Phrases introducing a focus-area section.
pub const HEADER_PHRASES: [&str; 6] = [
    "focus area",
    "to improve",
    "improvement",
    "priority",
    "action item",
    "recommend",
];

/// Fraction of the page height, from the bottom, searched for headers.
pub const HEADER_REGION: f64 = 0.7;

/// Fraction of the page height, from the bottom, searched for clusters.
pub const CLUSTER_REGION: f64 = 0.4;

/// Vertical extent below a header that belongs to its section.
pub const SECTION_WINDOW: f64 = 200.0;

const KPI_KEYWORDS: [&str; 26] = [
    "dpmo",
    "dcr",
    "dnr",
    "pod",
    "photo",
    "contact",
    "compliance",
    "delivery",
    "delivered",
    "completion",
    "safe",
    "driving",
    "fico",
    "seatbelt",
    "speeding",
    "distraction",
    "following",
    "escalation",
    "customer",
    "dvic",
    "vsa",
    "capacity",
    "reliability",
    "mentor",
    "working hours",
    "adoption",
];

const STOP_WORDS: [&str; 7] = ["the", "and", "area", "focus", "priority", "action", "item"];

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static PERCENT_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9.]+%$").expect("valid regex"));
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[•\-*]|\d+\.|[A-Z])").expect("valid regex"));
static LIST_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•\-*\d.]+\s*").expect("valid regex"));
static PERCENT_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%.*$").expect("valid regex"));
static VALUE_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s:]+[\d.,]+$").expect("valid regex"));

/// Returns `true` if the text mentions a scorecard KPI.
#[must_use]
pub fn is_likely_kpi(text: &str) -> bool {
    let lower = text.to_lowercase();
    KPI_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

fn clean_candidate(text: &str) -> Option<String> {
    let text = text.trim();
    if text.chars().count() < 3 || DIGITS_RE.is_match(text) || PERCENT_ONLY_RE.is_match(text) {
        return None;
    }
    if !LIST_ITEM_RE.is_match(text) && !is_likely_kpi(text) {
        return None;
    }

    let cleaned = LIST_MARKER_RE.replace(text, "");
    let cleaned = cleaned.trim_start_matches('–').trim_start();
    let cleaned = PERCENT_TAIL_RE.replace(cleaned, "");
    let cleaned = VALUE_TAIL_RE.replace(cleaned.trim_end(), "");
    let cleaned = cleaned.trim();

    let lower = cleaned.to_lowercase();
    if cleaned.chars().count() <= 3 || STOP_WORDS.contains(&lower.as_str()) {
        return None;
    }

    Some(cleaned.to_owned())
}

/// Turns candidate items into focus areas: list markers and trailing values
/// are removed, non-KPI text is dropped, duplicates are skipped and the
/// result is capped at [`MAX_FOCUS_AREAS`].
#[must_use]
pub fn extract_areas_from_items(items: &[&PositionalItem]) -> Vec<String> {
    let mut areas: Vec<String> = Vec::new();
    for item in items {
        let Some(candidate) = clean_candidate(&item.text) else {
            continue;
        };
        if !is_likely_kpi(&candidate) || areas.contains(&candidate) {
            continue;
        }
        areas.push(candidate);
        if areas.len() == MAX_FOCUS_AREAS {
            break;
        }
    }
    areas
}

fn merge(areas: &mut Vec<String>, found: Vec<String>) {
    for area in found {
        if areas.len() == MAX_FOCUS_AREAS {
            break;
        }
        if !areas.contains(&area) {
            areas.push(area);
        }
    }
}

fn top_down(items: &mut [&PositionalItem]) {
    items.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));
}

fn is_header(item: &PositionalItem) -> bool {
    let lower = item.text.to_lowercase();
    item.y < item.page_height * HEADER_REGION
        && HEADER_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Stage 1: items in the window below a focus-area header.
///
/// Headers are tried top down; the first one with areas beneath it wins.
#[must_use]
pub fn areas_below_headers(items: &[PositionalItem]) -> Vec<String> {
    let mut headers: Vec<&PositionalItem> = items.iter().filter(|item| is_header(item)).collect();
    top_down(&mut headers);

    for header in headers {
        let mut section: Vec<&PositionalItem> = items
            .iter()
            .filter(|item| item.y < header.y && item.y >= header.y - SECTION_WINDOW)
            .collect();
        top_down(&mut section);

        let mut areas = Vec::new();
        merge(&mut areas, extract_areas_from_items(&section));
        if !areas.is_empty() {
            log::debug!("Focus areas found below '{}': {areas:?}", header.text);
            return areas;
        }
    }

    Vec::new()
}

/// Stage 2: clusters of items near the bottom of the page.
#[must_use]
pub fn areas_from_clusters(items: &[PositionalItem]) -> Vec<String> {
    let bottom: Vec<PositionalItem> = items
        .iter()
        .filter(|item| item.y < item.page_height * CLUSTER_REGION)
        .cloned()
        .collect();

    let mut areas = Vec::new();
    for cluster in group_rows(&bottom, ROW_THRESHOLD) {
        let refs: Vec<&PositionalItem> = cluster.iter().collect();
        merge(&mut areas, extract_areas_from_items(&refs));
    }

    if !areas.is_empty() {
        log::debug!("Focus areas found in a bottom cluster: {areas:?}");
    }
    areas
}

/// Stages 3 and 4: known KPI names in raw text.
#[must_use]
pub fn known_kpis_in_text(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    KNOWN_KPIS
        .iter()
        .filter(|kpi| lower.contains(&kpi.to_lowercase()))
        .take(MAX_FOCUS_AREAS)
        .map(|kpi| (*kpi).to_owned())
        .collect()
}

/// Extracts between one and three focus areas from the scorecard pages.
#[must_use]
pub fn extract_focus_areas_from_structure(pages: &[PdfPage]) -> FocusAreas {
    let found = |areas: Vec<String>, provenance| {
        (!areas.is_empty()).then_some(FocusAreas { areas, provenance })
    };

    let extracted = pages
        .get(1)
        .and_then(|page| {
            found(areas_below_headers(&page.items), FocusAreaProvenance::HeaderSection)
                .or_else(|| {
                    found(
                        areas_from_clusters(&page.items),
                        FocusAreaProvenance::ProximityCluster,
                    )
                })
                .or_else(|| {
                    found(
                        known_kpis_in_text(&page.text),
                        FocusAreaProvenance::KeywordScanPage2,
                    )
                })
        })
        .or_else(|| {
            pages.first().and_then(|page| {
                found(
                    known_kpis_in_text(&page.text),
                    FocusAreaProvenance::KeywordScanPage1,
                )
            })
        });

    if let Some(focus) = extracted {
        return focus;
    }

    log::warn!("No focus areas found, using the default list");
    FocusAreas {
        areas: DEFAULT_FOCUS_AREAS.iter().map(|s| (*s).to_owned()).collect(),
        provenance: FocusAreaProvenance::Default,
    }
}

//! Company-level KPI lines.

use std::sync::LazyLock;

use dsp_quality_models::{CompanyKpi, KpiStatus};
use regex::Regex;

struct KpiPattern {
    name: &'static str,
    pattern: Regex,
    target: f64,
    unit: &'static str,
}

impl KpiPattern {
    fn new(name: &'static str, pattern: &str, target: f64, unit: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("valid regex"),
            target,
            unit,
        }
    }
}

static KPI_PATTERNS: LazyLock<Vec<KpiPattern>> = LazyLock::new(|| {
    vec![
        KpiPattern::new(
            "Delivery Completion Rate (DCR)",
            r"(?i)DCR[:\s]+(\d+(?:\.\d+)?)\s*%",
            98.0,
            "%",
        ),
        KpiPattern::new(
            "Delivered Not Received (DNR DPMO)",
            r"(?i)DNR\s+DPMO[:\s]+(\d+(?:\.\d+)?)",
            3000.0,
            "DPMO",
        ),
        KpiPattern::new(
            "Photo-On-Delivery",
            r"(?i)Photo[- ]On[- ]Delivery[:\s]+(\d+(?:\.\d+)?)\s*%",
            95.0,
            "%",
        ),
        KpiPattern::new(
            "Contact Compliance",
            r"(?i)Contact\s+Compliance[:\s]+(\d+(?:\.\d+)?)\s*%",
            95.0,
            "%",
        ),
        KpiPattern::new(
            "Customer escalation DPMO",
            r"(?i)Customer\s+escalation\s+DPMO[:\s]+(\d+(?:\.\d+)?)",
            3500.0,
            "DPMO",
        ),
        KpiPattern::new(
            "Vehicle Audit (VSA) Compliance",
            r"(?i)VSA[:\s]+(\d+(?:\.\d+)?)\s*%",
            95.0,
            "%",
        ),
        KpiPattern::new(
            "DVIC Compliance",
            r"(?i)DVIC[:\s]+(\d+(?:\.\d+)?)\s*%",
            95.0,
            "%",
        ),
        KpiPattern::new(
            "Safe Driving Metric (FICO)",
            r"(?i)FICO[:\s]+(\d+(?:\.\d+)?)",
            800.0,
            "",
        ),
        KpiPattern::new(
            "Capacity Reliability",
            r"(?i)Capacity\s+Reliability[:\s]+(\d+(?:\.\d+)?)\s*%",
            98.0,
            "%",
        ),
    ]
});

static BOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bBOC\b|breach\s+of\s+contract").expect("valid regex"));

/// Name of the breach-of-contract KPI.
pub const BOC_KPI: &str = "Breach of Contract (BOC)";

/// Status band of a KPI value.
///
/// DPMO metrics are better when lower, FICO is a score out of 850 and
/// everything else is a percentage.
#[must_use]
pub fn determine_status(name: &str, value: f64) -> KpiStatus {
    let upper = name.to_uppercase();
    if upper.contains("DPMO") {
        if value < 2000.0 {
            KpiStatus::Fantastic
        } else if value < 3000.0 {
            KpiStatus::Great
        } else if value < 4000.0 {
            KpiStatus::Fair
        } else {
            KpiStatus::Poor
        }
    } else if upper.contains("FICO") {
        if value > 850.0 {
            KpiStatus::Fantastic
        } else if value > 800.0 {
            KpiStatus::Great
        } else if value > 750.0 {
            KpiStatus::Fair
        } else {
            KpiStatus::Poor
        }
    } else if value > 98.0 {
        KpiStatus::Fantastic
    } else if value > 95.0 {
        KpiStatus::Great
    } else if value > 90.0 {
        KpiStatus::Fair
    } else {
        KpiStatus::Poor
    }
}

/// Extracts the labeled company KPIs present in the text.
///
/// Nothing is synthesized: a report without KPI lines yields an empty list.
#[must_use]
pub fn extract_company_kpis(text: &str) -> Vec<CompanyKpi> {
    let mut kpis: Vec<CompanyKpi> = KPI_PATTERNS
        .iter()
        .filter_map(|kpi| {
            let value: f64 = kpi.pattern.captures(text)?.get(1)?.as_str().parse().ok()?;
            Some(CompanyKpi {
                name: kpi.name.to_owned(),
                value,
                target: kpi.target,
                unit: kpi.unit.to_owned(),
                status: determine_status(kpi.name, value),
            })
        })
        .collect();

    if BOC_RE.is_match(text) {
        let status = if text.to_lowercase().contains("not in compliance") {
            KpiStatus::NotInCompliance
        } else {
            KpiStatus::None
        };
        kpis.push(CompanyKpi {
            name: BOC_KPI.to_owned(),
            value: 0.0,
            target: 0.0,
            unit: String::new(),
            status,
        });
    }

    if kpis.is_empty() {
        log::warn!("No company KPIs found");
    } else {
        log::debug!("Found {} company KPIs", kpis.len());
    }

    kpis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bands_by_kind() {
        assert_eq!(determine_status("DNR DPMO", 1500.0), KpiStatus::Fantastic);
        assert_eq!(determine_status("DNR DPMO", 3500.0), KpiStatus::Fair);
        assert_eq!(determine_status("DNR DPMO", 4000.0), KpiStatus::Poor);
        assert_eq!(determine_status("Safe Driving Metric (FICO)", 820.0), KpiStatus::Great);
        assert_eq!(determine_status("Safe Driving Metric (FICO)", 750.0), KpiStatus::Poor);
        assert_eq!(determine_status("DCR", 98.5), KpiStatus::Fantastic);
        assert_eq!(determine_status("DCR", 96.0), KpiStatus::Great);
        assert_eq!(determine_status("DCR", 95.0), KpiStatus::Fair);
        assert_eq!(determine_status("DCR", 90.0), KpiStatus::Poor);
    }

    #[test]
    fn extracts_labeled_kpis() {
        let text = "DCR: 99.1 %\nDNR DPMO 2450\nContact Compliance 93.5%\nFICO: 812";
        let kpis = extract_company_kpis(text);
        let names: Vec<&str> = kpis.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Delivery Completion Rate (DCR)",
                "Delivered Not Received (DNR DPMO)",
                "Contact Compliance",
                "Safe Driving Metric (FICO)",
            ]
        );
        assert_eq!(kpis[0].status, KpiStatus::Fantastic);
        assert_eq!(kpis[1].unit, "DPMO");
        assert_eq!(kpis[1].status, KpiStatus::Great);
        assert!((kpis[1].target - 3000.0).abs() < f64::EPSILON);
        assert_eq!(kpis[2].status, KpiStatus::Fair);
        assert_eq!(kpis[3].unit, "");
        assert_eq!(kpis[3].status, KpiStatus::Great);
    }

    #[test]
    fn breach_of_contract() {
        let kpis = extract_company_kpis("BOC: Not in compliance");
        assert_eq!(kpis.len(), 1);
        assert_eq!(kpis[0].name, BOC_KPI);
        assert_eq!(kpis[0].status, KpiStatus::NotInCompliance);

        let kpis = extract_company_kpis("Breach of Contract: none");
        assert_eq!(kpis[0].status, KpiStatus::None);
    }

    #[test]
    fn nothing_found_is_empty() {
        assert!(extract_company_kpis("Weekly summary").is_empty());
    }
}

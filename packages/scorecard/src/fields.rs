//! Single-value field extractors.
//!
//! Each extractor is a pure function of the page text. Patterns are tried
//! in a fixed order and the first match wins; an exhausted cascade yields
//! `None`.

use std::sync::LazyLock;

use dsp_quality_models::OverallStatus;
use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{2,3}\d+").expect("valid regex"));

static LABELED_SCORE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)overall\s+score:?\s*(\d{1,3}(?:\.\d+)?)\s*%?",
        r"(?i)scorecard\s+score:?\s*(\d{1,3}(?:\.\d+)?)",
        r"(?i)total\s+score:?\s*(\d{1,3}(?:\.\d+)?)",
        r"(?i)dsp\s+score:?\s*(\d{1,3}(?:\.\d+)?)",
        r"(?i)overall\s+standing:?\s*(\d{1,3}(?:\.\d+)?)",
        r"(?i)\bscore:\s*(\d{1,3}(?:\.\d+)?)",
    ])
});

static NEAR_SCORE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\b(?:score|overall|total)\b[^\d\n]{0,20}(\d{1,3}(?:\.\d+)?)\s*(?:%|points?\b)",
        r"(?i)(\d{1,3}(?:\.\d+)?)\s*(?:%|points?)\s*(?:overall|score|total)\b",
    ])
});

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3}(?:\.\d+)?)\s*%").expect("valid regex"));

static RANK_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\brank\s+at\s+(?:\([^)]*\)|[^:\d\n]*):?\s*(\d+)",
        r"(?i)\brank(?:ing)?\s*:\s*#?(\d+)",
        r"(?i)\bposition\s*:\s*#?(\d+)",
        r"(?i)\bplace\s*:\s*#?(\d+)",
        r"(?i)\branked\s+(?:at\s+)?(?:#|no\.\s*)?(\d+)",
        r"(?i)\b(\d+)(?:st|nd|rd|th)\b(?:\s+(?:place|rank|position))?",
    ])
});

static RANK_UP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bup\s+(\d+)\s+place").expect("valid regex"));
static RANK_DOWN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdown\s+(\d+)\s+place").expect("valid regex"));

/// Lowest percentage accepted by the headline-score fallback.
pub const MIN_FALLBACK_SCORE: f64 = 50.0;

/// Highest percentage accepted by the headline-score fallback.
pub const MAX_FALLBACK_SCORE: f64 = 100.0;

fn first_capture<T: std::str::FromStr>(patterns: &[Regex], text: &str) -> Option<T> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}

/// Station code: the first `[A-Z]{2,3}\d+` in the text.
#[must_use]
pub fn extract_location(text: &str) -> Option<String> {
    let location = LOCATION_RE.find(text).map(|m| m.as_str().to_owned());
    if location.is_none() {
        log::debug!("No station code found");
    }
    location
}

/// Headline score of the scorecard.
///
/// Labeled patterns win over numbers near score words, which win over the
/// largest percentage between 50 and 100 anywhere in the text.
#[must_use]
pub fn extract_overall_score(text: &str) -> Option<f64> {
    if let Some(score) = first_capture(&LABELED_SCORE_RES, text) {
        return Some(score);
    }
    if let Some(score) = first_capture(&NEAR_SCORE_RES, text) {
        log::debug!("Overall score {score} taken from text near a score label");
        return Some(score);
    }

    let best = PERCENT_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .filter(|v| (MIN_FALLBACK_SCORE..=MAX_FALLBACK_SCORE).contains(v))
        .max_by(f64::total_cmp);

    match best {
        Some(score) => log::debug!("Overall score {score} taken from the largest percentage"),
        None => log::warn!("No overall score found"),
    }

    best
}

/// Status band of a headline score. A missing score is reported as `Fair`.
#[must_use]
pub fn extract_overall_status(score: Option<f64>) -> OverallStatus {
    match score {
        Some(s) if s >= 95.0 => OverallStatus::Fantastic,
        Some(s) if s >= 85.0 => OverallStatus::Great,
        Some(s) if s >= 75.0 => OverallStatus::Fair,
        Some(_) => OverallStatus::Poor,
        None => OverallStatus::Fair,
    }
}

/// Station rank.
#[must_use]
pub fn extract_rank(text: &str) -> Option<u32> {
    let rank = first_capture(&RANK_RES, text);
    if rank.is_none() {
        log::debug!("No rank found");
    }
    rank
}

/// Rank change since last week: positive for "up N places", negative for
/// "down N places".
#[must_use]
pub fn extract_rank_change(text: &str) -> Option<i32> {
    let capture = |re: &Regex| -> Option<i32> {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    };
    capture(&RANK_UP_RE).or_else(|| capture(&RANK_DOWN_RE).map(|n| -n))
}

/// Human readable rank change.
#[must_use]
pub fn rank_note(change: Option<i32>) -> String {
    match change {
        Some(n) if n > 0 => format!("Up {n} places from last week"),
        Some(n) if n < 0 => format!("Down {} places from last week", n.unsigned_abs()),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_is_first_station_code() {
        assert_eq!(
            extract_location("Delivery station DSU1 at Berlin, also DBE2"),
            Some("DSU1".to_owned())
        );
        assert_eq!(extract_location("no code here"), None);
    }

    #[test]
    fn labeled_score() {
        assert_eq!(extract_overall_score("Overall Score: 87%"), Some(87.0));
        assert_eq!(extract_overall_score("Scorecard Score 91.5"), Some(91.5));
        assert_eq!(
            extract_overall_score("DCR 99.1% ... Overall Score: 78.2% Fair"),
            Some(78.2)
        );
    }

    #[test]
    fn score_near_label() {
        assert_eq!(extract_overall_score("Your overall result is 88 points"), Some(88.0));
        assert_eq!(extract_overall_score("83 % overall"), Some(83.0));
    }

    #[test]
    fn score_falls_back_to_largest_plausible_percentage() {
        assert_eq!(
            extract_overall_score("DCR 99.2 %\nPOD 97 %\nshare 12 %\n140 %"),
            Some(99.2)
        );
    }

    #[test]
    fn fallback_score_stays_in_range() {
        for text in ["12 % 30 % 49.9 %", "101 % 200 %", "55 % 120 %"] {
            if let Some(score) = extract_overall_score(text) {
                assert!((MIN_FALLBACK_SCORE..=MAX_FALLBACK_SCORE).contains(&score));
            }
        }
        assert_eq!(extract_overall_score("12 % 30 %"), None);
    }

    #[test]
    fn no_score_anywhere() {
        let score = extract_overall_score("Weekly report without numbers");
        assert_eq!(score, None);
        assert_eq!(extract_overall_status(score), OverallStatus::Fair);
    }

    #[test]
    fn status_bands() {
        assert_eq!(extract_overall_status(Some(87.0)), OverallStatus::Great);
        assert_eq!(extract_overall_status(Some(95.0)), OverallStatus::Fantastic);
        assert_eq!(extract_overall_status(Some(75.0)), OverallStatus::Fair);
        assert_eq!(extract_overall_status(Some(74.9)), OverallStatus::Poor);
    }

    #[test]
    fn rank_patterns() {
        assert_eq!(extract_rank("Rank at (DSU1): 4"), Some(4));
        assert_eq!(extract_rank("Ranking: 12"), Some(12));
        assert_eq!(extract_rank("Position: #7"), Some(7));
        assert_eq!(extract_rank("ranked at 3 in region"), Some(3));
        assert_eq!(extract_rank("finished 5th this week"), Some(5));
        assert_eq!(extract_rank("3rd place"), Some(3));
        assert_eq!(extract_rank("nothing"), None);
    }

    #[test]
    fn rank_change_and_note() {
        assert_eq!(extract_rank_change("Up 3 places from last week"), Some(3));
        assert_eq!(extract_rank_change("down 2 places"), Some(-2));
        assert_eq!(extract_rank_change("steady"), None);
        assert_eq!(rank_note(Some(3)), "Up 3 places from last week");
        assert_eq!(rank_note(Some(-2)), "Down 2 places from last week");
        assert_eq!(rank_note(Some(0)), "");
        assert_eq!(rank_note(None), "");
    }
}

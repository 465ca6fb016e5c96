//! `WKnn` week labels.

use std::sync::LazyLock;

use dsp_quality_models::concessions::week_number;
use regex::Regex;

static FILE_NAME_WEEK_RES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)(?:week|kw|wk)[- _]?(\d+)").expect("valid regex"),
        Regex::new(r"(?i)w(\d+)").expect("valid regex"),
    ]
});

fn label(digits: &str) -> String {
    format!("WK{digits:0>2}")
}

/// Normalizes a week cell to `WKnn`. Returns `None` if it has no digits.
#[must_use]
pub fn normalize_week(value: &str) -> Option<String> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then(|| label(&digits))
}

/// Week named in a file name, as `WKnn`.
#[must_use]
pub fn week_from_file_name(file_name: &str) -> Option<String> {
    FILE_NAME_WEEK_RES
        .iter()
        .find_map(|re| re.captures(file_name)?.get(1))
        .map(|m| label(m.as_str()))
}

/// Current week: from the file name, else the highest week in the data.
#[must_use]
pub fn determine_current_week<'a>(
    file_name: &str,
    weeks: impl IntoIterator<Item = &'a String>,
) -> Option<String> {
    if let Some(week) = week_from_file_name(file_name) {
        log::debug!("Week {week} taken from file name '{file_name}'");
        return Some(week);
    }

    let newest = weeks.into_iter().max_by_key(|w| week_number(w)).cloned();
    if let Some(week) = &newest {
        log::debug!("Using newest week in the data: {week}");
    }
    newest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_week_values() {
        assert_eq!(normalize_week("7").as_deref(), Some("WK07"));
        assert_eq!(normalize_week("KW 11").as_deref(), Some("WK11"));
        assert_eq!(normalize_week("WK12").as_deref(), Some("WK12"));
        assert_eq!(normalize_week("n/a"), None);
    }

    #[test]
    fn week_from_names() {
        assert_eq!(week_from_file_name("Concessions_KW_09.xlsx").as_deref(), Some("WK09"));
        assert_eq!(week_from_file_name("concessions week12.csv").as_deref(), Some("WK12"));
        assert_eq!(week_from_file_name("export-W3.xlsx").as_deref(), Some("WK03"));
        assert_eq!(week_from_file_name("concessions.xlsx"), None);
    }

    #[test]
    fn newest_week_from_data() {
        let weeks = ["WK09".to_owned(), "WK11".to_owned(), "WK10".to_owned()];
        assert_eq!(
            determine_current_week("concessions.xlsx", &weeks).as_deref(),
            Some("WK11")
        );
        assert_eq!(
            determine_current_week("kw8.xlsx", &weeks).as_deref(),
            Some("WK08")
        );
        assert_eq!(determine_current_week("concessions.xlsx", &Vec::<String>::new()), None);
    }
}

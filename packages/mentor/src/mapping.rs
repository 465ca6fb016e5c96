//! Semantic field to column mapping.
//!
//! The mapping is driven by one ordered rule list ([`RULES`]). For each
//! field the first rule in list order that yields a column wins:
//!
//! 1. [`MappingRule::ExactPosition`]: fixed columns that hold regardless of
//!    header text. The driver name columns `A`/`B` carry anonymised IDs and
//!    the five risk metrics sit at `H`/`J`/`L`/`N`/`V` in the standard
//!    vendor template.
//! 2. [`MappingRule::KeywordMatch`] in German: exact header terms.
//! 3. [`MappingRule::KeywordMatch`] in English: substring/equality terms.
//! 4. [`MappingRule::Fallback`]: default column when nothing matched.
//!
//! Within one language a header cell belongs to the first keyword rule it
//! matches. When several cells match the same rule the right-most column
//! wins.
//!
//! Keyword rules for the risk metrics are kept in the list even though the
//! fixed positions always win for them; the resulting mapping records that
//! a header keyword was shadowed so it shows up in the diagnostics.

use std::collections::BTreeMap;

use dsp_quality_document::column_index;
use dsp_quality_models::{MentorField, TabularRow};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use HeaderLanguage::{English, German};
use HeaderMatcher::{AnyOf, ContainsAll, ContainsAny, ContainsUnless, Equals};
use MappingRule::{ExactPosition, Fallback, KeywordMatch};

/// Language of a header keyword rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
pub enum HeaderLanguage {
    /// English vendor labels.
    English,
    /// German vendor labels.
    German,
}

/// Predicate over a lower-cased, trimmed header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatcher {
    /// Equal to one of the terms.
    Equals(&'static [&'static str]),
    /// Contains one of the terms.
    ContainsAny(&'static [&'static str]),
    /// Contains every one of the terms.
    ContainsAll(&'static [&'static str]),
    /// Contains `term` but not `unless`.
    ContainsUnless {
        /// Required term.
        term: &'static str,
        /// Term that vetoes the match.
        unless: &'static str,
    },
    /// Any of the nested matchers.
    AnyOf(&'static [Self]),
}

impl HeaderMatcher {
    /// Tests a lower-cased header cell.
    #[must_use]
    pub fn matches(&self, header: &str) -> bool {
        match self {
            Self::Equals(terms) => terms.contains(&header),
            Self::ContainsAny(terms) => terms.iter().any(|t| header.contains(t)),
            Self::ContainsAll(terms) => terms.iter().all(|t| header.contains(t)),
            Self::ContainsUnless { term, unless } => {
                header.contains(term) && !header.contains(unless)
            }
            Self::AnyOf(matchers) => matchers.iter().any(|m| m.matches(header)),
        }
    }
}

/// One rule of the column mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingRule {
    /// Field always read from `column`.
    ExactPosition {
        /// Target field.
        field: MentorField,
        /// Column letter.
        column: &'static str,
    },
    /// Field read from the header cell matching `matcher`.
    KeywordMatch {
        /// Target field.
        field: MentorField,
        /// Language of the header term.
        language: HeaderLanguage,
        /// Header predicate.
        matcher: HeaderMatcher,
    },
    /// Field read from `column` when no earlier rule applied.
    Fallback {
        /// Target field.
        field: MentorField,
        /// Column letter.
        column: &'static str,
    },
}

impl MappingRule {
    /// Field this rule resolves.
    #[must_use]
    pub const fn field(&self) -> MentorField {
        match self {
            Self::ExactPosition { field, .. }
            | Self::KeywordMatch { field, .. }
            | Self::Fallback { field, .. } => *field,
        }
    }
}

const fn german(field: MentorField, terms: &'static [&'static str]) -> MappingRule {
    KeywordMatch {
        field,
        language: German,
        matcher: Equals(terms),
    }
}

const fn english(field: MentorField, matcher: HeaderMatcher) -> MappingRule {
    KeywordMatch {
        field,
        language: English,
        matcher,
    }
}

/// The mapping rules in priority order.
pub const RULES: &[MappingRule] = &[
    ExactPosition {
        field: MentorField::DriverFirstName,
        column: "A",
    },
    ExactPosition {
        field: MentorField::DriverLastName,
        column: "B",
    },
    ExactPosition {
        field: MentorField::Acceleration,
        column: "H",
    },
    ExactPosition {
        field: MentorField::Braking,
        column: "J",
    },
    ExactPosition {
        field: MentorField::Cornering,
        column: "L",
    },
    ExactPosition {
        field: MentorField::Speeding,
        column: "N",
    },
    ExactPosition {
        field: MentorField::Seatbelt,
        column: "V",
    },
    german(MentorField::Acceleration, &["beschl.", "beschl"]),
    german(MentorField::Braking, &["bremsen"]),
    german(MentorField::Cornering, &["kurven"]),
    german(MentorField::Speeding, &["tempo"]),
    german(MentorField::TotalTrips, &["fahrten"]),
    german(MentorField::TotalDriverKm, &["km"]),
    german(MentorField::TotalHours, &["stunden"]),
    english(
        MentorField::DriverFirstName,
        AnyOf(&[
            ContainsAny(&["first"]),
            ContainsUnless {
                term: "driver",
                unless: "last",
            },
        ]),
    ),
    english(MentorField::DriverLastName, ContainsAny(&["last name"])),
    english(
        MentorField::OverallRating,
        ContainsAny(&["fico", "score", "gesamt"]),
    ),
    english(MentorField::Station, ContainsAny(&["station"])),
    english(
        MentorField::TotalTrips,
        AnyOf(&[ContainsAll(&["total", "trip"]), Equals(&["trips"])]),
    ),
    english(
        MentorField::TotalDriverKm,
        AnyOf(&[
            ContainsAll(&["total", "km"]),
            ContainsAny(&["kilometers"]),
            ContainsUnless {
                term: "distance",
                unless: "following",
            },
            Equals(&["km"]),
        ]),
    ),
    english(
        MentorField::TotalHours,
        AnyOf(&[ContainsAll(&["total", "hour"]), Equals(&["hours"])]),
    ),
    english(MentorField::Acceleration, Equals(&["acceleration"])),
    english(MentorField::Braking, Equals(&["braking"])),
    english(MentorField::Cornering, Equals(&["cornering"])),
    english(MentorField::Speeding, Equals(&["speeding"])),
    english(MentorField::Seatbelt, ContainsAny(&["seatbelt"])),
    english(MentorField::FollowingDistance, ContainsAny(&["following"])),
    english(
        MentorField::PhoneDistraction,
        ContainsAny(&["distraction", "phone"]),
    ),
    Fallback {
        field: MentorField::OverallRating,
        column: "C",
    },
    Fallback {
        field: MentorField::Station,
        column: "D",
    },
    Fallback {
        field: MentorField::TotalTrips,
        column: "E",
    },
    Fallback {
        field: MentorField::TotalDriverKm,
        column: "F",
    },
    Fallback {
        field: MentorField::TotalHours,
        column: "G",
    },
    Fallback {
        field: MentorField::FollowingDistance,
        column: "S",
    },
    Fallback {
        field: MentorField::PhoneDistraction,
        column: "U",
    },
];

/// How a field's column was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingSource {
    /// Fixed position.
    ExactPosition,
    /// Header keyword in the given language.
    KeywordMatch(HeaderLanguage),
    /// Default position.
    Fallback,
}

/// Column and provenance of one mapped field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAssignment {
    /// Column letter.
    pub column: String,
    /// Rule kind that produced the column.
    pub source: MappingSource,
}

/// Field to column-letter mapping for one document.
///
/// Only [`build_column_mapping`] creates mappings, and it assigns a column
/// to every [`MentorField`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    assignments: BTreeMap<MentorField, ColumnAssignment>,
    /// Header keywords that matched but lost to a higher-priority rule.
    shadowed: Vec<(MentorField, String)>,
}

impl ColumnMapping {
    /// Column letter for `field`.
    #[must_use]
    pub fn column(&self, field: MentorField) -> &str {
        self.assignments
            .get(&field)
            .map_or_else(|| default_column(field), |a| a.column.as_str())
    }

    /// How the column for `field` was decided.
    #[must_use]
    pub fn source(&self, field: MentorField) -> Option<MappingSource> {
        self.assignments.get(&field).map(|a| a.source)
    }

    /// All assignments in field order.
    pub fn iter(&self) -> impl Iterator<Item = (MentorField, &ColumnAssignment)> {
        self.assignments.iter().map(|(f, a)| (*f, a))
    }

    /// Header keyword matches that a fixed position overrode.
    #[must_use]
    pub fn shadowed(&self) -> &[(MentorField, String)] {
        &self.shadowed
    }
}

/// Column from the first position rule (exact or fallback) for `field`.
fn default_column(field: MentorField) -> &'static str {
    RULES
        .iter()
        .find_map(|rule| match rule {
            ExactPosition { field: f, column } | Fallback { field: f, column } if *f == field => {
                Some(*column)
            }
            _ => None,
        })
        .unwrap_or("A")
}

/// Per-language keyword assignments of a header row.
fn keyword_candidates(
    header: &TabularRow,
) -> BTreeMap<(HeaderLanguage, MentorField), String> {
    let mut cells: Vec<(&String, String)> = header
        .cells
        .iter()
        .filter_map(|(col, value)| {
            value
                .as_str()
                .map(|text| (col, text.trim().to_lowercase()))
        })
        .collect();
    cells.sort_by_key(|(col, _)| column_index(col).unwrap_or(usize::MAX));

    let mut candidates = BTreeMap::new();
    for language in [English, German] {
        for (col, text) in &cells {
            let rule = RULES.iter().find(|rule| {
                matches!(rule, KeywordMatch { language: l, matcher, .. }
                    if *l == language && matcher.matches(text))
            });
            if let Some(rule) = rule {
                candidates.insert((language, rule.field()), (*col).clone());
            }
        }
    }

    candidates
}

/// Builds the column mapping for a header row, or for a document without
/// one.
#[must_use]
pub fn build_column_mapping(header: Option<&TabularRow>) -> ColumnMapping {
    let candidates = header.map(keyword_candidates).unwrap_or_default();

    let mut assignments: BTreeMap<MentorField, ColumnAssignment> = BTreeMap::new();
    for rule in RULES {
        let field = rule.field();
        if assignments.contains_key(&field) {
            continue;
        }
        let assignment = match rule {
            ExactPosition { column, .. } => Some(ColumnAssignment {
                column: (*column).to_owned(),
                source: MappingSource::ExactPosition,
            }),
            KeywordMatch { language, .. } => {
                candidates
                    .get(&(*language, field))
                    .map(|column| ColumnAssignment {
                        column: column.clone(),
                        source: MappingSource::KeywordMatch(*language),
                    })
            }
            Fallback { column, .. } => Some(ColumnAssignment {
                column: (*column).to_owned(),
                source: MappingSource::Fallback,
            }),
        };
        if let Some(assignment) = assignment {
            assignments.insert(field, assignment);
        }
    }

    let shadowed: Vec<(MentorField, String)> = candidates
        .iter()
        .filter_map(|((_, field), column)| {
            let assigned = assignments.get(field)?;
            (assigned.source == MappingSource::ExactPosition && assigned.column != *column)
                .then(|| (*field, column.clone()))
        })
        .collect();
    for (field, column) in &shadowed {
        log::debug!(
            "Header maps {field} to column {column}, fixed column {} takes precedence",
            assignments.get(field).map_or("?", |a| a.column.as_str())
        );
    }

    for (field, a) in &assignments {
        if a.source == MappingSource::Fallback {
            log::debug!("Using default column {} for {field}", a.column);
        }
    }

    ColumnMapping {
        assignments,
        shadowed,
    }
}

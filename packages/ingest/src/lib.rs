#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weekly quality report ingestion.
//!
//! [`ingest_file`] runs one uploaded file through the pipeline: read the
//! bytes, load the document, resolve the reporting week, run the extractor
//! of the report category, save the result under its week key, record the
//! upload, and notify subscribers. Each file is an independent,
//! synchronous pass.

pub mod config;

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use dsp_quality_document::{DocumentError, LoadOptions, LoadedDocument, period};
use dsp_quality_models::{
    DocumentKind, FocusAreaProvenance, PdfPage, RawDocument, ReportCategory, ReportPeriod,
    UploadHistoryEntry,
};
use dsp_quality_store::{EventBus, Repository, StoreError, data_updated_topic, week_key};
use thiserror::Error;

pub use config::{ConfigError, IngestConfig};

/// Errors that abort an ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The document could not be read or decoded.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The result could not be stored.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The file type does not fit the report category.
    #[error("{category} reports cannot be read from {kind} files")]
    KindMismatch {
        /// Requested category.
        category: ReportCategory,
        /// Detected file type.
        kind: DocumentKind,
    },

    /// A result could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shared state of an ingestion run.
pub struct IngestContext {
    /// Settings.
    pub config: IngestConfig,
    /// Where results are stored.
    pub repository: Box<dyn Repository>,
    /// Notified after each successful save.
    pub events: EventBus,
    /// Date used when a file name carries no period.
    pub reference_date: NaiveDate,
    /// Reporting week that overrides the file name.
    pub week: Option<u32>,
    /// Reporting year that overrides the file name.
    pub year: Option<i32>,
    /// Precomputed positional layout used instead of the PDF text layer.
    pub layout: Option<PathBuf>,
}

impl std::fmt::Debug for IngestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestContext")
            .field("config", &self.config)
            .field("events", &self.events)
            .field("reference_date", &self.reference_date)
            .field("week", &self.week)
            .field("year", &self.year)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl IngestContext {
    /// Creates a context with no overrides.
    #[must_use]
    pub fn new(
        config: IngestConfig,
        repository: Box<dyn Repository>,
        reference_date: NaiveDate,
    ) -> Self {
        Self {
            config,
            repository,
            events: EventBus::new(),
            reference_date,
            week: None,
            year: None,
            layout: None,
        }
    }

    fn period(&self, category: ReportCategory, file_name: &str) -> ReportPeriod {
        let detected = match category {
            ReportCategory::Scorecard => period::scorecard_period(file_name, self.reference_date),
            ReportCategory::Mentor => period::mentor_period(file_name, self.reference_date),
            ReportCategory::CustomerContact | ReportCategory::Concessions => {
                period::generic_period(file_name, self.reference_date)
            }
        };
        ReportPeriod::new(
            self.week.unwrap_or(detected.week),
            self.year.unwrap_or(detected.year),
        )
    }
}

/// Summary of one ingested file.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    /// Report category.
    pub category: ReportCategory,
    /// Reporting period the result was stored under.
    pub period: ReportPeriod,
    /// Storage key of the result.
    pub key: String,
    /// Number of records extracted (drivers, rows, or items).
    pub records: usize,
    /// Extraction warnings worth showing to the user.
    pub warnings: Vec<String>,
    /// Subscribers notified of the update.
    pub notified: usize,
}

struct Extracted {
    value: serde_json::Value,
    records: usize,
    warnings: Vec<String>,
}

fn mismatch(category: ReportCategory, kind: DocumentKind) -> IngestError {
    IngestError::KindMismatch { category, kind }
}

fn extract_scorecard(pages: &[PdfPage], period: ReportPeriod) -> Result<Extracted, IngestError> {
    let extraction = dsp_quality_scorecard::extract_scorecard(pages, period);

    let mut warnings = Vec::new();
    if !extraction.drivers_plausible {
        warnings.push("Driver table looks incomplete".to_owned());
    }
    if extraction.focus_provenance == FocusAreaProvenance::Default {
        warnings.push("No focus areas found, showing defaults".to_owned());
    }
    if !dsp_quality_scorecard::is_valid_scorecard(&extraction.data) {
        warnings.push("Scorecard is missing required fields".to_owned());
    }

    Ok(Extracted {
        records: extraction.data.driver_kpis.len(),
        value: serde_json::to_value(&extraction.data)?,
        warnings,
    })
}

/// Pages of the positional layout file, or `None` when it cannot be used.
fn layout_pages(layout: &Path) -> Option<Vec<PdfPage>> {
    let pages = std::fs::read(layout)
        .map_err(DocumentError::from)
        .and_then(|bytes| dsp_quality_document::pdf::load_positional_json(&bytes));
    match pages {
        Ok(pages) if !pages.is_empty() => {
            log::debug!("Using positional layout {}", layout.display());
            Some(pages)
        }
        Ok(_) => {
            log::warn!("Layout {} has no pages, reading the PDF instead", layout.display());
            None
        }
        Err(e) => {
            log::warn!(
                "Layout {} is unusable ({e}), reading the PDF instead",
                layout.display()
            );
            None
        }
    }
}

fn extract(
    category: ReportCategory,
    raw: &RawDocument,
    document: &LoadedDocument,
    period: ReportPeriod,
    context: &IngestContext,
) -> Result<Extracted, IngestError> {
    match category {
        ReportCategory::Scorecard => {
            let pages = document
                .pages()
                .ok_or_else(|| mismatch(category, raw.kind))?;
            extract_scorecard(pages, period)
        }
        ReportCategory::Mentor => {
            let rows = document.rows().ok_or_else(|| mismatch(category, raw.kind))?;
            let report = dsp_quality_mentor::parse_mentor_rows(rows, &raw.file_name, period);
            let warnings = if report.drivers.is_empty() {
                vec!["No drivers found".to_owned()]
            } else {
                vec![]
            };
            Ok(Extracted {
                records: report.drivers.len(),
                value: serde_json::to_value(&report)?,
                warnings,
            })
        }
        ReportCategory::CustomerContact => {
            let html = document.as_text().ok_or_else(|| mismatch(category, raw.kind))?;
            let report = dsp_quality_contact::parse_customer_contact_report(
                html,
                &context.config.driver_names,
                period,
            );
            let warnings = if report.rows.is_empty() {
                vec!["No compliance rows found".to_owned()]
            } else {
                vec![]
            };
            Ok(Extracted {
                records: report.rows.len(),
                value: serde_json::to_value(&report)?,
                warnings,
            })
        }
        ReportCategory::Concessions => {
            let rows = document.rows().ok_or_else(|| mismatch(category, raw.kind))?;
            let report = dsp_quality_concessions::parse_concessions_rows(rows, &raw.file_name);
            let missing = rows
                .first()
                .map(|header| dsp_quality_concessions::detect_columns(header).missing())
                .unwrap_or_default();
            let warnings = missing
                .into_iter()
                .map(|column| format!("Missing column: {column}"))
                .collect();
            Ok(Extracted {
                records: report.items.len(),
                value: serde_json::to_value(&report)?,
                warnings,
            })
        }
    }
}

/// Ingests one file as a report of `category`.
///
/// # Errors
///
/// * [`IngestError::Document`] if the file cannot be read or decoded
/// * [`IngestError::KindMismatch`] if the file type does not fit the category
/// * [`IngestError::Store`] if the result cannot be saved
pub fn ingest_file(
    path: &Path,
    category: ReportCategory,
    context: &IngestContext,
) -> Result<IngestOutcome, IngestError> {
    let raw = dsp_quality_document::read_file(path)?;
    let period = context.period(category, &raw.file_name);
    log::info!("Ingesting '{}' as {category} for {period}", raw.file_name);

    let layout = match (category, &context.layout) {
        (ReportCategory::Scorecard, Some(layout)) => layout_pages(layout),
        _ => None,
    };
    let extracted = if let Some(pages) = layout {
        extract_scorecard(&pages, period)?
    } else {
        let document = dsp_quality_document::load(
            &raw,
            LoadOptions {
                max_pdf_pages: context.config.max_pdf_pages,
            },
        )?;
        extract(category, &raw, &document, period, context)?
    };
    for warning in &extracted.warnings {
        log::warn!("{}: {warning}", raw.file_name);
    }

    let key = week_key(category, period);
    let repo = context.repository.as_ref();
    dsp_quality_store::save_json(repo, &key, &extracted.value)?;
    dsp_quality_store::record_upload(
        repo,
        UploadHistoryEntry {
            name: raw.file_name.clone(),
            kind: raw.kind,
            timestamp: Utc::now(),
            category,
        },
        context.config.history_limit,
    )?;

    let notified = context.events.publish(
        &data_updated_topic(category),
        &serde_json::json!({ "key": key, "week": period.week, "year": period.year }),
    );

    Ok(IngestOutcome {
        category,
        period,
        key,
        records: extracted.records,
        warnings: extracted.warnings,
        notified,
    })
}

//! Extraction over a mirrored tree.
//!
//! Every markdown file under the input directory becomes a JSON file at the
//! same relative path under the output directory, and the averages over all
//! of them are written to `summary_average_scores.json`. A file that cannot
//! be read or written is reported and the next one proceeds.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::Serialize;

use crate::error::ScoresError;
use crate::review::ReviewScores;
use crate::summary::{ScoreSummary, SummaryBuilder};

pub const SUMMARY_FILE_NAME: &str = "summary_average_scores.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Mirror root holding the review markdown files.
    pub input_dir: PathBuf,
    /// Where per-file JSON and the summary are written.
    pub output_dir: PathBuf,
}

impl ExtractOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE_NAME)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FailedExtraction {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of [`extract_tree`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtractReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub files_extracted: usize,
    pub failed_files: Vec<FailedExtraction>,
    /// Directory entries the walk could not read.
    pub unreadable_entries: usize,
    pub summary_path: PathBuf,
    pub summary: ScoreSummary,
}

/// Extract every review under `options.input_dir`.
///
/// The output directory is skipped when it lies inside the input. Files
/// are visited in file-name order.
///
/// # Errors
///
/// Fails when the input directory does not exist or the summary cannot be
/// written. Per-file failures end up in [`ExtractReport::failed_files`].
pub fn extract_tree(options: &ExtractOptions) -> Result<ExtractReport, ScoresError> {
    if !options.input_dir.is_dir() {
        return Err(ScoresError::InputMissing(options.input_dir.clone()));
    }

    let mut builder = SummaryBuilder::new();
    let mut files_extracted = 0;
    let mut failed_files = Vec::new();
    let mut unreadable_entries = 0;

    let output_dir = options.output_dir.clone();
    let walk = WalkBuilder::new(&options.input_dir)
        .standard_filters(false)
        .hidden(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| entry.path() != output_dir.as_path())
        .build();

    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                unreadable_entries += 1;
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) || !is_markdown(entry.path()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&options.input_dir) else {
            continue;
        };
        let relative_dir = relative.parent().unwrap_or_else(|| Path::new(""));
        let json_path = options.output_dir.join(relative.with_extension("json"));

        match extract_file(entry.path(), &json_path) {
            Ok(review) => {
                tracing::debug!(
                    file = %entry.path().display(),
                    json = %json_path.display(),
                    "scores extracted"
                );
                builder.add(relative_dir, &review);
                files_extracted += 1;
            }
            Err(e) => {
                tracing::warn!(file = %entry.path().display(), error = %e, "extraction failed");
                failed_files.push(FailedExtraction {
                    path: entry.path().to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let summary = builder.finish();
    let summary_path = options.summary_path();
    write_json(&summary_path, &summary)?;

    Ok(ExtractReport {
        input_dir: options.input_dir.clone(),
        output_dir: options.output_dir.clone(),
        files_extracted,
        failed_files,
        unreadable_entries,
        summary_path,
        summary,
    })
}

/// Parse one review and write its JSON next to the mirrored path.
///
/// # Errors
///
/// Fails when `markdown` cannot be read as UTF-8 or `json_path` cannot be
/// written.
pub fn extract_file(markdown: &Path, json_path: &Path) -> Result<ReviewScores, ScoresError> {
    let content =
        std::fs::read_to_string(markdown).map_err(|e| ScoresError::io(markdown, e))?;
    let review = ReviewScores::parse(&content);
    write_json(json_path, &review)?;
    Ok(review)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ScoresError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ScoresError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|e| ScoresError::io(path, e))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

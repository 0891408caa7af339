//! # crs-scores
//!
//! Turns mirrored review markdown into structured scores.
//!
//! Each review file yields its seven category scores (`N/10`), the overall
//! score text, the key improvement items and its header sections. The
//! results are written as JSON next to a mirrored path, together with a
//! `summary_average_scores.json` holding per-metric averages and the list
//! of reviewed projects.
//!
//! ```no_run
//! use crs_scores::{ExtractOptions, extract_tree};
//!
//! let report = extract_tree(&ExtractOptions::new("docs/otc", "docs/extracted_scores"))
//!     .expect("extraction");
//! println!("{} reviews, overall {}", report.files_extracted, report.summary.overall);
//! ```

mod error;
mod extract;
mod review;
mod summary;

pub use error::ScoresError;
pub use extract::{
    ExtractOptions, ExtractReport, FailedExtraction, SUMMARY_FILE_NAME, extract_file,
    extract_tree,
};
pub use review::{Category, CategoryScores, NOT_AVAILABLE, ReviewScores, Sections};
pub use summary::{Average, ScoreSummary, SummaryBuilder, SummaryMetadata, project_path};

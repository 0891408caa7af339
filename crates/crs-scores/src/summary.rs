//! Averages across every extracted review.

use std::collections::BTreeSet;
use std::path::Path;

use crs_core::TARGET_DIR_NAME;
use serde::{Serialize, Serializer};

use crate::review::{Category, CategoryScores, NOT_AVAILABLE, ReviewScores};

/// An average rounded to two decimals, or `N/A` when nothing was scored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Average {
    Value(f64),
    #[default]
    NotAvailable,
}

impl Serialize for Average {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl std::fmt::Display for Average {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Content of `summary_average_scores.json`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreSummary {
    #[serde(flatten)]
    pub categories: CategoryScores<Average>,
    #[serde(rename = "Overall Score")]
    pub overall: Average,
    #[serde(rename = "Metadata")]
    pub metadata: SummaryMetadata,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SummaryMetadata {
    #[serde(rename = "Total Files Processed")]
    pub total_files: usize,
    #[serde(rename = "Total Projects")]
    pub total_projects: usize,
    /// Sorted project paths, e.g. `otc/sapmiddleware`.
    #[serde(rename = "Projects List")]
    pub projects: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn average(self) -> Average {
        if self.count == 0 {
            return Average::NotAvailable;
        }
        let mean = self.sum / f64::from(self.count);
        Average::Value((mean * 100.0).round() / 100.0)
    }
}

/// Accumulates reviews into a [`ScoreSummary`].
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    categories: CategoryScores<Mean>,
    overall: Mean,
    files: usize,
    projects: BTreeSet<String>,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one review found in `relative_dir`, the directory of the review
    /// file relative to the mirror root.
    pub fn add(&mut self, relative_dir: &Path, review: &ReviewScores) {
        self.files += 1;
        if let Some(project) = project_path(relative_dir) {
            self.projects.insert(project);
        }
        for category in Category::ALL {
            if let Some(score) = review.categories.get(category) {
                self.categories.get_mut(category).push(f64::from(*score));
            }
        }
        if let Some(overall) = review.overall_value() {
            self.overall.push(overall);
        }
    }

    pub fn finish(self) -> ScoreSummary {
        let mut categories = CategoryScores::<Average>::default();
        for category in Category::ALL {
            *categories.get_mut(category) = self.categories.get(category).average();
        }
        ScoreSummary {
            categories,
            overall: self.overall.average(),
            metadata: SummaryMetadata {
                total_files: self.files,
                total_projects: self.projects.len(),
                projects: self.projects.into_iter().collect(),
            },
        }
    }
}

/// The project a review belongs to: the directories above its
/// `code-review-scores` directory, joined with `/`.
pub fn project_path(relative_dir: &Path) -> Option<String> {
    let segments: Vec<String> = relative_dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .take_while(|segment| segment != TARGET_DIR_NAME)
        .collect();
    (!segments.is_empty()).then(|| segments.join("/"))
}

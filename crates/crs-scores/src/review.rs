//! Parsing of a single review markdown file.
//!
//! Reviews are free-form markdown. Category scores are found by name and
//! the first `N/10` on the same line or on a following line. The overall
//! score and the improvement list are read from their labelled lines, and
//! every header section is kept verbatim.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde::ser::SerializeMap;

/// The scored review categories, in report order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Category {
    Correctness,
    CodeQuality,
    Performance,
    Security,
    Consistency,
    Scalability,
    ErrorHandling,
}

impl Category {
    pub const ALL: [Self; 7] = [
        Self::Correctness,
        Self::CodeQuality,
        Self::Performance,
        Self::Security,
        Self::Consistency,
        Self::Scalability,
        Self::ErrorHandling,
    ];

    /// Name as written in review files and in the extracted JSON.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Correctness => "Correctness and Functionality",
            Self::CodeQuality => "Code Quality and Maintainability",
            Self::Performance => "Performance and Efficiency",
            Self::Security => "Security and Vulnerability Assessment",
            Self::Consistency => "Code Consistency and Style",
            Self::Scalability => "Scalability and Extensibility",
            Self::ErrorHandling => "Error Handling and Robustness",
        }
    }
}

/// One value per [`Category`], serialized under the category labels.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CategoryScores<T> {
    #[serde(rename = "Correctness and Functionality")]
    pub correctness: T,
    #[serde(rename = "Code Quality and Maintainability")]
    pub code_quality: T,
    #[serde(rename = "Performance and Efficiency")]
    pub performance: T,
    #[serde(rename = "Security and Vulnerability Assessment")]
    pub security: T,
    #[serde(rename = "Code Consistency and Style")]
    pub consistency: T,
    #[serde(rename = "Scalability and Extensibility")]
    pub scalability: T,
    #[serde(rename = "Error Handling and Robustness")]
    pub error_handling: T,
}

impl<T> CategoryScores<T> {
    pub const fn get(&self, category: Category) -> &T {
        match category {
            Category::Correctness => &self.correctness,
            Category::CodeQuality => &self.code_quality,
            Category::Performance => &self.performance,
            Category::Security => &self.security,
            Category::Consistency => &self.consistency,
            Category::Scalability => &self.scalability,
            Category::ErrorHandling => &self.error_handling,
        }
    }

    pub const fn get_mut(&mut self, category: Category) -> &mut T {
        match category {
            Category::Correctness => &mut self.correctness,
            Category::CodeQuality => &mut self.code_quality,
            Category::Performance => &mut self.performance,
            Category::Security => &mut self.security,
            Category::Consistency => &mut self.consistency,
            Category::Scalability => &mut self.scalability,
            Category::ErrorHandling => &mut self.error_handling,
        }
    }
}

/// Placeholder for a missing overall score or average.
pub const NOT_AVAILABLE: &str = "N/A";

/// Everything extracted from one review file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReviewScores {
    #[serde(flatten)]
    pub categories: CategoryScores<Option<u32>>,
    /// Text after `Overall Score:`, e.g. `7.14/10`, or `N/A`.
    #[serde(rename = "Overall Score")]
    pub overall: String,
    #[serde(rename = "Key Improvement Items")]
    pub improvements: Vec<String>,
    #[serde(rename = "Full Markdown Data")]
    pub sections: Sections,
}

impl ReviewScores {
    pub fn parse(content: &str) -> Self {
        let (overall, improvements) = overall_and_improvements(content);
        Self {
            categories: category_scores(content),
            overall,
            improvements,
            sections: Sections::parse(content),
        }
    }

    /// Numeric part of [`Self::overall`]: `7.14` for `"7.14/10"`.
    pub fn overall_value(&self) -> Option<f64> {
        let (value, _) = self.overall.split_once('/')?;
        value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Markdown sections keyed by header text, in first-seen order.
///
/// Text before the first header is kept under `main`. A repeated header
/// restarts its section in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sections {
    entries: Vec<(String, String)>,
}

impl Sections {
    pub const MAIN: &'static str = "main";

    pub fn parse(content: &str) -> Self {
        let mut sections = Self {
            entries: vec![(Self::MAIN.to_string(), String::new())],
        };
        let mut current = 0;
        for line in content.lines() {
            if let Some(caps) = header_re().captures(line) {
                current = sections.restart(caps[2].trim());
            } else {
                let body = &mut sections.entries[current].1;
                body.push_str(line);
                body.push('\n');
            }
        }
        sections
    }

    fn restart(&mut self, header: &str) -> usize {
        if let Some(index) = self.entries.iter().position(|(h, _)| h == header) {
            self.entries[index].1.clear();
            index
        } else {
            self.entries.push((header.to_string(), String::new()));
            self.entries.len() - 1
        }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, body)| body.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(h, _)| h.as_str())
    }
}

impl Serialize for Sections {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (header, body) in &self.entries {
            map.serialize_entry(header, body)?;
        }
        map.end()
    }
}

fn score_re() -> &'static Regex {
    static SCORE_RE: OnceLock<Regex> = OnceLock::new();
    SCORE_RE.get_or_init(|| Regex::new(r"(\d+)/10").expect("valid score pattern"))
}

fn bullet_re() -> &'static Regex {
    static BULLET_RE: OnceLock<Regex> = OnceLock::new();
    BULLET_RE.get_or_init(|| {
        Regex::new(r"^\s*(?:\d+\.\s*|-\s*)(.*)").expect("valid bullet pattern")
    })
}

fn header_re() -> &'static Regex {
    static HEADER_RE: OnceLock<Regex> = OnceLock::new();
    HEADER_RE.get_or_init(|| Regex::new(r"^(#{1,6})\s+(.*)").expect("valid header pattern"))
}

fn first_score(line: &str) -> Option<u32> {
    score_re()
        .captures(line)
        .and_then(|caps| caps[1].parse().ok())
}

/// Scores per category. A category line without a score leaves the
/// category open until a later line carries one.
fn category_scores(content: &str) -> CategoryScores<Option<u32>> {
    let mut scores = CategoryScores::<Option<u32>>::default();
    let mut open: Option<Category> = None;

    for line in content.lines() {
        if let Some(category) = Category::ALL
            .into_iter()
            .find(|c| line.contains(c.label()))
        {
            open = Some(category);
            if let Some(score) = first_score(line) {
                *scores.get_mut(category) = Some(score);
            }
        }
        if let Some(category) = open.filter(|c| scores.get(*c).is_none()) {
            if let Some(score) = first_score(line) {
                *scores.get_mut(category) = Some(score);
                open = None;
            }
        }
    }
    scores
}

/// The `Overall Score:` text and the items listed under
/// `Key Improvement Items:`, up to the next blank line or header.
fn overall_and_improvements(content: &str) -> (String, Vec<String>) {
    let mut overall = None;
    let mut improvements = Vec::new();
    let mut in_improvements = false;

    for line in content.lines() {
        if let Some(rest) = line.split("Overall Score:").nth(1) {
            overall = Some(rest.trim().to_string());
        } else if line.contains("Key Improvement Items:") {
            in_improvements = true;
        } else if in_improvements {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                in_improvements = false;
            } else if let Some(caps) = bullet_re().captures(line) {
                improvements.push(caps[1].trim().to_string());
            } else {
                improvements.push(line.trim().to_string());
            }
        }
    }

    let overall = overall
        .filter(|o| !o.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    (overall, improvements)
}

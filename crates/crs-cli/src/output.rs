use std::fmt::Write as _;

use crs_core::RunSummary;
use crs_scores::{Category, ExtractReport};
use serde::Serialize;

use crate::cli::OutputFormat;

/// What is printed at the end of a run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    #[serde(flatten)]
    pub summary: &'a RunSummary,
    pub duration_ms: i64,
    pub dry_run: bool,
}

impl<'a> Report<'a> {
    pub fn new(summary: &'a RunSummary, dry_run: bool) -> Self {
        Self {
            summary,
            duration_ms: summary.duration_ms(),
            dry_run,
        }
    }
}

/// A report printable in every [`OutputFormat`].
pub trait Render: Serialize {
    fn to_text(&self) -> String;
}

impl Render for Report<'_> {
    fn to_text(&self) -> String {
        render_text(self)
    }
}

impl Render for ExtractReport {
    fn to_text(&self) -> String {
        render_extract_text(self)
    }
}

/// Render the report in the requested format.
pub fn render<R: Render>(report: &R, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_text()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Raw => Ok(serde_json::to_string(report)?),
    }
}

/// Print the report on stdout.
pub fn output<R: Render>(report: &R, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(report, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_text(report: &Report<'_>) -> String {
    let s = report.summary;
    let mut out = String::new();

    let title = if report.dry_run {
        "crs-mirror dry run"
    } else {
        "crs-mirror"
    };
    let _ = writeln!(out, "{title}: finished in {} ms", report.duration_ms);

    let rows: [(&str, String); 8] = [
        ("groups visited", s.groups_visited.to_string()),
        ("projects visited", s.projects_visited.to_string()),
        ("directories matched", s.directories_matched.to_string()),
        (
            "files downloaded",
            format!("{} ({} bytes)", s.files_downloaded, s.bytes_written),
        ),
        ("files skipped", s.files_skipped.to_string()),
        ("files planned", s.files_planned.to_string()),
        ("files ignored", s.files_ignored.to_string()),
        ("files failed", s.files_failed.to_string()),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<20} {value}");
    }

    if !s.abandoned.is_empty() {
        let _ = writeln!(out, "abandoned branches:");
        for branch in &s.abandoned {
            let _ = writeln!(out, "  - {}: {}", branch.branch, branch.reason);
        }
    }
    if !s.failed_files.is_empty() {
        let _ = writeln!(out, "failed files:");
        for file in &s.failed_files {
            let _ = writeln!(
                out,
                "  - {}: {}: {}",
                file.project, file.remote_path, file.reason
            );
        }
    }

    out.truncate(out.trim_end().len());
    out
}

fn render_extract_text(report: &ExtractReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "crs-mirror extract: {} reviews from {}",
        report.files_extracted,
        report.input_dir.display()
    );
    let rows: [(&str, String); 4] = [
        ("files extracted", report.files_extracted.to_string()),
        ("files failed", report.failed_files.len().to_string()),
        ("projects", summary.metadata.total_projects.to_string()),
        ("summary", report.summary_path.display().to_string()),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<20} {value}");
    }

    let _ = writeln!(out, "averages:");
    for category in Category::ALL {
        let label = category.label();
        let _ = writeln!(out, "  {label:<38} {}", summary.categories.get(category));
    }
    let _ = writeln!(out, "  {:<38} {}", "Overall Score", summary.overall);

    if !report.failed_files.is_empty() {
        let _ = writeln!(out, "failed files:");
        for file in &report.failed_files {
            let _ = writeln!(out, "  - {}: {}", file.path.display(), file.reason);
        }
    }

    out.truncate(out.trim_end().len());
    out
}

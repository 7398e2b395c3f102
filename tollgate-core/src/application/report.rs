// tollgate-core/src/application/report.rs

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::quality::{CheckKind, CheckResult, CheckStatus, QualityRunSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    pub level: ReportLevel,
    pub message: String,
}

impl ReportLine {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: ReportLevel::Info,
            message: message.into(),
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            level: ReportLevel::Warn,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: ReportLevel::Error,
            message: message.into(),
        }
    }
}

/// Formats a quality summary into leveled lines.
///
/// Verbose mode narrates every check. Summary mode keeps only the row
/// count, failing checks, the summary box, and the warning and error lists.
pub struct Reporter;

impl Reporter {
    pub fn render(summary: &QualityRunSummary, verbose: bool) -> Vec<ReportLine> {
        let mut lines = Vec::new();

        if verbose {
            lines.push(ReportLine::info(format!(
                "Quality checks for {}",
                summary.relation
            )));
        }

        for check in &summary.checks {
            Self::check_lines(check, verbose, &mut lines);
        }

        lines.push(ReportLine::info(Self::summary_table(summary)));

        for warning in &summary.warnings {
            lines.push(ReportLine::warn(format!("WARNING: {}", warning)));
        }
        for err in &summary.errors {
            lines.push(ReportLine::error(format!("ERROR: {}", err)));
        }

        lines.push(Self::status_line(summary));
        lines
    }

    fn check_lines(check: &CheckResult, verbose: bool, lines: &mut Vec<ReportLine>) {
        let always = check.kind == CheckKind::RowCount || check.status == CheckStatus::Fail;
        if !verbose && !always {
            return;
        }

        let line = match check.status {
            CheckStatus::Fail => ReportLine::error(&check.detail),
            CheckStatus::Warn => ReportLine::warn(&check.detail),
            CheckStatus::Pass => ReportLine::info(&check.detail),
        };
        lines.push(line);

        // pass-with-warning sub-results, e.g. future dates
        if verbose && check.is_passed() {
            for warning in check.warnings() {
                lines.push(ReportLine::warn(warning));
            }
        }
    }

    pub fn summary_table(summary: &QualityRunSummary) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![Cell::new("Quality summary"), Cell::new(&summary.relation)]);

        let rows: [(&str, String); 6] = [
            ("Total checks", summary.total_checks.to_string()),
            ("Passed", summary.passed_checks.to_string()),
            ("Warnings", summary.warnings.len().to_string()),
            ("Errors", summary.errors.len().to_string()),
            ("Success rate", format!("{:.1}%", summary.success_rate)),
            ("Duration", format!("{:.2?}", summary.duration())),
        ];
        for (label, value) in rows {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]);
        }
        table.to_string()
    }

    /// Errors win over warnings, warnings over a clean pass.
    pub fn status_line(summary: &QualityRunSummary) -> ReportLine {
        if summary.has_errors() {
            ReportLine::error("Quality checks completed with ERRORS")
        } else if summary.has_warnings() {
            ReportLine::warn("Quality checks completed with WARNINGS")
        } else {
            ReportLine::info("Quality checks: all checks PASSED")
        }
    }

    /// Sends each line to `tracing` at its level.
    pub fn emit(lines: &[ReportLine]) {
        for line in lines {
            match line.level {
                ReportLevel::Info => info!("{}", line.message),
                ReportLevel::Warn => warn!("{}", line.message),
                ReportLevel::Error => error!("{}", line.message),
            }
        }
    }
}

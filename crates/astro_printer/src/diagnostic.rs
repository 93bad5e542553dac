//! Diagnostic types reported alongside printer output.
//!
//! The printer itself does not fail; the only diagnostics it produces come
//! from scanning the frontmatter for imports. oxc parse errors are mapped
//! into this format, with offsets relative to the whole `.astro` source.

use crate::printer::LineIndex;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

/// A labeled source span within a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLabel {
    /// Optional label text (e.g. "expected `;` here").
    pub text: Option<String>,
    /// Byte offset of the span start.
    pub start: u32,
    /// Byte offset of the span end (exclusive).
    pub end: u32,
    /// 1-based line number.
    pub line: u32,
    /// 0-based column number.
    pub column: u32,
}

impl DiagnosticLabel {
    pub fn new(text: Option<String>, start: u32, end: u32, index: &LineIndex<'_>) -> Self {
        let (line, column) = index.line_and_column(start);
        Self {
            text,
            start,
            end,
            line: line + 1,
            column,
        }
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    /// Human-readable message text.
    pub text: String,
    /// Optional hint for fixing the issue.
    pub hint: String,
    /// Labeled source spans.
    pub labels: Vec<DiagnosticLabel>,
}

impl Diagnostic {
    /// Create a diagnostic from an oxc `OxcDiagnostic` raised while parsing
    /// a script that starts at byte `base` of the original source.
    #[expect(clippy::cast_possible_truncation)]
    pub fn from_oxc(
        diag: &oxc_diagnostics::OxcDiagnostic,
        base: u32,
        index: &LineIndex<'_>,
    ) -> Self {
        let severity = match diag.severity {
            oxc_diagnostics::Severity::Error => DiagnosticSeverity::Error,
            oxc_diagnostics::Severity::Warning => DiagnosticSeverity::Warning,
            oxc_diagnostics::Severity::Advice => DiagnosticSeverity::Hint,
        };

        let hint = diag
            .help
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        let labels = diag
            .labels
            .as_ref()
            .map(|labels| {
                labels
                    .iter()
                    .map(|label| {
                        let start = base + label.offset() as u32;
                        DiagnosticLabel::new(
                            label.label().map(ToString::to_string),
                            start,
                            start + label.len() as u32,
                            index,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            severity,
            text: diag.message.to_string(),
            hint,
            labels,
        }
    }
}

//! Public output types for Astro printing.

use oxc_sourcemap::SourceMap;

use crate::diagnostic::Diagnostic;
use crate::options::SourcemapOption;

/// The type of a hoisted script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoistedScriptType {
    /// An inline script with code content.
    Inline,
    /// An external script with a `src` URL.
    External,
}

/// A hoisted script returned by static extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoistedScript {
    pub script_type: HoistedScriptType,
    /// The dedented inline code (when `script_type` is `Inline`).
    pub code: Option<String>,
    /// The external script URL (when `script_type` is `External`).
    pub src: Option<String>,
}

/// Output from Astro printing.
#[derive(Debug)]
pub struct TransformResult {
    /// The generated JavaScript code.
    pub code: String,
    /// Source map JSON document.
    ///
    /// Set for [`SourcemapOption::External`] and [`SourcemapOption::Both`],
    /// empty otherwise.
    pub map: String,
    /// CSS scope hash for the component.
    pub scope: String,
    /// Extracted CSS, one entry per hoisted style (static extraction only).
    pub css: Vec<String>,
    /// Hoisted scripts (static extraction only).
    pub scripts: Vec<HoistedScript>,
    /// Diagnostics from scanning the frontmatter.
    pub diagnostics: Vec<Diagnostic>,
}

/// Attach the source map to `code` according to `mode`.
///
/// Returns the final code and the external map document (empty unless the
/// mode asks for one).
pub(crate) fn package_output(
    mut code: String,
    sourcemap: Option<SourceMap>,
    mode: SourcemapOption,
) -> (String, String) {
    let map = match (sourcemap, mode) {
        (Some(sm), SourcemapOption::Inline) => {
            code.push_str("\n//# sourceMappingURL=");
            code.push_str(&sm.to_data_url());
            String::new()
        }
        (Some(sm), SourcemapOption::Both) => {
            let json = sm.to_json_string();
            code.push_str("\n//# sourceMappingURL=");
            code.push_str(&sm.to_data_url());
            json
        }
        (Some(sm), SourcemapOption::External) => sm.to_json_string(),
        (_, SourcemapOption::None) | (None, _) => String::new(),
    };
    (code, map)
}

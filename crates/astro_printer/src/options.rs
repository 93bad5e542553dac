//! Options for Astro printing.
//!
//! These mirror the `TransformOptions` accepted by `@astrojs/compiler`.
//! Every field has a documented default, so missing configuration never
//! fails a compilation.

use std::sync::Arc;

use crate::preprocess::PreprocessStyle;

/// Whether the source was parsed as a full document or as a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmissionMode {
    #[default]
    Document,
    Fragment,
}

impl EmissionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Fragment => "fragment",
        }
    }
}

/// Controls whether and how source maps are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourcemapOption {
    /// No source map.
    #[default]
    None,
    /// Return the source map document in `TransformResult::map`.
    External,
    /// Append an inline `//# sourceMappingURL=data:...` comment to the code.
    Inline,
    /// Append the inline comment **and** return the map document.
    Both,
}

impl SourcemapOption {
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Options for Astro code generation.
pub struct TransformOptions {
    /// `document` or `fragment`.
    pub mode: EmissionMode,

    /// Scope hash used to namespace component styles.
    /// [`crate::compile`] fills it from the source when left empty.
    pub scope: String,

    /// Filename used in the source map `sources` field.
    /// Defaults to `"<stdin>"`.
    pub filename: String,

    /// Pathname of the component. The component variable name and the
    /// extracted CSS import URLs are derived from it.
    /// Defaults to `"<stdin>"`.
    pub pathname: String,

    /// The import specifier for Astro runtime functions.
    /// Defaults to `"astro/internal"`.
    pub internal_url: String,

    /// Source map mode. Defaults to [`SourcemapOption::None`].
    pub sourcemap: SourcemapOption,

    /// Site passed to `$$createAstro`.
    /// Defaults to `"https://astro.build"`.
    pub site: String,

    /// Project root passed to `$$createAstro`.
    /// Defaults to `"."`.
    pub project_root: String,

    /// Asynchronous per-style transform run before printing.
    pub preprocess_style: Option<Arc<dyn PreprocessStyle>>,

    /// Return hoisted CSS and scripts separately instead of rendering them
    /// into the component.
    pub static_extraction: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            mode: EmissionMode::Document,
            scope: String::new(),
            filename: "<stdin>".to_string(),
            pathname: "<stdin>".to_string(),
            internal_url: "astro/internal".to_string(),
            sourcemap: SourcemapOption::None,
            site: "https://astro.build".to_string(),
            project_root: ".".to_string(),
            preprocess_style: None,
            static_extraction: false,
        }
    }
}

impl std::fmt::Debug for TransformOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformOptions")
            .field("mode", &self.mode)
            .field("scope", &self.scope)
            .field("filename", &self.filename)
            .field("pathname", &self.pathname)
            .field("internal_url", &self.internal_url)
            .field("sourcemap", &self.sourcemap)
            .field("site", &self.site)
            .field("project_root", &self.project_root)
            .field(
                "preprocess_style",
                &self.preprocess_style.as_ref().map(|_| "Some(<fn>)"),
            )
            .field("static_extraction", &self.static_extraction)
            .finish()
    }
}

impl TransformOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mode(mut self, mode: EmissionMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Set the filename. An empty filename keeps the `<stdin>` default.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        if !filename.is_empty() {
            self.filename = filename;
        }
        self
    }

    /// Set the pathname. An empty pathname keeps the `<stdin>` default.
    #[must_use]
    pub fn with_pathname(mut self, pathname: impl Into<String>) -> Self {
        let pathname = pathname.into();
        if !pathname.is_empty() {
            self.pathname = pathname;
        }
        self
    }

    #[must_use]
    pub fn with_internal_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.is_empty() {
            self.internal_url = url;
        }
        self
    }

    #[must_use]
    pub fn with_sourcemap(mut self, sourcemap: SourcemapOption) -> Self {
        self.sourcemap = sourcemap;
        self
    }

    #[must_use]
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        let site = site.into();
        if !site.is_empty() {
            self.site = site;
        }
        self
    }

    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<String>) -> Self {
        let root = root.into();
        if !root.is_empty() {
            self.project_root = root;
        }
        self
    }

    /// Set the asynchronous style preprocessor.
    #[must_use]
    pub fn with_preprocess_style(mut self, preprocessor: impl PreprocessStyle + 'static) -> Self {
        self.preprocess_style = Some(Arc::new(preprocessor));
        self
    }

    #[must_use]
    pub fn with_static_extraction(mut self, enabled: bool) -> Self {
        self.static_extraction = enabled;
        self
    }
}

/// Options for [`crate::print_to_json`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Attach `position` records to nodes and attributes.
    pub position: bool,
}

impl ParseOptions {
    #[must_use]
    pub fn with_position(mut self, position: bool) -> Self {
        self.position = position;
        self
    }
}

//! Astro code printer.
//!
//! Renders an annotated component tree into JavaScript compatible with the
//! Astro runtime, registering source locations as it goes.
//!
//! This module is split into focused submodules:
//!
//! - [`escape`]: string escaping utilities
//! - [`attributes`]: the attribute renderers (markup, object literal, resource, raw)
//! - [`elements`]: the tree walk: elements, components, slots, expressions
//! - [`metadata`]: the `$$metadata` block
//! - [`result`]: public output types and output packaging
//! - [`sourcemap_builder`]: line index and mapping table

use oxc_data_structures::code_buffer::CodeBuffer;

use crate::ast::{Loc, Node, NodeKind};
use crate::diagnostic::Diagnostic;
use crate::options::TransformOptions;
use crate::scanner::FrontmatterScan;

pub(crate) mod attributes;
mod elements;
pub(crate) mod escape;
mod metadata;
pub mod result;
mod sourcemap_builder;

pub use result::{HoistedScript, HoistedScriptType, TransformResult};
pub use sourcemap_builder::{LineIndex, LocationMapper};

use escape::{dedent, escape_single_quote, escape_template_literal};
use result::package_output;

/// Runtime function names used in generated code.
mod runtime {
    pub const FRAGMENT: &str = "Fragment";
    pub const RENDER: &str = "$$render";
    pub const CREATE_ASTRO: &str = "$$createAstro";
    pub const CREATE_COMPONENT: &str = "$$createComponent";
    pub const RENDER_COMPONENT: &str = "$$renderComponent";
    pub const RENDER_SLOT: &str = "$$renderSlot";
    pub const ADD_ATTRIBUTE: &str = "$$addAttribute";
    pub const SPREAD_ATTRIBUTES: &str = "$$spreadAttributes";
    pub const DEFINE_STYLE_VARS: &str = "$$defineStyleVars";
    pub const DEFINE_SCRIPT_VARS: &str = "$$defineScriptVars";
    pub const CREATE_METADATA: &str = "$$createMetadata";
    pub const RESULT: &str = "$$result";
    pub const SLOTS: &str = "$$slots";
}

/// Render a component tree into JavaScript.
///
/// The tree must already have been through the transform pass (scoping,
/// hoisting, metadata collection) and, when a style preprocessor is used,
/// through [`crate::preprocess_styles`].
pub fn transform(source_text: &str, doc: &Node, options: TransformOptions) -> TransformResult {
    tracing::debug!(
        filename = %options.filename,
        pathname = %options.pathname,
        mode = options.mode.as_str(),
        "printing component"
    );

    let (css, scripts) = if options.static_extraction {
        (extract_css(doc), extract_scripts(doc))
    } else {
        (Vec::new(), Vec::new())
    };

    let printed = Printer::new(source_text, &options).print_to_js(doc, css.len());
    let (code, map) = package_output(printed.code, printed.sourcemap, options.sourcemap);

    TransformResult {
        code,
        map,
        scope: options.scope,
        css,
        scripts,
        diagnostics: printed.diagnostics,
    }
}

/// Compute a scope identifier from the source text (8 lowercase base32 characters).
pub fn hash_from_source(source: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz234567";

    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    let mut h = hasher.finish();

    let mut result = String::with_capacity(8);
    for _ in 0..8 {
        result.push(ALPHABET[(h & 0x1f) as usize] as char);
        h >>= 5;
    }
    result
}

/// One CSS string per hoisted style, in document order.
fn extract_css(doc: &Node) -> Vec<String> {
    doc.styles
        .iter()
        .map(|style| style.text_content().unwrap_or_default().to_string())
        .collect()
}

fn extract_scripts(doc: &Node) -> Vec<HoistedScript> {
    doc.scripts
        .iter()
        .filter_map(|script| {
            if let Some(src) = script.attribute("src") {
                Some(HoistedScript {
                    script_type: HoistedScriptType::External,
                    code: None,
                    src: Some(src.val.clone()),
                })
            } else {
                script.first_child().map(|child| HoistedScript {
                    script_type: HoistedScriptType::Inline,
                    code: Some(dedent(child.data.trim_start_matches(['\r', '\n']))),
                    src: None,
                })
            }
        })
        .collect()
}

/// Derive the component variable name from the pathname.
fn get_component_name(pathname: &str) -> String {
    if pathname.is_empty() || pathname == "<stdin>" {
        return "$$Component".to_string();
    }

    let part = pathname.rsplit('/').next().unwrap_or("");
    let stem = part.split('.').next().unwrap_or(part);

    let pascal = stem
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let upper: String = first.to_uppercase().collect();
                    format!("{upper}{}", chars.as_str())
                }
                None => String::new(),
            }
        })
        .collect::<String>();

    if pascal.is_empty() || pascal == "Astro" {
        return "$$Component".to_string();
    }

    format!("$${pascal}")
}

/// Raw output of a [`Printer`] run, before packaging.
pub(crate) struct PrintResult {
    pub code: String,
    pub sourcemap: Option<oxc_sourcemap::SourceMap>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Emitter for one compilation.
///
/// Owns the output buffer and the location mapper; a printer is used for
/// exactly one component and never shared.
pub struct Printer<'a> {
    options: &'a TransformOptions,
    source_text: &'a str,
    code: CodeBuffer,
    /// Present when a source map was requested.
    sourcemap: Option<LocationMapper<'a>>,
    has_func_prelude: bool,
    has_internal_imports: bool,
}

impl<'a> Printer<'a> {
    pub fn new(source_text: &'a str, options: &'a TransformOptions) -> Self {
        let sourcemap = options
            .sourcemap
            .is_enabled()
            .then(|| LocationMapper::new(&options.filename, source_text));
        Self {
            options,
            source_text,
            code: CodeBuffer::default(),
            sourcemap,
            has_func_prelude: false,
            has_internal_imports: false,
        }
    }

    /// The text generated so far.
    pub fn output(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.code.as_bytes())
    }

    // --- Output helpers ---

    fn print(&mut self, s: &str) {
        self.code.print_str(s);
    }

    fn println(&mut self, s: &str) {
        self.code.print_str(s);
        self.code.print_char('\n');
    }

    // --- Sourcemap helpers ---

    fn add_source_mapping(&mut self, loc: Loc) {
        if let Some(sm) = &mut self.sourcemap {
            sm.add_mapping(self.code.as_bytes(), loc);
        }
    }

    /// The text printed next is synthetic and maps to nothing.
    fn add_nil_source_mapping(&mut self) {
        if let Some(sm) = &mut self.sourcemap {
            sm.add_nil_mapping(self.code.as_bytes());
        }
    }

    /// Print `text` that starts at `offset` in the original source, mapping
    /// the start of every line back to its origin.
    fn print_mapped_lines(&mut self, text: &str, offset: u32) {
        let mut line_offset = offset;
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.code.print_char('\n');
            }
            if !line.trim().is_empty() {
                let indent = line.len() - line.trim_start().len();
                self.add_source_mapping(Loc::new(line_offset + u32::try_from(indent).unwrap_or(0)));
            }
            self.print(line);
            let line_len = u32::try_from(line.len() + 1).unwrap_or(u32::MAX);
            line_offset = line_offset.saturating_add(line_len);
        }
    }

    // --- Framing ---

    /// Import the runtime helpers. Printed at most once.
    pub fn print_internal_imports(&mut self) {
        if self.has_internal_imports {
            return;
        }
        let specifiers = [
            runtime::FRAGMENT.to_string(),
            format!("render as {}", runtime::RENDER),
            format!("createAstro as {}", runtime::CREATE_ASTRO),
            format!("createComponent as {}", runtime::CREATE_COMPONENT),
            format!("renderComponent as {}", runtime::RENDER_COMPONENT),
            format!("renderSlot as {}", runtime::RENDER_SLOT),
            format!("addAttribute as {}", runtime::ADD_ATTRIBUTE),
            format!("spreadAttributes as {}", runtime::SPREAD_ATTRIBUTES),
            format!("defineStyleVars as {}", runtime::DEFINE_STYLE_VARS),
            format!("defineScriptVars as {}", runtime::DEFINE_SCRIPT_VARS),
            format!("createMetadata as {}", runtime::CREATE_METADATA),
        ];
        self.add_nil_source_mapping();
        self.print(&format!(
            "import {{\n  {}\n}} from \"{}\";\n",
            specifiers.join(",\n  "),
            self.options.internal_url
        ));
        self.has_internal_imports = true;
    }

    /// One side-effect import per extracted CSS string.
    fn print_css_imports(&mut self, css_len: usize) {
        for index in 0..css_len {
            self.println(&format!(
                "import \"{}?astro&type=style&index={index}&lang.css\";",
                self.options.pathname
            ));
        }
    }

    pub fn print_template_literal_open(&mut self) {
        self.add_nil_source_mapping();
        self.print(runtime::RENDER);
        self.print("`");
    }

    pub fn print_template_literal_close(&mut self) {
        self.add_nil_source_mapping();
        self.print("`");
    }

    fn print_return_open(&mut self) {
        self.add_nil_source_mapping();
        self.print("return ");
        self.print_template_literal_open();
    }

    fn print_return_close(&mut self) {
        self.add_nil_source_mapping();
        self.print_template_literal_close();
        self.println(";");
    }

    /// Open the component factory. Printed at most once.
    pub fn print_func_prelude(&mut self, component_name: &str) {
        if self.has_func_prelude {
            return;
        }
        self.add_nil_source_mapping();
        self.println("\n//@ts-ignore");
        self.println(&format!(
            "const {component_name} = {}(async ({}, $$props, {}) => {{",
            runtime::CREATE_COMPONENT,
            runtime::RESULT,
            runtime::SLOTS
        ));
        self.println(&format!(
            "const Astro = {}.createAstro($$Astro, $$props, {});",
            runtime::RESULT,
            runtime::SLOTS
        ));
        self.has_func_prelude = true;
    }

    pub fn print_func_suffix(&mut self, component_name: &str) {
        self.add_nil_source_mapping();
        self.println("});");
        self.println(&format!("export default {component_name};"));
    }

    fn print_top_level_astro(&mut self) {
        self.println(&format!(
            "const $$Astro = {}(import.meta.url, '{}', '{}');\nconst Astro = $$Astro;",
            runtime::CREATE_ASTRO,
            escape_single_quote(&self.options.site),
            escape_single_quote(&self.options.project_root)
        ));
    }

    /// Print a hoisted `<style>`/`<script>` as `{props:{...},children:`...`},`.
    pub fn print_style_or_script(&mut self, n: &Node) {
        self.add_nil_source_mapping();
        self.print("{props:");
        self.print_attributes_to_object(&n.attrs);
        if let Some(child) = n.first_child()
            && !child.data.trim().is_empty()
        {
            self.print(",children:`");
            if let Some(&loc) = child.loc.first().or_else(|| n.loc.first()) {
                self.add_source_mapping(loc);
            }
            self.print(&escape_template_literal(child.data.trim()));
            self.add_nil_source_mapping();
            self.print("`");
        }
        self.print("},\n");
    }

    fn print_hoisted_styles(&mut self, doc: &Node) {
        if doc.styles.is_empty() {
            return;
        }
        self.println("const STYLES = [");
        for style in &doc.styles {
            self.print_style_or_script(style);
        }
        self.println("];");
        self.add_nil_source_mapping();
        self.println("for (const STYLE of STYLES) $$result.styles.add(STYLE);");
    }

    fn print_hoisted_scripts(&mut self, doc: &Node) {
        if doc.scripts.is_empty() {
            return;
        }
        self.println("const SCRIPTS = [");
        for script in &doc.scripts {
            self.print_style_or_script(script);
        }
        self.println("];");
        self.add_nil_source_mapping();
        self.println("for (const SCRIPT of SCRIPTS) $$result.scripts.add(SCRIPT);");
    }

    // --- Build ---

    /// Render the whole component.
    pub(crate) fn print_to_js(mut self, doc: &Node, css_len: usize) -> PrintResult {
        let script = doc
            .frontmatter_node()
            .and_then(Node::first_child)
            .filter(|child| child.kind == NodeKind::Text);
        let script_text = script.map_or("", |s| s.data.as_str());
        let script_base = script.and_then(|s| s.loc.first()).map_or(0, |loc| loc.start);
        let scan = FrontmatterScan::scan(script_text);

        // 1. Runtime and CSS imports
        self.print_internal_imports();
        self.print_css_imports(css_len);

        // 2. Frontmatter imports/exports at module scope
        for &(start, end) in &scan.hoisted {
            self.print_mapped_lines(
                &script_text[start as usize..end as usize],
                script_base + start,
            );
            self.println("");
        }

        // 3. Metadata and the Astro global
        self.print_component_metadata(doc, &scan);
        self.print_top_level_astro();

        // 4. Component factory
        let component_name = get_component_name(&self.options.pathname);
        self.print_func_prelude(&component_name);
        for (offset, text) in scan.body_pieces(script_text) {
            self.print_mapped_lines(
                text.trim_matches('\n'),
                script_base + offset + leading_newlines(text),
            );
            self.println("");
        }
        if !self.options.static_extraction {
            self.print_hoisted_styles(doc);
            self.print_hoisted_scripts(doc);
        }

        // 5. Template
        self.print_return_open();
        self.print_node(doc);
        self.print_return_close();
        self.print_func_suffix(&component_name);

        let diagnostics = if scan.errors.is_empty() {
            Vec::new()
        } else {
            let index = LineIndex::new(self.source_text);
            scan.errors
                .iter()
                .map(|error| Diagnostic::from_oxc(error, script_base, &index))
                .collect()
        };

        PrintResult {
            code: self.code.into_string(),
            sourcemap: self.sourcemap.map(LocationMapper::into_sourcemap),
            diagnostics,
        }
    }
}

/// Byte length of the line breaks at the start of `text`.
fn leading_newlines(text: &str) -> u32 {
    u32::try_from(text.len() - text.trim_start_matches('\n').len()).unwrap_or(0)
}

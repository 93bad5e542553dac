//! Astro Printer
//!
//! Turns an annotated Astro component tree into JavaScript that runs on the
//! Astro runtime, with an optional source map back to the `.astro` source.
//! The same tree can also be serialized as a JSON AST for tooling.
//!
//! ## Output Format
//!
//! ```js
//! import { Fragment, render as $$render, ... } from "astro/internal";
//! // Imports and exports from the frontmatter
//!
//! export const $$metadata = $$createMetadata(import.meta.url, { ... });
//!
//! const $$Astro = $$createAstro(import.meta.url, 'https://astro.build', '.');
//! const Astro = $$Astro;
//!
//! //@ts-ignore
//! const $$Component = $$createComponent(async ($$result, $$props, $$slots) => {
//! const Astro = $$result.createAstro($$Astro, $$props, $$slots);
//!     // Remaining frontmatter code
//!     return $$render`...template...`;
//! });
//! export default $$Component;
//! ```
//!
//! Parsing and the transform pass (scoping, hoisting, hydration analysis)
//! happen upstream; this crate starts from their output, an [`ast::Node`].

pub mod ast;
mod diagnostic;
mod options;
mod preprocess;
mod print_to_json;
mod printer;
pub(crate) mod scanner;

pub use diagnostic::{Diagnostic, DiagnosticLabel, DiagnosticSeverity};
pub use options::{EmissionMode, ParseOptions, SourcemapOption, TransformOptions};
pub use preprocess::{
    PreprocessStyle, PreprocessStyleError, PreprocessStyleResult, StyleBlock, preprocess_styles,
};
pub use print_to_json::print_to_json;
pub use printer::{
    HoistedScript, HoistedScriptType, LineIndex, LocationMapper, Printer, TransformResult,
    hash_from_source, transform,
};

/// Compile a component tree.
///
/// Fills in the scope hash when none was given, runs the configured style
/// preprocessor over every hoisted style, then prints.
pub async fn compile(
    source_text: &str,
    mut doc: ast::Node,
    mut options: TransformOptions,
) -> TransformResult {
    if options.scope.is_empty() {
        options.scope = hash_from_source(source_text);
    }

    if let Some(preprocessor) = options.preprocess_style.clone() {
        let replaced = preprocess_styles(&mut doc, preprocessor.as_ref()).await;
        tracing::debug!(replaced, filename = %options.filename, "styles preprocessed");
    }

    transform(source_text, &doc, options)
}

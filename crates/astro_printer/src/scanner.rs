//! Frontmatter scanner.
//!
//! Parses the frontmatter script once with `oxc_parser` to find the module
//! declarations that must be hoisted out of the component factory and the
//! import specifiers listed in `$$metadata`.

use oxc_allocator::Allocator;
use oxc_ast::ast::Statement;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::{ParseOptions, Parser};
use oxc_span::{GetSpan, SourceType};

/// An `import` declaration found in the frontmatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// Byte offset of the statement start, relative to the script.
    pub start: u32,
    /// Byte offset of the statement end, relative to the script.
    pub end: u32,
    pub specifier: String,
    /// `import type ... from` declarations have no runtime module.
    pub type_only: bool,
}

/// Result of scanning a frontmatter script.
#[derive(Debug, Default)]
pub struct FrontmatterScan {
    /// Import declarations in source order.
    pub imports: Vec<ImportStatement>,
    /// Spans (relative to the script) of every import/export declaration,
    /// in source order. These are printed at module scope.
    pub hoisted: Vec<(u32, u32)>,
    /// Parse errors. The scan is best-effort when these are present.
    pub errors: Vec<OxcDiagnostic>,
}

impl FrontmatterScan {
    pub fn scan(script: &str) -> Self {
        if script.trim().is_empty() {
            return Self::default();
        }

        let allocator = Allocator::default();
        let options = ParseOptions {
            allow_return_outside_function: true,
            ..ParseOptions::default()
        };
        let ret = Parser::new(&allocator, script, SourceType::ts())
            .with_options(options)
            .parse();

        let mut scan = Self {
            errors: ret.errors,
            ..Self::default()
        };

        for stmt in &ret.program.body {
            if !matches!(
                stmt,
                Statement::ImportDeclaration(_)
                    | Statement::ExportAllDeclaration(_)
                    | Statement::ExportDefaultDeclaration(_)
                    | Statement::ExportNamedDeclaration(_)
                    | Statement::TSExportAssignment(_)
                    | Statement::TSNamespaceExportDeclaration(_)
            ) {
                continue;
            }
            let span = stmt.span();
            scan.hoisted.push((span.start, span.end));

            if let Statement::ImportDeclaration(decl) = stmt {
                scan.imports.push(ImportStatement {
                    start: span.start,
                    end: span.end,
                    specifier: decl.source.value.to_string(),
                    type_only: decl.import_kind.is_type(),
                });
            }
        }

        scan
    }

    /// Find the first runtime import that starts at or after `from`.
    ///
    /// Returns the offset to resume scanning from and the specifier, or
    /// `None` once every import has been visited.
    pub fn next_import_specifier(&self, from: u32) -> Option<(u32, &str)> {
        self.imports
            .iter()
            .find(|import| import.start >= from && !import.type_only)
            .map(|import| (import.end, import.specifier.as_str()))
    }

    /// The script with every hoisted declaration removed, as `(offset, text)`
    /// pieces relative to the script.
    pub fn body_pieces<'s>(&self, script: &'s str) -> Vec<(u32, &'s str)> {
        let mut pieces = Vec::new();
        let mut cursor = 0usize;
        for &(start, end) in &self.hoisted {
            let (start, end) = (start as usize, end as usize);
            if start > cursor {
                pieces.push((cursor, &script[cursor..start]));
            }
            cursor = cursor.max(end);
        }
        if cursor < script.len() {
            pieces.push((cursor, &script[cursor..]));
        }
        pieces
            .into_iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(offset, text)| (u32::try_from(offset).unwrap_or(u32::MAX), text))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_imports_in_order() {
        let scan = FrontmatterScan::scan(
            "import A from './A.astro';\nconst x = 1;\nimport { b } from \"pkg\";\n",
        );
        assert!(scan.errors.is_empty());
        let specs: Vec<_> = scan.imports.iter().map(|i| i.specifier.as_str()).collect();
        assert_eq!(specs, ["./A.astro", "pkg"]);
    }

    #[test]
    fn next_import_specifier_walks_imports() {
        let scan = FrontmatterScan::scan("import a from 'a';\nimport b from 'b';");
        let (next, first) = scan.next_import_specifier(0).unwrap();
        assert_eq!(first, "a");
        let (next, second) = scan.next_import_specifier(next).unwrap();
        assert_eq!(second, "b");
        assert!(scan.next_import_specifier(next).is_none());
    }

    #[test]
    fn type_only_imports_are_skipped() {
        let scan = FrontmatterScan::scan("import type { T } from './types';\nimport a from 'a';");
        assert_eq!(scan.next_import_specifier(0).map(|(_, s)| s), Some("a"));
        assert_eq!(scan.hoisted.len(), 2);
    }

    #[test]
    fn exports_are_hoisted_and_removed_from_body() {
        let script = "import a from 'a';\nexport const prerender = true;\nconst b = a;\n";
        let scan = FrontmatterScan::scan(script);
        assert_eq!(scan.hoisted.len(), 2);
        let body = scan.body_pieces(script);
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].1.trim(), "const b = a;");
    }

    #[test]
    fn top_level_return_is_allowed() {
        let scan = FrontmatterScan::scan("if (x) { return Astro.redirect('/'); }");
        assert!(scan.errors.is_empty());
    }

    #[test]
    fn empty_script_scans_to_nothing() {
        let scan = FrontmatterScan::scan("  \n");
        assert!(scan.imports.is_empty());
        assert!(scan.body_pieces("  \n").is_empty());
    }
}

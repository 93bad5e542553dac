//! The `$$metadata` export.
//!
//! Lists the component's runtime imports, the components that hydrate on the
//! client, its hoisted scripts and its resource tags. Metadata carries no
//! source positions, so nothing here touches the location mapper.

use rustc_hash::FxHashSet;

use crate::ast::Node;
use crate::scanner::FrontmatterScan;

use super::Printer;
use super::attributes::resource_entry;
use super::escape::escape_single_quote;
use super::runtime;

/// Distinct runtime import specifiers, in source order.
fn module_specifiers(scan: &FrontmatterScan) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    let mut specifiers = Vec::new();
    let mut cursor = scan.next_import_specifier(0);
    while let Some((next, specifier)) = cursor {
        if seen.insert(specifier) {
            specifiers.push(specifier);
        }
        cursor = scan.next_import_specifier(next);
    }
    specifiers
}

fn hoisted_entry(script: &Node) -> Option<String> {
    if let Some(src) = script.attribute("src") {
        return Some(format!("{{ type: 'remote', src: '{}' }}", escape_single_quote(&src.val)));
    }
    script
        .first_child()
        .map(|child| format!("{{ type: 'inline', value: '{}' }}", escape_single_quote(&child.data)))
}

impl Printer<'_> {
    pub(super) fn print_component_metadata(&mut self, doc: &Node, scan: &FrontmatterScan) {
        let specifiers = module_specifiers(scan);
        for (i, specifier) in specifiers.iter().enumerate() {
            self.print(&format!(
                "\nimport * as $$module{} from '{}';",
                i + 1,
                escape_single_quote(specifier)
            ));
        }
        if !specifiers.is_empty() {
            self.print("\n");
        }

        let modules = specifiers
            .iter()
            .enumerate()
            .map(|(i, specifier)| {
                format!(
                    "{{ module: $$module{}, specifier: '{}' }}",
                    i + 1,
                    escape_single_quote(specifier)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let hydrated_components = doc
            .metadata
            .hydrated_components
            .iter()
            .map(|component| {
                if component.custom_element {
                    format!("'{}'", escape_single_quote(&component.name))
                } else {
                    component.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let hoisted = doc
            .scripts
            .iter()
            .filter_map(hoisted_entry)
            .collect::<Vec<_>>()
            .join(", ");

        let resources = doc
            .metadata
            .resources
            .iter()
            .map(|attrs| {
                let entries = attrs.iter().map(resource_entry).collect::<Vec<_>>();
                format!("{{{}}}", entries.join(","))
            })
            .collect::<Vec<_>>()
            .join(",");

        self.print(&format!(
            "\nexport const $$metadata = {}(import.meta.url, {{ modules: [{modules}], hydratedComponents: [{hydrated_components}], hoisted: [{hoisted}], resources: [{resources}] }});\n\n",
            runtime::CREATE_METADATA
        ));
    }
}

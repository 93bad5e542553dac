//! Tree walk: markup, expressions, components and slots.
//!
//! Contains `impl Printer` methods that render the component tree inside the
//! `$$render` template literal. Implicit structural nodes are transparent:
//! their children are printed in their place.

use crate::ast::{AttributeType, Node, NodeKind};

use super::Printer;
use super::escape::{escape_double_quotes, escape_template_literal};
use super::runtime;

/// Returns `true` for HTML void elements that must not have a closing tag.
pub(super) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Whitespace-only text contributes nothing to a slot.
fn has_content(node: &Node) -> bool {
    node.kind != NodeKind::Text || !node.data.trim().is_empty()
}

/// The `slot="..."` target of a component child, if it names one.
fn slot_target(node: &Node) -> Option<&str> {
    if node.kind != NodeKind::Element || node.expression {
        return None;
    }
    node.attribute("slot")
        .filter(|attr| attr.kind == AttributeType::Quoted)
        .map(|attr| attr.val.as_str())
}

impl Printer<'_> {
    pub(super) fn print_node(&mut self, n: &Node) {
        if n.is_implicit() {
            self.print_children(n);
            return;
        }

        match n.kind {
            NodeKind::Document => self.print_children(n),
            // Printed at module scope before the template.
            NodeKind::Frontmatter => {}
            NodeKind::Text => {
                if let Some(&loc) = n.loc.first() {
                    self.add_source_mapping(loc);
                }
                self.print(&escape_template_literal(&n.data));
            }
            NodeKind::Comment => {
                if let Some(&loc) = n.loc.first() {
                    self.add_source_mapping(loc);
                }
                self.print("<!--");
                self.print(&escape_template_literal(&n.data));
                self.print("-->");
            }
            NodeKind::Doctype => {
                if let Some(&loc) = n.loc.first() {
                    self.add_source_mapping(loc);
                }
                self.print("<!DOCTYPE ");
                self.print(&escape_template_literal(&n.data));
                self.print(">");
            }
            NodeKind::Element if n.expression => self.print_expression(n),
            NodeKind::Element if n.component || n.custom_element || n.fragment => {
                self.print_component(n);
            }
            NodeKind::Element if n.is_element("slot") => self.print_slot_element(n),
            NodeKind::Element => self.print_html_element(n),
        }
    }

    pub(super) fn print_children(&mut self, n: &Node) {
        for child in &n.children {
            self.print_node(child);
        }
    }

    /// Print a plain HTML element.
    fn print_html_element(&mut self, n: &Node) {
        self.print("<");
        if let Some(&loc) = n.loc.first() {
            self.add_source_mapping(loc);
        }
        self.print(&n.data);
        for attr in &n.attrs {
            self.print_attribute(attr);
        }
        self.print(">");

        if is_void_element(&n.data) {
            return;
        }

        self.print_define_vars(n);
        self.print_children(n);

        self.print("</");
        if let Some(&loc) = n.loc.get(1) {
            self.add_source_mapping(loc);
        }
        self.print(&n.data);
        self.print(">");
    }

    /// Print an `{expression}` container.
    ///
    /// Text children are JavaScript and are printed verbatim; markup nested in
    /// the expression gets its own `$$render` template literal.
    fn print_expression(&mut self, n: &Node) {
        if let Some(&loc) = n.loc.first() {
            self.add_source_mapping(loc);
        }
        self.print("${");
        for child in &n.children {
            if child.kind == NodeKind::Text {
                if let Some(&loc) = child.loc.first() {
                    self.add_source_mapping(loc);
                }
                self.print(&child.data);
            } else {
                self.print_template_literal_open();
                self.print_node(child);
                self.print_template_literal_close();
            }
        }
        self.print("}");
    }

    /// Print a component, custom element or fragment as `$$renderComponent`.
    ///
    /// - `<Card a="b" />` → `${$$renderComponent($$result,"Card",Card,{"a":"b"},{})}`
    /// - `<my-el />` → `${$$renderComponent($$result,"my-el","my-el",{},{})}`
    /// - `<>...</>` → `${$$renderComponent($$result,"Fragment",Fragment,{},{...})}`
    fn print_component(&mut self, n: &Node) {
        let name =
            if n.fragment && n.data.is_empty() { runtime::FRAGMENT } else { n.data.as_str() };

        if let Some(&loc) = n.loc.first() {
            self.add_source_mapping(loc);
        }
        self.print("${");
        self.print(runtime::RENDER_COMPONENT);
        self.print("(");
        self.print(runtime::RESULT);
        self.print(",\"");
        self.print(&escape_double_quotes(name));
        self.print("\",");
        if n.custom_element {
            self.print("\"");
            self.print(&escape_double_quotes(name));
            self.print("\"");
        } else {
            self.print(name);
        }
        self.print(",");
        self.print_attributes_to_object(&n.attrs);
        self.print(",");
        if n.custom_element {
            self.print_default_slot_only(n);
        } else {
            self.print_component_slots(n);
        }
        self.print(")}");
    }

    fn print_slot_fn(&mut self, slot_name: &str, children: &[&Node]) {
        self.print("\"");
        self.print(&escape_double_quotes(slot_name));
        self.print("\": () => ");
        self.print_template_literal_open();
        for child in children {
            self.print_node(child);
        }
        self.print_template_literal_close();
        self.print(",");
    }

    /// Custom elements slot natively in the browser, so every child goes to
    /// the default slot with its `slot` attribute intact.
    fn print_default_slot_only(&mut self, n: &Node) {
        self.print("{");
        if n.children.iter().any(has_content) {
            let children: Vec<&Node> = n.children.iter().collect();
            self.print_slot_fn("default", &children);
        }
        self.print("}");
    }

    /// Group children by their `slot` attribute and print one render
    /// function per slot, in order of first appearance.
    fn print_component_slots(&mut self, n: &Node) {
        let mut slots: Vec<(&str, Vec<&Node>)> = Vec::new();
        for child in &n.children {
            let name = slot_target(child).unwrap_or("default");
            match slots.iter_mut().find(|(slot, _)| *slot == name) {
                Some((_, children)) => children.push(child),
                None => slots.push((name, vec![child])),
            }
        }

        self.print("{");
        for (name, children) in &slots {
            if children.iter().copied().any(has_content) {
                self.print_slot_fn(name, children);
            }
        }
        self.print("}");
    }

    /// Print a `<slot>` placeholder.
    ///
    /// - `<slot />` → `${$$renderSlot($$result,$$slots["default"])}`
    /// - `<slot name="x"><p>fallback</p></slot>` →
    ///   `${$$renderSlot($$result,$$slots["x"],$$render`<p>fallback</p>`)}`
    fn print_slot_element(&mut self, n: &Node) {
        if let Some(&loc) = n.loc.first() {
            self.add_source_mapping(loc);
        }
        self.print("${");
        self.print(runtime::RENDER_SLOT);
        self.print("(");
        self.print(runtime::RESULT);
        self.print(",");
        self.print(runtime::SLOTS);
        self.print("[");
        match n.attribute("name") {
            Some(attr)
                if matches!(attr.kind, AttributeType::Expression | AttributeType::Shorthand) =>
            {
                let expr =
                    if attr.kind == AttributeType::Shorthand { &attr.key } else { &attr.val };
                self.print(expr.trim());
            }
            Some(attr) if attr.kind == AttributeType::Quoted => {
                self.print(&format!("\"{}\"", escape_double_quotes(&attr.val)));
            }
            _ => self.print("\"default\""),
        }
        self.print("]");

        if n.children.iter().any(has_content) {
            self.print(",");
            self.print_template_literal_open();
            self.print_children(n);
            self.print_template_literal_close();
        }
        self.print(")}");
    }
}

//! Attribute rendering.
//!
//! Each attribute kind has four renderings that must stay in lock-step:
//! markup inside the template literal, an object-literal entry (component
//! props, hoisted style/script props), a `$$metadata` resource entry, and
//! the `raw` source slice reported by the JSON AST. All four match on the
//! same [`AttributeType`] without a wildcard arm.

use crate::ast::{Attribute, AttributeType, Loc, Node};

use super::Printer;
use super::escape::{escape_double_quotes, escape_html_attribute, escape_single_quote};
use super::runtime;

/// Key of the attribute whose value is injected into `<style>`/`<script>`.
const DEFINE_VARS: &str = "define:vars";

impl Printer<'_> {
    /// Print one attribute in markup form.
    pub fn print_attribute(&mut self, attr: &Attribute) {
        if attr.key == DEFINE_VARS || attr.is_implicit_marker() {
            return;
        }

        let name = attr.qualified_name();
        match attr.kind {
            AttributeType::Quoted => {
                self.print(" ");
                self.add_source_mapping(attr.key_loc);
                self.print(&name);
                self.print("=");
                self.add_source_mapping(attr.val_loc);
                self.print(&format!("\"{}\"", escape_html_attribute(&attr.val)));
            }
            AttributeType::Empty => {
                self.print(" ");
                self.add_source_mapping(attr.key_loc);
                self.print(&name);
            }
            AttributeType::Expression => {
                self.print(&format!("${{{}(", runtime::ADD_ATTRIBUTE));
                self.add_source_mapping(attr.val_loc);
                self.print(attr.val.trim());
                self.add_source_mapping(attr.key_loc);
                self.print(&format!(", \"{}\")}}", escape_double_quotes(name.trim())));
            }
            AttributeType::Spread => {
                self.print(&format!("${{{}(", runtime::SPREAD_ATTRIBUTES));
                // `key_loc` points past the `{...` that opens the spread.
                self.add_source_mapping(Loc::new(attr.key_loc.start.saturating_sub(3)));
                self.print(attr.key.trim());
                self.print(")}");
            }
            AttributeType::Shorthand => {
                self.print(&format!("${{{}(", runtime::ADD_ATTRIBUTE));
                self.add_source_mapping(attr.key_loc);
                self.print(attr.key.trim());
                self.add_source_mapping(attr.key_loc);
                self.print(&format!(", \"{}\")}}", escape_double_quotes(attr.key.trim())));
            }
            AttributeType::TemplateLiteral => {
                self.print(&format!("${{{}(`", runtime::ADD_ATTRIBUTE));
                self.add_source_mapping(attr.val_loc);
                self.print(attr.val.trim());
                self.add_source_mapping(attr.key_loc);
                self.print(&format!("`, \"{}\")}}", escape_double_quotes(name.trim())));
            }
        }
    }

    /// Print attributes as an object literal: `{"a":"b",...(c)}`.
    pub fn print_attributes_to_object(&mut self, attrs: &[Attribute]) {
        self.print("{");
        let visible = attrs.iter().filter(|attr| !attr.is_implicit_marker());
        for (i, attr) in visible.enumerate() {
            if i > 0 {
                self.print(",");
            }
            let name = escape_double_quotes(&attr.qualified_name());
            match attr.kind {
                AttributeType::Quoted => {
                    self.add_source_mapping(attr.key_loc);
                    self.print(&format!("\"{name}\":"));
                    self.add_source_mapping(attr.val_loc);
                    self.print(&format!("\"{}\"", escape_double_quotes(&attr.val)));
                }
                AttributeType::Empty => {
                    self.add_source_mapping(attr.key_loc);
                    self.print(&format!("\"{name}\":true"));
                }
                AttributeType::Expression => {
                    self.add_source_mapping(attr.key_loc);
                    self.print(&format!("\"{name}\":"));
                    self.add_source_mapping(attr.val_loc);
                    self.print(&format!("({})", attr.val.trim()));
                }
                AttributeType::Spread => {
                    self.add_source_mapping(Loc::new(attr.key_loc.start.saturating_sub(3)));
                    self.print(&format!("...({})", attr.key.trim()));
                }
                AttributeType::Shorthand => {
                    let key = attr.key.trim();
                    self.add_source_mapping(attr.key_loc);
                    self.print(&format!("\"{}\":({key})", escape_double_quotes(key)));
                }
                AttributeType::TemplateLiteral => {
                    self.add_source_mapping(attr.key_loc);
                    self.print(&format!("\"{}\":", name.trim()));
                    self.add_source_mapping(attr.val_loc);
                    self.print(&format!("`{}`", attr.val.trim()));
                }
            }
        }
        self.print("}");
    }

    /// Inject `define:vars` into a `<style>` or `<script>` body.
    pub fn print_define_vars(&mut self, n: &Node) {
        let definer = match n.data.as_str() {
            "style" => runtime::DEFINE_STYLE_VARS,
            "script" => runtime::DEFINE_SCRIPT_VARS,
            _ => return,
        };
        let Some(attr) = n.attribute(DEFINE_VARS) else {
            return;
        };

        let value = match attr.kind {
            AttributeType::Quoted => format!("\"{}\"", escape_double_quotes(&attr.val)),
            AttributeType::Empty => attr.key.clone(),
            AttributeType::Expression | AttributeType::TemplateLiteral => {
                attr.val.trim().to_string()
            }
            AttributeType::Spread | AttributeType::Shorthand => attr.key.trim().to_string(),
        };

        self.add_nil_source_mapping();
        self.print(&format!("${{{definer}("));
        self.add_source_mapping(attr.val_loc);
        self.print(&value);
        self.add_nil_source_mapping();
        self.print(")}");
    }
}

/// Render an attribute as an entry of a `$$metadata` resource object.
pub fn resource_entry(attr: &Attribute) -> String {
    let key = escape_single_quote(&attr.qualified_name());
    match attr.kind {
        AttributeType::Quoted => format!("'{key}':'{}'", escape_single_quote(&attr.val)),
        AttributeType::Empty => format!("'{key}':true"),
        AttributeType::Expression => format!("'{key}':{}", attr.val.trim()),
        AttributeType::Spread => format!("...({})", attr.key.trim()),
        AttributeType::Shorthand => format!("[{}]:true", attr.key.trim()),
        AttributeType::TemplateLiteral => format!("'{key}':`{}`", attr.val),
    }
}

/// The attribute value exactly as written in `source`, delimiters included.
///
/// Empty, spread and shorthand attributes have no separate value span and
/// produce an empty string, as do locations that fall outside `source`.
pub fn attribute_raw(attr: &Attribute, source: &str) -> String {
    match attr.kind {
        AttributeType::Quoted | AttributeType::TemplateLiteral | AttributeType::Expression => {}
        AttributeType::Empty | AttributeType::Spread | AttributeType::Shorthand => {
            return String::new();
        }
    }

    let value_start = attr.val_loc.start as usize;
    let Some(mut start) = value_start.checked_sub(1) else {
        return String::new();
    };
    let mut end = value_start + attr.val.len();
    if source.as_bytes().get(start) == Some(&b'=') {
        start += 1;
    } else {
        end += 1;
    }

    source
        .get(start..end)
        .map(|raw| raw.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::tests::printer_output;

    fn markup(attr: &Attribute) -> String {
        printer_output(|p| p.print_attribute(attr))
    }

    #[test]
    fn test_markup_forms() {
        assert_eq!(markup(&Attribute::quoted("class", "a b")), " class=\"a b\"");
        assert_eq!(markup(&Attribute::empty("disabled")), " disabled");
        assert_eq!(
            markup(&Attribute::expression("href", " url ")),
            "${$$addAttribute(url, \"href\")}"
        );
        assert_eq!(markup(&Attribute::spread("props")), "${$$spreadAttributes(props)}");
        assert_eq!(
            markup(&Attribute::shorthand("title")),
            "${$$addAttribute(title, \"title\")}"
        );
        assert_eq!(
            markup(&Attribute::template_literal("src", "${base}/a.png")),
            "${$$addAttribute(`${base}/a.png`, \"src\")}"
        );
    }

    #[test]
    fn test_markup_escapes_quoted_value() {
        assert_eq!(
            markup(&Attribute::quoted("title", "say \"hi\" `now`")),
            " title=\"say &quot;hi&quot; \\`now\\`\""
        );
    }

    #[test]
    fn test_markup_keeps_backslashes_inside_the_template() {
        assert_eq!(markup(&Attribute::quoted("pattern", "\\d+")), " pattern=\"\\\\d+\"");
        assert_eq!(markup(&Attribute::quoted("title", "a\\`b")), " title=\"a\\\\\\`b\"");
    }

    #[test]
    fn test_markup_namespace() {
        assert_eq!(
            markup(&Attribute::quoted("href", "#a").with_namespace("xlink")),
            " xlink:href=\"#a\""
        );
    }

    #[test]
    fn test_define_vars_and_marker_are_not_printed() {
        assert_eq!(markup(&Attribute::expression("define:vars", "{ a }")), "");
        assert_eq!(markup(&Attribute::empty(crate::ast::IMPLICIT_NODE_MARKER)), "");
    }

    #[test]
    fn test_object_literal() {
        let attrs = [
            Attribute::quoted("a", "x\"y"),
            Attribute::empty("b"),
            Attribute::expression("c", "1 + 1"),
            Attribute::spread("rest"),
            Attribute::shorthand("d"),
            Attribute::template_literal("e", "t"),
        ];
        let output = printer_output(|p| p.print_attributes_to_object(&attrs));
        assert_eq!(
            output,
            r#"{"a":"x\"y","b":true,"c":(1 + 1),...(rest),"d":(d),"e":`t`}"#
        );
    }

    #[test]
    fn test_object_literal_values_are_valid_strings() {
        let attrs = [Attribute::quoted("a", "line1\nC:\\new")];
        let output = printer_output(|p| p.print_attributes_to_object(&attrs));
        assert_eq!(output, r#"{"a":"line1\nC:\\new"}"#);
    }

    #[test]
    fn test_empty_object_literal() {
        assert_eq!(printer_output(|p| p.print_attributes_to_object(&[])), "{}");
    }

    #[test]
    fn test_define_vars_injection() {
        let style = Node::element("style")
            .with_attr(Attribute::expression("define:vars", " { color } "));
        let script = Node::element("script").with_attr(Attribute::quoted("define:vars", "x"));
        let div = Node::element("div").with_attr(Attribute::expression("define:vars", "a"));

        assert_eq!(
            printer_output(|p| p.print_define_vars(&style)),
            "${$$defineStyleVars({ color })}"
        );
        assert_eq!(
            printer_output(|p| p.print_define_vars(&script)),
            "${$$defineScriptVars(\"x\")}"
        );
        assert_eq!(printer_output(|p| p.print_define_vars(&div)), "");
    }

    #[test]
    fn test_define_vars_quoted_value_is_escaped() {
        let style = Node::element("style").with_attr(Attribute::quoted("define:vars", "x\"y"));
        assert_eq!(
            printer_output(|p| p.print_define_vars(&style)),
            r#"${$$defineStyleVars("x\"y")}"#
        );
    }

    #[test]
    fn test_resource_entries() {
        assert_eq!(resource_entry(&Attribute::quoted("rel", "it's")), "'rel':'it\\'s'");
        assert_eq!(resource_entry(&Attribute::empty("async")), "'async':true");
        assert_eq!(resource_entry(&Attribute::expression("href", "url")), "'href':url");
        assert_eq!(resource_entry(&Attribute::spread("props")), "...(props)");
        assert_eq!(resource_entry(&Attribute::shorthand("media")), "[media]:true");
        assert_eq!(resource_entry(&Attribute::template_literal("href", "a")), "'href':`a`");
    }

    #[test]
    fn test_raw_reconstruction() {
        // <a href="x" b=`y` c={z}>
        let source = "<a href=\"x\" b=`y` c={z}>";
        let quoted = Attribute::quoted("href", "x").with_locs(3, 9);
        assert_eq!(attribute_raw(&quoted, source), "\"x\"");

        let template = Attribute::template_literal("b", "y").with_locs(12, 15);
        assert_eq!(attribute_raw(&template, source), "`y`");

        let expression = Attribute::expression("c", "z").with_locs(18, 21);
        assert_eq!(attribute_raw(&expression, source), "{z}");
    }

    #[test]
    fn test_raw_after_equals() {
        // unquoted value: the character before it is `=`
        let source = "<a href=x>";
        let attr = Attribute::quoted("href", "x").with_locs(3, 8);
        assert_eq!(attribute_raw(&attr, source), "x");
    }

    #[test]
    fn test_raw_is_empty_for_keyless_forms() {
        let source = "<a {...p} {q} b>";
        assert_eq!(attribute_raw(&Attribute::spread("p").with_locs(6, 6), source), "");
        assert_eq!(attribute_raw(&Attribute::shorthand("q").with_locs(11, 11), source), "");
        assert_eq!(attribute_raw(&Attribute::empty("b").with_locs(14, 14), source), "");
    }

    #[test]
    fn test_raw_out_of_bounds() {
        let attr = Attribute::quoted("a", "long value").with_locs(0, 5);
        assert_eq!(attribute_raw(&attr, "<a b>"), "");
    }
}

//! JSON AST output.
//!
//! Projects the component tree into the position-annotated JSON AST consumed
//! by editor tooling. Field order follows the struct declarations; optional
//! fields are left out of the output rather than written as `null`.

use serde::Serialize;

use crate::ast::{Loc, Node, NodeKind};
use crate::options::ParseOptions;
use crate::printer::LineIndex;
use crate::printer::attributes::attribute_raw;

/// A 1-based line/column and a byte offset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
struct AstPoint {
    line: u32,
    column: u32,
    offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct AstPosition {
    start: AstPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<AstPoint>,
}

#[derive(Debug, Default, Serialize)]
struct AstNode {
    #[serde(rename = "type")]
    node_type: &'static str,
    /// Attribute kind (attributes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    /// Attribute source text (attributes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes: Option<Vec<AstNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<AstNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<AstPosition>,
}

/// `Some` for non-empty strings.
fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Widen the tag-name offsets recorded for an element to cover its tags.
///
/// `start` and `end` are the offsets of the opening and closing tag names.
/// Equal offsets mean a self-closing element.
pub(crate) fn element_offsets(start: u32, end: u32, tag_name_len: u32) -> (u32, u32) {
    let end = if start == end { end + tag_name_len + 2 } else { end + tag_name_len + 1 };
    let start = if start == 0 { start } else { start - 1 };
    (start, end)
}

struct JsonPrinter<'a> {
    source_text: &'a str,
    index: LineIndex<'a>,
    options: ParseOptions,
}

impl JsonPrinter<'_> {
    fn point(&self, offset: u32) -> AstPoint {
        let (line, column) = self.index.line_and_column(offset);
        AstPoint { line: line + 1, column: column + 1, offset }
    }

    fn position(&self, n: &Node) -> Option<AstPosition> {
        if !self.options.position {
            return None;
        }
        match n.loc.as_slice() {
            [start] => Some(AstPosition { start: self.point(start.start), end: None }),
            [start, end] => {
                let (mut start, mut end) = (*start, *end);
                if n.kind == NodeKind::Element {
                    let tag_name_len = u32::try_from(n.data.len()).unwrap_or(u32::MAX);
                    let (s, e) = element_offsets(start.start, end.start, tag_name_len);
                    start = Loc::new(s);
                    end = Loc::new(e);
                }
                Some(AstPosition {
                    start: self.point(start.start),
                    end: Some(self.point(end.start)),
                })
            }
            _ => None,
        }
    }

    fn attribute_nodes(&self, n: &Node) -> Vec<AstNode> {
        n.attrs
            .iter()
            .map(|attr| AstNode {
                node_type: "attribute",
                kind: Some(attr.kind.as_str()),
                name: non_empty(&attr.qualified_name()),
                value: Some(attr.val.clone()),
                raw: Some(attribute_raw(attr, self.source_text)),
                position: self
                    .options
                    .position
                    .then(|| AstPosition { start: self.point(attr.key_loc.start), end: None }),
                ..AstNode::default()
            })
            .collect()
    }

    /// Append the projection of `n` to `out`. Implicit nodes contribute
    /// their children instead of themselves.
    fn render(&self, n: &Node, out: &mut Vec<AstNode>) {
        if n.is_implicit() {
            for child in &n.children {
                self.render(child, out);
            }
            return;
        }

        let mut node = AstNode { position: self.position(n), ..AstNode::default() };
        let mut element_like = false;

        if n.kind == NodeKind::Element {
            if n.expression {
                node.node_type = "expression";
            } else {
                element_like = true;
                node.name = non_empty(&n.data);
                node.node_type = if n.component {
                    "component"
                } else if n.custom_element {
                    "custom-element"
                } else if n.fragment {
                    node.name = Some(n.data.clone());
                    "fragment"
                } else {
                    "element"
                };
                node.attributes = Some(self.attribute_nodes(n));
            }
        } else {
            node.node_type = n.kind.as_str();
            if matches!(n.kind, NodeKind::Text | NodeKind::Comment | NodeKind::Doctype) {
                node.value = non_empty(&n.data);
            }
        }

        match n.first_child() {
            Some(script) if n.kind == NodeKind::Frontmatter => node.value = non_empty(&script.data),
            _ => {
                let mut children = Vec::new();
                for child in &n.children {
                    self.render(child, &mut children);
                }
                if element_like || !children.is_empty() {
                    node.children = Some(children);
                }
            }
        }

        out.push(node);
    }
}

/// Serialize `doc` as a JSON AST.
///
/// Positions are included when [`ParseOptions::position`] is set. Returns an
/// empty string when the tree projects to nothing.
pub fn print_to_json(source_text: &str, doc: &Node, options: ParseOptions) -> String {
    let printer = JsonPrinter { source_text, index: LineIndex::new(source_text), options };
    let mut roots = Vec::new();
    printer.render(doc, &mut roots);
    let Some(root) = roots.first() else {
        return String::new();
    };
    match serde_json::to_string(root) {
        Ok(json) => json,
        Err(error) => {
            tracing::warn!(%error, "failed to serialize the JSON AST");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Attribute, IMPLICIT_NODE_MARKER};

    fn json(source: &str, doc: &Node) -> serde_json::Value {
        let output = print_to_json(source, doc, ParseOptions::default().with_position(true));
        serde_json::from_str(&output).expect("output should be valid JSON")
    }

    #[test]
    fn test_element_offsets() {
        // <br/>
        assert_eq!(element_offsets(1, 1, 2), (0, 5));
        // <p>a</p>
        assert_eq!(element_offsets(1, 6, 1), (0, 8));
        // synthesized at offset zero
        assert_eq!(element_offsets(0, 4, 1), (0, 6));
    }

    #[test]
    fn test_self_closing_element_position() {
        let doc = Node::document().with_child(Node::element("br").with_loc(1).with_loc(1));
        let value = json("<br/>", &doc);
        let br = &value["children"][0];
        assert_eq!(br["type"], "element");
        assert_eq!(br["name"], "br");
        assert_eq!(br["position"]["start"]["offset"], 0);
        assert_eq!(br["position"]["start"]["line"], 1);
        assert_eq!(br["position"]["start"]["column"], 1);
        assert_eq!(br["position"]["end"]["offset"], 5);
        assert_eq!(br["position"]["end"]["column"], 6);
    }

    #[test]
    fn test_element_like_nodes_always_have_arrays() {
        let doc = Node::document()
            .with_child(Node::element("div"))
            .with_child(Node::component("Card"))
            .with_child(Node::fragment(""));
        let output = print_to_json("", &doc, ParseOptions::default());
        assert_eq!(
            output,
            "{\"type\":\"root\",\"children\":[\
             {\"type\":\"element\",\"name\":\"div\",\"attributes\":[],\"children\":[]},\
             {\"type\":\"component\",\"name\":\"Card\",\"attributes\":[],\"children\":[]},\
             {\"type\":\"fragment\",\"name\":\"\",\"attributes\":[],\"children\":[]}]}"
        );
    }

    #[test]
    fn test_implicit_children_are_spliced() {
        let doc = Node::document()
            .with_child(
                Node::element("marker")
                    .with_attr(Attribute::empty(IMPLICIT_NODE_MARKER))
                    .with_child(Node::element("a"))
                    .with_child(Node::element("b")),
            )
            .with_child(Node::element("c"));
        let value = json("", &doc);
        let names: Vec<_> = value["children"]
            .as_array()
            .unwrap()
            .iter()
            .map(|child| child["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_frontmatter_value_is_script_text() {
        let doc = Node::document()
            .with_child(Node::frontmatter(Node::text("\nconst a = 1;\n").with_loc(3)));
        let value = json("---\nconst a = 1;\n---", &doc);
        let frontmatter = &value["children"][0];
        assert_eq!(frontmatter["type"], "frontmatter");
        assert_eq!(frontmatter["value"], "\nconst a = 1;\n");
        assert!(frontmatter.get("children").is_none());
    }

    #[test]
    fn test_attribute_records() {
        let source = "<a href=\"/x\" hidden>";
        let doc = Node::document().with_child(
            Node::element("a")
                .with_loc(1)
                .with_attr(Attribute::quoted("href", "/x").with_locs(3, 9))
                .with_attr(Attribute::empty("hidden").with_locs(13, 13)),
        );
        let value = json(source, &doc);
        let attrs = &value["children"][0]["attributes"];
        assert_eq!(attrs[0]["kind"], "quoted");
        assert_eq!(attrs[0]["name"], "href");
        assert_eq!(attrs[0]["value"], "/x");
        assert_eq!(attrs[0]["raw"], "\"/x\"");
        assert_eq!(attrs[0]["position"]["start"]["offset"], 3);
        assert_eq!(attrs[1]["kind"], "empty");
        assert_eq!(attrs[1]["value"], "");
        assert_eq!(attrs[1]["raw"], "");
    }

    #[test]
    fn test_text_values_are_escaped() {
        let doc = Node::document().with_child(Node::text("a \"quoted\"\\path\n"));
        let value = json("", &doc);
        assert_eq!(value["children"][0]["value"], "a \"quoted\"\\path\n");
    }

    #[test]
    fn test_backslash_before_quote_round_trips() {
        let doc = Node::document().with_child(Node::text("\\\""));
        let output = print_to_json("", &doc, ParseOptions::default());
        assert_eq!(output, r#"{"type":"root","children":[{"type":"text","value":"\\\""}]}"#);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["children"][0]["value"], "\\\"");
    }

    #[test]
    fn test_control_characters_are_escaped() {
        let doc = Node::document().with_child(Node::text("a\n\r\t\u{c}\u{1}b"));
        let output = print_to_json("", &doc, ParseOptions::default());
        assert!(output.contains(r#""value":"a\n\r\t\f\u0001b""#));
    }

    #[test]
    fn test_positions_are_omitted_when_disabled() {
        let doc = Node::document().with_child(Node::text("hi").with_loc(0));
        let output = print_to_json("hi", &doc, ParseOptions::default());
        assert!(!output.contains("position"));
    }

    #[test]
    fn test_empty_projection() {
        assert_eq!(print_to_json("", &Node::implicit("html"), ParseOptions::default()), "");
    }
}

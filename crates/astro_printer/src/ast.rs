//! Component tree consumed by the printer.
//!
//! The tree is produced by the Astro parser and annotated in place by the
//! transform pass (CSS scoping, hydration analysis, style/script hoisting)
//! before it reaches this crate. The printer treats it as read-only, except
//! for the style text rewrite performed by [`crate::preprocess_styles`].

use smallvec::SmallVec;

/// Key of the attribute the parser attaches to synthesized structural nodes
/// (implicit `<html>`, `<head>`, `<body>`, ...).
///
/// A node carrying this attribute is never printed; its children take its
/// place in the parent.
pub const IMPLICIT_NODE_MARKER: &str = "\u{0}implicit";

/// A byte offset into the original `.astro` source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Loc {
    pub start: u32,
}

impl Loc {
    pub const fn new(start: u32) -> Self {
        Self { start }
    }
}

/// The kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Comment,
    Doctype,
    Frontmatter,
}

impl NodeKind {
    /// Name used for the node's `type` in the JSON AST.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "root",
            Self::Element => "element",
            Self::Text => "text",
            Self::Comment => "comment",
            Self::Doctype => "doctype",
            Self::Frontmatter => "frontmatter",
        }
    }
}

/// Syntactic form of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    /// `name="value"`
    Quoted,
    /// `name`
    Empty,
    /// `name={value}`
    Expression,
    /// `{...value}`
    Spread,
    /// `{value}`
    Shorthand,
    /// `` name=`value` ``
    TemplateLiteral,
}

impl AttributeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quoted => "quoted",
            Self::Empty => "empty",
            Self::Expression => "expression",
            Self::Spread => "spread",
            Self::Shorthand => "shorthand",
            Self::TemplateLiteral => "template-literal",
        }
    }
}

/// A single attribute, in the order it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub namespace: String,
    pub key: String,
    /// Decoded value. For spread and shorthand attributes the expression
    /// lives in `key` instead.
    pub val: String,
    pub key_loc: Loc,
    pub val_loc: Loc,
    pub kind: AttributeType,
}

impl Attribute {
    pub fn new(kind: AttributeType, key: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            namespace: String::new(),
            key: key.into(),
            val: val.into(),
            key_loc: Loc::default(),
            val_loc: Loc::default(),
            kind,
        }
    }

    pub fn quoted(key: impl Into<String>, val: impl Into<String>) -> Self {
        Self::new(AttributeType::Quoted, key, val)
    }

    pub fn empty(key: impl Into<String>) -> Self {
        Self::new(AttributeType::Empty, key, "")
    }

    pub fn expression(key: impl Into<String>, val: impl Into<String>) -> Self {
        Self::new(AttributeType::Expression, key, val)
    }

    pub fn spread(expr: impl Into<String>) -> Self {
        Self::new(AttributeType::Spread, expr, "")
    }

    pub fn shorthand(expr: impl Into<String>) -> Self {
        Self::new(AttributeType::Shorthand, expr, "")
    }

    pub fn template_literal(key: impl Into<String>, val: impl Into<String>) -> Self {
        Self::new(AttributeType::TemplateLiteral, key, val)
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn with_locs(mut self, key_loc: u32, val_loc: u32) -> Self {
        self.key_loc = Loc::new(key_loc);
        self.val_loc = Loc::new(val_loc);
        self
    }

    /// `namespace:key`, or just `key` when there is no namespace.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.key.clone()
        } else {
            format!("{}:{}", self.namespace, self.key)
        }
    }

    pub fn is_implicit_marker(&self) -> bool {
        self.key == IMPLICIT_NODE_MARKER
    }
}

/// A component that needs client-side hydration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydratedComponent {
    /// Tag name. For non-custom elements this must be an expression in scope
    /// of the component module (usually an imported binding).
    pub name: String,
    pub custom_element: bool,
}

/// Document-level metadata collected by the transform pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentMetadata {
    pub hydrated_components: Vec<HydratedComponent>,
    /// One attribute group per resource-declaring tag (e.g. stylesheet links).
    pub resources: Vec<Vec<Attribute>>,
}

/// A node of the component tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Tag name for elements, text payload for everything else.
    pub data: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    /// Empty for synthesized nodes, one entry for text-like nodes, and the
    /// opening/closing tag-name offsets for elements.
    pub loc: SmallVec<[Loc; 2]>,

    pub expression: bool,
    pub component: bool,
    pub custom_element: bool,
    pub fragment: bool,

    /// Hoisted `<style>` elements (document node only).
    pub styles: Vec<Node>,
    /// Hoisted `<script>` elements (document node only).
    pub scripts: Vec<Node>,
    /// Component metadata (document node only).
    pub metadata: ComponentMetadata,
}

impl Node {
    fn new(kind: NodeKind, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            loc: SmallVec::new(),
            expression: false,
            component: false,
            custom_element: false,
            fragment: false,
            styles: Vec::new(),
            scripts: Vec::new(),
            metadata: ComponentMetadata::default(),
        }
    }

    pub fn document() -> Self {
        Self::new(NodeKind::Document, "")
    }

    pub fn element(tag_name: impl Into<String>) -> Self {
        Self::new(NodeKind::Element, tag_name)
    }

    pub fn component(tag_name: impl Into<String>) -> Self {
        let mut node = Self::element(tag_name);
        node.component = true;
        node
    }

    pub fn custom_element(tag_name: impl Into<String>) -> Self {
        let mut node = Self::element(tag_name);
        node.custom_element = true;
        node
    }

    pub fn fragment(tag_name: impl Into<String>) -> Self {
        let mut node = Self::element(tag_name);
        node.fragment = true;
        node
    }

    /// An `{expression}` container. Its children are the JavaScript text and
    /// any markup nested inside the expression.
    pub fn expression() -> Self {
        let mut node = Self::element("");
        node.expression = true;
        node
    }

    pub fn text(data: impl Into<String>) -> Self {
        Self::new(NodeKind::Text, data)
    }

    pub fn comment(data: impl Into<String>) -> Self {
        Self::new(NodeKind::Comment, data)
    }

    pub fn doctype(data: impl Into<String>) -> Self {
        Self::new(NodeKind::Doctype, data)
    }

    /// A frontmatter block holding `script` as its single text child.
    pub fn frontmatter(script: Node) -> Self {
        Self::new(NodeKind::Frontmatter, "").with_child(script)
    }

    /// An element carrying the implicit marker.
    pub fn implicit(tag_name: impl Into<String>) -> Self {
        Self::element(tag_name).with_attr(Attribute::empty(IMPLICIT_NODE_MARKER))
    }

    #[must_use]
    pub fn with_attr(mut self, attr: Attribute) -> Self {
        self.attrs.push(attr);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    #[must_use]
    pub fn with_loc(mut self, start: u32) -> Self {
        self.loc.push(Loc::new(start));
        self
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|attr| attr.key == key)
    }

    pub fn is_implicit(&self) -> bool {
        self.attrs.iter().any(Attribute::is_implicit_marker)
    }

    pub fn is_element(&self, tag_name: &str) -> bool {
        self.kind == NodeKind::Element && !self.expression && self.data == tag_name
    }

    /// Text of the first child, when it is a text node.
    pub fn text_content(&self) -> Option<&str> {
        self.first_child()
            .filter(|child| child.kind == NodeKind::Text)
            .map(|child| child.data.as_str())
    }

    /// The frontmatter node, if the document has one.
    pub fn frontmatter_node(&self) -> Option<&Node> {
        self.children
            .iter()
            .find(|child| child.kind == NodeKind::Frontmatter)
    }
}

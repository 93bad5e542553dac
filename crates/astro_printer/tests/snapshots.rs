//! End-to-end printer tests.
//!
//! Each test builds the tree the parser and transform pass would hand over
//! for a small `.astro` file and checks the printed output.

use astro_printer::ast::{Attribute, HydratedComponent, Node};
use astro_printer::{
    ParseOptions, PreprocessStyleResult, StyleBlock, TransformOptions, compile, hash_from_source,
    print_to_json, transform,
};

fn compile_sync(source: &str, doc: &Node) -> String {
    transform(source, doc, TransformOptions::new()).code
}

fn line_starting_with<'a>(output: &'a str, prefix: &str) -> &'a str {
    output
        .lines()
        .find(|line| line.starts_with(prefix))
        .unwrap_or_else(|| panic!("no line starting with {prefix:?} in:\n{output}"))
}

#[test]
fn full_component() {
    let doc = Node::document().with_child(Node::element("h1").with_child(Node::text("Hi")));
    let output = compile_sync("<h1>Hi</h1>", &doc);

    let expected = r#"import {
  Fragment,
  render as $$render,
  createAstro as $$createAstro,
  createComponent as $$createComponent,
  renderComponent as $$renderComponent,
  renderSlot as $$renderSlot,
  addAttribute as $$addAttribute,
  spreadAttributes as $$spreadAttributes,
  defineStyleVars as $$defineStyleVars,
  defineScriptVars as $$defineScriptVars,
  createMetadata as $$createMetadata
} from "astro/internal";

export const $$metadata = $$createMetadata(import.meta.url, { modules: [], hydratedComponents: [], hoisted: [], resources: [] });

const $$Astro = $$createAstro(import.meta.url, 'https://astro.build', '.');
const Astro = $$Astro;

//@ts-ignore
const $$Component = $$createComponent(async ($$result, $$props, $$slots) => {
const Astro = $$result.createAstro($$Astro, $$props, $$slots);
return $$render`<h1>Hi</h1>`;
});
export default $$Component;
"#;
    assert_eq!(output, expected);
}

#[test]
fn metadata_lists_modules_and_hydrated_custom_elements() {
    let script =
        "\nimport Counter from '../components/Counter.jsx';\nimport '../styles/global.css';\n";
    let source = format!("---{script}---\n<my-element client:load />");
    let mut doc = Node::document()
        .with_child(Node::frontmatter(Node::text(script).with_loc(3)))
        .with_child(Node::custom_element("my-element"));
    doc.metadata.hydrated_components.push(HydratedComponent {
        name: "my-element".to_string(),
        custom_element: true,
    });

    let output = compile_sync(&source, &doc);

    assert!(output.contains("\nimport * as $$module1 from '../components/Counter.jsx';"));
    assert!(output.contains("\nimport * as $$module2 from '../styles/global.css';"));
    insta::assert_snapshot!(
        line_starting_with(&output, "export const $$metadata"),
        @"export const $$metadata = $$createMetadata(import.meta.url, { modules: [{ module: $$module1, specifier: '../components/Counter.jsx' }, { module: $$module2, specifier: '../styles/global.css' }], hydratedComponents: ['my-element'], hoisted: [], resources: [] });"
    );
}

#[test]
fn frontmatter_imports_stay_at_module_scope() {
    let script = "\nimport Card from './Card.astro';\nexport const prerender = true;\nconst { title } = Astro.props;\n";
    let source = format!("---{script}---\n<Card title={{title}} />");
    let doc = Node::document()
        .with_child(Node::frontmatter(Node::text(script).with_loc(3)))
        .with_child(Node::component("Card").with_attr(Attribute::expression("title", "title")));

    let output = compile_sync(&source, &doc);

    let factory = output.find("$$createComponent(async").unwrap();
    assert!(output.find("import Card from './Card.astro';").unwrap() < factory);
    assert!(output.find("export const prerender = true;").unwrap() < factory);
    assert!(output.find("const { title } = Astro.props;").unwrap() > factory);
    insta::assert_snapshot!(
        line_starting_with(&output, "return "),
        @r#"return $$render`${$$renderComponent($$result,"Card",Card,{"title":(title)},{})}`;"#
    );
}

#[test]
fn every_attribute_kind() {
    let doc = Node::document().with_child(
        Node::element("a")
            .with_attr(Attribute::quoted("href", "/"))
            .with_attr(Attribute::empty("download"))
            .with_attr(Attribute::expression("class", "cls"))
            .with_attr(Attribute::spread("rest"))
            .with_attr(Attribute::shorthand("title"))
            .with_attr(Attribute::template_literal("data-x", "${y}"))
            .with_child(Node::text("Go")),
    );
    let output = compile_sync("", &doc);
    insta::assert_snapshot!(
        line_starting_with(&output, "return "),
        @r#"return $$render`<a href="/" download${$$addAttribute(cls, "class")}${$$spreadAttributes(rest)}${$$addAttribute(title, "title")}${$$addAttribute(`${y}`, "data-x")}>Go</a>`;"#
    );
}

#[test]
fn named_and_default_slots() {
    let doc = Node::document().with_child(
        Node::component("Layout")
            .with_attr(Attribute::expression("title", "title"))
            .with_child(
                Node::element("h1")
                    .with_attr(Attribute::quoted("slot", "header"))
                    .with_child(Node::text("Hi")),
            )
            .with_child(Node::text("Body")),
    );
    let output = compile_sync("", &doc);
    insta::assert_snapshot!(
        line_starting_with(&output, "return "),
        @r#"return $$render`${$$renderComponent($$result,"Layout",Layout,{"title":(title)},{"header": () => $$render`<h1 slot="header">Hi</h1>`,"default": () => $$render`Body`,})}`;"#
    );
}

#[test]
fn implicit_document_structure_is_not_printed() {
    let doc = Node::document().with_child(
        Node::implicit("html")
            .with_child(Node::implicit("head"))
            .with_child(Node::implicit("body").with_child(Node::element("main"))),
    );
    let output = compile_sync("<main></main>", &doc);
    insta::assert_snapshot!(
        line_starting_with(&output, "return "),
        @"return $$render`<main></main>`;"
    );
}

#[test]
fn pathname_names_the_component() {
    let doc = Node::document();
    let options = TransformOptions::new().with_pathname("/src/pages/blog-post.astro");
    let output = transform("", &doc, options).code;
    assert!(output.contains("const $$BlogPost = $$createComponent("));
    assert!(output.ends_with("export default $$BlogPost;\n"));
}

async fn compile_sass(block: StyleBlock) -> PreprocessStyleResult {
    if block.attrs.iter().any(|(key, value)| key == "lang" && value == "scss") {
        Ok(Some(block.content.replace("$c", "red")))
    } else {
        Ok(None)
    }
}

#[tokio::test]
async fn compile_preprocesses_styles_and_fills_scope() {
    let source = "<p>Hi</p><style lang=\"scss\">p { color: $c; }</style>";
    let mut doc = Node::document().with_child(Node::element("p").with_child(Node::text("Hi")));
    doc.styles.push(
        Node::element("style")
            .with_attr(Attribute::quoted("lang", "scss"))
            .with_child(Node::text("p { color: $c; }")),
    );
    doc.styles.push(Node::element("style").with_child(Node::text("a { color: blue; }")));

    let options = TransformOptions::new().with_preprocess_style(compile_sass);
    let result = compile(source, doc, options).await;

    assert_eq!(result.scope, hash_from_source(source));
    assert!(result.code.contains(
        "const STYLES = [\n{props:{\"lang\":\"scss\"},children:`p { color: red; }`},\n{props:{},children:`a { color: blue; }`},\n];"
    ));
}

#[tokio::test]
async fn compile_keeps_explicit_scope() {
    let options = TransformOptions::new().with_scope("abc123");
    let result = compile("", Node::document(), options).await;
    assert_eq!(result.scope, "abc123");
}

#[test]
fn json_ast_for_self_closing_element() {
    let doc = Node::document().with_child(Node::element("br").with_loc(1).with_loc(1));
    let output = print_to_json("<br/>", &doc, ParseOptions::default().with_position(true));
    insta::assert_snapshot!(
        output,
        @r#"{"type":"root","children":[{"type":"element","name":"br","attributes":[],"children":[],"position":{"start":{"line":1,"column":1,"offset":0},"end":{"line":1,"column":6,"offset":5}}}]}"#
    );
}

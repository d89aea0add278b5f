use header_stamp::core::item::Item;
use header_stamp::core::template::{Delimiter, RenderContext, Template, FILE_KEY};
use header_stamp::core::types::ErrorCategory;
use serde_json::{json, Map, Value};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn fixture_item() -> Item {
    Item::new("./test/fixture/file.txt")
        .with_cwd("./test/")
        .with_base("./test/fixture/")
        .with_buffer("Hello world")
}

#[test]
fn test_tag_style_renders_static_data() {
    let template = Template::compile("And then <%= foo %> said : ").unwrap();
    assert_eq!(template.delimiter(), Delimiter::Tag);

    let ctx = RenderContext::for_item(&object(json!({"foo": "you"})), &fixture_item());
    assert_eq!(template.render(&ctx).unwrap(), "And then you said : ");
}

#[test]
fn test_brace_style_renders_static_data() {
    let template = Template::compile("And then ${foo} said : ").unwrap();
    assert_eq!(template.delimiter(), Delimiter::Brace);

    let ctx = RenderContext::for_item(&object(json!({"foo": "you"})), &fixture_item());
    assert_eq!(template.render(&ctx).unwrap(), "And then you said : ");
}

#[test]
fn test_render_ignores_item_content() {
    let template = Template::compile("And then <%= foo %> said : ").unwrap();
    let data = object(json!({"foo": "you"}));
    let first = RenderContext::for_item(&data, &Item::new("a.txt").with_buffer("one"));
    let second = RenderContext::for_item(&data, &Item::new("a.txt").with_buffer("two"));
    assert_eq!(
        template.render(&first).unwrap(),
        template.render(&second).unwrap()
    );
}

#[test]
fn test_file_fields_are_reachable() {
    let template = Template::compile("<%= file.relative %>\n<%= file.path %>\n").unwrap();
    let ctx = RenderContext::for_item(&Map::new(), &fixture_item());
    assert_eq!(
        template.render(&ctx).unwrap(),
        "file.txt\ntest/fixture/file.txt\n"
    );
}

#[test]
fn test_item_data_and_filename_are_exposed() {
    let item = fixture_item().with_data(object(json!({"license": "WTFPL"})));
    let template = Template::compile("<%= license %> / <%= filename %> / <%= file.extname %>").unwrap();
    let ctx = RenderContext::for_item(&Map::new(), &item);
    assert_eq!(template.render(&ctx).unwrap(), "WTFPL / file.txt / .txt");
}

#[test]
fn test_reserved_file_key_wins_over_static_data() {
    let ctx = RenderContext::for_item(&object(json!({"file": "clobbered"})), &fixture_item());
    assert!(ctx.get(FILE_KEY).unwrap().is_object());
}

#[test]
fn test_non_string_values_are_stringified() {
    let template = Template::compile("${year} ${draft} ${authors}").unwrap();
    let data = object(json!({"year": 2024, "draft": false, "authors": ["a", "b"]}));
    let ctx = RenderContext::for_item(&data, &fixture_item());
    assert_eq!(template.render(&ctx).unwrap(), r#"2024 false ["a","b"]"#);
}

#[test]
fn test_expressions_are_evaluated() {
    let template = Template::compile(r#"<%= name + "!" %> <%= year + 1 %>"#).unwrap();
    let data = object(json!({"name": "hi", "year": 2024}));
    let ctx = RenderContext::for_item(&data, &fixture_item());
    assert_eq!(template.render(&ctx).unwrap(), "hi! 2025");
}

#[test]
fn test_string_functions_in_headers() {
    let template =
        Template::compile(r#"<%= "Copyright " + year %> <%= name.to_upper() %>"#).unwrap();
    let data = object(json!({"name": "acme", "year": 2024}));
    let ctx = RenderContext::for_item(&data, &fixture_item());
    assert_eq!(template.render(&ctx).unwrap(), "Copyright 2024 ACME");
}

#[test]
fn test_close_tag_inside_string_literal() {
    let template = Template::compile(r#"<%= "50%>" %> done"#).unwrap();
    let ctx = RenderContext::for_item(&Map::new(), &fixture_item());
    assert_eq!(template.render(&ctx).unwrap(), "50%> done");
}

#[test]
fn test_unclosed_tag_is_a_syntax_error() {
    let err = Template::compile("/* <%= foo */").unwrap_err();
    assert_eq!(err.category, ErrorCategory::TemplateSyntaxError);
    assert_eq!(err.code, "HDR-TPL-001");
}

#[test]
fn test_invalid_expression_is_a_syntax_error() {
    let err = Template::compile("line one\n<%= foo bar baz %>").unwrap_err();
    assert_eq!(err.category, ErrorCategory::TemplateSyntaxError);
    assert_eq!(err.context.get("line").map(String::as_str), Some("2"));
}

#[test]
fn test_undefined_variable_is_a_render_error() {
    let template = Template::compile("<%= author %>").unwrap();
    let err = template
        .render(&RenderContext::for_item(&Map::new(), &fixture_item()))
        .unwrap_err();
    assert_eq!(err.category, ErrorCategory::TemplateRenderError);
    assert_eq!(err.code, "HDR-TPL-002");
    assert_eq!(
        err.context.get("expression").map(String::as_str),
        Some("author")
    );
}

#[test]
fn test_forced_delimiter_overrides_detection() {
    let template = Template::compile_with("${x} <%= y %>", Delimiter::Tag).unwrap();
    let ctx = RenderContext::for_item(&object(json!({"y": "Y"})), &fixture_item());
    assert_eq!(template.render(&ctx).unwrap(), "${x} Y");
}

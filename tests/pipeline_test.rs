//! Integration tests for extraction, parsing, and cleanup.

use proptest::prelude::*;
use unwiki::{
    clean_content, extract_structure, parse_response, parse_structure, CleanupPipeline,
    CleanupPreset, Error,
};

const FENCED_RESPONSE: &str = r#"
```xml
<wiki_structure>
    <title>Test Wiki</title>
    <description>This is a test wiki.</description>
    <pages>
        <page id="p1">
            <title>Page 1</title>
            <description>Content for page 1.</description>
            <importance>high</importance>
            <file_path>file1.txt</file_path>
        </page>
    </pages>
</wiki_structure>
```
"#;

#[test]
fn test_extract_fenced_response() {
    let fragment = extract_structure(FENCED_RESPONSE).unwrap();
    let trimmed = fragment.trim();
    assert!(trimmed.starts_with("<wiki_structure>"));
    assert!(trimmed.ends_with("</wiki_structure>"));
}

#[test]
fn test_extract_errors() {
    assert!(matches!(extract_structure(""), Err(Error::EmptyInput)));
    assert!(matches!(extract_structure("   "), Err(Error::EmptyInput)));
    assert!(matches!(
        extract_structure("no structure here"),
        Err(Error::NoStructureFound { .. })
    ));
}

#[test]
fn test_parse_extracted_fragment() {
    let fragment = extract_structure(FENCED_RESPONSE).unwrap();
    let doc = parse_structure(&fragment).unwrap();

    assert_eq!(doc.title, "Test Wiki");
    assert_eq!(doc.description, "This is a test wiki.");
    assert_eq!(doc.page_count(), 1);

    let page = &doc.pages[0];
    assert_eq!(page.id, "p1");
    assert_eq!(page.title, "Page 1");
    assert_eq!(page.description, "Content for page 1.");
    assert_eq!(page.importance, "high");
    assert_eq!(page.file_paths, vec!["file1.txt"]);
    assert!(page.related_page_ids.is_empty());
}

#[test]
fn test_parse_response_with_prose_and_control_chars() {
    let response = "Sure! Here is the wiki:\n\n<wiki_structure>\u{0}<title>Ops\u{1B} Guide</title>\
                    <pages><page id=\"deploy\"><title>Deploy</title>\
                    <related>monitoring</related><related>rollback</related></page>\
                    <page id=\"monitoring\"><title>Monitoring</title></page></pages>\
                    </wiki_structure>\n\nLet me know if you need changes.";

    let doc = parse_response(response).unwrap();
    assert_eq!(doc.title, "Ops Guide");
    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.pages[0].related_page_ids, vec!["monitoring", "rollback"]);
    assert_eq!(doc.pages[1].importance, "medium");
}

#[test]
fn test_parse_response_malformed() {
    let response = "<wiki_structure><title>Broken</titel></wiki_structure>";
    assert!(matches!(
        parse_response(response),
        Err(Error::MalformedStructure(_))
    ));
}

#[test]
fn test_clean_reference_example() {
    let dirty = "<details><summary>Click me</summary>Hidden details.</details>This is `Sources: [source](http://example.com)` visible. ![img](img.png) [link text](http://example.com/link)";
    assert_eq!(clean_content(dirty), "This is visible. link text");
}

#[test]
fn test_clean_is_idempotent() {
    let samples = [
        "",
        "plain text",
        "  spaced \n\n out \t text ",
        "<p>Para</p>\n\n<details>x</details>```mermaid\ngraph TD;\n```",
        "[a](https://a.example) and [b](./b.md) and ![c](c.png)",
        "<<b>>nested<</b>>",
        "[x]<br>(http://exposed.example)",
        "`Sources: [](x)` `source: [a](b)`",
    ];
    for sample in samples {
        let once = clean_content(sample);
        assert_eq!(clean_content(&once), once, "not idempotent for {:?}", sample);
    }
}

#[test]
fn test_clean_leaves_no_markup() {
    let samples = [
        "<details>\n<summary>s</summary>\nbody\n</details>",
        "a <div class=\"x\">b</div> <br/> c",
        "![one](1.png)![two](https://x.example/2.png)",
        "<details><details>inner</details></details>",
        "<span>![alt](<b>img</b>)</span>",
    ];
    for sample in samples {
        let cleaned = clean_content(sample);
        assert!(!cleaned.contains("<details>"), "{:?} -> {:?}", sample, cleaned);
        assert!(!cleaned.contains("!["), "{:?} -> {:?}", sample, cleaned);
        let has_tag = cleaned
            .find('<')
            .map(|start| cleaned[start..].contains('>'))
            .unwrap_or(false);
        assert!(!has_tag, "{:?} -> {:?}", sample, cleaned);
    }
}

#[test]
fn test_clean_nested_links_fully_unwrapped() {
    let text = format!("[[[[[[a{}", "](http://e.example)".repeat(6));
    let once = clean_content(&text);
    assert_eq!(once, "a");
    assert_eq!(clean_content(&once), once);
}

/// Fragments that combine into overlapping, nested, and broken markup.
/// `!` only ever appears as the start of a complete image.
const MARKUP_TOKENS: &[&str] = &[
    "alpha",
    "beta",
    " ",
    "\t",
    "\n",
    "\n\n",
    "[",
    "]",
    "(",
    ")",
    "](http://x)",
    "](https://e.example/p)",
    "](docs/guide.md)",
    "<",
    ">",
    "<b>",
    "</b>",
    "<br/>",
    "<details>",
    "</details>",
    "<summary>",
    "`",
    "```mermaid\n",
    "```",
    "![img](a.png)",
    "![](https://e.example/i.svg)",
    "`Sources: [s](http://x)`",
];

fn markup_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(MARKUP_TOKENS.to_vec()), 0..48)
        .prop_map(|tokens| tokens.concat())
}

fn has_tag(text: &str) -> bool {
    text.find('<')
        .map(|start| text[start..].contains('>'))
        .unwrap_or(false)
}

proptest! {
    #[test]
    fn prop_clean_is_idempotent(text in markup_text()) {
        let once = clean_content(&text);
        let twice = clean_content(&once);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_paragraph_clean_is_idempotent(text in markup_text()) {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Paragraphs);
        let once = pipeline.process(&text);
        let twice = pipeline.process(&once);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_clean_leaves_no_markup(text in markup_text()) {
        let cleaned = clean_content(&text);
        prop_assert!(!cleaned.contains("<details>"), "{:?} -> {:?}", text, cleaned);
        prop_assert!(!cleaned.contains("!["), "{:?} -> {:?}", text, cleaned);
        prop_assert!(!has_tag(&cleaned), "{:?} -> {:?}", text, cleaned);
    }

    #[test]
    fn prop_clean_has_flat_whitespace(text in markup_text()) {
        let cleaned = clean_content(&text);
        prop_assert!(!cleaned.contains('\n'));
        prop_assert!(!cleaned.contains("  "));
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
    }
}

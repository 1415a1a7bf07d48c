use chatmark_core::ChatMessage;
use chatmark_core::RenderOptions;
use chatmark_core::render;
use chatmark_core::render_message;
use pretty_assertions::assert_eq;

#[test]
fn bold_and_emphasis_render_without_extra_tags() {
    assert_eq!(
        render("**bold** and _em_"),
        "<p><strong>bold</strong> and <em>em</em></p>\n"
    );
}

#[test]
fn single_newline_renders_line_break_inside_one_paragraph() {
    let html = render("line1\nline2");
    assert_eq!(html, "<p>line1<br>\nline2</p>\n");
}

#[test]
fn inline_script_is_dropped_and_text_kept() {
    let html = render("<script>alert(1)</script>hello");
    assert!(html.contains("hello"), "{html}");
    assert!(!html.contains("script"), "{html}");
}

#[test]
fn markdown_link_gets_new_tab_attributes() {
    let html = render("[click](https://evil.example)");
    assert!(html.starts_with("<p><a "), "{html}");
    assert!(html.ends_with(">click</a></p>\n"), "{html}");
    for attribute in [
        r#"href="https://evil.example""#,
        r#"target="_blank""#,
        r#"rel="noopener noreferrer""#,
    ] {
        assert!(html.contains(attribute), "{attribute} missing from {html}");
    }
}

#[test]
fn markdown_table_keeps_only_its_text() {
    let html = render("| name | qty |\n|------|-----|\n| apple | 3 |");
    assert_eq!(html, "<p>name qty</p>\n<p>apple 3</p>\n");
}

#[test]
fn table_cell_markup_survives_flattening() {
    let html = render("| **a** | [b](https://b.example) |\n|---|---|");
    assert!(html.starts_with("<p><strong>a</strong> <a "), "{html}");
    assert!(html.ends_with(">b</a></p>\n"), "{html}");
}

#[test]
fn image_keeps_its_alt_text() {
    let html = render("look: ![diagram](https://i.example/x.png)");
    assert_eq!(html, "<p>look: diagram</p>\n");
}

#[test]
fn linked_image_keeps_alt_text_as_link_text() {
    let html = render("[![logo](https://i.example/l.png)](https://a.example)");
    assert!(html.contains(">logo</a>"), "{html}");
    assert!(!html.contains("<img"), "{html}");
}

#[test]
fn unsupported_blocks_degrade_to_visible_text() {
    let html = render("<div><span>still visible</span></div>");
    assert!(html.contains("still visible"), "{html}");
    assert!(!html.contains("<div"), "{html}");
    assert!(!html.contains("<span"), "{html}");
}

#[test]
fn malformed_markdown_degrades_to_text() {
    let html = render("**unterminated [link](");
    assert_eq!(html, "<p>**unterminated [link](</p>\n");
}

#[test]
fn html_special_characters_are_escaped() {
    let html = render("a < b && c > d");
    assert_eq!(html, "<p>a &lt; b &amp;&amp; c &gt; d</p>\n");
}

#[test]
fn chat_message_content_is_rendered() {
    let message = ChatMessage {
        id: Some("42".to_string()),
        content: "hi <img src=x onerror=alert(1)> **there**".to_string(),
    };
    let rendered = render_message(&message, RenderOptions::default());
    assert_eq!(rendered.id.as_deref(), Some("42"));
    assert_eq!(rendered.html, "<p>hi  <strong>there</strong></p>\n");
}

use super::*;

// =============================================================
// parse_segments
// =============================================================

#[test]
fn splits_text_code_text() {
    let segments = parse_segments("a\n```js\nx=1\n```\nb");
    assert_eq!(
        segments,
        vec![Segment::Text("a\n"), Segment::Code { language: "js", content: "x=1" }, Segment::Text("\nb"),]
    );
}

#[test]
fn fence_free_input_is_single_text_segment() {
    let input = "just words\nacross lines";
    assert_eq!(parse_segments(input), vec![Segment::Text(input)]);
}

#[test]
fn empty_input_has_no_segments() {
    assert!(parse_segments("").is_empty());
}

#[test]
fn missing_language_defaults_to_text() {
    let segments = parse_segments("```\nplain\n```");
    assert_eq!(segments, vec![Segment::Code { language: DEFAULT_LANGUAGE, content: "plain" }]);
}

#[test]
fn unterminated_fence_stays_plain_text() {
    let input = "before\n```rust\nfn main() {}\n";
    assert_eq!(parse_segments(input), vec![Segment::Text(input)]);
}

#[test]
fn code_body_keeps_inner_whitespace() {
    let segments = parse_segments("```py\ndef f():\n    return 1\n\n```");
    assert_eq!(segments, vec![Segment::Code { language: "py", content: "def f():\n    return 1" }]);
}

#[test]
fn multiple_blocks_in_order() {
    let segments = parse_segments("```a\n1\n```mid```b\n2\n```");
    assert_eq!(
        segments,
        vec![
            Segment::Code { language: "a", content: "1" },
            Segment::Text("mid"),
            Segment::Code { language: "b", content: "2" },
        ]
    );
}

#[test]
fn parsing_is_repeatable() {
    let input = "x\n```sh\nls -la\n```\ny";
    assert_eq!(parse_segments(input), parse_segments(input));
}

// =============================================================
// format_message
// =============================================================

#[test]
fn format_plain_text_is_unchanged() {
    assert_eq!(format_message("hello\nworld", Theme::Dark), "hello\nworld");
}

#[test]
fn format_code_block_labels_language_and_lines() {
    let out = format_message("see:\n```rust\nlet a = 1;\nlet b = 2;\n```\ndone", Theme::Light);
    let palette = Theme::Light.palette();
    assert!(out.starts_with("see:\n"));
    assert!(out.contains("┌─ rust"));
    assert!(out.contains(&format!("{}let a = 1;{}", palette.code, palette.reset)));
    assert!(out.contains(&format!("{}let b = 2;{}", palette.code, palette.reset)));
    assert!(out.ends_with("└─\x1b[0m\ndone"));
}

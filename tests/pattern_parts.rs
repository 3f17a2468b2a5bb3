use url_pattern::encoding::{Encoding, encode};
use url_pattern::pattern::{
    Modifier, PartKind, TokenKind, TokenizerMode, compile_component, parse_component_pattern,
    tokenize,
};

#[test]
fn tokenizer_when_all_shapes_present_then_kinds_and_spans_line_up() {
    let tokens = tokenize("/:foo(\\d+)*{x}?", TokenizerMode::Strict).expect("tokens");
    let kinds: Vec<(TokenKind, usize)> = tokens.iter().map(|t| (t.kind, t.span)).collect();
    assert_eq!(
        kinds,
        [
            (TokenKind::Char, 1),
            (TokenKind::Name, 4),
            (TokenKind::Pattern, 5),
            (TokenKind::Asterisk, 1),
            (TokenKind::Open, 1),
            (TokenKind::Char, 1),
            (TokenKind::Close, 1),
            (TokenKind::OtherModifier, 1),
            (TokenKind::End, 0),
            (TokenKind::End, 0),
            (TokenKind::End, 0),
        ]
    );
}

#[test]
fn tokenizer_when_escape_covers_multibyte_char_then_span_counts_bytes() {
    let tokens = tokenize("\\é", TokenizerMode::Strict).expect("tokens");
    assert_eq!(tokens[0].kind, TokenKind::EscapedChar);
    assert_eq!(tokens[0].span, 3);
}

#[test]
fn tokenizer_when_strict_and_input_malformed_then_rejected() {
    tokenize("\\", TokenizerMode::Strict).expect_err("dangling escape should fail");
    tokenize(":0abc", TokenizerMode::Strict).expect_err("non-identifier name should fail");
    tokenize("(café)", TokenizerMode::Strict).expect_err("non-ascii group should fail");
    tokenize("(?foo)", TokenizerMode::Strict).expect_err("leading ? should fail");
    tokenize("(foo(bar))", TokenizerMode::Strict).expect_err("capturing nested group should fail");
    tokenize("()", TokenizerMode::Strict).expect_err("empty group should fail");
    tokenize("(foo", TokenizerMode::Strict).expect_err("unbalanced group should fail");
}

#[test]
fn tokenizer_when_lenient_then_malformed_regions_degrade_to_invalid_chars() {
    let tokens = tokenize("(café)", TokenizerMode::Lenient).expect("tokens");
    assert_eq!(tokens[0].kind, TokenKind::InvalidChar);
    assert_eq!(tokens[0].span, 1);

    let tokens = tokenize(":/", TokenizerMode::Lenient).expect("tokens");
    assert_eq!(tokens[0].kind, TokenKind::InvalidChar);
    assert_eq!(tokens[1].kind, TokenKind::Char);
}

#[test]
fn parser_when_segments_and_text_mix_then_parts_ordered() {
    let parts =
        parse_component_pattern("/users/:id", "/", "[^\\/]+?", Encoding::Pathname).expect("parts");
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].kind, PartKind::Text);
    assert_eq!(parts[0].value, "/users");
    assert_eq!(parts[1].kind, PartKind::Segment);
    assert_eq!(parts[1].name, "id");
    assert_eq!(parts[1].prefix, "/");
    assert!(parts[1].custom_name);
    assert_eq!(parts[1].modifier, Modifier::None);
}

#[test]
fn parser_when_group_is_wildcard_shaped_then_classified_as_asterisk() {
    let parts = parse_component_pattern("*", "", ".+?", Encoding::Search).expect("parts");
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].kind, PartKind::Asterisk);
    assert_eq!(parts[0].name, "0");
    assert!(!parts[0].custom_name);

    let parts = parse_component_pattern("(.*)", "", ".+?", Encoding::Search).expect("parts");
    assert_eq!(parts[0].kind, PartKind::Asterisk);
}

#[test]
fn parser_when_brace_group_carries_prefix_and_suffix_then_stored_on_part() {
    let parts =
        parse_component_pattern("{a:name.b}?", "", "[^\\.]+?", Encoding::Hostname).expect("parts");
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].kind, PartKind::Segment);
    assert_eq!(parts[0].prefix, "a");
    assert_eq!(parts[0].suffix, ".b");
    assert_eq!(parts[0].modifier, Modifier::Optional);
    assert!(!parts[0].empty_prefix_suffix);
}

#[test]
fn compiler_when_segments_have_prefixes_then_regex_keeps_them_non_capturing() {
    let component =
        compile_component("/:foo/:bar?", "/", "/", Encoding::Pathname, false).expect("component");
    assert_eq!(
        component.regex.as_str(),
        r"^(?:\/([^\/]+?))(?:\/([^\/]+?))?$"
    );
    assert_eq!(component.pattern, "/:foo/:bar?");
    let names: Vec<&str> = component.group_names.iter().map(String::as_str).collect();
    assert_eq!(names, ["foo", "bar"]);
}

#[test]
fn compiler_when_plus_modifier_then_repetition_absorbs_separators() {
    let component =
        compile_component("/foo/:bar+", "/", "/", Encoding::Pathname, false).expect("component");
    assert_eq!(
        component.regex.as_str(),
        r"^\/foo(?:\/((?:[^\/]+?)(?:\/(?:[^\/]+?))*))$"
    );
}

#[test]
fn compiler_when_star_modifier_then_outer_group_optional() {
    let component =
        compile_component("/foo/:bar*", "/", "/", Encoding::Pathname, false).expect("component");
    assert_eq!(
        component.regex.as_str(),
        r"^\/foo(?:\/((?:[^\/]+?)(?:\/(?:[^\/]+?))*))?$"
    );
}

#[test]
fn compiler_when_text_carries_modifier_then_braced_in_canonical_pattern() {
    let component = compile_component("http{s}?", "", "", Encoding::Protocol, false)
        .expect("component");
    assert_eq!(component.regex.as_str(), "^http(?:s)?$");
    assert_eq!(component.pattern, "http{s}?");
    assert!(component.group_names.is_empty());
}

#[test]
fn compiler_when_wildcard_has_suffix_then_canonical_pattern_braces_it() {
    let component =
        compile_component("{*.}?example.com", "", ".", Encoding::Hostname, false)
            .expect("component");
    assert_eq!(component.regex.as_str(), r"^(?:(.*)\.)?example\.com$");
    assert_eq!(component.pattern, "{*.}?example.com");
    let names: Vec<&str> = component.group_names.iter().map(String::as_str).collect();
    assert_eq!(names, ["0"]);
}

#[test]
fn compiler_when_component_unconstrained_then_empty_input_matches() {
    for (input, separator) in [("*", ""), ("*", "/")] {
        let component =
            compile_component(input, "", separator, Encoding::Search, false).expect("component");
        assert!(component.regex.is_match(""));
    }
    let empty = compile_component("", "", "", Encoding::Port, false).expect("component");
    assert!(empty.regex.is_match(""));
    assert!(!empty.regex.is_match("80"));
}

#[test]
fn compiler_when_group_names_counted_then_matches_capture_count() {
    for input in ["/:a/:b/:c", "(x)(y)", "{:n}?", "*", "/fixed"] {
        let component =
            compile_component(input, "/", "/", Encoding::Pathname, false).expect("component");
        assert_eq!(
            component.regex.captures_len(),
            component.group_names.len() + 1,
            "{input}"
        );
    }
}

#[test]
fn encoder_when_applied_twice_then_idempotent() {
    let cases = [
        (Encoding::Username, "café"),
        (Encoding::Pathname, "/foo/./bar"),
        (Encoding::Pathname, "/a b"),
        (Encoding::Hostname, "café.com"),
        (Encoding::Port, "080"),
        (Encoding::Search, "q=café"),
        (Encoding::Hash, "frag ment"),
        (Encoding::OpaquePathname, "var x = 1;"),
        (Encoding::Protocol, "HTTP"),
    ];
    for (encoding, input) in cases {
        let once = encode(input, encoding).expect("first pass should encode");
        let twice = encode(&once, encoding).expect("second pass should encode");
        assert_eq!(once, twice, "{input}");
    }
}

#[test]
fn encoder_when_port_out_of_range_then_rejected() {
    encode("65536", Encoding::Port).expect_err("port above u16 range should fail");
    encode("80 ", Encoding::Port).expect_err("trailing space should fail");
    assert_eq!(encode("65535", Encoding::Port).expect("port"), "65535");
    assert_eq!(encode("080", Encoding::Port).expect("port"), "80");
}

#[test]
fn encoder_when_scheme_uppercase_then_lowercased() {
    assert_eq!(encode("HTTP", Encoding::Protocol).expect("scheme"), "http");
    encode("ht tp", Encoding::Protocol).expect_err("space in scheme should fail");
}

#[test]
fn encoder_when_path_has_dot_segments_then_collapsed_except_edges() {
    assert_eq!(
        encode("/foo/./bar", Encoding::Pathname).expect("path"),
        "/foo/bar"
    );
    assert_eq!(
        encode("/foo/bar/../baz", Encoding::Pathname).expect("path"),
        "/foo/baz"
    );
    assert_eq!(encode("./foo", Encoding::Pathname).expect("path"), "./foo");
    assert_eq!(encode("/foo/..", Encoding::Pathname).expect("path"), "/foo/..");
    assert_eq!(
        encode("/foo/.%2E/bar", Encoding::Pathname).expect("path"),
        "/bar"
    );
}

#[test]
fn encoder_when_hostname_percent_sequence_malformed_then_rejected() {
    encode("bad%hostname", Encoding::Hostname).expect_err("stray percent should fail");
    encode("bad%2ghost", Encoding::Hostname).expect_err("non-hex follower should fail");
}

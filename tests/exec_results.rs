use url_pattern::{
    ComponentKind, UrlPattern, UrlPatternInit, UrlPatternInput, UrlPatternOptions,
};

#[test]
fn exec_when_named_segments_match_then_groups_bound_in_order() {
    let pattern = UrlPattern::new("/:foo/:bar").expect("pattern");
    let result = pattern.exec("/test/route").expect("match");
    assert_eq!(
        result.pathname.groups.get("foo"),
        Some(&Some("test".to_string()))
    );
    assert_eq!(
        result.pathname.groups.get("bar"),
        Some(&Some("route".to_string()))
    );
    let names: Vec<&str> = result.pathname.groups.keys().map(String::as_str).collect();
    assert_eq!(names, ["foo", "bar"]);
    assert_eq!(result.pathname.input, "/test/route");
}

#[test]
fn exec_when_regex_constrains_segment_then_only_matching_inputs_pass() {
    let pattern = UrlPattern::new("/icon-:foo(\\d+).png").expect("pattern");
    assert!(pattern.test("/icon-123.png"));
    assert!(!pattern.test("/icon-abc.png"));
    let result = pattern.exec("/icon-123.png").expect("match");
    assert_eq!(
        result.pathname.groups.get("foo"),
        Some(&Some("123".to_string()))
    );
}

#[test]
fn exec_when_optional_group_absent_then_group_present_but_unbound() {
    let pattern = UrlPattern::new("/:foo/:bar?").expect("pattern");
    assert!(pattern.test("/test"));
    assert!(pattern.test("/test/route"));
    let result = pattern.exec("/test").expect("match");
    assert_eq!(
        result.pathname.groups.get("foo"),
        Some(&Some("test".to_string()))
    );
    assert_eq!(result.pathname.groups.get("bar"), Some(&None));
}

#[test]
fn exec_when_auto_numbered_groups_then_names_are_indices() {
    let pattern = UrlPattern::new("/(\\d+)/(\\w+)").expect("pattern");
    let result = pattern.exec("/42/foo").expect("match");
    assert_eq!(result.pathname.groups.get("0"), Some(&Some("42".to_string())));
    assert_eq!(
        result.pathname.groups.get("1"),
        Some(&Some("foo".to_string()))
    );
}

#[test]
fn exec_when_url_input_then_inputs_echoed() {
    let pattern = UrlPattern::new("https://example.com/:page").expect("pattern");
    let result = pattern.exec("https://example.com/about").expect("match");
    assert_eq!(
        result.inputs,
        vec![UrlPatternInput::Url("https://example.com/about".to_string())]
    );

    let result = pattern
        .exec_with_base("/about", "https://example.com")
        .expect("match");
    assert_eq!(
        result.inputs,
        vec![
            UrlPatternInput::Url("/about".to_string()),
            UrlPatternInput::Url("https://example.com".to_string()),
        ]
    );
}

#[test]
fn exec_when_init_input_then_init_echoed() {
    let init = UrlPatternInit {
        pathname: Some("/about".into()),
        ..Default::default()
    };
    let pattern = UrlPattern::from_init(&UrlPatternInit {
        pathname: Some("/:page".into()),
        ..Default::default()
    })
    .expect("pattern");
    let result = pattern.exec_init(&init).expect("match");
    assert_eq!(result.inputs, vec![UrlPatternInput::Init(init)]);
}

#[test]
fn test_and_exec_agree_on_every_outcome() {
    let pattern = UrlPattern::new("https://example.com/:page").expect("pattern");
    for input in [
        "https://example.com/about",
        "https://example.com/a/b",
        "http://example.com/about",
        "not|a|valid|url",
        "/about",
    ] {
        assert_eq!(pattern.test(input), pattern.exec(input).is_some(), "{input}");
    }
}

#[test]
fn exec_when_component_fails_then_whole_match_fails() {
    let pattern = UrlPattern::new("https://example.com/:page#frag").expect("pattern");
    assert!(pattern.exec("https://example.com/about#other").is_none());
    assert!(pattern.exec("https://example.com/about#frag").is_some());
}

#[test]
fn options_when_ignore_case_set_then_only_pathname_folds() {
    let options = UrlPatternOptions::default().with_ignore_case(true);
    assert!(options.ignore_case);
    let pattern = UrlPattern::with_options("https://example.com/FOO", None, options)
        .expect("pattern");
    assert!(pattern.test("https://example.com/foo"));
    assert!(pattern.test("https://example.com/FOO"));
    // Case folding stops at the pathname; the hostname stays exact.
    assert!(!pattern.test("https://EXAMPLE.com/foo"));

    let pattern = UrlPattern::new("https://example.com/FOO").expect("pattern");
    assert!(!pattern.test("https://example.com/foo"));
}

#[test]
fn hostname_case_when_ignore_case_unset_then_still_exact() {
    let pattern = UrlPattern::from_init(&UrlPatternInit {
        hostname: Some("EXAMPLE.com".into()),
        ..Default::default()
    });
    // IDNA lowercases the pattern, so the canonical input form matches.
    let pattern = pattern.expect("pattern");
    assert!(pattern.test_init(&UrlPatternInit {
        hostname: Some("example.com".into()),
        ..Default::default()
    }));
}

#[test]
fn patterns_when_same_canonical_form_then_equal() {
    let left = UrlPattern::new("https://example.com/:page").expect("pattern");
    let right = UrlPattern::new("https://example.com/:page").expect("pattern");
    assert_eq!(left, right);

    let other = UrlPattern::new("https://example.com/:slug").expect("pattern");
    assert_ne!(left, other);

    let case_insensitive = UrlPattern::with_options(
        "https://example.com/:page",
        None,
        UrlPatternOptions::default().with_ignore_case(true),
    )
    .expect("pattern");
    assert_ne!(left, case_insensitive);
}

#[test]
fn accessors_when_defaults_untouched_then_wildcards_reported() {
    let pattern = UrlPattern::from_init(&UrlPatternInit::default()).expect("pattern");
    assert_eq!(pattern.protocol(), "*");
    assert_eq!(pattern.username(), "*");
    assert_eq!(pattern.password(), "*");
    assert_eq!(pattern.hostname(), "*");
    assert_eq!(pattern.port(), "*");
    assert_eq!(pattern.pathname(), "*");
    assert_eq!(pattern.search(), "*");
    assert_eq!(pattern.hash(), "*");
    assert_eq!(pattern.component_pattern(ComponentKind::Pathname), Some("*"));
    assert_eq!(pattern.component_pattern(ComponentKind::BaseUrl), None);
}

#[test]
fn init_when_built_by_component_kind_then_same_as_field_access() {
    let mut by_kind = UrlPatternInit::default();
    by_kind.set_component(ComponentKind::Hostname, "example.com");
    by_kind.set_component(ComponentKind::Pathname, "/:page");
    let by_field = UrlPatternInit {
        hostname: Some("example.com".into()),
        pathname: Some("/:page".into()),
        ..Default::default()
    };
    assert_eq!(by_kind, by_field);
    let pattern = UrlPattern::from_init(&by_kind).expect("pattern");
    assert!(pattern.test("https://example.com/about"));
}

#[test]
fn errors_when_construction_fails_then_message_names_input_and_index() {
    let err = UrlPattern::from_init(&UrlPatternInit {
        protocol: Some("(café)".into()),
        ..Default::default()
    })
    .expect_err("non-ascii regex group should be rejected");
    assert_eq!(format!("{err}"), "illegal pattern near index 0: (café)");
    assert_eq!(err.index(), 0);
    assert_eq!(err.input(), "(café)");
    assert_eq!(err.kind().to_string(), "Tokenizer");
}

#[test]
fn component_kinds_when_displayed_then_use_canonical_names() {
    assert_eq!(ComponentKind::Protocol.to_string(), "protocol");
    assert_eq!(ComponentKind::Pathname.to_string(), "pathname");
    assert_eq!(ComponentKind::BaseUrl.to_string(), "baseURL");
}

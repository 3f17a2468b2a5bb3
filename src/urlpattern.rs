use crate::encoding::Encoding;
use crate::enums::{ComponentKind, SPECIAL_SCHEMES, default_port};
use crate::errors::PatternResult;
use crate::init::{ComponentMap, UrlPatternInit, process_init};
use crate::matcher::{UrlPatternInput, UrlPatternResult, match_component};
use crate::options::UrlPatternOptions;
use crate::pattern::{Component, compile_component};
use crate::resolver::parse_url_input;
use crate::shape::split_pattern_string;

/// A compiled URL pattern: eight per-component matchers built once,
/// queried many times. Immutable and safe to share across threads.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    protocol: Component,
    username: Component,
    password: Component,
    hostname: Component,
    port: Component,
    pathname: Component,
    search: Component,
    hash: Component,
    options: UrlPatternOptions,
}

impl UrlPattern {
    /// Builds a pattern from a URL-shaped pattern string.
    pub fn new(pattern: &str) -> PatternResult<Self> {
        Self::with_options(pattern, None, UrlPatternOptions::default())
    }

    /// Builds a pattern from a pattern string resolved against a base URL.
    pub fn with_base(pattern: &str, base_url: &str) -> PatternResult<Self> {
        Self::with_options(pattern, Some(base_url), UrlPatternOptions::default())
    }

    pub fn with_options(
        pattern: &str,
        base_url: Option<&str>,
        options: UrlPatternOptions,
    ) -> PatternResult<Self> {
        let mut map = split_pattern_string(pattern, options.ignore_case)?;
        if let Some(base_url) = base_url {
            map.set(ComponentKind::BaseUrl, base_url);
        }
        Self::from_processed(process_init(&map, false)?, options)
    }

    /// Builds a pattern from per-component sub-patterns.
    pub fn from_init(init: &UrlPatternInit) -> PatternResult<Self> {
        Self::from_init_with_options(init, UrlPatternOptions::default())
    }

    pub fn from_init_with_options(
        init: &UrlPatternInit,
        options: UrlPatternOptions,
    ) -> PatternResult<Self> {
        Self::from_processed(process_init(&init.to_component_map(), false)?, options)
    }

    fn from_processed(
        mut processed: ComponentMap,
        options: UrlPatternOptions,
    ) -> PatternResult<Self> {
        let protocol_pattern = processed.get_or(ComponentKind::Protocol, "*").to_string();
        if let Some(default) = default_port(&protocol_pattern) {
            if processed.get(ComponentKind::Port) == Some(default) {
                processed.set(ComponentKind::Port, "");
            }
        }
        let protocol = compile_component(&protocol_pattern, "", "", Encoding::Protocol, false)?;
        let username = compile_component(
            processed.get_or(ComponentKind::Username, "*"),
            "",
            "",
            Encoding::Username,
            false,
        )?;
        let password = compile_component(
            processed.get_or(ComponentKind::Password, "*"),
            "",
            "",
            Encoding::Password,
            false,
        )?;
        let hostname_pattern = processed.get_or(ComponentKind::Hostname, "*");
        let hostname_encoding = if hostname_pattern.starts_with('[')
            || hostname_pattern.starts_with("\\[")
            || hostname_pattern.starts_with("{[")
        {
            Encoding::Ipv6Hostname
        } else {
            Encoding::Hostname
        };
        let hostname = compile_component(hostname_pattern, "", ".", hostname_encoding, false)?;
        let port = compile_component(
            processed.get_or(ComponentKind::Port, "*"),
            "",
            "",
            Encoding::Port,
            false,
        )?;
        let is_special_scheme = SPECIAL_SCHEMES
            .iter()
            .any(|(scheme, _)| protocol.regex.is_match(scheme));
        let pathname_pattern = processed.get_or(ComponentKind::Pathname, "*");
        let pathname = if is_special_scheme {
            compile_component(
                pathname_pattern,
                "/",
                "/",
                Encoding::Pathname,
                options.ignore_case,
            )?
        } else {
            compile_component(
                pathname_pattern,
                "",
                "",
                Encoding::OpaquePathname,
                options.ignore_case,
            )?
        };
        let search = compile_component(
            processed.get_or(ComponentKind::Search, "*"),
            "",
            "",
            Encoding::Search,
            false,
        )?;
        let hash = compile_component(
            processed.get_or(ComponentKind::Hash, "*"),
            "",
            "",
            Encoding::Hash,
            false,
        )?;
        Ok(Self {
            protocol,
            username,
            password,
            hostname,
            port,
            pathname,
            search,
            hash,
            options,
        })
    }

    pub fn protocol(&self) -> &str {
        &self.protocol.pattern
    }

    pub fn username(&self) -> &str {
        &self.username.pattern
    }

    pub fn password(&self) -> &str {
        &self.password.pattern
    }

    pub fn hostname(&self) -> &str {
        &self.hostname.pattern
    }

    pub fn port(&self) -> &str {
        &self.port.pattern
    }

    pub fn pathname(&self) -> &str {
        &self.pathname.pattern
    }

    pub fn search(&self) -> &str {
        &self.search.pattern
    }

    pub fn hash(&self) -> &str {
        &self.hash.pattern
    }

    pub fn options(&self) -> UrlPatternOptions {
        self.options
    }

    /// Canonical pattern string for one component; `None` for
    /// [`ComponentKind::BaseUrl`], which is never compiled.
    pub fn component_pattern(&self, kind: ComponentKind) -> Option<&str> {
        match kind {
            ComponentKind::Protocol => Some(&self.protocol.pattern),
            ComponentKind::Username => Some(&self.username.pattern),
            ComponentKind::Password => Some(&self.password.pattern),
            ComponentKind::Hostname => Some(&self.hostname.pattern),
            ComponentKind::Port => Some(&self.port.pattern),
            ComponentKind::Pathname => Some(&self.pathname.pattern),
            ComponentKind::Search => Some(&self.search.pattern),
            ComponentKind::Hash => Some(&self.hash.pattern),
            ComponentKind::BaseUrl => None,
        }
    }

    /// Matches a URL string, returning the per-component capture results.
    /// Unparseable input yields `None`, never an error.
    #[tracing::instrument(level = "trace", skip(self), fields(input = %input))]
    pub fn exec(&self, input: &str) -> Option<UrlPatternResult> {
        let components = parse_url_input(input, "").ok()?;
        self.run_match(&components, vec![UrlPatternInput::Url(input.to_string())])
    }

    /// Matches a URL string resolved against a base URL.
    pub fn exec_with_base(&self, input: &str, base_url: &str) -> Option<UrlPatternResult> {
        let components = parse_url_input(input, base_url).ok()?;
        self.run_match(
            &components,
            vec![
                UrlPatternInput::Url(input.to_string()),
                UrlPatternInput::Url(base_url.to_string()),
            ],
        )
    }

    /// Matches a component map. Entries are canonicalized the same way URL
    /// inputs are; canonicalization failures yield `None`.
    pub fn exec_init(&self, init: &UrlPatternInit) -> Option<UrlPatternResult> {
        let components = process_init(&init.to_component_map(), true).ok()?;
        self.run_match(&components, vec![UrlPatternInput::Init(init.clone())])
    }

    pub fn test(&self, input: &str) -> bool {
        self.exec(input).is_some()
    }

    pub fn test_with_base(&self, input: &str, base_url: &str) -> bool {
        self.exec_with_base(input, base_url).is_some()
    }

    pub fn test_init(&self, init: &UrlPatternInit) -> bool {
        self.exec_init(init).is_some()
    }

    // Components are examined in a fixed order; the first failure ends the
    // whole match.
    fn run_match(
        &self,
        components: &ComponentMap,
        inputs: Vec<UrlPatternInput>,
    ) -> Option<UrlPatternResult> {
        let protocol =
            match_component(&self.protocol, components.get_or(ComponentKind::Protocol, ""))?;
        let username =
            match_component(&self.username, components.get_or(ComponentKind::Username, ""))?;
        let password =
            match_component(&self.password, components.get_or(ComponentKind::Password, ""))?;
        let hostname =
            match_component(&self.hostname, components.get_or(ComponentKind::Hostname, ""))?;
        let port = match_component(&self.port, components.get_or(ComponentKind::Port, ""))?;
        let pathname =
            match_component(&self.pathname, components.get_or(ComponentKind::Pathname, ""))?;
        let search = match_component(&self.search, components.get_or(ComponentKind::Search, ""))?;
        let hash = match_component(&self.hash, components.get_or(ComponentKind::Hash, ""))?;
        Some(UrlPatternResult {
            inputs,
            protocol,
            username,
            password,
            hostname,
            port,
            pathname,
            search,
            hash,
        })
    }
}

impl PartialEq for UrlPattern {
    fn eq(&self, other: &Self) -> bool {
        self.options == other.options
            && self.protocol.pattern == other.protocol.pattern
            && self.username.pattern == other.username.pattern
            && self.password.pattern == other.password.pattern
            && self.hostname.pattern == other.hostname.pattern
            && self.port.pattern == other.port.pattern
            && self.pathname.pattern == other.pathname.pattern
            && self.search.pattern == other.search.pattern
            && self.hash.pattern == other.hash.pattern
    }
}

impl Eq for UrlPattern {}

use crate::encoding::{Encoding, encode};
use crate::enums::{ComponentKind, URL_COMPONENTS, default_port};
use crate::errors::{PatternError, PatternErrorKind, PatternResult};
use crate::pattern::escape_pattern_text;
use crate::resolver::parse_url_input;

/// Sparse component → string map, shared between pattern construction and
/// map-form matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ComponentMap {
    slots: [Option<String>; 9],
}

impl ComponentMap {
    pub(crate) fn get(&self, kind: ComponentKind) -> Option<&str> {
        self.slots[kind as usize].as_deref()
    }

    pub(crate) fn get_or<'a>(&'a self, kind: ComponentKind, default: &'a str) -> &'a str {
        self.get(kind).unwrap_or(default)
    }

    pub(crate) fn set(&mut self, kind: ComponentKind, value: impl Into<String>) {
        self.slots[kind as usize] = Some(value.into());
    }
}

/// Sparse set of component sub-patterns (or, when matched against, concrete
/// component values), optionally anchored to a base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UrlPatternInit {
    pub protocol: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<String>,
    pub pathname: Option<String>,
    pub search: Option<String>,
    pub hash: Option<String>,
    pub base_url: Option<String>,
}

impl UrlPatternInit {
    /// Map-style entry point: assigns one component's sub-pattern by kind.
    pub fn set_component(&mut self, kind: ComponentKind, value: impl Into<String>) {
        let value = Some(value.into());
        match kind {
            ComponentKind::Protocol => self.protocol = value,
            ComponentKind::Username => self.username = value,
            ComponentKind::Password => self.password = value,
            ComponentKind::Hostname => self.hostname = value,
            ComponentKind::Port => self.port = value,
            ComponentKind::Pathname => self.pathname = value,
            ComponentKind::Search => self.search = value,
            ComponentKind::Hash => self.hash = value,
            ComponentKind::BaseUrl => self.base_url = value,
        }
    }

    pub(crate) fn to_component_map(&self) -> ComponentMap {
        let mut map = ComponentMap::default();
        let fields = [
            (ComponentKind::Protocol, &self.protocol),
            (ComponentKind::Username, &self.username),
            (ComponentKind::Password, &self.password),
            (ComponentKind::Hostname, &self.hostname),
            (ComponentKind::Port, &self.port),
            (ComponentKind::Pathname, &self.pathname),
            (ComponentKind::Search, &self.search),
            (ComponentKind::Hash, &self.hash),
            (ComponentKind::BaseUrl, &self.base_url),
        ];
        for (kind, value) in fields {
            if let Some(value) = value {
                map.set(kind, value.as_str());
            }
        }
        map
    }
}

/// Normalizes an init map into the per-component strings the compiler (or
/// the matcher) consumes.
///
/// With `is_url` the entries are concrete URL components: they are
/// canonicalized, and base-URL-derived values have pattern metacharacters
/// escaped. Without it they are pattern strings and pass through untouched.
pub(crate) fn process_init(input: &ComponentMap, is_url: bool) -> PatternResult<ComponentMap> {
    let mut result = ComponentMap::default();
    if is_url {
        for kind in URL_COMPONENTS {
            result.set(kind, "");
        }
    }

    let mut base_dir_path = String::new();
    if let Some(base_url) = input.get(ComponentKind::BaseUrl) {
        let base = parse_url_input(base_url, "")?;
        if base.get(ComponentKind::Protocol).is_none() {
            return Err(PatternError::new(PatternErrorKind::Resolver, base_url, 0));
        }
        let base_protocol = base.get_or(ComponentKind::Protocol, "");
        let base_pathname = base.get_or(ComponentKind::Pathname, "");
        // A hierarchical base contributes its directory as the prefix for
        // relative pathname entries.
        if default_port(base_protocol).is_some() || base_pathname.starts_with('/') {
            if let Some(last_slash) = base_pathname.rfind('/') {
                base_dir_path = base_pathname[..=last_slash].to_string();
            }
        }
        for kind in URL_COMPONENTS {
            let value = base.get_or(kind, "");
            if is_url {
                result.set(kind, escape_pattern_text(value));
            } else {
                result.set(kind, value);
            }
        }
    }

    if let Some(protocol) = input.get(ComponentKind::Protocol) {
        let protocol = protocol.strip_suffix(':').unwrap_or(protocol);
        if is_url {
            result.set(ComponentKind::Protocol, encode(protocol, Encoding::Protocol)?);
        } else {
            result.set(ComponentKind::Protocol, protocol);
        }
    }
    if let Some(username) = input.get(ComponentKind::Username) {
        if is_url {
            result.set(ComponentKind::Username, encode(username, Encoding::Username)?);
        } else {
            result.set(ComponentKind::Username, username);
        }
    }
    if let Some(password) = input.get(ComponentKind::Password) {
        if is_url {
            result.set(ComponentKind::Password, encode(password, Encoding::Password)?);
        } else {
            result.set(ComponentKind::Password, password);
        }
    }
    if let Some(hostname) = input.get(ComponentKind::Hostname) {
        if is_url {
            result.set(ComponentKind::Hostname, encode(hostname, Encoding::Hostname)?);
        } else {
            result.set(ComponentKind::Hostname, hostname);
        }
    }

    let protocol_port: Option<&'static str> = result
        .get(ComponentKind::Protocol)
        .and_then(default_port);
    if let Some(port) = input.get(ComponentKind::Port) {
        let port = if protocol_port == Some(port) { "" } else { port };
        if is_url {
            result.set(ComponentKind::Port, encode(port, Encoding::Port)?);
        } else {
            result.set(ComponentKind::Port, port);
        }
    }

    if let Some(pathname) = input.get(ComponentKind::Pathname) {
        let mut absolute = pathname.starts_with('/');
        if !is_url {
            absolute = absolute || pathname.starts_with("\\/") || pathname.starts_with("{/");
        }
        let mut pathname = pathname.to_string();
        if !absolute {
            pathname = format!("{base_dir_path}{pathname}");
        }
        if is_url {
            let encoding = if result.get_or(ComponentKind::Protocol, "").is_empty()
                || protocol_port.is_some()
            {
                Encoding::Pathname
            } else {
                Encoding::OpaquePathname
            };
            pathname = encode(&pathname, encoding)?;
        }
        result.set(ComponentKind::Pathname, pathname);
    }

    if let Some(search) = input.get(ComponentKind::Search) {
        let search = search.strip_prefix('?').unwrap_or(search);
        if is_url {
            result.set(ComponentKind::Search, encode(search, Encoding::Search)?);
        } else {
            result.set(ComponentKind::Search, search);
        }
    }
    if let Some(hash) = input.get(ComponentKind::Hash) {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        if is_url {
            result.set(ComponentKind::Hash, encode(hash, Encoding::Hash)?);
        } else {
            result.set(ComponentKind::Hash, hash);
        }
    }
    Ok(result)
}

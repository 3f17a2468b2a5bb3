use iri_string::format::ToDedicatedString;
use iri_string::types::{UriReferenceStr, UriString};
use memchr::memchr;

use crate::enums::{ComponentKind, default_port};
use crate::errors::{PatternError, PatternErrorKind, PatternResult};
use crate::init::ComponentMap;

/// Decomposes an input URL string, optionally resolved against a base URL,
/// into the eight-component map. The base may be empty, in which case the
/// input's own components are used as-is.
#[tracing::instrument(level = "trace", fields(input = %input, base = %base_url))]
pub(crate) fn parse_url_input(input: &str, base_url: &str) -> PatternResult<ComponentMap> {
    let base = UriReferenceStr::new(base_url)
        .map_err(|_| PatternError::new(PatternErrorKind::Resolver, base_url, 0))?;
    let reference = UriReferenceStr::new(input)
        .map_err(|_| PatternError::new(PatternErrorKind::Resolver, input, 0))?;

    let resolved_buf: UriString;
    let resolved: &UriReferenceStr = match base.to_iri() {
        Ok(base_iri) => {
            // RFC 3986 resolution ignores the base fragment.
            let (base_absolute, _) = base_iri.to_absolute_and_fragment();
            resolved_buf = reference.resolve_against(base_absolute).to_dedicated_string();
            resolved_buf.as_ref()
        }
        Err(_) => reference,
    };

    let mut result = ComponentMap::default();
    let scheme = resolved.scheme_str();
    if let Some(scheme) = scheme {
        result.set(ComponentKind::Protocol, scheme);
    }
    let authority = resolved.authority_str();
    if authority.is_some() {
        result.set(ComponentKind::Username, "");
        result.set(ComponentKind::Password, "");
    }
    if let Some(components) = resolved.authority_components() {
        if let Some(userinfo) = components.userinfo() {
            match userinfo.split_once(':') {
                Some((username, password)) => {
                    result.set(ComponentKind::Username, username);
                    result.set(ComponentKind::Password, password);
                }
                None => result.set(ComponentKind::Username, userinfo),
            }
        }
        result.set(ComponentKind::Hostname, components.host());
        if let Some(port) = components.port() {
            let is_default = scheme.is_some_and(|s| default_port(s) == Some(port));
            if !port.is_empty() && !is_default {
                result.set(ComponentKind::Port, port);
            }
        }
    }

    let path = resolved.path_str();
    let query = resolved.query_str();
    let fragment = resolved.fragment().map(|f| f.as_str());
    if scheme.is_some() && authority.is_none() && !path.starts_with('/') {
        split_opaque_part(path, query, fragment, &mut result);
    } else {
        let pathname = if authority.is_some() && path.is_empty() {
            "/"
        } else {
            path
        };
        result.set(ComponentKind::Pathname, pathname);
        if let Some(query) = query {
            result.set(ComponentKind::Search, query);
        }
        if let Some(fragment) = fragment {
            result.set(ComponentKind::Hash, fragment);
        }
    }
    Ok(result)
}

// An opaque scheme-specific part is split positionally on its first `?` and
// first `#`, covering the three interleavings.
fn split_opaque_part(
    path: &str,
    query: Option<&str>,
    fragment: Option<&str>,
    result: &mut ComponentMap,
) {
    let mut part = String::from(path);
    if let Some(query) = query {
        part.push('?');
        part.push_str(query);
    }
    if let Some(fragment) = fragment {
        part.push('#');
        part.push_str(fragment);
    }
    let question = memchr(b'?', part.as_bytes());
    let pound = memchr(b'#', part.as_bytes());
    match (question, pound) {
        (Some(q), Some(h)) if q < h => {
            result.set(ComponentKind::Pathname, &part[..q]);
            result.set(ComponentKind::Search, &part[q + 1..h]);
            result.set(ComponentKind::Hash, &part[h + 1..]);
        }
        (_, Some(h)) => {
            result.set(ComponentKind::Pathname, &part[..h]);
            result.set(ComponentKind::Hash, &part[h + 1..]);
        }
        (Some(q), None) => {
            result.set(ComponentKind::Pathname, &part[..q]);
            result.set(ComponentKind::Search, &part[q + 1..]);
        }
        (None, None) => result.set(ComponentKind::Pathname, part.as_str()),
    }
}

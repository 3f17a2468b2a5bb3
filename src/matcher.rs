use indexmap::IndexMap;

use crate::init::UrlPatternInit;
use crate::pattern::Component;

/// Echo of one caller-supplied input, as passed to `exec`/`test`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPatternInput {
    Url(String),
    Init(UrlPatternInit),
}

/// Match outcome for one component: the concrete input string and the
/// captured groups in declaration order. A group that did not participate
/// in the match is present with a `None` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentResult {
    pub input: String,
    pub groups: IndexMap<String, Option<String>>,
}

/// Result of a successful `exec`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPatternResult {
    pub inputs: Vec<UrlPatternInput>,
    pub protocol: ComponentResult,
    pub username: ComponentResult,
    pub password: ComponentResult,
    pub hostname: ComponentResult,
    pub port: ComponentResult,
    pub pathname: ComponentResult,
    pub search: ComponentResult,
    pub hash: ComponentResult,
}

/// Runs one compiled component against its input. The component regex is
/// anchored, so any match consumes the whole string.
pub(crate) fn match_component(component: &Component, input: &str) -> Option<ComponentResult> {
    let captures = component.regex.captures(input)?;
    let mut groups = IndexMap::with_capacity(component.group_names.len());
    for (index, name) in component.group_names.iter().enumerate() {
        groups.insert(
            name.clone(),
            captures.get(index + 1).map(|m| m.as_str().to_string()),
        );
    }
    Some(ComponentResult {
        input: input.to_string(),
        groups,
    })
}

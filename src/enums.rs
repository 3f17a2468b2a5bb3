use std::fmt;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ComponentKind {
    Protocol = 0,
    Username,
    Password,
    Hostname,
    Port,
    Pathname,
    Search,
    Hash,
    /// Input key only; never compiled into a component of its own.
    BaseUrl,
}

impl ComponentKind {
    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Protocol => "protocol",
            ComponentKind::Username => "username",
            ComponentKind::Password => "password",
            ComponentKind::Hostname => "hostname",
            ComponentKind::Port => "port",
            ComponentKind::Pathname => "pathname",
            ComponentKind::Search => "search",
            ComponentKind::Hash => "hash",
            ComponentKind::BaseUrl => "baseURL",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The eight matchable components, in match order.
pub(crate) const URL_COMPONENTS: [ComponentKind; 8] = [
    ComponentKind::Protocol,
    ComponentKind::Username,
    ComponentKind::Password,
    ComponentKind::Hostname,
    ComponentKind::Port,
    ComponentKind::Pathname,
    ComponentKind::Search,
    ComponentKind::Hash,
];

/// Schemes that select segmented-path compilation and default-port
/// suppression, with their default ports.
pub(crate) const SPECIAL_SCHEMES: [(&str, &str); 6] = [
    ("file", ""),
    ("ftp", "21"),
    ("http", "80"),
    ("ws", "80"),
    ("https", "443"),
    ("wss", "443"),
];

pub(crate) fn default_port(scheme: &str) -> Option<&'static str> {
    SPECIAL_SCHEMES
        .iter()
        .find(|(name, _)| *name == scheme)
        .map(|(_, port)| *port)
}

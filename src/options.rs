/// Configuration accepted at pattern construction.
///
/// `ignore_case` affects only how the pathname component is compiled; every
/// other component always matches case-sensitively.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct UrlPatternOptions {
    pub ignore_case: bool,
}

impl UrlPatternOptions {
    pub fn with_ignore_case(self, ignore_case: bool) -> Self {
        Self { ignore_case }
    }
}

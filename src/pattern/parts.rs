#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// Fixed text, already canonicalized for its component.
    Text,
    /// A named or auto-numbered group with an explicit regex body.
    Pattern,
    /// A named group matching one "segment" (everything up to the
    /// component's separator).
    Segment,
    /// A full wildcard (`*` or `(.*)`).
    Asterisk,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Modifier {
    #[default]
    None,
    Optional,
    Plus,
    Star,
}

impl Modifier {
    pub fn as_char(self) -> Option<char> {
        match self {
            Modifier::None => None,
            Modifier::Optional => Some('?'),
            Modifier::Plus => Some('+'),
            Modifier::Star => Some('*'),
        }
    }
}

/// One structural element of a parsed component sub-pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub kind: PartKind,
    pub modifier: Modifier,
    /// Group name; empty for text parts, a decimal index for auto-named
    /// groups.
    pub name: String,
    /// Text for `Text` parts, the raw regex body for `Pattern` parts.
    pub value: String,
    pub prefix: String,
    pub suffix: String,
    pub custom_name: bool,
    pub empty_prefix_suffix: bool,
}

impl Part {
    pub(crate) fn text(value: String, modifier: Modifier) -> Self {
        Self {
            kind: PartKind::Text,
            modifier,
            name: String::new(),
            value,
            prefix: String::new(),
            suffix: String::new(),
            custom_name: false,
            empty_prefix_suffix: true,
        }
    }
}

use crate::encoding::Encoding;
use crate::enums::{ComponentKind, SPECIAL_SCHEMES};
use crate::errors::PatternResult;
use crate::init::ComponentMap;
use crate::pattern::{Token, TokenKind, TokenizerMode, compile_component, tokenize};

/// Splits a URL-shaped pattern string into per-component sub-patterns.
///
/// Runs a state machine over leniently-tokenized input; tokens inside
/// `{...}` groups and `(...)` regex groups never drive transitions. A
/// pattern with no top-level `:` is a relative pattern (pathname, search, or
/// hash per its first character); components the machine never touches are
/// left unset and default to `*` downstream.
#[tracing::instrument(level = "trace", fields(input = %input))]
pub(crate) fn split_pattern_string(input: &str, ignore_case: bool) -> PatternResult<ComponentMap> {
    let tokens = tokenize(input, TokenizerMode::Lenient)?;
    let parser = ShapeParser {
        input,
        ignore_case,
        tokens,
        cursor: 0,
        token_index: 0,
        component_start_cursor: 0,
        component_start_token: 0,
        advance: false,
        group_depth: 0,
        ipv6_depth: 0,
        state: ShapeState::Init,
        result: ComponentMap::default(),
    };
    parser.parse()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeState {
    Init,
    Authority,
    Protocol,
    Username,
    Password,
    Hostname,
    Port,
    Pathname,
    Search,
    Hash,
}

impl ShapeState {
    fn component(self) -> ComponentKind {
        match self {
            ShapeState::Protocol => ComponentKind::Protocol,
            ShapeState::Username => ComponentKind::Username,
            ShapeState::Password => ComponentKind::Password,
            ShapeState::Hostname => ComponentKind::Hostname,
            ShapeState::Port => ComponentKind::Port,
            ShapeState::Pathname => ComponentKind::Pathname,
            ShapeState::Search => ComponentKind::Search,
            ShapeState::Hash => ComponentKind::Hash,
            ShapeState::Init | ShapeState::Authority => unreachable!(),
        }
    }
}

struct ShapeParser<'a> {
    input: &'a str,
    ignore_case: bool,
    tokens: Vec<Token>,
    cursor: usize,
    token_index: usize,
    component_start_cursor: usize,
    component_start_token: usize,
    advance: bool,
    group_depth: usize,
    ipv6_depth: i32,
    state: ShapeState,
    result: ComponentMap,
}

impl<'a> ShapeParser<'a> {
    fn parse(mut self) -> PatternResult<ComponentMap> {
        loop {
            let kind = self.tokens[self.token_index].kind;
            let at_end = kind == TokenKind::End;
            self.advance = true;
            if at_end && self.state == ShapeState::Init {
                self.rewind();
                if self.is_single_char("?") || self.is_another_search() {
                    self.collect(1);
                    self.state = ShapeState::Search;
                    self.result.set(ComponentKind::Hash, "");
                } else if self.is_single_char("#") {
                    self.collect(1);
                    self.state = ShapeState::Hash;
                } else {
                    self.collect(0);
                    self.state = ShapeState::Pathname;
                    self.result.set(ComponentKind::Search, "");
                    self.result.set(ComponentKind::Hash, "");
                }
                self.step();
                continue;
            }
            if at_end && self.state == ShapeState::Authority {
                self.rewind();
                self.state = ShapeState::Hostname;
                self.step();
                continue;
            }
            if at_end {
                let value = self.collect(0);
                self.result.set(self.state.component(), value);
                return Ok(self.result);
            }
            if kind == TokenKind::Open {
                self.group_depth += 1;
                self.step();
                continue;
            }
            if self.group_depth > 0 && kind != TokenKind::Close {
                self.step();
                continue;
            }
            if self.group_depth > 0 {
                self.group_depth -= 1;
            }
            match self.state {
                ShapeState::Init => {
                    if self.is_single_char(":") {
                        self.result.set(ComponentKind::Hash, "");
                        self.result.set(ComponentKind::Search, "");
                        self.result.set(ComponentKind::Pathname, "");
                        self.result.set(ComponentKind::Port, "");
                        self.result.set(ComponentKind::Hostname, "");
                        self.result.set(ComponentKind::Password, "");
                        self.result.set(ComponentKind::Username, "");
                        self.rewind();
                        self.state = ShapeState::Protocol;
                    }
                }
                ShapeState::Authority => {
                    if self.is_single_char("@") {
                        self.rewind();
                        self.state = ShapeState::Username;
                    } else if self.is_single_char("/?#") || self.is_another_search() {
                        self.rewind();
                        self.state = ShapeState::Hostname;
                    }
                }
                ShapeState::Protocol => {
                    if self.is_single_char(":") {
                        self.leave_protocol()?;
                    }
                }
                ShapeState::Username => {
                    if self.is_single_char(":") {
                        let value = self.collect(1);
                        self.result.set(ComponentKind::Username, value);
                        self.state = ShapeState::Password;
                    } else if self.is_single_char("@") {
                        let value = self.collect(1);
                        self.result.set(ComponentKind::Username, value);
                        self.state = ShapeState::Hostname;
                    }
                }
                ShapeState::Password => {
                    if self.is_single_char("@") {
                        let value = self.collect(1);
                        self.result.set(ComponentKind::Password, value);
                        self.state = ShapeState::Hostname;
                    }
                }
                ShapeState::Hostname => {
                    if self.is_single_char("[") {
                        self.ipv6_depth += 1;
                    } else if self.is_single_char("]") {
                        self.ipv6_depth -= 1;
                    } else if self.is_single_char(":") && self.ipv6_depth == 0 {
                        let value = self.collect(1);
                        self.result.set(ComponentKind::Hostname, value);
                        self.state = ShapeState::Port;
                    } else if self.is_single_char("/") {
                        let value = self.collect(0);
                        self.result.set(ComponentKind::Hostname, value);
                        self.state = ShapeState::Pathname;
                    } else if self.is_single_char("?") || self.is_another_search() {
                        let value = self.collect(1);
                        self.result.set(ComponentKind::Hostname, value);
                        self.state = ShapeState::Search;
                    } else if self.is_single_char("#") {
                        let value = self.collect(1);
                        self.result.set(ComponentKind::Hostname, value);
                        self.state = ShapeState::Hash;
                    }
                }
                ShapeState::Port => {
                    if self.is_single_char("/") {
                        let value = self.collect(0);
                        self.result.set(ComponentKind::Port, value);
                        self.state = ShapeState::Pathname;
                    } else if self.is_single_char("?") || self.is_another_search() {
                        let value = self.collect(1);
                        self.result.set(ComponentKind::Port, value);
                        self.state = ShapeState::Search;
                    } else if self.is_single_char("#") {
                        let value = self.collect(1);
                        self.result.set(ComponentKind::Port, value);
                        self.state = ShapeState::Hash;
                    }
                }
                ShapeState::Pathname => {
                    if self.is_single_char("?") || self.is_another_search() {
                        let value = self.collect(1);
                        self.result.set(ComponentKind::Pathname, value);
                        self.state = ShapeState::Search;
                    } else if self.is_single_char("#") {
                        let value = self.collect(1);
                        self.result.set(ComponentKind::Pathname, value);
                        self.state = ShapeState::Hash;
                    }
                }
                ShapeState::Search => {
                    if self.is_single_char("#") {
                        let value = self.collect(1);
                        self.result.set(ComponentKind::Search, value);
                        self.state = ShapeState::Hash;
                    }
                }
                ShapeState::Hash => {}
            }
            self.step();
        }
    }

    // The protocol sub-pattern decides where the machine goes next: `://`
    // or a possibly-special scheme leads into the authority, anything else
    // straight into an opaque pathname.
    fn leave_protocol(&mut self) -> PatternResult<()> {
        let protocol = self.collect(0);
        let compiled = compile_component(
            if protocol.is_empty() {
                "*"
            } else {
                protocol.as_str()
            },
            "",
            "",
            Encoding::Protocol,
            self.ignore_case,
        )?;
        let may_be_special = SPECIAL_SCHEMES
            .iter()
            .any(|(scheme, _)| compiled.regex.is_match(scheme));
        let double_slashes = self.followed_by_double_slashes();
        self.result.set(ComponentKind::Protocol, protocol);
        if may_be_special {
            self.result.set(ComponentKind::Pathname, "/");
        }
        self.collect(if double_slashes { 3 } else { 1 });
        self.state = if !double_slashes && !may_be_special {
            ShapeState::Pathname
        } else {
            ShapeState::Authority
        };
        Ok(())
    }

    fn step(&mut self) {
        if self.advance {
            self.cursor += self.tokens[self.token_index].span;
            self.token_index += 1;
        }
    }

    fn rewind(&mut self) {
        self.advance = false;
        self.cursor = self.component_start_cursor;
        self.token_index = self.component_start_token;
    }

    /// Returns the text accumulated since the component start, then skips
    /// `skip` tokens and re-bases the component start there.
    fn collect(&mut self, skip: usize) -> String {
        let value = self.input[self.component_start_cursor..self.cursor].to_string();
        for _ in 0..skip {
            self.cursor += self.tokens[self.token_index].span;
            self.token_index += 1;
        }
        self.advance = false;
        self.component_start_cursor = self.cursor;
        self.component_start_token = self.token_index;
        value
    }

    /// Does the current token boil down to one ASCII character in `choices`?
    /// Covers plain and invalid single-byte tokens plus ASCII escapes.
    fn is_single_char(&self, choices: &str) -> bool {
        let token = self.tokens[self.token_index];
        let bytes = self.input.as_bytes();
        let b = match (token.kind, token.span) {
            (TokenKind::Char, 1) | (TokenKind::InvalidChar, 1) => bytes[self.cursor],
            (TokenKind::EscapedChar, 2) => bytes[self.cursor + 1],
            _ => return false,
        };
        choices.as_bytes().contains(&b)
    }

    // A bare `?` introduces the search component unless it reads as the
    // modifier of the token before it.
    fn is_another_search(&self) -> bool {
        let token = self.tokens[self.token_index];
        if token.kind != TokenKind::OtherModifier
            || token.span != 1
            || self.input.as_bytes()[self.cursor] != b'?'
        {
            return false;
        }
        let prev = if self.token_index > 0 {
            self.tokens[self.token_index - 1].kind
        } else {
            TokenKind::End
        };
        !matches!(
            prev,
            TokenKind::Name | TokenKind::Pattern | TokenKind::Close | TokenKind::Asterisk
        )
    }

    fn followed_by_double_slashes(&self) -> bool {
        let bytes = self.input.as_bytes();
        let first = self.tokens[self.token_index + 1];
        let first_cursor = self.cursor + self.tokens[self.token_index].span;
        let first_is_slash = match (first.kind, first.span) {
            (TokenKind::Char, 1) | (TokenKind::InvalidChar, 1) => bytes[first_cursor] == b'/',
            (TokenKind::EscapedChar, 2) => bytes[first_cursor + 1] == b'/',
            _ => false,
        };
        if !first_is_slash {
            return false;
        }
        let second = self.tokens[self.token_index + 2];
        let second_cursor = first_cursor + first.span;
        match (second.kind, second.span) {
            (TokenKind::Char, 1) | (TokenKind::InvalidChar, 1) => bytes[second_cursor] == b'/',
            (TokenKind::EscapedChar, 2) => bytes[second_cursor + 1] == b'/',
            _ => false,
        }
    }
}

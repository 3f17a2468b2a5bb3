use hashbrown::HashSet;

use crate::encoding::{Encoding, encode};
use crate::errors::{PatternError, PatternErrorKind, PatternResult};

use super::parts::{Modifier, Part, PartKind};
use super::tokenizer::{Token, TokenKind, TokenizerMode, tokenize};

/// Parses one component sub-pattern into an ordered part list.
///
/// `prefix_string` is the component's segment prefix (`/` for segmented
/// paths, empty elsewhere) and `seg_pattern` the regex class a bare `:name`
/// group compiles to. Literal runs, prefixes, and suffixes are passed
/// through the component encoder before being stored.
pub fn parse_component_pattern(
    input: &str,
    prefix_string: &str,
    seg_pattern: &str,
    encoding: Encoding,
) -> PatternResult<Vec<Part>> {
    let tokens = tokenize(input, TokenizerMode::Strict)?;
    let parser = PartParser {
        input,
        tokens,
        token_index: 0,
        cursor: 0,
        next_name_index: 0,
        prefix_string,
        seg_pattern,
        encoding,
        pending: String::new(),
        parts: Vec::new(),
    };
    parser.parse()
}

struct PartParser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    token_index: usize,
    cursor: usize,
    next_name_index: usize,
    prefix_string: &'a str,
    seg_pattern: &'a str,
    encoding: Encoding,
    pending: String,
    parts: Vec<Part>,
}

impl<'a> PartParser<'a> {
    fn parse(mut self) -> PatternResult<Vec<Part>> {
        loop {
            let char_token = self.take(TokenKind::Char);
            let name_token = self.take(TokenKind::Name);
            let mut pattern_token = self.take(TokenKind::Pattern);
            if name_token.is_empty() && pattern_token.is_empty() {
                pattern_token = self.take(TokenKind::Asterisk);
            }
            if !name_token.is_empty() || !pattern_token.is_empty() {
                let mut prefix = char_token;
                if prefix != self.prefix_string {
                    self.pending.push_str(prefix);
                    prefix = "";
                }
                self.flush_pending()?;
                let modifier = self.take_modifier();
                self.push_group(prefix, name_token, pattern_token, "", modifier)?;
                continue;
            }
            let char_token = if char_token.is_empty() {
                self.take(TokenKind::EscapedChar)
            } else {
                char_token
            };
            if !char_token.is_empty() {
                self.pending
                    .push_str(char_token.strip_prefix('\\').unwrap_or(char_token));
                continue;
            }
            if !self.take(TokenKind::Open).is_empty() {
                let prefix = self.take_text();
                let name_token = self.take(TokenKind::Name);
                let mut pattern_token = self.take(TokenKind::Pattern);
                if name_token.is_empty() && pattern_token.is_empty() {
                    pattern_token = self.take(TokenKind::Asterisk);
                }
                let suffix = self.take_text();
                if self.take(TokenKind::Close).is_empty() {
                    return Err(self.error());
                }
                let modifier = self.take_modifier();
                self.push_group(&prefix, name_token, pattern_token, &suffix, modifier)?;
                continue;
            }
            self.flush_pending()?;
            if self.cursor != self.input.len() {
                return Err(self.error());
            }
            {
                let mut names = HashSet::new();
                for part in &self.parts {
                    if !part.name.is_empty() && !names.insert(part.name.as_str()) {
                        return Err(PatternError::new(
                            PatternErrorKind::Parser,
                            self.input,
                            self.input.len(),
                        ));
                    }
                }
            }
            return Ok(self.parts);
        }
    }

    fn error(&self) -> PatternError {
        PatternError::new(PatternErrorKind::Parser, self.input, self.cursor)
    }

    /// Consumes the current token if it has the requested kind, returning
    /// its lexeme; returns the empty string otherwise.
    fn take(&mut self, kind: TokenKind) -> &'a str {
        let token = self.tokens[self.token_index];
        if token.kind != kind {
            return "";
        }
        let start = self.cursor;
        self.cursor += token.span;
        self.token_index += 1;
        &self.input[start..self.cursor]
    }

    fn take_modifier(&mut self) -> Modifier {
        let mut lexeme = self.take(TokenKind::Asterisk);
        if lexeme.is_empty() {
            lexeme = self.take(TokenKind::OtherModifier);
        }
        match lexeme.as_bytes().first() {
            Some(b'?') => Modifier::Optional,
            Some(b'+') => Modifier::Plus,
            Some(b'*') => Modifier::Star,
            _ => Modifier::None,
        }
    }

    fn take_text(&mut self) -> String {
        let mut text = String::new();
        loop {
            let mut lexeme = self.take(TokenKind::Char);
            if lexeme.is_empty() {
                lexeme = self.take(TokenKind::EscapedChar);
            }
            if lexeme.is_empty() {
                return text;
            }
            text.push_str(lexeme.strip_prefix('\\').unwrap_or(lexeme));
        }
    }

    fn flush_pending(&mut self) -> PatternResult<()> {
        if !self.pending.is_empty() {
            let value = encode(&self.pending, self.encoding)?;
            self.parts.push(Part::text(value, Modifier::None));
            self.pending.clear();
        }
        Ok(())
    }

    fn push_group(
        &mut self,
        prefix: &str,
        name_token: &str,
        pattern_token: &str,
        suffix: &str,
        modifier: Modifier,
    ) -> PatternResult<()> {
        let empty_name = name_token.is_empty();
        let fixed_grouping = empty_name && pattern_token.is_empty();
        if fixed_grouping && modifier == Modifier::None {
            self.pending.push_str(prefix);
            return Ok(());
        }
        self.flush_pending()?;
        let encoded_prefix = encode(prefix, self.encoding)?;
        let encoded_suffix = encode(suffix, self.encoding)?;
        if fixed_grouping {
            if !suffix.is_empty() {
                return Err(self.error());
            }
            if !prefix.is_empty() {
                self.parts.push(Part::text(encoded_prefix, modifier));
            }
            return Ok(());
        }
        let mut kind = PartKind::Pattern;
        let mut pattern_token = pattern_token;
        if pattern_token.is_empty() || pattern_token == self.seg_pattern {
            kind = PartKind::Segment;
            pattern_token = "()";
        }
        if pattern_token.starts_with('*') || pattern_token == "(.*)" {
            kind = PartKind::Asterisk;
            pattern_token = "()";
        }
        let value = pattern_token[1..pattern_token.len() - 1].to_string();
        let name = if empty_name {
            let index = self.next_name_index;
            self.next_name_index += 1;
            index.to_string()
        } else {
            name_token[1..].to_string()
        };
        let empty_prefix_suffix = encoded_prefix.is_empty() && encoded_suffix.is_empty();
        self.parts.push(Part {
            kind,
            modifier,
            name,
            value,
            prefix: encoded_prefix,
            suffix: encoded_suffix,
            custom_name: !empty_name,
            empty_prefix_suffix,
        });
        Ok(())
    }
}

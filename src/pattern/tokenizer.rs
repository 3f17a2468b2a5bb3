use unicode_ident::{is_xid_continue, is_xid_start};

use crate::errors::{PatternError, PatternErrorKind, PatternResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Char,
    EscapedChar,
    Name,
    Pattern,
    Asterisk,
    OtherModifier,
    Open,
    Close,
    InvalidChar,
    End,
}

/// One scanned lexeme. Tokens are positional: `span` is the byte width of
/// the lexeme, and the running sum of spans locates it in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: usize,
}

impl Token {
    pub(crate) const END: Token = Token {
        kind: TokenKind::End,
        span: 0,
    };

    fn new(kind: TokenKind, span: usize) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerMode {
    /// Every byte must belong to a well-formed token.
    Strict,
    /// Malformed constructs degrade to single-codepoint `InvalidChar` tokens.
    Lenient,
}

/// Scans `input` into a flat token stream, terminated by three `End`
/// sentinels so callers may look ahead past the last real token.
pub fn tokenize(input: &str, mode: TokenizerMode) -> PatternResult<Vec<Token>> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::with_capacity(len + 3);
    let mut cursor = 0;
    while cursor < len {
        let token = match bytes[cursor] {
            b'*' => Token::new(TokenKind::Asterisk, 1),
            b'+' | b'?' => Token::new(TokenKind::OtherModifier, 1),
            b'{' => Token::new(TokenKind::Open, 1),
            b'}' => Token::new(TokenKind::Close, 1),
            b'\\' => {
                if cursor + 1 < len {
                    Token::new(TokenKind::EscapedChar, 1 + char_width(input, cursor + 1))
                } else {
                    invalid_char(input, cursor, mode)?
                }
            }
            b':' => {
                let end = scan_name(input, cursor);
                if end > cursor + 1 {
                    Token::new(TokenKind::Name, end - cursor)
                } else {
                    invalid_char(input, cursor, mode)?
                }
            }
            b'(' => match scan_regex_group(bytes, cursor) {
                Some(end) => Token::new(TokenKind::Pattern, end - cursor),
                None => invalid_char(input, cursor, mode)?,
            },
            _ => Token::new(TokenKind::Char, char_width(input, cursor)),
        };
        tokens.push(token);
        cursor += token.span;
    }
    tokens.extend([Token::END; 3]);
    Ok(tokens)
}

fn char_width(input: &str, cursor: usize) -> usize {
    input[cursor..]
        .chars()
        .next()
        .map_or(1, |c| c.len_utf8())
}

fn invalid_char(input: &str, cursor: usize, mode: TokenizerMode) -> PatternResult<Token> {
    if mode == TokenizerMode::Strict {
        return Err(PatternError::new(
            PatternErrorKind::Tokenizer,
            input,
            cursor,
        ));
    }
    Ok(Token::new(TokenKind::InvalidChar, char_width(input, cursor)))
}

// `:` followed by an XID identifier; returns the byte offset one past the
// identifier, or `cursor + 1` when no identifier follows.
fn scan_name(input: &str, cursor: usize) -> usize {
    let mut end = cursor + 1;
    let mut chars = input[cursor + 1..].chars();
    match chars.next() {
        Some(first) if is_xid_start(first) => end += first.len_utf8(),
        _ => return end,
    }
    for c in chars {
        if !is_xid_continue(c) {
            break;
        }
        end += c.len_utf8();
    }
    end
}

// `(...)`: ASCII-only, depth-balanced, nested groups must be non-capturing,
// the group must not start with `?` and must not be empty. Returns the byte
// offset one past the closing parenthesis.
fn scan_regex_group(bytes: &[u8], cursor: usize) -> Option<usize> {
    let len = bytes.len();
    let group_start = cursor + 1;
    let mut depth = 1usize;
    let mut end = group_start;
    let mut j = group_start;
    while depth > 0 && j < len {
        let b = bytes[j];
        if b > 0x7F {
            return None;
        }
        if j == group_start && b == b'?' {
            return None;
        }
        if b == b'\\' {
            j += 1;
            if j == len || bytes[j] > 0x7F {
                return None;
            }
        }
        if b == b'(' {
            j += 1;
            if j == len || bytes[j] != b'?' {
                return None;
            }
            depth += 1;
        } else if b == b')' {
            depth -= 1;
        }
        j += 1;
        end = j;
    }
    if depth == 0 && end > group_start + 1 {
        Some(end)
    } else {
        None
    }
}

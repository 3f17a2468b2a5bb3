use std::fmt;

use thiserror::Error;

pub type PatternResult<T> = Result<T, PatternError>;

/// Stage of the pipeline a [`PatternError`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PatternErrorKind {
    Tokenizer,
    Parser,
    Compiler,
    Encoder,
    Resolver,
}

impl PatternErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            PatternErrorKind::Tokenizer => "Tokenizer",
            PatternErrorKind::Parser => "Parser",
            PatternErrorKind::Compiler => "Compiler",
            PatternErrorKind::Encoder => "Encoder",
            PatternErrorKind::Resolver => "Resolver",
        }
    }
}

impl fmt::Display for PatternErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure raised while building a pattern or canonicalizing an input.
///
/// `input` is the string that was being processed when the failure was
/// detected and `index` is a byte offset near the offending position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal pattern near index {index}: {input}")]
pub struct PatternError {
    kind: PatternErrorKind,
    input: String,
    index: usize,
}

impl PatternError {
    pub(crate) fn new(kind: PatternErrorKind, input: impl Into<String>, index: usize) -> Self {
        Self {
            kind,
            input: input.into(),
            index,
        }
    }

    pub fn kind(&self) -> PatternErrorKind {
        self.kind
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

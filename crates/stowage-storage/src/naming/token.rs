use chrono::{DateTime, Local};
use rand::distr::Alphanumeric;
use rand::Rng;

use super::RuleKind;
use crate::backend::{BackendTraits, OriginName};

/// Per-upload values placeholders are resolved against.
///
/// The clock is read once when the context is built, so every time token in
/// one expansion sees the same instant.
#[derive(Debug, Clone)]
pub struct ResolutionContext<'a> {
    pub uid: u64,
    /// Original file name, may be empty.
    pub origin_name: &'a str,
    /// Caller-supplied base path for directory rules.
    pub base_path: &'a str,
    pub now: DateTime<Local>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(uid: u64) -> Self {
        Self {
            uid,
            origin_name: "",
            base_path: "",
            now: Local::now(),
        }
    }

    pub fn with_origin_name(mut self, origin_name: &'a str) -> Self {
        self.origin_name = origin_name;
        self
    }

    pub fn with_base_path(mut self, base_path: &'a str) -> Self {
        self.base_path = base_path;
        self
    }

    /// Pin the resolution time.
    pub fn at(mut self, now: DateTime<Local>) -> Self {
        self.now = now;
        self
    }
}

/// A recognized rule placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Uid,
    Timestamp,
    Datetime,
    Date,
    RandomKey8,
    RandomKey16,
    Path,
    OriginName,
}

impl Token {
    /// Parse the text between the braces. Names are case-sensitive.
    pub fn parse(name: &str) -> Option<Token> {
        match name {
            "uid" => Some(Token::Uid),
            "timestamp" => Some(Token::Timestamp),
            "datetime" => Some(Token::Datetime),
            "date" => Some(Token::Date),
            "randomkey8" => Some(Token::RandomKey8),
            "randomkey16" => Some(Token::RandomKey16),
            "path" => Some(Token::Path),
            "originname" => Some(Token::OriginName),
            _ => None,
        }
    }

    /// Whether the token can be resolved in a rule of the given kind.
    pub fn is_available(self, kind: RuleKind) -> bool {
        match self {
            Token::Path => kind == RuleKind::Directory,
            Token::OriginName => kind == RuleKind::FileName,
            _ => true,
        }
    }
}

/// Resolve a token to its substitution, or `None` to leave it literal.
pub fn resolve(
    token: Token,
    ctx: &ResolutionContext<'_>,
    kind: RuleKind,
    traits: &BackendTraits,
) -> Option<String> {
    if !token.is_available(kind) {
        return None;
    }

    let value = match token {
        Token::Uid => ctx.uid.to_string(),
        Token::Timestamp => ctx.now.timestamp().to_string(),
        Token::Datetime => ctx.now.format("%Y%m%d%H%M%S").to_string(),
        Token::Date => ctx.now.format("%Y%m%d").to_string(),
        Token::RandomKey8 => random_key(8),
        Token::RandomKey16 => random_key(16),
        Token::Path => format!("{}/", ctx.base_path),
        Token::OriginName => match traits.origin_name {
            OriginName::Literal => ctx.origin_name.to_string(),
            OriginName::Callback(template) => template.to_string(),
        },
    };
    Some(value)
}

/// Random string of `len` ASCII letters and digits from the thread-local generator.
pub fn random_key(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

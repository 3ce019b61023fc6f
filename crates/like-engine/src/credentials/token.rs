use std::sync::Arc;

use serde::Deserialize;

/// Number of leading characters shown when a token is logged.
const LOG_PREFIX_LEN: usize = 10;

/// Opaque bearer token.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token(Arc<str>);

impl Token {
    pub fn new(value: impl Into<Arc<str>>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix that is safe to put in logs.
    pub fn redacted(&self) -> &str {
        match self.0.char_indices().nth(LOG_PREFIX_LEN) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({}...)", self.redacted())
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One entry of the remote token list.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenRecord {
    #[serde(default)]
    pub token: Option<String>,
}

impl TokenRecord {
    pub(crate) fn into_token(self) -> Option<Token> {
        self.token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Token::new)
    }
}

//! Topic tokens for scoping subscriptions and sends.

use std::fmt;
use std::sync::Arc;

/// Optional string-valued topic qualifier attached to subscriptions and sends.
///
/// The empty token is the wildcard: it matches every other token. Two tokens
/// match for delivery purposes when either side is empty or both carry the
/// same string. Equality and hashing go by string value, so tokens work as
/// map keys on the application side.
///
/// Cloning is cheap (shared backing storage), which matters because the
/// dispatcher clones the whole subscription table for every send.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    id: Arc<str>,
}

impl Token {
    /// Creates a token from a topic string.
    ///
    /// An empty string yields the wildcard token, same as [`Token::none`].
    pub fn new(id: impl AsRef<str>) -> Self {
        Self {
            id: Arc::from(id.as_ref()),
        }
    }

    /// The empty (wildcard) token.
    pub fn none() -> Self {
        Self { id: Arc::from("") }
    }

    /// Returns true for the empty (wildcard) token.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// Delivery-matching rule: true if either token is empty or both are equal.
    ///
    /// The rule is symmetric: an unscoped subscription receives every token
    /// of its type, and an unscoped send reaches every subscription of its
    /// type regardless of the subscription's token.
    pub fn matches(&self, other: &Token) -> bool {
        self.is_empty() || other.is_empty() || self == other
    }

    /// The underlying topic string.
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<&str> for Token {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Token {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

//! Opaque media references.

use core::fmt;
use std::sync::Arc;

/// Opaque reference to a generated image or clip.
///
/// Usually a file path or a storage locator. The overlay only stores and
/// forwards tokens; it never looks inside one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaToken(Arc<str>);

impl MediaToken {
    /// Wraps a locator.
    #[must_use]
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    /// Returns the locator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for MediaToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl AsRef<str> for MediaToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};

use ghas_lab_core::LabError;

use crate::error::ExhaustedError;

// ─── CredentialSource ─────────────────────────────────────────────────────

/// Resolves the `Authorization` header value for an outbound request.
///
/// Implemented by [`CredentialRotator`] (a pool of tokens that advances under
/// rate-limit pressure) and [`StaticCredential`] (one fixed token). The
/// transport holds one of these behind an `Arc<dyn CredentialSource>`,
/// chosen once at startup.
pub trait CredentialSource: Send + Sync {
    /// The token to use right now. Empty means "send no credential".
    fn current(&self) -> &str;

    /// `Bearer <token>`, or `None` when the current token is empty.
    fn authorization(&self) -> Option<String> {
        let token = self.current();
        if token.is_empty() {
            None
        } else {
            Some(format!("Bearer {token}"))
        }
    }
}

// ─── CredentialRotator ────────────────────────────────────────────────────

/// An ordered, immutable token pool plus a shared cursor.
///
/// `current()` and `advance()` may be called from any number of workers.
/// The cursor only ever holds an in-bounds index: advancing is a single
/// compare-and-swap that refuses to move past the last token.
#[derive(Debug)]
pub struct CredentialRotator {
    tokens: Vec<String>,
    cursor: AtomicUsize,
}

impl CredentialRotator {
    /// Build a rotator starting at the first token. Fails on an empty set.
    pub fn new(tokens: Vec<String>) -> Result<Self, LabError> {
        if tokens.is_empty() {
            return Err(LabError::NoCredentials);
        }
        Ok(Self {
            tokens,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Move to the next token.
    ///
    /// On exhaustion the cursor stays on the last token and every caller
    /// racing past the end gets [`ExhaustedError`].
    pub fn advance(&self) -> Result<(), ExhaustedError> {
        let last = self.tokens.len() - 1;
        match self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| {
                (i < last).then_some(i + 1)
            }) {
            Ok(previous) => {
                tracing::info!(
                    new_index = previous + 1,
                    total_tokens = self.tokens.len(),
                    "rotated to new token"
                );
                Ok(())
            }
            Err(index) => Err(ExhaustedError {
                index,
                total: self.tokens.len(),
            }),
        }
    }

    /// Current 0-based cursor position.
    pub fn index(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl CredentialSource for CredentialRotator {
    fn current(&self) -> &str {
        &self.tokens[self.index()]
    }
}

// ─── StaticCredential ─────────────────────────────────────────────────────

/// A single fixed token, used by commands that never rotate.
#[derive(Debug, Clone)]
pub struct StaticCredential {
    token: String,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// First token of a credential set, or an empty credential for none.
    pub fn first_of(tokens: &[String]) -> Self {
        Self::new(tokens.first().cloned().unwrap_or_default())
    }
}

impl CredentialSource for StaticCredential {
    fn current(&self) -> &str {
        &self.token
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

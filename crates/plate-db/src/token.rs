//! Public share token issuance.
//!
//! A token is 9 random bytes encoded as URL-safe base64 without padding
//! (12 characters). Uniqueness is enforced by the store: a candidate is
//! inserted, and a UNIQUE violation on the token column means "try another".
//! Any other failure aborts immediately.

use std::future::Future;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::{DatabaseError, TokenError};

/// Candidates tried before giving up.
pub const MAX_TOKEN_ATTEMPTS: u32 = 5;

const TOKEN_BYTES: usize = 9;

/// Result of one insert attempt with a candidate token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome<T> {
    Inserted(T),
    /// The candidate already exists.
    Conflict,
}

/// Draw a fresh random token from the OS RNG.
///
/// # Errors
///
/// Returns `TokenError::Database` wrapping the RNG failure.
pub fn generate_token() -> Result<String, TokenError> {
    let mut buf = [0u8; TOKEN_BYTES];
    getrandom::fill(&mut buf)
        .map_err(|e| DatabaseError::Other(anyhow::anyhow!("OS random source failed: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(buf))
}

/// Detect a UNIQUE violation on `column` (written `table.column`).
///
/// Narrow on purpose: a UNIQUE failure on any other column is a real error.
pub fn is_unique_violation(e: &libsql::Error, column: &str) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE constraint failed") && msg.contains(column)
}

/// Classify the result of an insert carrying a candidate token.
///
/// # Errors
///
/// Returns the underlying error unless it is a UNIQUE violation on `column`.
pub fn insert_outcome(
    result: Result<u64, libsql::Error>,
    column: &str,
) -> Result<InsertOutcome<()>, DatabaseError> {
    match result {
        Ok(_) => Ok(InsertOutcome::Inserted(())),
        Err(e) if is_unique_violation(&e, column) => Ok(InsertOutcome::Conflict),
        Err(e) => Err(e.into()),
    }
}

/// Bounded retry loop around a token-carrying insert.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    max_attempts: u32,
    preferred: Option<String>,
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self {
            max_attempts: MAX_TOKEN_ATTEMPTS,
            preferred: None,
        }
    }
}

impl TokenIssuer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try `token` as the first candidate. Migrated shared menus keep their
    /// legacy token this way unless it collides. Empty tokens are ignored.
    #[must_use]
    pub fn prefer(mut self, token: Option<&str>) -> Self {
        self.preferred = token.filter(|t| !t.is_empty()).map(String::from);
        self
    }

    /// Run `attempt` with successive candidates until it inserts.
    ///
    /// The preferred token, if any, counts as the first attempt. Returns the
    /// token that was stored together with the attempt's value.
    ///
    /// # Errors
    ///
    /// `TokenError::Exhausted` once every attempt conflicted, or the first
    /// non-conflict error `attempt` returned.
    pub async fn issue<T, F, Fut>(self, mut attempt: F) -> Result<(String, T), TokenError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<InsertOutcome<T>, DatabaseError>>,
    {
        let mut preferred = self.preferred;
        for n in 1..=self.max_attempts {
            let candidate = match preferred.take() {
                Some(token) => token,
                None => generate_token()?,
            };
            match attempt(candidate.clone()).await? {
                InsertOutcome::Inserted(value) => return Ok((candidate, value)),
                InsertOutcome::Conflict => {
                    tracing::debug!("token: candidate collided (attempt {}/{})", n, self.max_attempts);
                }
            }
        }
        tracing::warn!("token: no unique token after {} attempts", self.max_attempts);
        Err(TokenError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

//! Access-token persistence.
//!
//! The API client only needs to forget a token when the backend rejects it,
//! while the CLI also loads and saves tokens between runs. Both go through
//! [`TokenStore`].

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::debug;

const KEYRING_SERVICE: &str = "palaver";

/// Describes failures when reading or writing a stored token.
///
/// Recoverable errors indicate that the credential backend was
/// temporarily unavailable (for example when the keychain service is
/// locked or inaccessible). Permanent errors surface the underlying
/// cause directly so callers can report them to the user.
#[derive(Debug)]
pub enum TokenStoreError {
    Recoverable(keyring::Error),
    Permanent(keyring::Error),
}

impl TokenStoreError {
    fn inner(&self) -> &keyring::Error {
        match self {
            TokenStoreError::Recoverable(err) | TokenStoreError::Permanent(err) => err,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, TokenStoreError::Recoverable(_))
    }
}

impl From<keyring::Error> for TokenStoreError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_) => {
                TokenStoreError::Recoverable(err)
            }
            other => TokenStoreError::Permanent(other),
        }
    }
}

impl fmt::Display for TokenStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner())
    }
}

impl Error for TokenStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner())
    }
}

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, TokenStoreError>;
    fn store(&self, token: &str) -> Result<(), TokenStoreError>;
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Process-local token cache. Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.slot().clone())
    }

    fn store(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        self.slot().take();
        Ok(())
    }
}

/// Token kept in the platform keyring, one entry per backend endpoint.
pub struct KeyringTokenStore {
    account: String,
}

impl KeyringTokenStore {
    pub fn new(http_endpoint: &str) -> Self {
        Self {
            account: crate::utils::url::normalize_base_url(http_endpoint),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, TokenStoreError> {
        Ok(keyring::Entry::new(KEYRING_SERVICE, &self.account)?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn store(&self, token: &str) -> Result<(), TokenStoreError> {
        self.entry()?.set_password(token)?;
        debug!(account = %self.account, "stored access token in keyring");
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                debug!(account = %self.account, "removed access token from keyring");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

use base64::DecodeError;
use documentdb_core::hash::base64_decode;
use documentdb_core::utils::Redact;
use documentdb_core::{Error, Result, SigningCredential};
use once_cell::sync::OnceCell;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Why a master key could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyDecodeError {
    /// A byte outside the base64 alphabet, or a final symbol with trailing
    /// bits set.
    #[error("base64 input is corrupt at offset {offset}, check the master key")]
    CorruptInput {
        /// Offset of the offending byte in the raw key.
        offset: usize,
    },
    /// The key length or padding does not form valid base64.
    #[error("base64 input has invalid length or padding, check the master key")]
    InvalidLength,
}

impl From<DecodeError> for KeyDecodeError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::InvalidByte(offset, _) | DecodeError::InvalidLastSymbol(offset, _) => {
                KeyDecodeError::CorruptInput { offset }
            }
            DecodeError::InvalidLength(_) | DecodeError::InvalidPadding => {
                KeyDecodeError::InvalidLength
            }
        }
    }
}

/// MasterKey holds the base64 encoded account key used to sign requests.
///
/// The key is decoded at most once, on first use. Both outcomes are cached:
/// later calls to [`MasterKey::salt`] return the same bytes, or the same
/// error, without decoding again. Clones share the cache.
#[derive(Clone)]
pub struct MasterKey {
    raw: Arc<str>,
    salt: Arc<OnceCell<std::result::Result<Vec<u8>, KeyDecodeError>>>,
}

impl MasterKey {
    /// Create a new master key from its base64 form.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            raw: Arc::from(key.into()),
            salt: Arc::new(OnceCell::new()),
        }
    }

    /// The key as it was given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The decoded key bytes used as HMAC key.
    pub fn salt(&self) -> Result<&[u8]> {
        let decoded = self
            .salt
            .get_or_init(|| base64_decode(&self.raw).map_err(KeyDecodeError::from));

        match decoded {
            Ok(bs) => Ok(bs),
            Err(err) => Err(Error::credential_invalid(err.to_string()).with_source(err.clone())),
        }
    }

    /// Whether the key has been decoded already, successfully or not.
    pub fn is_decoded(&self) -> bool {
        self.salt.get().is_some()
    }
}

impl Debug for MasterKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &Redact::from(&*self.raw))
            .finish()
    }
}

impl SigningCredential for MasterKey {
    fn is_valid(&self) -> bool {
        !self.raw.is_empty()
    }
}

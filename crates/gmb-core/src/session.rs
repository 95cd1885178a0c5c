//! Session credentials sourced from a persistent key-value store.
//!
//! The values are written by an external login flow and are read-only here.
//! Operations receive a [`Session`] explicitly and call
//! [`Session::credentials`] to enforce the non-empty precondition before
//! touching the network.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::ConfigError;

pub const TOKEN_KEY: &str = "token";
pub const GMB_ACCESS_TOKEN_KEY: &str = "gmb_access_token";
pub const GMB_ACCOUNT_ID_KEY: &str = "gmb_account_id";
pub const GMB_ACCOUNT_NAME_KEY: &str = "gmb_account_name";

/// Read access to named session values.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
}

impl SessionStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Session values loaded from a YAML map on disk.
#[derive(Debug, Clone, Default)]
pub struct FileSessionStore {
    values: HashMap<String, String>,
}

impl FileSessionStore {
    /// Load the session file at `path`.
    ///
    /// A missing file is an empty session (nobody has signed in yet), so the
    /// credential check reports the first missing value instead.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or is not
    /// a YAML map of strings.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::SessionFileIo {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        Self::from_yaml_str(&content)
    }

    /// Parse session values from YAML text. An empty document is an empty session.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SessionFileParse`] on malformed YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        use serde_yaml::Value;

        let raw: Option<HashMap<String, Value>> =
            serde_yaml::from_str(content).map_err(ConfigError::SessionFileParse)?;
        // Scalars only; account ids are often written unquoted.
        let values = raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                Value::Number(n) => Some((k, n.to_string())),
                Value::Bool(b) => Some((k, b.to_string())),
                _ => None,
            })
            .collect();
        Ok(Self { values })
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("missing session value: {0}")]
    Missing(&'static str),
}

/// Raw session values; any of them may be absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub auth_token: Option<String>,
    pub gmb_access_token: Option<String>,
    pub gmb_account_id: Option<String>,
    pub gmb_account_name: Option<String>,
}

impl Session {
    #[must_use]
    pub fn from_store<S: SessionStore + ?Sized>(store: &S) -> Self {
        let read = |key: &str| store.get(key).filter(|v| !v.trim().is_empty());
        Self {
            auth_token: read(TOKEN_KEY),
            gmb_access_token: read(GMB_ACCESS_TOKEN_KEY),
            gmb_account_id: read(GMB_ACCOUNT_ID_KEY),
            gmb_account_name: read(GMB_ACCOUNT_NAME_KEY),
        }
    }

    /// The complete credentials bundle.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::Missing`] naming the first absent or
    /// blank value, checked in the order token, access token, account id.
    pub fn credentials(&self) -> Result<Credentials, CredentialsError> {
        fn required(value: Option<&String>, key: &'static str) -> Result<String, CredentialsError> {
            value
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .ok_or(CredentialsError::Missing(key))
        }

        Ok(Credentials {
            auth_token: required(self.auth_token.as_ref(), TOKEN_KEY)?,
            gmb_access_token: required(self.gmb_access_token.as_ref(), GMB_ACCESS_TOKEN_KEY)?,
            gmb_account_id: required(self.gmb_account_id.as_ref(), GMB_ACCOUNT_ID_KEY)?,
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[redacted]"))
            .field(
                "gmb_access_token",
                &self.gmb_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("gmb_account_id", &self.gmb_account_id)
            .field("gmb_account_name", &self.gmb_account_name)
            .finish()
    }
}

/// A validated credentials bundle; every field is non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub auth_token: String,
    pub gmb_access_token: String,
    pub gmb_account_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_token", &"[redacted]")
            .field("gmb_access_token", &"[redacted]")
            .field("gmb_account_id", &self.gmb_account_id)
            .finish()
    }
}

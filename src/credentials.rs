use crate::error::{Result, SyncError};

/// Source of the bearer token the remote clients authenticate with.
/// The OAuth exchange and token persistence live outside this crate; the
/// core only ever sees a ready-to-use token.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Result<String>;
}

/// Reads the token from an environment variable (default
/// SPOTIFY_ACCESS_TOKEN). Used by the CLI.
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new() -> Self {
        Self::with_var("SPOTIFY_ACCESS_TOKEN")
    }

    pub fn with_var(var: &str) -> Self {
        Self {
            var: var.to_string(),
        }
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn bearer_token(&self) -> Result<String> {
        match std::env::var(&self.var) {
            Ok(tok) if !tok.trim().is_empty() => Ok(tok),
            _ => Err(SyncError::Auth(format!(
                "no bearer token: set the {} environment variable",
                self.var
            ))),
        }
    }
}

/// Fixed token, handy for tests and embedding.
pub struct StaticCredentialProvider {
    token: String,
}

impl StaticCredentialProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn bearer_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

use anyhow::{Result, anyhow};
use std::fmt;

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "ISSUECHECK_TOKEN";

/// HTTP Basic credentials: a GitHub login and a personal access token.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    user: String,
    token: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let user = user.into();
        let token = token.into();
        if user.trim().is_empty() {
            return Err(anyhow!("Credentials user must not be empty"));
        }
        if token.trim().is_empty() {
            return Err(anyhow!("Credentials token must not be empty"));
        }
        Ok(Credentials { user, token })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

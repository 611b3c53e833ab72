use crate::config::ClientConfig;

/// Cookie values identifying a signed-in browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub session_token: String,
    pub csrf_token: Option<String>,
}

/// Sign-in state of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionContext {
    credentials: Option<SessionCredentials>,
}

impl SessionContext {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(session_token: impl Into<String>, csrf_token: Option<String>) -> Self {
        Self {
            credentials: Some(SessionCredentials {
                session_token: session_token.into(),
                csrf_token,
            }),
        }
    }

    /// Signed in whenever a session cookie is configured.
    pub fn from_config(config: &ClientConfig) -> Self {
        match &config.session_cookie {
            Some(token) => Self::signed_in(token.clone(), config.csrf_token.clone()),
            None => Self::signed_out(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn credentials(&self) -> Option<&SessionCredentials> {
        self.credentials.as_ref()
    }
}

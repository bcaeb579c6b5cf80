use crate::domain::models::{
    auth::{AuthResponse, AuthTokens},
    partner::Partner,
};

/// Signed-in context handed to every partner call. Created by
/// `login`/`register`, replaced by `refresh`, consumed by `logout`.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: Partner,
    tokens: AuthTokens,
}

impl Session {
    pub fn access_token(&self) -> &str {
        &self.tokens.token
    }

    pub fn refresh_token(&self) -> &str {
        &self.tokens.refresh_token
    }

    pub fn establishment_id(&self) -> &str {
        &self.user.establishment_id
    }
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self { user: response.user, tokens: response.tokens }
    }
}

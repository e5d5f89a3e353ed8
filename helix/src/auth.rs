use crate::{
    HelixError,
    HelixResult,
};
use chrono::{
    DateTime,
    Utc,
};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Provided by the configuration, acts on behalf of a user.
    User,
    /// Acquired through the client credentials grant.
    App,
}

/// Bearer token attached to every Helix request.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    kind: TokenKind,
    expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"********")
            .field("kind", &self.kind)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl AccessToken {
    pub fn user(value: impl ToString) -> Self {
        Self {
            value: value.to_string(),
            kind: TokenKind::User,
            expires_at: None,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub(crate) fn secret(&self) -> &str {
        &self.value
    }

    /// Client credentials grant against `<auth_url>/token`.
    #[instrument(level = "debug", skip(http, client_secret))]
    pub(crate) async fn request_app_token(
        http: &reqwest::Client,
        auth_url: &Url,
        client_id: &str,
        client_secret: &str,
    ) -> HelixResult<Self> {
        let url = auth_url.join("token")?;

        debug!(%url, "requesting app access token");

        let response = http
            .post(url)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HelixError::Token(format!("{status}: {}", body.trim())));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| HelixError::Token(format!("malformed token response: {e}")))?;

        if token.access_token.is_empty() {
            return Err(HelixError::Token("token endpoint returned an empty access_token".to_string()));
        }

        let expires_at = token
            .expires_in
            .map(|secs| Utc::now() + chrono::Duration::seconds(secs as i64));
        debug!(?expires_at, "acquired app access token");

        Ok(Self {
            value: token.access_token,
            kind: TokenKind::App,
            expires_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

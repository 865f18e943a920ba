use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::plex::api::{self, Resource};
use crate::SourceError;

pub(crate) const PLEX_TV_BASE_URL: &str = "https://plex.tv";
pub(crate) const CLIENT_IDENTIFIER: &str = "kodi2plex-cli";
const PRODUCT: &str = "kodi2plex";

#[derive(Debug, Deserialize)]
struct SignInResponse {
    #[serde(rename = "authToken")]
    auth_token: String,
}

/// Headers Plex expects on every request, plus JSON responses.
pub(crate) fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("x-plex-client-identifier"),
        HeaderValue::from_static(CLIENT_IDENTIFIER),
    );
    headers.insert(HeaderName::from_static("x-plex-product"), HeaderValue::from_static(PRODUCT));
    headers.insert(
        HeaderName::from_static("x-plex-version"),
        HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
    );
    headers
}

pub(crate) fn build_http_client() -> Result<Client, SourceError> {
    Ok(Client::builder().default_headers(default_headers()).build()?)
}

/// A signed-in plex.tv account.
pub struct PlexAccount {
    client: Client,
    token: String,
    base_url: String,
}

impl PlexAccount {
    /// Sign in with username (or email) and password.
    pub async fn sign_in(client: Client, username: &str, password: &str) -> Result<Self, SourceError> {
        Self::sign_in_at(client, PLEX_TV_BASE_URL, username, password).await
    }

    pub async fn sign_in_at(
        client: Client,
        base_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, SourceError> {
        let url = format!("{}/api/v2/users/signin", base_url);
        let params = [("login", username), ("password", password), ("rememberMe", "false")];
        let response = client.post(&url).form(&params).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(SourceError::Auth(api::error_message(&body).unwrap_or_else(|| status.to_string())));
        }
        if !status.is_success() {
            return Err(SourceError::Http {
                service: "plex.tv",
                status: status.as_u16(),
                message: body,
            });
        }

        let signed_in: SignInResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::decode("plex.tv", e))?;
        info!("Signed in to Plex as {}", username);

        Ok(Self {
            client,
            token: signed_in.auth_token,
            base_url: base_url.to_string(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Devices and servers linked to the account.
    pub async fn resources(&self) -> Result<Vec<Resource>, SourceError> {
        let url = format!("{}/api/v2/resources", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("includeHttps", "1"), ("includeRelay", "1")])
            .header("X-Plex-Token", &self.token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Http {
                service: "plex.tv",
                status: status.as_u16(),
                message: body,
            });
        }

        let resources = api::parse_resources(&body)?;
        debug!("Plex: account has {} resources", resources.len());
        Ok(resources)
    }
}

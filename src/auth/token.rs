use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::Deserialize;

use super::credentials::Credentials;
use crate::api::constants::TOKEN_URL;
use crate::api::error::{ApiError, google_error_message};

const TOKEN_OPERATION: &str = "oauth.token";

/// Bearer token obtained from a refresh token
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchange the refresh token for an access token
pub async fn refresh_access_token(credentials: &Credentials) -> Result<AccessToken, ApiError> {
    info!("Refreshing access token for client {}", credentials.client_id);

    let client = reqwest::Client::new();
    let response = client
        .post(TOKEN_URL)
        .form(&[
            ("grant_type", "refresh_token"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
        ])
        .send()
        .await
        .map_err(|source| ApiError::Transport {
            operation: TOKEN_OPERATION,
            source,
        })?;

    let status = response.status();
    debug!("Token request status: {}", status);

    let body = response.text().await.map_err(|source| ApiError::Transport {
        operation: TOKEN_OPERATION,
        source,
    })?;

    if !status.is_success() {
        return Err(ApiError::remote(
            TOKEN_OPERATION,
            status.as_u16(),
            token_error_message(&body),
        ));
    }

    let token: TokenResponse = serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        operation: TOKEN_OPERATION,
        source,
    })?;

    // Default to 1 hour if not provided
    let expires_in = token.expires_in.unwrap_or(3600);
    let expires_at = Utc::now() + Duration::seconds(expires_in);

    info!("Access token valid until {}", expires_at.to_rfc3339());
    Ok(AccessToken {
        access_token: token.access_token,
        expires_at,
    })
}

/// OAuth errors use `{error, error_description}` rather than the API error document
fn token_error_message(body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(TokenErrorResponse {
            error,
            error_description: Some(description),
        }) => format!("{}: {}", error, description),
        Ok(TokenErrorResponse { error, .. }) => error,
        Err(_) => google_error_message(body),
    }
}

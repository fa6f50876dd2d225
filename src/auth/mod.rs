//! OAuth credentials and access-token acquisition

pub mod credentials;
pub mod token;

pub use credentials::{Credentials, credential_presence, load_env_file};
pub use token::{AccessToken, refresh_access_token};

use crate::api::{ApiError, GoogleClient};

/// Refresh an access token once and build the client every command shares
pub async fn connect(credentials: &Credentials) -> Result<GoogleClient, ApiError> {
    let token = refresh_access_token(credentials).await?;
    Ok(GoogleClient::new(token.access_token))
}

use crate::client::config::Config;
use crate::client::consts::{ASSISTANTS_BETA, OPENAI_BETA_HEADER};
use crate::client::error::ApiError;
use crate::types::ErrorResponse;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

pub fn build_headers(config: &Config) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key().expose_secret()))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(OPENAI_BETA_HEADER, HeaderValue::from_static(ASSISTANTS_BETA));
    Ok(headers)
}

/// Turns a non-2xx response into [`ApiError::Api`], passing successful ones through.
pub async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    let (message, code) = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(envelope) => {
            let details = envelope.into_error();
            (details.message().to_string(), details.code().map(str::to_string))
        }
        Err(_) => (body, None),
    };
    tracing::debug!("api error: status={}, message={}", status, message);
    Err(ApiError::Api {
        status: status.as_u16(),
        message,
        code,
    })
}

pub async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

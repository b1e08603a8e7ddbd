//! HTTP Gateway Lookup Client
//!
//! Talks JSON to a lookup gateway, a process that hosts the real lookup
//! service client and exposes its four calls over HTTP. The gateway owns the
//! service's protocol; this client only forwards arguments and returns what
//! comes back.
//!
//! ## Endpoints
//!
//! - `POST {base}/login` - `{"phoneNumber"}`
//! - `POST {base}/verify-otp` - `{"phoneNumber", "context", "otp"}`
//! - `POST {base}/search` - `{"phoneNumber", "countryCode", "installationId"}`
//! - `POST {base}/bulk-search` - `{"phoneNumbers", "countryCode", "installationId"}`
//!
//! Search results are passed through verbatim on a 2xx status. Any other
//! status on the search endpoints is a rejection.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use cl_core::{LoginResponse, LookupClient, LookupClientError, LookupResult, VerifyOtpResponse};
use cl_shared::phone::mask_phone_number;

use crate::config::LookupConfig;
use crate::InfrastructureError;

/// Lookup client backed by an HTTP gateway
#[derive(Debug, Clone)]
pub struct HttpLookupClient {
    client: Client,
    base_url: String,
}

impl HttpLookupClient {
    /// Create a new HTTP lookup client
    pub fn new(config: &LookupConfig) -> Result<Self, InfrastructureError> {
        let base_url = config
            .base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                InfrastructureError::Config("lookup.base_url is required for the http provider".to_string())
            })?
            .trim_end_matches('/')
            .to_string();

        let mut headers = header::HeaderMap::new();
        if let Some(api_key) = config.api_key.as_deref().filter(|key| !key.is_empty()) {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| InfrastructureError::Config(format!("Invalid lookup.api_key: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        info!(
            base_url = %base_url,
            timeout_secs = config.timeout_secs,
            "HTTP lookup client initialized"
        );

        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and return the status with the decoded body
    ///
    /// Bodies that are not JSON are returned as a JSON string.
    async fn post_json(&self, path: &str, body: &Value) -> Result<(StatusCode, Value), LookupClientError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Sending lookup gateway request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| LookupClientError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LookupClientError::Transport(e.to_string()))?;

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Lookup gateway returned an error status");
        }

        Ok((status, value))
    }
}

/// Successful lookup bodies pass through, error statuses become rejections
fn into_lookup_result(status: StatusCode, body: Value) -> Result<LookupResult, LookupClientError> {
    if status.is_success() {
        Ok(body)
    } else {
        Err(LookupClientError::Rejected {
            status_code: status.as_u16(),
        })
    }
}

/// Use the body when it is a status envelope, otherwise wrap it with the HTTP status
fn into_status_envelope<T, F>(status: StatusCode, body: Value, wrap: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce(u16, Value) -> T,
{
    let looks_like_envelope = body.get("statusCode").is_some() || body.get("status_code").is_some();
    if looks_like_envelope {
        if let Ok(parsed) = serde_json::from_value::<T>(body.clone()) {
            return parsed;
        }
    }
    wrap(status.as_u16(), body)
}

#[async_trait]
impl LookupClient for HttpLookupClient {
    async fn login(&self, phone_number: &str) -> Result<LoginResponse, LookupClientError> {
        info!(phone = %mask_phone_number(phone_number), "Requesting OTP via lookup gateway");

        let (status, body) = self
            .post_json("login", &json!({ "phoneNumber": phone_number }))
            .await?;
        Ok(into_status_envelope(status, body, LoginResponse::new))
    }

    async fn verify_otp(
        &self,
        phone_number: &str,
        context: &Value,
        otp: &str,
    ) -> Result<VerifyOtpResponse, LookupClientError> {
        info!(phone = %mask_phone_number(phone_number), "Verifying OTP via lookup gateway");

        let (status, body) = self
            .post_json(
                "verify-otp",
                &json!({
                    "phoneNumber": phone_number,
                    "context": context,
                    "otp": otp,
                }),
            )
            .await?;
        Ok(into_status_envelope(status, body, VerifyOtpResponse::new))
    }

    async fn search_phone_number(
        &self,
        phone_number: &str,
        country_code: &str,
        installation_id: &str,
    ) -> Result<LookupResult, LookupClientError> {
        let (status, body) = self
            .post_json(
                "search",
                &json!({
                    "phoneNumber": phone_number,
                    "countryCode": country_code,
                    "installationId": installation_id,
                }),
            )
            .await?;
        into_lookup_result(status, body)
    }

    async fn bulk_search(
        &self,
        phone_numbers: &str,
        country_code: &str,
        installation_id: &str,
    ) -> Result<LookupResult, LookupClientError> {
        let (status, body) = self
            .post_json(
                "bulk-search",
                &json!({
                    "phoneNumbers": phone_numbers,
                    "countryCode": country_code,
                    "installationId": installation_id,
                }),
            )
            .await?;
        into_lookup_result(status, body)
    }

    fn provider_name(&self) -> &str {
        "HTTP Gateway"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_base_url() {
        let config = LookupConfig {
            provider: crate::config::LookupProvider::Http,
            ..LookupConfig::default()
        };
        assert!(matches!(
            HttpLookupClient::new(&config),
            Err(InfrastructureError::Config(_))
        ));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = HttpLookupClient::new(&LookupConfig::http("http://127.0.0.1:9000/api/")).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9000/api");
    }

    #[test]
    fn test_envelope_parsing() {
        let parsed: LoginResponse = into_status_envelope(
            StatusCode::OK,
            json!({"statusCode": 429, "data": {"message": "Too many requests"}}),
            LoginResponse::new,
        );
        assert_eq!(parsed.status_code, 429);

        let wrapped: LoginResponse = into_status_envelope(
            StatusCode::BAD_GATEWAY,
            Value::String("upstream down".to_string()),
            LoginResponse::new,
        );
        assert_eq!(wrapped.status_code, 502);
        assert_eq!(wrapped.data, json!("upstream down"));

        let plain: VerifyOtpResponse = into_status_envelope(
            StatusCode::OK,
            json!({"installationId": "abc"}),
            VerifyOtpResponse::new,
        );
        assert_eq!(plain.status_code, 200);
        assert_eq!(plain.installation_id(), Some("abc"));
    }
}

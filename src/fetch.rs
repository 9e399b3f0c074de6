//! Downloading incident reports by URL.
//!
//! A plain HTTP GET. The response must declare a PDF `Content-Type`; anything
//! else is rejected with [`FetchError::InvalidSource`] before the body is read.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::extract::is_pdf_content_type;

/// Build the HTTP client used for all report downloads.
pub fn build_client(config: &FetchConfig) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// Check a response `Content-Type` header value.
pub fn validate_content_type(url: &str, content_type: Option<&str>) -> Result<(), FetchError> {
    match content_type {
        Some(ct) if is_pdf_content_type(ct) => Ok(()),
        other => Err(FetchError::InvalidSource {
            url: url.to_string(),
            content_type: other.unwrap_or("none").to_string(),
        }),
    }
}

/// GET `url` and return the PDF bytes.
pub async fn fetch_document(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let http_err = |source| FetchError::Http {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(http_err)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    validate_content_type(url, content_type.as_deref())?;

    let bytes = response.bytes().await.map_err(http_err)?;
    Ok(bytes.to_vec())
}

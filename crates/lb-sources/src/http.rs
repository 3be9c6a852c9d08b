//! HTTP plumbing shared by the remote adapters.
//!
//! One client builder, one status check. Adapters construct their own
//! requests; this module decides what a response status means for them.

use crate::error::SourceError;

/// Map a response's status onto the adapter error model.
///
/// A 429 becomes [`SourceError::RateLimited`] carrying the server's
/// `Retry-After` hint; any other non-success status becomes
/// [`SourceError::Api`] with the response body as the message. Successful
/// responses pass through untouched.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SourceError> {
    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(SourceError::RateLimited {
            retry_after_secs: retry_after_secs(&resp),
        });
    }
    if status.is_success() {
        Ok(resp)
    } else {
        Err(SourceError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        })
    }
}

/// Seconds the server asked us to back off. A minute when the header is
/// absent or unparseable.
fn retry_after_secs(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(60)
}

/// Build the HTTP client every remote adapter shares.
///
/// # Panics
///
/// Panics if the underlying `reqwest::Client` fails to build, which only
/// happens with an unusable TLS backend.
#[must_use]
pub fn client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("logbook/0.1")
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .expect("reqwest client should build")
}

// --- File: crates/frontdesk_common/src/http/client.rs ---
use reqwest::{redirect::Policy, Client, Error as ReqwestError};
use std::time::Duration;

/// Longest upstream error body kept for a log line.
const MAX_ERROR_BODY: usize = 512;

/// Builds the outbound client used by the Google and GA4 adapters.
///
/// * `timeout_secs` - whole-request timeout, connect included
/// * `follow_redirects` - when false, 3xx responses are returned as-is
pub fn create_client(timeout_secs: u64, follow_redirects: bool) -> Result<Client, ReqwestError> {
    let redirects = if follow_redirects {
        Policy::limited(5)
    } else {
        Policy::none()
    };
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(redirects)
        .user_agent(concat!("frontdesk/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Body of a failed upstream response, cut to a loggable size.
pub async fn error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(text) => truncate_for_log(text),
        Err(e) => format!("<unreadable body: {e}>"),
    }
}

fn truncate_for_log(mut text: String) -> String {
    if text.len() <= MAX_ERROR_BODY {
        return text;
    }
    let mut cut = MAX_ERROR_BODY;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
    text.push('…');
    text
}

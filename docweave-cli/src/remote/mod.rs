//! HTTP implementations of the babel service traits.
//!
//!     google  Drive v3 and Docs v1 behind [`DocumentService`](docweave_babel::DocumentService)
//!     kroki   diagram rendering behind [`DiagramRenderer`](docweave_babel::DiagramRenderer)
//!     reader  URL to Markdown reader plus direct fetches behind [`WebSource`](docweave_babel::WebSource)
//!
//! All clients are blocking and share one configured timeout and user agent.

pub mod google;
pub mod kroki;
pub mod reader;

pub use google::GoogleWorkspace;
pub use kroki::KrokiClient;
pub use reader::HttpWebSource;

use docweave_babel::ServiceError;
use docweave_config::ServicesConfig;
use reqwest::blocking::{Client, Response};

/// Longest error body quoted back to the user.
const ERROR_BODY_LIMIT: usize = 300;

pub fn http_client(services: &ServicesConfig) -> Result<Client, ServiceError> {
    Client::builder()
        .user_agent(services.user_agent.clone())
        .timeout(services.timeout())
        .build()
        .map_err(|err| ServiceError::unreachable("HTTP client", err))
}

/// Map a transport failure to [`ServiceError::Unreachable`].
pub fn send_error(service: &str, err: reqwest::Error) -> ServiceError {
    ServiceError::unreachable(service, err)
}

/// Pass successful responses through; turn anything else into [`ServiceError::Status`]
/// carrying the start of the response body.
pub fn check_status(service: &str, response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ServiceError::Status {
        service: service.to_string(),
        status: status.as_u16(),
        message: truncate(body.trim(), ERROR_BODY_LIMIT),
    })
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

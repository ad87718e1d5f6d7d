use super::{check_status, send_error};
use docweave_babel::{DiagramRenderer, ServiceError};
use reqwest::blocking::Client;
use tracing::debug;

const SERVICE: &str = "Kroki";

/// Renders diagrams with `POST {base}/{kind}/{format}` and the source as plain text.
pub struct KrokiClient {
    client: Client,
    base_url: String,
}

impl KrokiClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, kind: &str, format: &str) -> String {
        format!("{}/{kind}/{format}", self.base_url)
    }
}

impl DiagramRenderer for KrokiClient {
    fn render(&self, kind: &str, format: &str, source: &str) -> Result<Vec<u8>, ServiceError> {
        let url = self.endpoint(kind, format);
        debug!(%url, bytes = source.len(), "rendering diagram");
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(source.to_string())
            .send()
            .map_err(|err| send_error(SERVICE, err))?;
        let response = check_status(SERVICE, response)?;
        let bytes = response
            .bytes()
            .map_err(|err| ServiceError::bad_response(SERVICE, err))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_kind_and_format() {
        let kroki = KrokiClient::new(Client::new(), "https://kroki.io/");
        assert_eq!(kroki.endpoint("graphviz", "svg"), "https://kroki.io/graphviz/svg");
    }
}

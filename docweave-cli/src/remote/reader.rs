use super::{check_status, send_error};
use docweave_babel::{ServiceError, WebSource};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::debug;

const READER: &str = "Reader service";
const WEB: &str = "Web server";

/// Web access for ingestion: the reader service for Markdown, plain GETs otherwise.
pub struct HttpWebSource {
    client: Client,
    reader_url: String,
}

impl HttpWebSource {
    pub fn new(client: Client, reader_url: &str) -> Self {
        Self {
            client,
            reader_url: reader_url.to_string(),
        }
    }

    /// The reader takes the target URL appended verbatim to its own.
    fn reader_endpoint(&self, url: &str) -> String {
        if self.reader_url.ends_with('/') {
            format!("{}{url}", self.reader_url)
        } else {
            format!("{}/{url}", self.reader_url)
        }
    }

    fn get(&self, service: &str, url: &str) -> Result<reqwest::blocking::Response, ServiceError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| send_error(service, err))?;
        check_status(service, response)
    }
}

impl WebSource for HttpWebSource {
    fn read_markdown(&self, url: &str) -> Result<String, ServiceError> {
        let endpoint = self.reader_endpoint(url);
        debug!(%endpoint, "fetching through reader");
        let response = self
            .client
            .get(&endpoint)
            .header(ACCEPT, "text/markdown")
            .send()
            .map_err(|err| send_error(READER, err))?;
        check_status(READER, response)?
            .text()
            .map_err(|err| ServiceError::bad_response(READER, err))
    }

    fn fetch_text(&self, url: &str) -> Result<String, ServiceError> {
        debug!(url, "fetching page");
        self.get(WEB, url)?
            .text()
            .map_err(|err| ServiceError::bad_response(WEB, err))
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        debug!(url, "downloading");
        let bytes = self
            .get(WEB, url)?
            .bytes()
            .map_err(|err| ServiceError::bad_response(WEB, err))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_endpoint_appends_target_url() {
        let web = HttpWebSource::new(Client::new(), "https://r.jina.ai/");
        assert_eq!(
            web.reader_endpoint("https://example.com/a?b=1"),
            "https://r.jina.ai/https://example.com/a?b=1"
        );
        let web = HttpWebSource::new(Client::new(), "http://localhost:8080");
        assert_eq!(
            web.reader_endpoint("https://example.com"),
            "http://localhost:8080/https://example.com"
        );
    }
}

//! OAuth credentials for the Google APIs.
//!
//! `credentials.json` holds the desktop client secrets downloaded from the cloud
//! console; `token.json` holds what the consent flow produced. Access tokens are
//! refreshed when they are within a minute of expiring. The consent flow is copy/paste:
//! the user opens the printed URL, approves, and pastes back either the code or the
//! whole URL the browser was redirected to.

use crate::paths::StatePaths;
use crate::remote::{check_status, send_error};
use chrono::{DateTime, Duration, Utc};
use docweave_babel::ServiceError;
use docweave_config::ServicesConfig;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use tracing::{debug, info};
use url::Url;

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/drive.file",
    "https://www.googleapis.com/auth/documents",
];

const REFRESH_MARGIN_SECS: i64 = 60;
const DEFAULT_REDIRECT: &str = "http://localhost";
const SERVICE: &str = "Google sign-in";

#[derive(Debug, Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

impl ClientSecrets {
    fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_REDIRECT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl StoredToken {
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - now <= Duration::seconds(REFRESH_MARGIN_SECS)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

impl TokenResponse {
    fn into_stored(self, previous_refresh: Option<String>, now: DateTime<Utc>) -> StoredToken {
        StoredToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            expires_at: now + Duration::seconds(self.expires_in),
            scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Hands out bearer tokens, loading, refreshing and persisting them on demand.
///
/// Nothing is read from disk until the first token is requested, so commands that
/// fail before talking to Google never require credentials.
pub struct Authenticator {
    client: Client,
    paths: StatePaths,
    auth_url: String,
    token_url: String,
    cached: RefCell<Option<StoredToken>>,
}

impl Authenticator {
    pub fn new(client: Client, paths: StatePaths, services: &ServicesConfig) -> Self {
        Self {
            client,
            paths,
            auth_url: services.oauth_auth_url.clone(),
            token_url: services.oauth_token_url.clone(),
            cached: RefCell::new(None),
        }
    }

    pub fn access_token(&self) -> Result<String, ServiceError> {
        let now = Utc::now();
        if let Some(token) = self.cached.borrow().as_ref() {
            if !token.needs_refresh(now) {
                return Ok(token.access_token.clone());
            }
        }

        let token = match self.load_token()? {
            Some(token) if !token.needs_refresh(now) => token,
            Some(token) if token.refresh_token.is_some() => self.refresh(token)?,
            _ if io::stdin().is_terminal() => self.authorize(&mut prompt_on_terminal)?,
            _ => {
                return Err(ServiceError::SetupRequired(
                    "Not signed in to Google. Run `docweave auth` first.".to_string(),
                ))
            }
        };
        let access = token.access_token.clone();
        *self.cached.borrow_mut() = Some(token);
        Ok(access)
    }

    /// Run the consent flow and store the resulting token.
    ///
    /// `prompt` receives the consent URL and returns what the user pasted back.
    pub fn authorize(
        &self,
        prompt: &mut dyn FnMut(&str) -> io::Result<String>,
    ) -> Result<StoredToken, ServiceError> {
        let secrets = self.load_secrets()?;
        let consent = consent_url(&self.auth_url, &secrets)?;
        let pasted = prompt(consent.as_str())
            .map_err(|err| ServiceError::SetupRequired(format!("Could not read the code: {err}")))?;
        let code = extract_code(&pasted).ok_or_else(|| {
            ServiceError::SetupRequired("No authorization code was given.".to_string())
        })?;

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("code", code.as_str()),
                ("client_id", secrets.client_id.as_str()),
                ("client_secret", secrets.client_secret.as_str()),
                ("redirect_uri", secrets.redirect_uri()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .map_err(|err| send_error(SERVICE, err))?;
        let token = parse_token_response(response)?.into_stored(None, Utc::now());
        self.save_token(&token)?;
        info!("stored new google token");
        Ok(token)
    }

    fn refresh(&self, token: StoredToken) -> Result<StoredToken, ServiceError> {
        let secrets = self.load_secrets()?;
        let refresh_token = token.refresh_token.unwrap_or_default();
        debug!("refreshing google token");
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("client_id", secrets.client_id.as_str()),
                ("client_secret", secrets.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .map_err(|err| send_error(SERVICE, err))?;
        let refreshed = match parse_token_response(response) {
            Ok(response) => response.into_stored(Some(refresh_token), Utc::now()),
            Err(ServiceError::Status { status, .. }) if status == 400 || status == 401 => {
                return Err(ServiceError::SetupRequired(
                    "The stored Google token was revoked or expired. Run `docweave auth` to sign in again."
                        .to_string(),
                ))
            }
            Err(err) => return Err(err),
        };
        self.save_token(&refreshed)?;
        Ok(refreshed)
    }

    fn load_secrets(&self) -> Result<ClientSecrets, ServiceError> {
        let path = self.paths.credentials();
        let text = fs::read_to_string(&path)
            .map_err(|_| ServiceError::SetupRequired(setup_instructions(&path)))?;
        parse_secrets(&text).ok_or_else(|| {
            ServiceError::SetupRequired(format!(
                "{} is not an OAuth desktop client file.\n\n{}",
                path.display(),
                setup_instructions(&path)
            ))
        })
    }

    fn load_token(&self) -> Result<Option<StoredToken>, ServiceError> {
        let path = self.paths.token();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(ServiceError::SetupRequired(format!(
                    "Cannot read {}: {err}",
                    path.display()
                )))
            }
        };
        // A token file we cannot parse is as good as none.
        Ok(serde_json::from_str(&text).ok())
    }

    fn save_token(&self, token: &StoredToken) -> Result<(), ServiceError> {
        let path = self.paths.token();
        let write = || -> io::Result<()> {
            fs::create_dir_all(self.paths.root())?;
            let json = serde_json::to_string_pretty(token)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            fs::write(&path, json)?;
            restrict_permissions(&path)
        };
        write().map_err(|err| {
            ServiceError::SetupRequired(format!("Cannot write {}: {err}", path.display()))
        })
    }
}

fn parse_token_response(
    response: reqwest::blocking::Response,
) -> Result<TokenResponse, ServiceError> {
    check_status(SERVICE, response)?
        .json()
        .map_err(|err| ServiceError::bad_response(SERVICE, err))
}

fn parse_secrets(text: &str) -> Option<ClientSecrets> {
    let file: SecretsFile = serde_json::from_str(text).ok()?;
    file.installed.or(file.web)
}

pub fn consent_url(auth_url: &str, secrets: &ClientSecrets) -> Result<Url, ServiceError> {
    let scope = SCOPES.join(" ");
    Url::parse_with_params(
        auth_url,
        &[
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", secrets.redirect_uri()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|err| ServiceError::SetupRequired(format!("Invalid OAuth endpoint {auth_url}: {err}")))
}

/// The authorization code from a pasted redirect URL, or the pasted text itself.
pub fn extract_code(pasted: &str) -> Option<String> {
    let pasted = pasted.trim();
    if pasted.is_empty() {
        return None;
    }
    match Url::parse(pasted) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned()),
        Err(_) => Some(pasted.to_string()),
    }
}

pub fn setup_instructions(credentials: &Path) -> String {
    format!(
        "Missing credentials file: {}\n\n\
        Setup:\n  \
        1. Go to https://console.cloud.google.com/\n  \
        2. Create a project, enable the Drive API and the Docs API\n  \
        3. Create OAuth 2.0 credentials (Desktop app)\n  \
        4. Save the JSON as {}\n  \
        5. Run `docweave auth`",
        credentials.display(),
        credentials.display()
    )
}

/// Print the consent URL on stderr and read one line from stdin.
pub fn prompt_on_terminal(url: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    writeln!(stderr, "Open this URL in a browser and approve access:\n\n  {url}\n")?;
    write!(
        stderr,
        "Paste the code (or the full URL you were redirected to): "
    )?;
    stderr.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

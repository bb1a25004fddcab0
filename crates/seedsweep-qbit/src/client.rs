//! HTTP client for the qBittorrent Web API (v2).
//!
//! Authentication uses the cookie-based login endpoint; the cookie store on
//! the underlying client carries the `SID` cookie across calls. Each public
//! operation logs in first, which keeps the client stateless with respect to
//! session expiry.

use reqwest::{Client, Url};
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::model::{Torrent, Tracker};
use crate::traits::{TorrentRemover, TorrentSource};

/// Client for a single qBittorrent Web API endpoint.
#[derive(Debug, Clone)]
pub struct QbitClient {
    http: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl QbitClient {
    /// Build a client for the given base URL and credentials.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::BaseUrl` when the URL does not parse.
    pub fn new(base_url: &str, username: &str, password: &str) -> ClientResult<Self> {
        let mut parsed: Url = base_url.parse().map_err(|_| ClientError::BaseUrl {
            value: base_url.to_string(),
        })?;
        if !parsed.path().ends_with('/') {
            parsed.set_path(&format!("{}/", parsed.path()));
        }
        let http = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|source| ClientError::Http {
                operation: "build_client",
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self {
            http,
            base_url: parsed,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url.join(path).map_err(|_| ClientError::BaseUrl {
            value: format!("{}{path}", self.base_url),
        })
    }

    async fn login(&self) -> ClientResult<()> {
        let url = self.endpoint("api/v2/auth/login")?;
        let response = self
            .http
            .post(url.clone())
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await
            .map_err(|source| ClientError::Http {
                operation: "login",
                url: url.to_string(),
                source,
            })?;
        if response.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized {
                url: url.to_string(),
            });
        }
        let status = response.status();
        let body = response.text().await.map_err(|source| ClientError::Http {
            operation: "login",
            url: url.to_string(),
            source,
        })?;
        // The API answers 200 with a literal "Fails." body on bad credentials.
        if !status.is_success() || body.trim() != "Ok." {
            return Err(ClientError::Unauthorized {
                url: url.to_string(),
            });
        }
        Ok(())
    }

    async fn fetch_trackers(&self, hash: &str) -> ClientResult<Vec<Tracker>> {
        let url = self.endpoint("api/v2/torrents/trackers")?;
        let response = self
            .http
            .get(url.clone())
            .query(&[("hash", hash)])
            .send()
            .await
            .map_err(|source| ClientError::Http {
                operation: "fetch_trackers",
                url: url.to_string(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(ClientError::HttpStatus {
                operation: "fetch_trackers",
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|source| ClientError::Decode {
                operation: "fetch_trackers",
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait::async_trait]
impl TorrentSource for QbitClient {
    async fn fetch_all(&self) -> ClientResult<Vec<Torrent>> {
        self.login().await?;
        let url = self.endpoint("api/v2/torrents/info")?;
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ClientError::Http {
                operation: "fetch_torrents",
                url: url.to_string(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(ClientError::HttpStatus {
                operation: "fetch_torrents",
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        let mut torrents: Vec<Torrent> =
            response
                .json()
                .await
                .map_err(|source| ClientError::Decode {
                    operation: "fetch_torrents",
                    url: url.to_string(),
                    source,
                })?;
        for torrent in &mut torrents {
            torrent.trackers = self.fetch_trackers(&torrent.hash).await?;
        }
        debug!(torrents = torrents.len(), "fetched torrent snapshot");
        Ok(torrents)
    }
}

#[async_trait::async_trait]
impl TorrentRemover for QbitClient {
    async fn remove_keeping_data(&self, hash: &str) -> ClientResult<()> {
        self.login().await?;
        let url = self.endpoint("api/v2/torrents/delete")?;
        let response = self
            .http
            .post(url.clone())
            .form(&[("hashes", hash), ("deleteFiles", "false")])
            .send()
            .await
            .map_err(|source| ClientError::Http {
                operation: "remove_torrent",
                url: url.to_string(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(ClientError::HttpStatus {
                operation: "remove_torrent",
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        debug!(hash, "removed torrent record");
        Ok(())
    }
}

//! HTTP client for the two archive endpoints the bridge relies on.

use std::collections::HashMap;

use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use swh_bridge_core::{CandidateSet, Swhid};
use thiserror::Error;
use tracing::debug;

use crate::config::BridgeConfig;

const KNOWN_PATH: &str = "/api/1/known/";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0} not found in the archive")]
    NotFound(Swhid),
    #[error("unexpected response status: {0}")]
    UnexpectedStatus(StatusCode),
    #[error("archive request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Deserialize, Debug)]
struct KnownStatus {
    known: bool,
}

/// Client for the Software Heritage web API.
///
/// Requests are never retried.
#[derive(Clone, Debug)]
pub struct ArchiveClient {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl ArchiveClient {
    pub fn new(config: &BridgeConfig) -> Result<Self, reqwest::Error> {
        let mut builder = ClientBuilder::new();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// The API is rooted at the host, so `path` replaces any path in the base URL.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Asks the archive which candidates exist, in a single request.
    /// Returns the first known candidate, in candidate order.
    pub async fn probe_existence(
        &self,
        candidates: &CandidateSet,
    ) -> Result<Option<Swhid>, ClientError> {
        if candidates.is_empty() {
            return Ok(None);
        }

        debug!("probing {} candidates", candidates.len());

        let response = self
            .authorize(self.client.post(self.endpoint(KNOWN_PATH)))
            .json(candidates.as_slice())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus(status));
        }

        let known = response.json::<HashMap<String, KnownStatus>>().await?;

        let found = candidates
            .iter()
            .find(|swhid| {
                known
                    .get(&swhid.to_string())
                    .is_some_and(|status| status.known)
            })
            .copied();

        match &found {
            Some(swhid) => debug!("found {}", swhid),
            None => debug!("no candidate known"),
        }

        Ok(found)
    }

    /// Downloads the raw bytes of an object.
    pub async fn fetch_content(&self, swhid: &Swhid) -> Result<Vec<u8>, ClientError> {
        debug!("fetching {}", swhid);

        let url = self.endpoint(&format!("/api/1/raw/{}/", swhid));
        let response = self.authorize(self.client.get(url)).send().await?;

        let status = response.status();
        match status {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(ClientError::NotFound(*swhid)),
            // Only a 200 carries the object, even among success codes.
            _ => return Err(ClientError::UnexpectedStatus(status)),
        }

        let data = response.bytes().await?.to_vec();

        debug!("fetched {} ({} bytes)", swhid, data.len());

        Ok(data)
    }
}

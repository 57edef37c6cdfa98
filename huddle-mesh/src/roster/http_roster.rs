use crate::error::MeshError;
use crate::roster::RosterSource;
use async_trait::async_trait;
use huddle_core::utils::ROSTER_PATH;
use huddle_core::{PeerName, RoomId};
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

/// `GET {base}/roster/{roomId}` → `["name", ...]`.
#[derive(Debug, Clone)]
pub struct HttpRoster {
    client: reqwest::Client,
    base: Url,
}

impl HttpRoster {
    pub fn new(base: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    pub fn roster_url(&self, room: &RoomId) -> Result<Url, MeshError> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| MeshError::RosterFetchFailed(format!("{} cannot be a base url", self.base)))?
            .pop_if_empty()
            .push(ROSTER_PATH)
            .push(room.as_str());
        Ok(url)
    }
}

#[async_trait]
impl RosterSource for HttpRoster {
    async fn fetch(&self, room: &RoomId) -> Result<Vec<PeerName>, MeshError> {
        let url = self.roster_url(room)?;
        debug!("Fetching roster from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MeshError::RosterFetchFailed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(MeshError::RosterFetchFailed(format!("room {room} not found")));
            }
            status if !status.is_success() => {
                return Err(MeshError::RosterFetchFailed(format!(
                    "unexpected status {status}"
                )));
            }
            _ => {}
        }

        response
            .json::<Vec<PeerName>>()
            .await
            .map_err(|e| MeshError::RosterFetchFailed(format!("malformed roster: {e}")))
    }
}

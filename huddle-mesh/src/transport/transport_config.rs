use huddle_core::IceServerConfig;
use huddle_core::utils::DEFAULT_STUN_ADDR;
use webrtc::ice_transport::ice_server::RTCIceServer;

pub const ENV_STUN_URLS: &str = "HUDDLE_STUN_URLS";
pub const ENV_TURN_URLS: &str = "HUDDLE_TURN_URLS";
pub const ENV_TURN_USERNAME: &str = "HUDDLE_TURN_USERNAME";
pub const ENV_TURN_CREDENTIAL: &str = "HUDDLE_TURN_CREDENTIAL";

/// Конфигурация для WebRTC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::stun(vec![DEFAULT_STUN_ADDR.to_owned()])],
        }
    }
}

impl TransportConfig {
    /// No ICE servers at all: host candidates only.
    pub fn host_only() -> Self {
        Self {
            ice_servers: Vec::new(),
        }
    }

    pub fn with_stun(mut self, urls: Vec<String>) -> Self {
        self.ice_servers.retain(|s| s.username.is_some());
        if !urls.is_empty() {
            self.ice_servers.insert(0, IceServerConfig::stun(urls));
        }
        self
    }

    pub fn with_turn(
        mut self,
        urls: Vec<String>,
        username: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        self.ice_servers
            .push(IceServerConfig::turn(urls, username.into(), credential.into()));
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// TURN is added only when urls, username and credential are all present.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(stun) = lookup(ENV_STUN_URLS) {
            config = config.with_stun(split_urls(&stun));
        }

        let turn = (
            lookup(ENV_TURN_URLS),
            lookup(ENV_TURN_USERNAME),
            lookup(ENV_TURN_CREDENTIAL),
        );
        if let (Some(urls), Some(username), Some(credential)) = turn {
            let urls = split_urls(&urls);
            if !urls.is_empty() {
                config = config.with_turn(urls, username, credential);
            }
        }

        config
    }

    pub fn rtc_ice_servers(&self) -> Vec<RTCIceServer> {
        self.ice_servers
            .iter()
            .map(|server| RTCIceServer {
                urls: server.urls.clone(),
                username: server.username.clone().unwrap_or_default(),
                credential: server.credential.clone().unwrap_or_default(),
            })
            .collect()
    }
}

fn split_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub retry: RetryDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            retry: RetryDefaults::default(),
        }
    }
}

/// Remote collaborators the client talks to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Base URL of the HomeHero REST backend.
    pub backend_url: String,
    /// Base URL of the identity provider's HTTP API.
    pub identity_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            backend_url: "https://home-hero-server-zeta.vercel.app".to_string(),
            identity_url: "https://identity.homehero.app".to_string(),
        }
    }
}

/// Retry knobs for resilient collection reads.
///
/// The backend host cold-starts, so reads retry every failure with a fixed
/// delay. Mutations never retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryDefaults {
    /// Total attempt budget per read, including the first try.
    pub max_attempts: u32,
    /// Fixed delay between attempts in milliseconds.
    pub base_delay_ms: u64,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for RetryDefaults {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_ms: 300,
            timeout_seconds: 15,
        }
    }
}

// ── Client configuration ──
//
// Everything needed to open a session: credentials, account tier, the
// endpoint a transport should bind to, and the default delivery delay.

use secrecy::SecretString;

use pureresponse_api::{AccountTier, Endpoint};

use crate::schedule::ScheduleDelay;

/// Resolved configuration for a [`PureResponseClient`](crate::PureResponseClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub username: String,
    pub password: SecretString,
    pub tier: AccountTier,
    /// Informational for the transport; the client itself never reads it.
    pub endpoint: Endpoint,
    /// Used by `send_to_list` when no explicit delay is given.
    pub schedule_delay: ScheduleDelay,
}

impl ClientConfig {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
            tier: AccountTier::default(),
            endpoint: Endpoint::default(),
            schedule_delay: ScheduleDelay::default(),
        }
    }

    pub fn with_tier(mut self, tier: AccountTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_schedule_delay(mut self, delay: ScheduleDelay) -> Self {
        self.schedule_delay = delay;
        self
    }
}

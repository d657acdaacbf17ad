use crate::input::InputMode;
use crate::network::endpoint_label;
use shared::{WireLimits, DEFAULT_ADDR, DEFAULT_PORT};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_addr: String,
    pub port: u16,
    /// `None` waits forever for the next snapshot.
    pub read_timeout: Option<Duration>,
    pub input_mode: InputMode,
    pub limits: WireLimits,
    pub window_width: usize,
    pub window_height: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_ADDR.to_string(),
            port: DEFAULT_PORT,
            read_timeout: Some(Duration::from_secs(10)),
            input_mode: InputMode::default(),
            limits: WireLimits::default(),
            window_width: 1440,
            window_height: 900,
        }
    }
}

impl ClientConfig {
    pub fn endpoint(&self) -> String {
        endpoint_label(&self.server_addr, self.port)
    }
}

use serde::Deserialize;

/// Listening socket for the HTTP API
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Public prefix for short URLs when `BASE_URL` is not set
    pub fn default_base_url(&self) -> String {
        format!("http://{}", self.addr())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

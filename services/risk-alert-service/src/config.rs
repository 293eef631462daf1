use risk_alert_common::env_or;

pub const SERVICE_NAME: &str = "risk-alert-service";

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Request body cap for `/upload`, enforced by the framework body limit.
    pub upload_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env_or("PORT", DEFAULT_PORT),
            upload_limit_bytes: env_or("UPLOAD_LIMIT_BYTES", DEFAULT_UPLOAD_LIMIT_BYTES),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            upload_limit_bytes: DEFAULT_UPLOAD_LIMIT_BYTES,
        }
    }
}

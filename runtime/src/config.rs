//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default listen port (5000 collides with AirPlay Receiver on macOS).
pub const DEFAULT_PORT: u16 = 5001;
/// Default model artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "model/svm_model_finger.json";
/// Default directory holding `templates/` and `static/`.
pub const DEFAULT_WEB_ROOT: &str = "web";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Model artifact path.
    pub model_path: PathBuf,
    /// Directory with page templates and static assets.
    pub web_root: PathBuf,
    /// Enable permissive CORS.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            web_root: PathBuf::from(DEFAULT_WEB_ROOT),
            cors: true,
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.web_root.join("templates")
    }

    pub fn static_dir(&self) -> PathBuf {
        self.web_root.join("static")
    }
}

/// Builder for ServerConfig.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    model_path: Option<PathBuf>,
    web_root: Option<PathBuf>,
    cors: Option<bool>,
}

impl ServerConfigBuilder {
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    pub fn web_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.web_root = Some(path.into());
        self
    }

    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = Some(enabled);
        self
    }

    pub fn build(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            addr: self.addr.unwrap_or(defaults.addr),
            model_path: self.model_path.unwrap_or(defaults.model_path),
            web_root: self.web_root.unwrap_or(defaults.web_root),
            cors: self.cors.unwrap_or(defaults.cors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr.port(), 5001);
        assert_eq!(config.model_path, PathBuf::from("model/svm_model_finger.json"));
        assert_eq!(config.templates_dir(), PathBuf::from("web/templates"));
        assert!(config.cors);
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::builder()
            .addr("127.0.0.1:3000".parse().unwrap())
            .model_path("/srv/model.json")
            .web_root("/srv/web")
            .cors(false)
            .build();

        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.model_path, PathBuf::from("/srv/model.json"));
        assert_eq!(config.static_dir(), PathBuf::from("/srv/web/static"));
        assert!(!config.cors);
    }
}

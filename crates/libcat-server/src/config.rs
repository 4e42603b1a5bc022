use crate::error::Result;
pub use clap::Parser;
use libcat_types::config::BackendConfig;
use url::Url;

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about = "REST server for library catalog - books, members, issues and returns")]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 5000,
        env = "LIBCAT_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "LIBCAT_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "LIBCAT_BASE_URL",
        default_value = "http://localhost:5000",
        help = "Base URL of server, as visible to clients"
    )]
    pub base_url: Url,

    #[command(flatten)]
    pub backend: BackendConfig,

    #[arg(long, env = "LIBCAT_CORS", help = "Enable permissive CORS")]
    pub cors: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn database_url(&self) -> String {
        self.backend.database_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config =
            ServerConfig::try_parse_from(["libcat-server", "--data-dir", "/tmp/libcat"]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.listen_address, "127.0.0.1");
        assert_eq!(config.base_url.as_str(), "http://localhost:5000/");
        assert_eq!(config.database_url(), "sqlite:///tmp/libcat/libcat.db");
        assert!(!config.cors);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::try_parse_from([
            "libcat-server",
            "--port",
            "8080",
            "--listen-address",
            "0.0.0.0",
            "--database-url",
            "sqlite::memory:",
            "--cors",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.listen_address, "0.0.0.0");
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert!(config.cors);
    }
}

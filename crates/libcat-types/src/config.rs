use clap::Parser;
use std::{fs, path::PathBuf};

#[derive(Debug, Clone, Parser)]
pub struct BackendConfig {
    #[arg(
        long,
        env = "LIBCAT_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/libcat.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "LIBCAT_DATA_DIR",
        help = "Data directory (database etc.), default is system default like ~/.local/share/libcat",
        default_value_t = default_data_dir()
    )]
    data_dir: String,
}

pub fn default_data_dir() -> String {
    let dir = dirs::data_dir()
        .map(|p| p.join("libcat"))
        .unwrap_or_else(|| PathBuf::from("libcat"));

    // errors surface later, when the database is opened
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }

    dir.to_string_lossy().to_string()
}

impl BackendConfig {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        database_url_for(self.database_url.as_deref(), &self.data_dir)
    }
}

pub fn database_url_for(explicit: Option<&str>, data_dir: &str) -> String {
    explicit
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("sqlite://{}/libcat.db", data_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_url() {
        let config =
            BackendConfig::try_parse_from(["libcat", "--data-dir", "/tmp/libcat-test"]).unwrap();
        assert_eq!(config.database_url(), "sqlite:///tmp/libcat-test/libcat.db");
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/libcat-test"));
    }

    #[test]
    fn test_explicit_database_url() {
        let config = BackendConfig::try_parse_from([
            "libcat",
            "--database-url",
            "sqlite::memory:",
            "--data-dir",
            "/tmp/libcat-test",
        ])
        .unwrap();
        assert_eq!(config.database_url(), "sqlite::memory:");
    }
}

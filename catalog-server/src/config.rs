/// Catalog server configuration
///
/// All settings can be overridden through environment variables:
///
/// | Env var | Default | Meaning |
/// |---------|---------|---------|
/// | WORK_DIR | ./work_dir | working directory for database and logs |
/// | DATABASE_FILE | catalog.db | SQLite file name inside WORK_DIR |
/// | LOG_LEVEL | info | tracing filter when RUST_LOG is unset |
/// | LOG_JSON | false | JSON log format (production) |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database file and logs
    pub work_dir: String,
    /// SQLite file name inside the working directory
    pub database_file: String,
    /// Log level: trace | debug | info | warn | error
    pub log_level: String,
    /// JSON log output
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            database_file: std::env::var("DATABASE_FILE").unwrap_or_else(|_| "catalog.db".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Full path of the SQLite database file
    pub fn database_path(&self) -> String {
        format!("{}/{}", self.work_dir, self.database_file)
    }

    /// Directory for rotating file logs
    pub fn log_dir(&self) -> String {
        format!("{}/logs", self.work_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_joins_work_dir() {
        let config = Config {
            work_dir: "/var/lib/catalog".into(),
            database_file: "catalog.db".into(),
            log_level: "info".into(),
            log_json: false,
        };
        assert_eq!(config.database_path(), "/var/lib/catalog/catalog.db");
        assert_eq!(config.log_dir(), "/var/lib/catalog/logs");
    }
}

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the ticket dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ticket file is not well-formed CSV.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the ticket file header.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A year selection value is not a calendar year.
    #[error("Invalid year selection: {0}")]
    InvalidSelection(String),

    /// A JSON document could not be serialised or parsed.
    #[error("Failed to serialise JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// The terminal could not be set up, drawn to or read from.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DashboardError::FileRead {
            path: PathBuf::from("/some/Clientes_Tickets.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/Clientes_Tickets.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = DashboardError::MissingColumn("Fecha_tiquet".to_string());
        assert_eq!(err.to_string(), "Missing required column: Fecha_tiquet");
    }

    #[test]
    fn test_error_display_invalid_selection() {
        let err = DashboardError::InvalidSelection("20x3".to_string());
        assert_eq!(err.to_string(), "Invalid year selection: 20x3");
    }

    #[test]
    fn test_error_display_terminal() {
        let err = DashboardError::Terminal("raw mode unavailable".to_string());
        assert_eq!(err.to_string(), "Terminal error: raw mode unavailable");
    }

    #[test]
    fn test_error_display_config() {
        let err = DashboardError::Config("cutoff month out of range".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: cutoff month out of range"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DashboardError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(err.to_string().contains("Failed to serialise JSON"));
    }

    #[test]
    fn test_error_from_csv() {
        let data = "a,b\n1,2,3\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let csv_err = rdr
            .records()
            .find_map(|r| r.err())
            .expect("ragged row must fail");
        let err: DashboardError = csv_err.into();
        assert!(err.to_string().starts_with("Failed to parse CSV"));
    }
}

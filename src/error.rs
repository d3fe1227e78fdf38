// src/error.rs
use std::fmt;

/// Errors raised while loading survey data or computing statistics.
#[derive(Debug)]
pub enum HygieneError {
    /// Data file does not exist
    FileNotFound(String),

    /// Data file exists but could not be read
    Io(std::io::Error),

    /// Declared encoding label is not known to encoding_rs
    UnknownEncoding(String),

    /// File bytes are not valid under the chosen encoding
    Undecodable { path: String, encoding: String },

    /// File holds no header row
    EmptyFile(String),

    /// Malformed CSV content
    Csv(csv::Error),

    /// Required columns absent from the header
    MissingColumns(Vec<String>),

    /// Statistic requested on an empty sample
    InsufficientSample,

    /// Argument outside its valid domain
    InvalidArgument(String),

    /// Distribution construction failed inside statrs
    Statistics(String),

    /// Settings could not be read, merged or written
    Config(String),
}

impl HygieneError {
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            HygieneError::FileNotFound(_)
                | HygieneError::Io(_)
                | HygieneError::UnknownEncoding(_)
                | HygieneError::Undecodable { .. }
                | HygieneError::EmptyFile(_)
                | HygieneError::Csv(_)
        )
    }

    pub fn is_schema_error(&self) -> bool {
        matches!(self, HygieneError::MissingColumns(_))
    }

    /// Short message shown in the dashboard.
    pub fn user_message(&self) -> String {
        match self {
            HygieneError::FileNotFound(path) => {
                format!("Erreur lors du chargement des données: fichier introuvable ({path})")
            }
            HygieneError::Io(err) => {
                format!("Erreur lors du chargement des données: lecture impossible ({err})")
            }
            HygieneError::UnknownEncoding(label) => format!("Encodage inconnu: {label}"),
            HygieneError::Undecodable { encoding, .. } => {
                format!("Erreur lors du chargement des données: contenu invalide en {encoding}")
            }
            HygieneError::EmptyFile(_) => {
                "Erreur lors du chargement des données: fichier vide".to_string()
            }
            HygieneError::Csv(err) => format!("Erreur lors du chargement des données: {err}"),
            HygieneError::MissingColumns(columns) => {
                format!("Colonnes manquantes: {}", columns.join(", "))
            }
            HygieneError::InsufficientSample => {
                "Échantillon vide: statistique non calculable".to_string()
            }
            HygieneError::InvalidArgument(msg) => format!("Paramètre invalide: {msg}"),
            HygieneError::Statistics(msg) => format!("Erreur statistique: {msg}"),
            HygieneError::Config(msg) => format!("Erreur de configuration: {msg}"),
        }
    }
}

impl fmt::Display for HygieneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HygieneError::FileNotFound(path) => write!(f, "File not found: {path}"),
            HygieneError::Io(err) => write!(f, "IO error: {err}"),
            HygieneError::UnknownEncoding(label) => write!(f, "Unknown encoding: {label}"),
            HygieneError::Undecodable { path, encoding } => {
                write!(f, "Cannot decode {path} as {encoding}")
            }
            HygieneError::EmptyFile(path) => write!(f, "Empty data file: {path}"),
            HygieneError::Csv(err) => write!(f, "CSV error: {err}"),
            HygieneError::MissingColumns(columns) => {
                write!(f, "Missing columns: {}", columns.join(", "))
            }
            HygieneError::InsufficientSample => write!(f, "Insufficient sample: total is zero"),
            HygieneError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            HygieneError::Statistics(msg) => write!(f, "Statistics error: {msg}"),
            HygieneError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for HygieneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HygieneError::Io(err) => Some(err),
            HygieneError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HygieneError {
    fn from(err: std::io::Error) -> Self {
        HygieneError::Io(err)
    }
}

impl From<csv::Error> for HygieneError {
    fn from(err: csv::Error) -> Self {
        HygieneError::Csv(err)
    }
}

impl From<config::ConfigError> for HygieneError {
    fn from(err: config::ConfigError) -> Self {
        HygieneError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HygieneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_families() {
        assert!(HygieneError::FileNotFound("data.csv".into()).is_load_error());
        assert!(HygieneError::EmptyFile("data.csv".into()).is_load_error());
        assert!(!HygieneError::InsufficientSample.is_load_error());

        let schema = HygieneError::MissingColumns(vec!["Existence_BPH".into()]);
        assert!(schema.is_schema_error());
        assert!(!schema.is_load_error());
    }

    #[test]
    fn test_error_display() {
        let err = HygieneError::MissingColumns(vec!["A".into(), "B".into()]);
        assert_eq!(format!("{err}"), "Missing columns: A, B");
        assert_eq!(err.user_message(), "Colonnes manquantes: A, B");
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        match HygieneError::from(io_error) {
            HygieneError::Io(_) => {}
            other => panic!("Expected Io variant, got {other:?}"),
        }
    }
}

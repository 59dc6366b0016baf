/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised while assembling a specification
#[derive(Debug)]
pub enum Error {
    /// Malformed schema or operation metadata, raised at declaration time
    Declaration(String),
    /// A record declaration would expand inline into itself
    CyclicSchema { type_name: String },
    /// The assembled document could not be serialized
    Serialization(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Declaration(msg) => write!(f, "invalid declaration: {}", msg),
            Error::CyclicSchema { type_name } => {
                write!(f, "cyclic schema: {} expands inline into itself", type_name)
            }
            Error::Serialization(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_declaration() {
        let err = Error::Declaration("field name is empty".to_string());
        assert_eq!(err.to_string(), "invalid declaration: field name is empty");
    }

    #[test]
    fn test_display_cyclic_schema() {
        let err = Error::CyclicSchema {
            type_name: "Node".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cyclic schema: Node expands inline into itself"
        );
    }
}

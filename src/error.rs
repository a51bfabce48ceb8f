use thiserror::Error;

/// Main error type for facetql operations
#[derive(Error, Debug)]
pub enum FacetqlError {
    #[error("Property could not be resolved: {0}")]
    PropertyResolution(String),

    #[error("Invalid specification at `{path}`: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid query document: {0}")]
    InvalidQuery(String),

    #[error("Chained filter on `{0}` was compiled before being resolved")]
    UnresolvedChain(String),

    #[error("Search request failed: {0}")]
    Search(String),

    #[error("Invalid search configuration: {0}")]
    Config(String),
}

/// Result type alias for facetql operations
pub type Result<T> = std::result::Result<T, FacetqlError>;

impl FacetqlError {
    /// Build a parse error for a dotted field path
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        FacetqlError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = FacetqlError::parse("filter.0.key", "expected a string");
        assert_eq!(
            err.to_string(),
            "Invalid specification at `filter.0.key`: expected a string"
        );
    }

    #[test]
    fn test_resolution_error_display() {
        let err = FacetqlError::PropertyResolution("Foobar".to_string());
        assert_eq!(err.to_string(), "Property could not be resolved: Foobar");
    }
}

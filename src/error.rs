//! Error types for the structure reconstruction engine.
//!
//! Only the ingestion boundary, configuration loading and chunker construction
//! surface these errors to callers. Everything past ingestion degrades to a
//! well-formed (possibly empty) document instead.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconstructing document structure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source document could not be opened or decoded at all
    #[error("Ingestion failed: {0}")]
    Ingestion(String),

    /// A single page could not be extracted
    #[error("Failed to extract page {page}: {reason}")]
    PageExtraction {
        /// Zero-based page index
        page: usize,
        /// Reason reported by the extractor
        reason: String,
    },

    /// A page could not be rendered for OCR
    #[error("Failed to render page {page}: {reason}")]
    Render {
        /// Zero-based page index
        page: usize,
        /// Reason reported by the renderer
        reason: String,
    },

    /// Text recognition failed for a rendered page
    #[error("Failed to recognize page {page}: {reason}")]
    Recognition {
        /// Zero-based page index
        page: usize,
        /// Reason reported by the recognizer
        reason: String,
    },

    /// Configuration value out of range or inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingestion_error() {
        let err = Error::Ingestion("file not found".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Ingestion failed"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_page_extraction_error() {
        let err = Error::PageExtraction {
            page: 4,
            reason: "broken content stream".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("page 4"));
        assert!(msg.contains("broken content stream"));
    }

    #[test]
    fn test_render_and_recognition_errors() {
        let render = Error::Render {
            page: 1,
            reason: "out of memory".to_string(),
        };
        assert!(format!("{}", render).contains("render page 1"));

        let ocr = Error::Recognition {
            page: 2,
            reason: "language pack missing".to_string(),
        };
        assert!(format!("{}", ocr).contains("recognize page 2"));
    }

    #[test]
    fn test_invalid_config_error() {
        let err = Error::InvalidConfig("band_ratio must be in (0, 0.5]".to_string());
        assert!(format!("{}", err).contains("band_ratio"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(format!("{}", err).contains("JSON error"));
    }
}

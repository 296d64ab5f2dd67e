//! Split types
//!
//! Request, payload and error types shared by the split pipeline.

use std::path::PathBuf;

use axum::body::Bytes;

// ============================================================================
// Constants
// ============================================================================

/// Name of the per-workspace directory that receives extracted artifacts
pub const OUTPUT_DIR_NAME: &str = "output";

/// Download name used when more than one artifact is produced
pub const ARCHIVE_FILE_NAME: &str = "split_files.zip";

/// Prefix of every extracted artifact file name
pub const ARTIFACT_PREFIX: &str = "pages_";

/// Extension of every extracted artifact file name
pub const ARTIFACT_EXTENSION: &str = ".pdf";

/// Fallback basename for uploads whose filename has no usable characters
pub const FALLBACK_UPLOAD_NAME: &str = "upload.pdf";

// ============================================================================
// Request Types
// ============================================================================

/// The uploaded document
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied filename (display and storage naming only)
    pub filename: String,

    /// Opaque document bytes
    pub data: Bytes,
}

impl Upload {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// Raw form input for one split request, before validation
#[derive(Debug, Clone, Default)]
pub struct SplitRequest {
    /// The `file` field, if the form had one
    pub file: Option<Upload>,

    /// The `ranges` field, if the form had one
    pub ranges: Option<String>,
}

// ============================================================================
// Result Types
// ============================================================================

/// One successfully extracted output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Range text the artifact was extracted with
    pub range: String,

    /// File name inside the output directory
    pub file_name: String,

    /// Full path of the file
    pub path: PathBuf,

    /// Size in bytes (always > 0)
    pub size: u64,
}

/// Fully materialized response body
#[derive(Debug, Clone)]
pub enum SplitPayload {
    /// Exactly one range was requested
    Single { file_name: String, data: Vec<u8> },

    /// Two or more ranges, bundled as a zip archive
    Archive {
        file_name: String,
        data: Vec<u8>,
        entries: usize,
    },
}

impl SplitPayload {
    /// Download name for the Content-Disposition header
    pub fn file_name(&self) -> &str {
        match self {
            Self::Single { file_name, .. } | Self::Archive { file_name, .. } => file_name,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Single { .. } => "application/pdf",
            Self::Archive { .. } => "application/zip",
        }
    }

    pub fn data(&self) -> &[u8] {
        match self {
            Self::Single { data, .. } | Self::Archive { data, .. } => data,
        }
    }

    pub fn into_data(self) -> Vec<u8> {
        match self {
            Self::Single { data, .. } | Self::Archive { data, .. } => data,
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Split error types
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("No file part in the request")]
    MissingFile,

    #[error("No file selected")]
    EmptyFilename,

    #[error("Invalid file type, please upload a PDF")]
    InvalidFileType(String),

    #[error("No page ranges provided")]
    MissingRanges,

    #[error("No pages were extracted. Please check your page ranges.")]
    NoPagesExtracted,

    #[error("Failed to read upload: {0}")]
    MalformedUpload(String),

    #[error("File too large")]
    UploadTooLarge,

    #[error("Failed to process range '{range}': no output produced by {tool}")]
    ExtractionFailed {
        range: String,
        tool: String,
        diagnostics: String,
    },

    #[error("Page extractor unavailable: {0}")]
    ExtractorUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SplitError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::EmptyFilename => StatusCode::BAD_REQUEST,
            Self::InvalidFileType(_) => StatusCode::BAD_REQUEST,
            Self::MissingRanges => StatusCode::BAD_REQUEST,
            Self::NoPagesExtracted => StatusCode::BAD_REQUEST,
            Self::MalformedUpload(_) => StatusCode::BAD_REQUEST,
            Self::UploadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ExtractionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ExtractorUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Archive(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller sent something unusable (as opposed to a server fault)
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl From<tokio::task::JoinError> for SplitError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(format!("Background task failed: {}", e))
    }
}

//! Page Extractor
//!
//! The capability that materializes a PDF holding a selected page range.
//! Orchestration only depends on the `PageExtractor` trait; `QpdfExtractor`
//! is the production implementation.
//!
//! ## Requirements
//!
//! - `qpdf` must be installed and available in PATH (or configured via
//!   `QPDF_PATH`)

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::types::SplitError;

/// Outcome of one extractor invocation.
///
/// Advisory only: whether the request succeeds is decided by the artifact
/// on disk, not by the exit code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Process exit code (`None` if terminated by a signal)
    pub exit_code: Option<i32>,

    /// Captured stderr/stdout text
    pub diagnostics: String,
}

impl ExtractionReport {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Page extraction capability
#[async_trait]
pub trait PageExtractor: Send + Sync {
    /// Short tool name used in logs and error messages
    fn name(&self) -> &str;

    /// Check if the extractor can be run
    async fn is_available(&self) -> bool;

    /// Write the pages selected by `range` from `input` into `output`.
    ///
    /// Returns `Err` only when the extractor could not be run at all.
    async fn extract(
        &self,
        input: &Path,
        range: &str,
        output: &Path,
    ) -> Result<ExtractionReport, SplitError>;
}

// ============================================================================
// qpdf
// ============================================================================

/// Page extraction through the `qpdf` command line tool
#[derive(Debug, Clone)]
pub struct QpdfExtractor {
    qpdf_path: String,
}

impl Default for QpdfExtractor {
    fn default() -> Self {
        Self::new("qpdf")
    }
}

impl QpdfExtractor {
    pub fn new(qpdf_path: impl Into<String>) -> Self {
        Self {
            qpdf_path: qpdf_path.into(),
        }
    }

    pub fn qpdf_path(&self) -> &str {
        &self.qpdf_path
    }

    /// Get qpdf version
    pub async fn version(&self) -> Result<String, SplitError> {
        let output = Command::new(&self.qpdf_path)
            .arg("--version")
            .output()
            .await
            .map_err(|e| SplitError::ExtractorUnavailable(format!("Failed to run qpdf: {}", e)))?;

        if !output.status.success() {
            return Err(SplitError::ExtractorUnavailable(
                "qpdf not available".to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }
}

#[async_trait]
impl PageExtractor for QpdfExtractor {
    fn name(&self) -> &str {
        "qpdf"
    }

    async fn is_available(&self) -> bool {
        let result = Command::new(&self.qpdf_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        matches!(result, Ok(status) if status.success())
    }

    async fn extract(
        &self,
        input: &Path,
        range: &str,
        output: &Path,
    ) -> Result<ExtractionReport, SplitError> {
        // qpdf <input> --pages . <range> -- <output>
        // "." selects the primary input file
        let result = Command::new(&self.qpdf_path)
            .arg(input)
            .arg("--pages")
            .arg(".")
            .arg(range)
            .arg("--")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SplitError::ExtractorUnavailable(format!("Failed to run qpdf: {}", e)))?;

        let mut diagnostics = String::from_utf8_lossy(&result.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&result.stdout);
        let stdout = stdout.trim();
        if !stdout.is_empty() {
            if !diagnostics.is_empty() {
                diagnostics.push('\n');
            }
            diagnostics.push_str(stdout);
        }

        Ok(ExtractionReport {
            exit_code: result.status.code(),
            diagnostics,
        })
    }
}

// ============================================================================
// Test Support
// ============================================================================

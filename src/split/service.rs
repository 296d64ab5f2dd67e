//! Split Service
//!
//! Drives one request through validate -> parse -> acquire workspace ->
//! save upload -> extract each range -> assemble -> release workspace.
//!
//! Validation and parsing happen before any filesystem side effect. Once a
//! workspace exists, every exit path goes through `Workspace::release`, and
//! the payload is fully read into memory before that happens.

use std::path::PathBuf;
use std::sync::Arc;

use super::assembler::assemble;
use super::extractor::PageExtractor;
use super::invoker::extract_range;
use super::ranges::{parse_ranges, RangeToken};
use super::types::{Artifact, SplitError, SplitPayload, SplitRequest, Upload};
use super::workspace::Workspace;

/// Extensions accepted for uploads (compared case-insensitively)
const PDF_EXTENSIONS: &[&str] = &[".pdf"];

/// Split service configuration
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Base directory under which request workspaces are created
    pub upload_root: PathBuf,
}

/// Orchestrates page-range splitting
#[derive(Clone)]
pub struct SplitService {
    config: SplitConfig,
    extractor: Arc<dyn PageExtractor>,
}

impl SplitService {
    pub fn new(config: SplitConfig, extractor: Arc<dyn PageExtractor>) -> Self {
        Self { config, extractor }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn extractor(&self) -> &dyn PageExtractor {
        self.extractor.as_ref()
    }

    /// Create the upload root if it does not exist yet
    pub async fn ensure_upload_root(&self) -> Result<(), SplitError> {
        tokio::fs::create_dir_all(&self.config.upload_root).await?;
        Ok(())
    }

    /// Handle one split request end to end
    pub async fn split(&self, request: SplitRequest) -> Result<SplitPayload, SplitError> {
        let upload = validate_upload(request.file)?;
        let tokens = parse_ranges(request.ranges.as_deref())?;

        let workspace = Workspace::acquire(&self.config.upload_root).await?;
        tracing::info!(
            workspace = %workspace.id(),
            file = %upload.filename,
            bytes = upload.data.len(),
            ranges = tokens.len(),
            "Split request started"
        );

        let result = self.run(&workspace, &upload, &tokens).await;

        match &result {
            Ok(payload) => tracing::info!(
                workspace = %workspace.id(),
                download = %payload.file_name(),
                bytes = payload.data().len(),
                "Split request complete"
            ),
            Err(e) => tracing::error!(workspace = %workspace.id(), "Split request failed: {}", e),
        }

        workspace.release().await;
        result
    }

    async fn run(
        &self,
        workspace: &Workspace,
        upload: &Upload,
        tokens: &[RangeToken],
    ) -> Result<SplitPayload, SplitError> {
        let input = workspace.save_upload(&upload.filename, &upload.data).await?;

        // Sequential and fail-fast: the first bad range aborts the request
        let mut artifacts: Vec<Artifact> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let artifact =
                extract_range(self.extractor.as_ref(), &input, token, workspace.output_dir()).await?;
            artifacts.push(artifact);
        }

        assemble(workspace, &artifacts).await
    }
}

/// Reject missing files, empty filenames and non-PDF extensions
pub fn validate_upload(file: Option<Upload>) -> Result<Upload, SplitError> {
    let upload = file.ok_or(SplitError::MissingFile)?;

    if upload.filename.is_empty() {
        return Err(SplitError::EmptyFilename);
    }

    let lower = upload.filename.to_lowercase();
    if !PDF_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return Err(SplitError::InvalidFileType(upload.filename));
    }

    Ok(upload)
}

//! Extraction Invoker
//!
//! Runs the extractor for one range token and classifies the result. A
//! nonempty artifact at the expected path is success regardless of exit
//! code; a missing or empty artifact is failure regardless of exit code.

use std::path::Path;

use super::extractor::PageExtractor;
use super::ranges::RangeToken;
use super::types::{Artifact, SplitError};

/// Extract one range into `output_dir`.
pub async fn extract_range(
    extractor: &dyn PageExtractor,
    input: &Path,
    token: &RangeToken,
    output_dir: &Path,
) -> Result<Artifact, SplitError> {
    let file_name = token.output_file_name();
    let output = output_dir.join(&file_name);

    let report = extractor.extract(input, &token.text, &output).await?;

    let size = match tokio::fs::metadata(&output).await {
        Ok(metadata) if metadata.is_file() => metadata.len(),
        _ => 0,
    };

    if size == 0 {
        tracing::error!(
            range = %token.text,
            exit_code = ?report.exit_code,
            diagnostics = %report.diagnostics,
            "{} produced no output",
            extractor.name()
        );
        return Err(SplitError::ExtractionFailed {
            range: token.text.clone(),
            tool: extractor.name().to_string(),
            diagnostics: report.diagnostics,
        });
    }

    if !report.succeeded() {
        tracing::warn!(
            range = %token.text,
            exit_code = ?report.exit_code,
            "{} exited with warnings but produced output: {}",
            extractor.name(),
            report.diagnostics
        );
    }

    tracing::debug!(range = %token.text, file = %file_name, size = size, "Range extracted");

    Ok(Artifact {
        range: token.text.clone(),
        file_name,
        path: output,
        size,
    })
}

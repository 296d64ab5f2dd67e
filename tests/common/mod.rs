//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;

use pdf_split_server::config::Config;
use pdf_split_server::routes;
use pdf_split_server::split::{
    ExtractionReport, PageExtractor, SplitConfig, SplitError, SplitService,
};
use pdf_split_server::state::AppState;

/// Extractor that writes a small fake PDF per range.
///
/// Ranges listed in `silent` exit 0 without writing, like a tool that
/// swallowed an error; ranges in `warn` write output but exit 3.
#[derive(Default)]
pub struct FakeExtractor {
    pub silent: HashSet<String>,
    pub warn: HashSet<String>,
    pub calls: Mutex<Vec<(PathBuf, String, PathBuf)>>,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn silent_on(mut self, range: &str) -> Self {
        self.silent.insert(range.to_string());
        self
    }

    pub fn warn_on(mut self, range: &str) -> Self {
        self.warn.insert(range.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(PathBuf, String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageExtractor for FakeExtractor {
    fn name(&self) -> &str {
        "fake"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn extract(
        &self,
        input: &Path,
        range: &str,
        output: &Path,
    ) -> Result<ExtractionReport, SplitError> {
        self.calls
            .lock()
            .unwrap()
            .push((input.to_path_buf(), range.to_string(), output.to_path_buf()));

        // The upload must already be on disk when the extractor runs
        assert!(input.is_file(), "input {} missing", input.display());

        if self.silent.contains(range) {
            return Ok(ExtractionReport {
                exit_code: Some(0),
                diagnostics: String::new(),
            });
        }

        tokio::fs::write(output, format!("%PDF-1.4 range={}", range)).await?;

        let exit_code = if self.warn.contains(range) { 3 } else { 0 };
        Ok(ExtractionReport {
            exit_code: Some(exit_code),
            diagnostics: String::new(),
        })
    }
}

/// Coordinate drawn on page `n` (1-based) by `build_pdf`
pub fn page_marker(n: usize) -> usize {
    100 + n
}

/// Router wired to `extractor`, with workspaces under `upload_root`
pub fn app_with(upload_root: &Path, extractor: Arc<dyn PageExtractor>, max_upload_bytes: usize) -> Router {
    let mut config = Config::default();
    config.storage.upload_root = upload_root.to_path_buf();
    config.server.max_upload_bytes = max_upload_bytes;

    let split_service = SplitService::new(
        SplitConfig {
            upload_root: upload_root.to_path_buf(),
        },
        extractor,
    );

    routes::router(AppState::new(config, split_service))
}

pub fn app(upload_root: &Path, extractor: Arc<dyn PageExtractor>) -> Router {
    app_with(upload_root, extractor, 10 * 1024 * 1024)
}

const BOUNDARY: &str = "pdf-split-test-boundary";

/// Raw `POST /split` request with a `ranges` field and a `file` part,
/// for driving the router directly with `oneshot`
pub fn split_request(filename: &str, ranges: &str, pdf: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"ranges\"\r\n\r\n{ranges}\r\n",
            b = BOUNDARY
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n",
            b = BOUNDARY
        )
        .as_bytes(),
    );
    body.extend_from_slice(pdf);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::post("/split")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// True when no workspace directory is left under `root`
pub fn root_is_empty(root: &Path) -> bool {
    std::fs::read_dir(root).unwrap().next().is_none()
}

/// Build a valid PDF with `pages` pages. Page N draws a line to
/// `(100 + N, 100 + N)`, which marks the page in uncompressed output.
pub fn build_pdf(pages: usize) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());

    let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", 3 + i * 2)).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages
    ));

    for i in 0..pages {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R >>",
            4 + i * 2
        ));
        let content = format!("0 0 m {0} {0} l S", page_marker(i + 1));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, object).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );

    out
}

//! PDF Split Module
//!
//! Extracts page ranges from an uploaded PDF into one file per range.
//!
//! Flow per request:
//! 1. Validate the upload (present, named, `.pdf`) and parse the range list
//! 2. Acquire a private workspace directory
//! 3. Run the page extractor once per range, in order, stopping at the first failure
//! 4. Return the single artifact, or a zip of all artifacts
//! 5. Remove the workspace, whatever happened above

pub mod assembler;
pub mod extractor;
pub mod invoker;
pub mod ranges;
pub mod service;
pub mod types;
pub mod workspace;

pub use extractor::{ExtractionReport, PageExtractor, QpdfExtractor};
pub use ranges::{parse_ranges, RangeToken};
pub use service::{SplitConfig, SplitService};
pub use types::*;
pub use workspace::Workspace;

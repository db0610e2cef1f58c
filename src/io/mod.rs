/// Command-line interface and batch orchestration
pub mod cli;
/// Default parameters and output naming
pub mod configuration;
/// Layer documents, manifests and composition reports
pub mod document;
/// Error types and context propagation
pub mod error;
/// Sheet loading and asset export
pub mod image;
/// Progress display for batch runs
pub mod progress;

use std::sync::Arc;

/// Receives one human-readable line per audit step. The CLI wires this to
/// stderr under `--verbose`; embedders may supply their own sink.
pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

//! Library-level error kinds (spec §7). Per-chunk/per-region failures are
//! logged and skipped by the decoder itself and never reach this enum;
//! what's left are the handful of kinds that can end a render.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("region directory not found: {0}")]
    MissingRegionDir(std::path::PathBuf),

    /// Malformed palette JSON — a usage error (spec §7), not a render
    /// failure: the caller gave us a bad `-colors` file.
    #[error("invalid palette file: {0}")]
    InvalidPalette(String),

    #[error("failed to read output file {path}: {source}")]
    OutputIo {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Projected pixel fell outside the canvas buffer. Always a bug in the
    /// projection math (spec §7/§9), never a user-facing condition.
    #[error("projected pixel ({u}, {v}) out of canvas bounds ({width}x{height})")]
    OutOfCanvasBounds {
        u: i64,
        v: i64,
        width: u32,
        height: u32,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

//! Error types for tile rendering.
//!
//! The taxonomy distinguishes four failure classes with different caller
//! contracts: configuration errors and I/O errors are fatal to the
//! invocation or subtree, a transient feature-index conflict is retryable,
//! and a symbolization fault is logged and non-fatal (reported through
//! [`crate::rules::PassOutcome`], never as an `Err`).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering tiles or pyramids.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Invalid pyramid range; rejected before any work is performed.
    #[error("max zoom {max_zoom} is less than start zoom {zoom}")]
    Configuration { zoom: u8, max_zoom: u8 },

    /// Tile coordinate outside the valid range for its zoom level.
    #[error("tile ({x}, {y}) out of range at zoom {zoom}")]
    InvalidTile { zoom: u8, x: u32, y: u32 },

    /// Failed to persist or delete a tile file. Fatal for the subtree:
    /// a silently incomplete pyramid is worse than a loud failure.
    #[error("tile file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The shared feature index changed while a render pass was reading
    /// it. The pass was aborted; the caller should retry.
    #[error("feature index changed during render pass, retry")]
    TransientConflict,

    /// PNG encoding of the tile canvas failed.
    #[error("png encoding failed: {0}")]
    Encode(String),
}

impl RenderError {
    /// Whether the caller may retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RenderError::TransientConflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = RenderError::Configuration {
            zoom: 14,
            max_zoom: 12,
        };
        assert_eq!(err.to_string(), "max zoom 12 is less than start zoom 14");
    }

    #[test]
    fn test_only_conflict_is_retryable() {
        assert!(RenderError::TransientConflict.is_retryable());
        assert!(!RenderError::Configuration {
            zoom: 1,
            max_zoom: 0
        }
        .is_retryable());
        assert!(!RenderError::Encode("bad".into()).is_retryable());
    }

    #[test]
    fn test_io_source_is_preserved() {
        let err = RenderError::Io {
            path: PathBuf::from("/tiles/12/1/2.png"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tiles/12/1/2.png"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

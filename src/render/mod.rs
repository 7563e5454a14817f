//! Tile rendering orchestration.
//!
//! [`TileRenderer`] renders single tiles to PNG bytes and walks tile
//! pyramids: each pass renders a quad-tree of tiles under a starting
//! tile, persists non-empty tiles, deletes stale ones, and reports the
//! difference as a [`BatchResult`] change list for an upload consumer.

mod canvas;
mod parallel;
mod recording;
mod skia;

pub use canvas::{
    palette, ChartCanvas, Delta, FontSpec, FontStyle, FrameKind, Handle, LabelFrame, LineStyle,
    PatternCode, Rgba, Scheme, SymbolId,
};
pub use recording::{DrawOp, RecordingCanvas};
pub use skia::PixmapCanvas;

use crate::error::RenderError;
use crate::feature::ChartSnapshot;
use crate::geo::{self, TileCoord, STANDARD_TILE_SIZE};
use crate::rules::{self, PassOutcome, RuleSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extra render attempts after a transient feature-index conflict.
const CONFLICT_RETRIES: u32 = 2;

/// Pyramids always descend to this zoom even through empty tiles, since
/// a tile with no content can still have non-empty descendants.
const ALWAYS_DESCEND_BELOW: u8 = 16;

/// Renderer configuration.
///
/// `tile_size` is the canvas edge in pixels; `scale` multiplies the
/// projection so oversized canvases can either supersample one tile or
/// cover a block of standard tiles.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub tile_size: u32,
    pub scale: f64,
    pub ruleset: RuleSet,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tile_size: STANDARD_TILE_SIZE,
            scale: 1.0,
            ruleset: RuleSet::All,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the canvas size, keeping one canvas per standard tile by
    /// scaling the projection to match.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self.scale = tile_size as f64 / STANDARD_TILE_SIZE as f64;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_ruleset(mut self, ruleset: RuleSet) -> Self {
        self.ruleset = ruleset;
        self
    }
}

/// One entry in a pyramid change list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeRecord {
    /// A freshly rendered tile to upload: local file and remote path.
    Publish { local: PathBuf, remote: String },
    /// A previously published tile that is now empty.
    Delete { remote: String },
}

/// Ordered change list produced by one pyramid pass.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub records: Vec<ChangeRecord>,
    /// Tiles rendered, including empty ones.
    pub rendered: u64,
    /// Render passes degraded by a contained symbolization fault.
    pub degraded: u64,
}

impl BatchResult {
    pub fn has_changes(&self) -> bool {
        !self.records.is_empty()
    }

    /// The change list in upload-script form, one directive per line:
    /// `put <local> <remote>` or `rm <remote>`.
    pub fn lines(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| match r {
                ChangeRecord::Publish { local, remote } => {
                    format!("put {} {}", local.display(), remote)
                }
                ChangeRecord::Delete { remote } => format!("rm {remote}"),
            })
            .collect()
    }

    fn merge(&mut self, other: BatchResult) {
        self.records.extend(other.records);
        self.rendered += other.rendered;
        self.degraded += other.degraded;
    }
}

/// Local path of a tile under the output root.
pub fn tile_path(root: &Path, tile: TileCoord) -> PathBuf {
    root.join(tile.zoom.to_string())
        .join(tile.x.to_string())
        .join(format!("{}.png", tile.y))
}

/// Remote path of a tile on the upload target.
pub fn remote_tile_path(tile: TileCoord) -> String {
    format!("tiles/{}/{}/{}.png", tile.zoom, tile.x, tile.y)
}

/// Renders chart tiles from an immutable feature snapshot.
pub struct TileRenderer {
    snapshot: ChartSnapshot,
    config: RenderConfig,
}

impl TileRenderer {
    pub fn new(snapshot: ChartSnapshot, config: RenderConfig) -> Self {
        Self { snapshot, config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders one tile to PNG bytes.
    ///
    /// A transient feature-index conflict aborts and retries the pass up
    /// to [`CONFLICT_RETRIES`] times before surfacing the error. A
    /// symbolization fault inside a rule handler is contained: the pass
    /// completes with that feature's drawing abandoned.
    pub fn render_tile(&self, zoom: u8, x: u32, y: u32) -> Result<Vec<u8>, RenderError> {
        let (png, _) = self.render_tile_inner(zoom, x, y)?;
        Ok(png)
    }

    fn render_tile_inner(&self, zoom: u8, x: u32, y: u32) -> Result<(Vec<u8>, bool), RenderError> {
        let tile = TileCoord::new(zoom, x, y);
        if !tile.is_valid() {
            return Err(RenderError::InvalidTile { zoom, x, y });
        }

        let bounds = geo::tile_bounds(zoom, x, y, self.config.tile_size, self.config.scale)
            .padded(geo::mercator_border(zoom, self.config.tile_size));
        let clipped = self.snapshot.clipped(bounds);

        let mut attempt = 0;
        loop {
            let mut canvas =
                PixmapCanvas::new(zoom, x, y, self.config.tile_size, self.config.scale)?;
            match rules::run_pass(&clipped, &mut canvas, zoom, self.config.ruleset) {
                Ok(PassOutcome::Clean) => return Ok((canvas.encode_png()?, false)),
                Ok(PassOutcome::Degraded(fault)) => {
                    warn!(tile = %tile, %fault, "render pass degraded");
                    return Ok((canvas.encode_png()?, true));
                }
                Err(err) if err.is_retryable() && attempt < CONFLICT_RETRIES => {
                    attempt += 1;
                    debug!(tile = %tile, attempt, "feature index conflict, retrying pass");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Size in bytes of an encoded empty tile, the baseline for deciding
    /// whether a rendered tile has content.
    fn empty_tile_size(&self) -> Result<usize, RenderError> {
        let canvas = PixmapCanvas::new(0, 0, 0, self.config.tile_size, self.config.scale)?;
        Ok(canvas.encode_png()?.len())
    }

    /// Renders the pyramid rooted at `(zoom, x, y)` down to `max_zoom`.
    ///
    /// Tiles with content are written under `out_root` and recorded as
    /// `Publish`; previously written tiles that render empty are removed
    /// and recorded as `Delete`. Children are only descended into when
    /// the parent has content, except that descent always continues
    /// below zoom 16. Empty directories are pruned after the walk.
    pub fn render_pyramid(
        &self,
        zoom: u8,
        x: u32,
        y: u32,
        max_zoom: u8,
        out_root: &Path,
    ) -> Result<BatchResult, RenderError> {
        let root = self.check_pyramid_args(zoom, x, y, max_zoom)?;

        let empty = self.empty_tile_size()?;
        let mut batch = BatchResult::default();
        self.render_subtree(root, max_zoom, out_root, empty, &mut batch)?;
        prune_empty_dirs(out_root).map_err(|source| RenderError::Io {
            path: out_root.to_path_buf(),
            source,
        })?;

        info!(
            tile = %root,
            max_zoom,
            rendered = batch.rendered,
            changes = batch.records.len(),
            "pyramid pass complete"
        );
        Ok(batch)
    }

    fn check_pyramid_args(
        &self,
        zoom: u8,
        x: u32,
        y: u32,
        max_zoom: u8,
    ) -> Result<TileCoord, RenderError> {
        if max_zoom < zoom {
            return Err(RenderError::Configuration { zoom, max_zoom });
        }
        let root = TileCoord::new(zoom, x, y);
        if !root.is_valid() {
            return Err(RenderError::InvalidTile { zoom, x, y });
        }
        Ok(root)
    }

    /// Renders one tile, persists or deletes it, and reports whether the
    /// pyramid should descend into its children.
    fn render_node(
        &self,
        tile: TileCoord,
        max_zoom: u8,
        out_root: &Path,
        empty: usize,
        batch: &mut BatchResult,
    ) -> Result<bool, RenderError> {
        let (png, degraded) = self.render_tile_inner(tile.zoom, tile.x, tile.y)?;
        batch.rendered += 1;
        if degraded {
            batch.degraded += 1;
        }

        let has_content = png.len() > empty;
        let local = tile_path(out_root, tile);
        let remote = remote_tile_path(tile);

        if has_content {
            if let Some(parent) = local.parent() {
                fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&local, &png).map_err(|source| RenderError::Io {
                path: local.clone(),
                source,
            })?;
            batch.records.push(ChangeRecord::Publish { local, remote });
        } else if local.exists() {
            fs::remove_file(&local).map_err(|source| RenderError::Io {
                path: local,
                source,
            })?;
            batch.records.push(ChangeRecord::Delete { remote });
        }

        Ok(tile.zoom < max_zoom && (has_content || tile.zoom < ALWAYS_DESCEND_BELOW))
    }

    fn render_subtree(
        &self,
        tile: TileCoord,
        max_zoom: u8,
        out_root: &Path,
        empty: usize,
        batch: &mut BatchResult,
    ) -> Result<(), RenderError> {
        if self.render_node(tile, max_zoom, out_root, empty, batch)? {
            for child in tile.children() {
                self.render_subtree(child, max_zoom, out_root, empty, batch)?;
            }
        }
        Ok(())
    }
}

/// Removes directories under `dir` left empty by tile deletion. Returns
/// whether `dir` itself is (now) empty; the root is kept either way.
fn prune_empty_dirs(dir: &Path) -> io::Result<bool> {
    let mut empty = true;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if prune_empty_dirs(&path)? {
                fs::remove_dir(&path)?;
            } else {
                empty = false;
            }
        } else {
            empty = false;
        }
    }
    Ok(empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::ChartSnapshot;

    #[test]
    fn test_tile_paths() {
        let t = TileCoord::new(14, 8593, 5747);
        assert_eq!(
            tile_path(Path::new("/work/tiles"), t),
            PathBuf::from("/work/tiles/14/8593/5747.png")
        );
        assert_eq!(remote_tile_path(t), "tiles/14/8593/5747.png");
    }

    #[test]
    fn test_batch_lines_format() {
        let batch = BatchResult {
            records: vec![
                ChangeRecord::Publish {
                    local: PathBuf::from("/work/tiles/12/1/2.png"),
                    remote: "tiles/12/1/2.png".into(),
                },
                ChangeRecord::Delete {
                    remote: "tiles/12/1/3.png".into(),
                },
            ],
            ..Default::default()
        };
        assert_eq!(
            batch.lines(),
            vec![
                "put /work/tiles/12/1/2.png tiles/12/1/2.png",
                "rm tiles/12/1/3.png",
            ]
        );
    }

    #[test]
    fn test_inverted_zoom_range_is_rejected() {
        let renderer = TileRenderer::new(ChartSnapshot::default(), RenderConfig::default());
        let err = renderer
            .render_pyramid(14, 0, 0, 12, Path::new("/nonexistent"))
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Configuration {
                zoom: 14,
                max_zoom: 12
            }
        ));
    }

    #[test]
    fn test_out_of_range_tile_is_rejected() {
        let renderer = TileRenderer::new(ChartSnapshot::default(), RenderConfig::default());
        let err = renderer.render_tile(3, 8, 0).unwrap_err();
        assert!(matches!(err, RenderError::InvalidTile { zoom: 3, x: 8, y: 0 }));
    }

    #[test]
    fn test_config_tile_size_sets_scale() {
        let cfg = RenderConfig::new().with_tile_size(1024);
        assert_eq!(cfg.tile_size, 1024);
        assert!((cfg.scale - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_snapshot_tile_matches_baseline() {
        let renderer = TileRenderer::new(ChartSnapshot::default(), RenderConfig::default());
        let png = renderer.render_tile(12, 2048, 1362).unwrap();
        assert_eq!(png.len(), renderer.empty_tile_size().unwrap());
    }
}

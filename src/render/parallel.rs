//! Parallel pyramid rendering.
//!
//! The four child subtrees of the starting tile are independent: they
//! touch disjoint directories and read a shared immutable snapshot, so
//! each renders on its own thread. Results merge in child order, making
//! the change list identical to a sequential pass.

use super::{prune_empty_dirs, BatchResult, TileRenderer};
use crate::error::RenderError;
use std::path::Path;
use std::thread;
use tracing::info;

impl TileRenderer {
    /// Renders the pyramid rooted at `(zoom, x, y)` down to `max_zoom`,
    /// fanning the four child subtrees out over worker threads.
    ///
    /// Produces the same tile files and the same ordered change list as
    /// [`TileRenderer::render_pyramid`].
    pub fn render_pyramid_parallel(
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
        let descend = self.render_node(root, max_zoom, out_root, empty, &mut batch)?;

        if descend {
            let children = root.children();
            let results = thread::scope(|scope| {
                let handles: Vec<_> = children
                    .iter()
                    .map(|&child| {
                        scope.spawn(move || {
                            let mut sub = BatchResult::default();
                            self.render_subtree(child, max_zoom, out_root, empty, &mut sub)?;
                            Ok::<_, RenderError>(sub)
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(join_subtree)
                    .collect::<Vec<Result<BatchResult, RenderError>>>()
            });
            for result in results {
                batch.merge(result?);
            }
        }

        prune_empty_dirs(out_root).map_err(|source| RenderError::Io {
            path: out_root.to_path_buf(),
            source,
        })?;

        info!(
            tile = %root,
            max_zoom,
            rendered = batch.rendered,
            changes = batch.records.len(),
            "parallel pyramid pass complete"
        );
        Ok(batch)
    }
}

/// Joins a subtree worker, surfacing a worker panic as a panic here.
fn join_subtree(
    handle: thread::ScopedJoinHandle<'_, Result<BatchResult, RenderError>>,
) -> Result<BatchResult, RenderError> {
    match handle.join() {
        Ok(result) => result,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

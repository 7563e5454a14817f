//! End-to-end pyramid rendering against a temporary tile store.

use seatile::feature::{
    Att, AttVal, BoyShp, CatLam, ChartSnapshot, Colour, Feature, Geometry, Obj, Position, Reln,
};
use seatile::render::{ChangeRecord, RenderConfig, TileRenderer};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Square of land straddling 54ºN 10ºE, covering the zoom 12 tile
/// (2161, 1315) and its descendants around the centre.
fn land_snapshot() -> ChartSnapshot {
    let ring = vec![
        Position::new(53.9f64.to_radians(), 9.9f64.to_radians()),
        Position::new(53.9f64.to_radians(), 10.1f64.to_radians()),
        Position::new(54.1f64.to_radians(), 10.1f64.to_radians()),
        Position::new(54.1f64.to_radians(), 9.9f64.to_radians()),
    ];
    ChartSnapshot::new(vec![Feature::new(
        Obj::Lndare,
        Reln::Master,
        Geometry::area(ring),
    )])
}

fn buoy_snapshot() -> ChartSnapshot {
    let geom = Geometry::point(Position::new(54.0f64.to_radians(), 10.0f64.to_radians()));
    ChartSnapshot::new(vec![Feature::new(Obj::Boylat, Reln::Master, geom)
        .attribute(Att::CatLam, AttVal::one(CatLam::Port))
        .attribute(Att::BoyShp, AttVal::one(BoyShp::Can))
        .attribute(Att::Colour, AttVal::list([Colour::Red]))])
}

fn file_count(dir: &Path) -> usize {
    let mut n = 0;
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
        for entry in fs::read_dir(&d).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                n += 1;
            }
        }
    }
    n
}

#[test]
fn test_empty_pyramid_descends_to_zoom_16_without_output() {
    let out = tempdir().unwrap();
    let renderer = TileRenderer::new(ChartSnapshot::default(), RenderConfig::default());

    let batch = renderer
        .render_pyramid(15, 17290, 10521, 18, out.path())
        .unwrap();

    // The root and its four children render, then descent stops at the
    // empty zoom 16 tiles well short of max_zoom.
    assert_eq!(batch.rendered, 5);
    assert!(!batch.has_changes());
    assert_eq!(file_count(out.path()), 0);
    // Pruning leaves the output root itself in place.
    assert!(out.path().is_dir());
}

#[test]
fn test_stale_tile_is_deleted_and_dirs_pruned() {
    let out = tempdir().unwrap();
    let stale = out.path().join("15/17290/10521.png");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, b"old tile").unwrap();

    let renderer = TileRenderer::new(ChartSnapshot::default(), RenderConfig::default());
    let batch = renderer
        .render_pyramid(15, 17290, 10521, 15, out.path())
        .unwrap();

    assert_eq!(
        batch.records,
        vec![ChangeRecord::Delete {
            remote: "tiles/15/17290/10521.png".into()
        }]
    );
    assert!(!stale.exists());
    assert!(!out.path().join("15").exists());
}

#[test]
fn test_land_tile_is_published() {
    let out = tempdir().unwrap();
    let renderer = TileRenderer::new(land_snapshot(), RenderConfig::default());

    let batch = renderer
        .render_pyramid(12, 2161, 1315, 12, out.path())
        .unwrap();

    let local = out.path().join("12/2161/1315.png");
    assert_eq!(
        batch.records,
        vec![ChangeRecord::Publish {
            local: local.clone(),
            remote: "tiles/12/2161/1315.png".into()
        }]
    );
    assert_eq!(
        batch.lines(),
        vec![format!("put {} tiles/12/2161/1315.png", local.display())]
    );
    assert_eq!(
        fs::read(&local).unwrap(),
        renderer.render_tile(12, 2161, 1315).unwrap()
    );
}

#[test]
fn test_rendering_is_deterministic() {
    let renderer = TileRenderer::new(land_snapshot(), RenderConfig::default());
    let first = renderer.render_tile(14, 8647, 5260).unwrap();
    let second = renderer.render_tile(14, 8647, 5260).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_buoy_changes_tile_content() {
    let with_buoy = TileRenderer::new(buoy_snapshot(), RenderConfig::default());
    let without = TileRenderer::new(ChartSnapshot::default(), RenderConfig::default());

    // Lateral buoys appear from zoom 14.
    assert_ne!(
        with_buoy.render_tile(14, 8647, 5260).unwrap(),
        without.render_tile(14, 8647, 5260).unwrap()
    );
}

#[test]
fn test_parallel_pyramid_matches_sequential() {
    let seq_out = tempdir().unwrap();
    let par_out = tempdir().unwrap();
    let renderer = TileRenderer::new(land_snapshot(), RenderConfig::default());

    let seq = renderer
        .render_pyramid(12, 2161, 1315, 14, seq_out.path())
        .unwrap();
    let par = renderer
        .render_pyramid_parallel(12, 2161, 1315, 14, par_out.path())
        .unwrap();

    assert_eq!(seq.rendered, par.rendered);
    let remotes = |batch: &seatile::render::BatchResult| -> Vec<String> {
        batch
            .records
            .iter()
            .map(|r| match r {
                ChangeRecord::Publish { remote, .. } => format!("put {remote}"),
                ChangeRecord::Delete { remote } => format!("rm {remote}"),
            })
            .collect()
    };
    // Same tiles change in the same order regardless of threading.
    assert_eq!(remotes(&seq), remotes(&par));

    for record in &par.records {
        if let ChangeRecord::Publish { local, remote } = record {
            let seq_local = seq_out.path().join(remote.strip_prefix("tiles/").unwrap());
            assert_eq!(fs::read(local).unwrap(), fs::read(seq_local).unwrap());
        }
    }
}

#[test]
fn test_oversized_canvas_still_publishes() {
    let out = tempdir().unwrap();
    let renderer = TileRenderer::new(land_snapshot(), RenderConfig::new().with_tile_size(512));

    let batch = renderer
        .render_pyramid(12, 2161, 1315, 12, out.path())
        .unwrap();
    assert_eq!(batch.records.len(), 1);
    let png = fs::read(out.path().join("12/2161/1315.png")).unwrap();
    // PNG signature then a 512 px IHDR width.
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(&png[16..20], &512u32.to_be_bytes());
}

//! Tile producer tests against an in-process stand-in for GDAL.
//!
//! `FakeTools` retiles with the same fixed-size windows and file naming as
//! `gdal_retile.py`, "converts" by copying, and records every call, so the
//! naming, emptiness filter and failure policy are exercised without GDAL.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use cog::{
    CogError, CogOptions, CogStatus, FailurePolicy, ProduceRequest, RasterTools, RunMode,
    TileProducer, ToolOutput,
};
use geotiff_reader::RasterHeader;
use gpw_common::{BoundingBox, GridSpec, TileGrid};
use test_utils::{
    create_constant_grid, create_sparse_grid, create_test_grid, extract_window,
    list_files_with_suffix, read_test_samples, TestGeoTiff,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Translate {
        input: PathBuf,
        output: PathBuf,
        nodata: Option<f64>,
    },
    Retile {
        input: PathBuf,
        target_dir: PathBuf,
        tiling: TileGrid,
    },
    Warp {
        input: PathBuf,
        grid: GridSpec,
    },
}

#[derive(Default)]
struct FakeTools {
    calls: Mutex<Vec<Call>>,
    /// File names whose conversion fails
    fail_translate: Vec<String>,
    fail_retile: bool,
    fail_warp: bool,
    /// Write an unreadable tile next to the real ones
    corrupt_tile: bool,
}

impl FakeTools {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn failed(program: &str) -> ToolOutput {
        ToolOutput {
            program: program.to_string(),
            args: vec![],
            success: false,
            exit_code: Some(1),
            output: "ERROR 1: fake failure".to_string(),
        }
    }
}

#[async_trait]
impl RasterTools for FakeTools {
    async fn translate(
        &self,
        input: &Path,
        output: &Path,
        options: &CogOptions,
    ) -> cog::Result<ToolOutput> {
        self.record(Call::Translate {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            nodata: options.nodata,
        });
        let name = input.file_name().unwrap().to_string_lossy().into_owned();
        if self.fail_translate.contains(&name) {
            return Ok(Self::failed("gdal_translate"));
        }
        std::fs::copy(input, output)?;
        Ok(ToolOutput::ok("gdal_translate", vec![]))
    }

    async fn retile(
        &self,
        input: &Path,
        target_dir: &Path,
        tiling: &TileGrid,
    ) -> cog::Result<ToolOutput> {
        self.record(Call::Retile {
            input: input.to_path_buf(),
            target_dir: target_dir.to_path_buf(),
            tiling: *tiling,
        });
        if self.fail_retile {
            return Ok(Self::failed("gdal_retile.py"));
        }

        let header = RasterHeader::read(input)?;
        let (width, height, data) = read_test_samples(input);
        let (dx, dy) = header.transform.pixel_size();
        let stem = input.file_stem().unwrap().to_string_lossy().into_owned();

        for window in tiling.windows(width, height) {
            let tile = extract_window(
                &data,
                width,
                window.x_off,
                window.y_off,
                window.width,
                window.height,
            );
            let (x0, y0) = header
                .transform
                .apply(window.x_off as f64, window.y_off as f64);
            let name = tiling.tile_stem(&stem, width, height, window.row, window.col);
            TestGeoTiff::new(window.width, window.height, tile)
                .origin(x0, y0)
                .pixel_size(dx, dy)
                .write(target_dir.join(format!("{}.tif", name)))
                .unwrap();
        }
        if self.corrupt_tile {
            std::fs::write(target_dir.join(format!("{}_0_0.tif", stem)), b"not a tiff")?;
        }
        Ok(ToolOutput::ok("gdal_retile.py", vec![]))
    }

    async fn warp(&self, input: &Path, output: &Path, grid: &GridSpec) -> cog::Result<ToolOutput> {
        self.record(Call::Warp {
            input: input.to_path_buf(),
            grid: *grid,
        });
        if self.fail_warp {
            return Ok(Self::failed("gdalwarp"));
        }

        // A coarse stand-in for the 43200 x 21600 result with the same bounds
        let (w, h) = (8, 4);
        TestGeoTiff::new(w, h, create_test_grid(w, h))
            .origin(grid.bbox.min_x, grid.bbox.max_y)
            .pixel_size(grid.bbox.width() / w as f64, grid.bbox.height() / h as f64)
            .write(output)
            .unwrap();
        Ok(ToolOutput::ok("gdalwarp", vec![]))
    }
}

fn producer(tools: FakeTools, policy: FailurePolicy) -> TileProducer<FakeTools> {
    TileProducer::new(tools, CogOptions::default(), policy, RunMode::Execute)
        .with_tiling(TileGrid::new(10, 10).unwrap())
}

fn write_input(dir: &Path, name: &str, width: usize, height: usize, data: Vec<f32>) -> PathBuf {
    let path = dir.join(name);
    TestGeoTiff::new(width, height, data).write(&path).unwrap();
    path
}

fn request(input: &Path, output_dir: &Path, tile: bool) -> ProduceRequest {
    ProduceRequest {
        input: input.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        tile,
        expand_bbox: None,
    }
}

// ============================================================================
// Single raster conversion
// ============================================================================

#[tokio::test]
async fn test_single_conversion_produces_one_named_cog() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let input = write_input(
        src.path(),
        "gpw_v4_population_count_rev11_2020_30_sec.tif",
        16,
        8,
        create_test_grid(16, 8),
    );

    let producer = producer(FakeTools::default(), FailurePolicy::Strict);
    let outcome = producer
        .produce(&request(&input, dest.path(), false))
        .await
        .unwrap();

    let expected = dest
        .path()
        .join("gpw_v4_population_count_rev11_2020_30_sec_cog.tif");
    assert_eq!(outcome.written(), vec![expected.as_path()]);
    assert_eq!(
        list_files_with_suffix(dest.path(), ".tif"),
        vec!["gpw_v4_population_count_rev11_2020_30_sec_cog.tif"]
    );

    // Non-expanding conversions force nodata to 0
    assert_eq!(
        producer.tools().calls(),
        vec![Call::Translate {
            input: input.clone(),
            output: expected,
            nodata: Some(0.0),
        }]
    );
}

#[tokio::test]
async fn test_missing_destination_fails_before_any_work() {
    let src = tempfile::tempdir().unwrap();
    let input = write_input(src.path(), "pop.tif", 4, 4, create_test_grid(4, 4));
    let missing = src.path().join("does-not-exist");

    let producer = producer(FakeTools::default(), FailurePolicy::BestEffort);
    for tile in [false, true] {
        let result = producer.produce(&request(&input, &missing, tile)).await;
        assert!(matches!(result, Err(CogError::MissingDestination(p)) if p == missing));
    }
    assert!(producer.tools().calls().is_empty());
}

#[tokio::test]
async fn test_strict_conversion_failure_propagates() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let input = write_input(src.path(), "pop.tif", 4, 4, create_test_grid(4, 4));

    let tools = FakeTools {
        fail_translate: vec!["pop.tif".to_string()],
        ..FakeTools::default()
    };
    let result = producer(tools, FailurePolicy::Strict)
        .produce(&request(&input, dest.path(), false))
        .await;

    match result {
        Err(CogError::Tool { program, output, .. }) => {
            assert_eq!(program, "gdal_translate");
            assert!(output.contains("fake failure"));
        }
        other => panic!("expected tool error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_best_effort_conversion_failure_still_returns_path() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let input = write_input(src.path(), "pop.tif", 4, 4, create_test_grid(4, 4));

    let tools = FakeTools {
        fail_translate: vec!["pop.tif".to_string()],
        ..FakeTools::default()
    };
    let outcome = producer(tools, FailurePolicy::BestEffort)
        .produce(&request(&input, dest.path(), false))
        .await
        .unwrap();

    assert!(outcome.written().is_empty());
    assert_eq!(outcome.failures().len(), 1);
    assert_eq!(outcome.cogs[0].path, dest.path().join("pop_cog.tif"));
}

#[tokio::test]
async fn test_dry_run_touches_nothing() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let input = write_input(src.path(), "pop.tif", 20, 20, create_test_grid(20, 20));

    let producer = TileProducer::new(
        FakeTools::default(),
        CogOptions::default(),
        FailurePolicy::Strict,
        RunMode::DryRun,
    );

    let single = producer
        .produce(&request(&input, dest.path(), false))
        .await
        .unwrap();
    assert!(single.dry_run);
    assert_eq!(single.cogs[0].status, CogStatus::DryRun);

    let tiled = producer
        .produce(&request(&input, dest.path(), true))
        .await
        .unwrap();
    assert!(tiled.dry_run);
    assert!(tiled.cogs.is_empty());

    assert!(producer.tools().calls().is_empty());
    assert!(list_files_with_suffix(dest.path(), ".tif").is_empty());
}

// ============================================================================
// Retiling and the empty-tile filter
// ============================================================================

#[tokio::test]
async fn test_empty_tiles_are_discarded() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    // Two 10x10 tiles; only the left one has people
    let data = create_sparse_grid(20, 10, &[(3, 4, 17.0)]);
    let input = write_input(src.path(), "pop.tif", 20, 10, data);

    let outcome = producer(FakeTools::default(), FailurePolicy::Strict)
        .produce(&request(&input, dest.path(), true))
        .await
        .unwrap();

    assert_eq!(
        list_files_with_suffix(dest.path(), ".tif"),
        vec!["pop_1_1_cog.tif"]
    );
    assert_eq!(outcome.empty_tiles, vec![PathBuf::from("pop_1_2.tif")]);
}

#[tokio::test]
async fn test_all_zero_raster_produces_no_tiles() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let input = write_input(
        src.path(),
        "ocean.tif",
        30,
        20,
        create_constant_grid(30, 20, 0.0),
    );

    let producer = producer(FakeTools::default(), FailurePolicy::Strict);
    let outcome = producer
        .produce(&request(&input, dest.path(), true))
        .await
        .unwrap();

    assert!(outcome.written().is_empty());
    assert_eq!(outcome.empty_tiles.len(), 6);
    assert!(list_files_with_suffix(dest.path(), ".tif").is_empty());
    assert!(producer
        .tools()
        .calls()
        .iter()
        .all(|c| !matches!(c, Call::Translate { .. })));
}

#[tokio::test]
async fn test_tile_outputs_are_subset_of_grid_split() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    // 25x25 splits into a 3x3 grid with clipped edge tiles
    let data = create_sparse_grid(25, 25, &[(0, 0, 1.0), (24, 24, 2.0), (12, 5, 3.0)]);
    let input = write_input(src.path(), "pop.tif", 25, 25, data);

    let outcome = producer(FakeTools::default(), FailurePolicy::Strict)
        .produce(&request(&input, dest.path(), true))
        .await
        .unwrap();

    let tiling = TileGrid::new(10, 10).unwrap();
    let all: Vec<String> = tiling
        .windows(25, 25)
        .iter()
        .map(|w| format!("{}_cog.tif", tiling.tile_stem("pop", 25, 25, w.row, w.col)))
        .collect();
    assert_eq!(all.len(), 9);

    let written = list_files_with_suffix(dest.path(), "_cog.tif");
    assert_eq!(written, vec!["pop_1_1_cog.tif", "pop_1_2_cog.tif", "pop_3_3_cog.tif"]);
    assert!(written.iter().all(|name| all.contains(name)));
    assert_eq!(outcome.empty_tiles.len(), 6);

    // Edge tile keeps its clipped size
    let (w, h, _) = read_test_samples(dest.path().join("pop_3_3_cog.tif"));
    assert_eq!((w, h), (5, 5));
}

#[tokio::test]
async fn test_tiles_keep_georeferencing() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let input = write_input(src.path(), "pop.tif", 20, 10, create_constant_grid(20, 10, 1.0));

    producer(FakeTools::default(), FailurePolicy::Strict)
        .produce(&request(&input, dest.path(), true))
        .await
        .unwrap();

    let header = RasterHeader::read(dest.path().join("pop_1_2_cog.tif")).unwrap();
    let bounds = header.bounds();
    let cell = 1.0 / 120.0;
    let expected = BoundingBox::new(-180.0 + 10.0 * cell, 90.0 - 10.0 * cell, -180.0 + 20.0 * cell, 90.0);
    assert!(bounds.matches_within(&expected, 1e-9));
}

#[tokio::test]
async fn test_strict_tile_failure_aborts_remaining_tiles() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let input = write_input(src.path(), "pop.tif", 30, 10, create_constant_grid(30, 10, 5.0));

    let tools = FakeTools {
        fail_translate: vec!["pop_1_2.tif".to_string()],
        ..FakeTools::default()
    };
    let producer = producer(tools, FailurePolicy::Strict);
    let result = producer.produce(&request(&input, dest.path(), true)).await;

    assert!(matches!(result, Err(CogError::Tool { .. })));
    assert_eq!(
        list_files_with_suffix(dest.path(), ".tif"),
        vec!["pop_1_1_cog.tif"]
    );
    let translated = producer
        .tools()
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::Translate { .. }))
        .count();
    assert_eq!(translated, 2);
}

#[tokio::test]
async fn test_best_effort_tile_failure_continues() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let input = write_input(src.path(), "pop.tif", 30, 10, create_constant_grid(30, 10, 5.0));

    let tools = FakeTools {
        fail_translate: vec!["pop_1_2.tif".to_string()],
        ..FakeTools::default()
    };
    let outcome = producer(tools, FailurePolicy::BestEffort)
        .produce(&request(&input, dest.path(), true))
        .await
        .unwrap();

    assert_eq!(
        list_files_with_suffix(dest.path(), ".tif"),
        vec!["pop_1_1_cog.tif", "pop_1_3_cog.tif"]
    );
    let failures = outcome.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, dest.path().join("pop_1_2_cog.tif"));
}

#[tokio::test]
async fn test_retile_failure_follows_policy() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let input = write_input(src.path(), "pop.tif", 20, 10, create_test_grid(20, 10));

    let strict = producer(
        FakeTools {
            fail_retile: true,
            ..FakeTools::default()
        },
        FailurePolicy::Strict,
    );
    let result = strict.produce(&request(&input, dest.path(), true)).await;
    assert!(matches!(result, Err(CogError::Tool { ref program, .. }) if program == "gdal_retile.py"));

    let lenient = producer(
        FakeTools {
            fail_retile: true,
            ..FakeTools::default()
        },
        FailurePolicy::BestEffort,
    );
    let outcome = lenient
        .produce(&request(&input, dest.path(), true))
        .await
        .unwrap();
    assert_eq!(outcome.failures().len(), 1);
    assert_eq!(outcome.cogs[0].path, input);
}

// ============================================================================
// Scratch directory
// ============================================================================

fn retile_dir(calls: &[Call]) -> PathBuf {
    calls
        .iter()
        .find_map(|call| match call {
            Call::Retile { target_dir, .. } => Some(target_dir.clone()),
            _ => None,
        })
        .expect("retile was called")
}

#[tokio::test]
async fn test_scratch_dir_removed_after_success() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let input = write_input(src.path(), "pop.tif", 20, 10, create_constant_grid(20, 10, 1.0));

    let producer = producer(FakeTools::default(), FailurePolicy::Strict);
    let outcome = producer
        .produce(&request(&input, dest.path(), true))
        .await
        .unwrap();
    assert_eq!(outcome.written().len(), 2);

    let scratch = retile_dir(&producer.tools().calls());
    assert_ne!(scratch, dest.path());
    assert!(!scratch.exists());
}

#[tokio::test]
async fn test_scratch_dir_removed_after_strict_failure() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let input = write_input(src.path(), "pop.tif", 20, 10, create_constant_grid(20, 10, 1.0));

    let producer = producer(
        FakeTools {
            corrupt_tile: true,
            ..FakeTools::default()
        },
        FailurePolicy::Strict,
    );
    let result = producer.produce(&request(&input, dest.path(), true)).await;
    assert!(result.is_err());

    let scratch = retile_dir(&producer.tools().calls());
    assert!(!scratch.exists());
}

// ============================================================================
// Bounding-box expansion
// ============================================================================

#[tokio::test]
async fn test_expand_then_tile() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let input = write_input(src.path(), "pop.tif", 12, 6, create_test_grid(12, 6));
    let bbox = BoundingBox::new(-180.0, -77.0, -95.0, 7.0);

    let producer = producer(FakeTools::default(), FailurePolicy::Strict)
        .with_tiling(TileGrid::new(4, 4).unwrap());
    let outcome = producer
        .produce(&ProduceRequest {
            expand_bbox: Some(bbox),
            ..request(&input, dest.path(), true)
        })
        .await
        .unwrap();

    let calls = producer.tools().calls();
    match &calls[0] {
        Call::Warp { input: warped, grid } => {
            assert_eq!(warped, &input);
            assert_eq!((grid.width, grid.height), (43200, 21600));
            assert_eq!(grid.bbox, bbox);
        }
        other => panic!("expected warp first, got {:?}", other),
    }
    match &calls[1] {
        Call::Retile { input: retiled, .. } => {
            assert_eq!(retiled.file_name().unwrap(), "pop_expanded.tif");
        }
        other => panic!("expected retile second, got {:?}", other),
    }

    // Expanded tiles keep the resampler's nodata
    for call in &calls[2..] {
        assert!(matches!(call, Call::Translate { nodata: None, .. }));
    }

    // The 8x4 stand-in splits into two 4x4 tiles, both with data
    assert_eq!(
        list_files_with_suffix(dest.path(), ".tif"),
        vec!["pop_expanded_1_1_cog.tif", "pop_expanded_1_2_cog.tif"]
    );
    assert_eq!(outcome.written().len(), 2);
}

#[tokio::test]
async fn test_expand_rejects_invalid_bbox() {
    let scratch = tempfile::tempdir().unwrap();
    let producer = producer(FakeTools::default(), FailurePolicy::BestEffort);

    let result = producer
        .expand(
            Path::new("pop.tif"),
            scratch.path(),
            BoundingBox::new(10.0, 10.0, 5.0, 5.0),
        )
        .await;
    assert!(matches!(result, Err(CogError::InvalidBbox(_))));
    assert!(producer.tools().calls().is_empty());
}

#[tokio::test]
async fn test_expand_failure_is_never_swallowed() {
    let src = tempfile::tempdir().unwrap();
    let input = write_input(src.path(), "pop.tif", 4, 4, create_test_grid(4, 4));

    let producer = producer(
        FakeTools {
            fail_warp: true,
            ..FakeTools::default()
        },
        FailurePolicy::BestEffort,
    );
    let result = producer
        .expand(&input, src.path(), BoundingBox::global())
        .await;
    assert!(matches!(result, Err(CogError::Tool { ref program, .. }) if program == "gdalwarp"));
}

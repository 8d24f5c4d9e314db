mod common;

use std::{cell::Cell, fs, rc::Rc};

use kuvio::{
    pipeline::{Config, FrameBuffer},
    ExportError, ExportKind, GenerateError, Mosaic, ParamValue, PipelineError, PipelineState,
    PreviewPipeline, Request, ResvgRasterizer,
};

use common::{counting, solid_svg, switchable, FILL};

fn pipeline<G: kuvio::Generator>(generator: G) -> PreviewPipeline<G> {
    PreviewPipeline::new(generator, ResvgRasterizer::new(), FrameBuffer::new())
}

#[test]
fn identical_requests_give_identical_markup() {
    let request = Mosaic::default().parameters().unwrap().to_request();
    let mut pipeline = pipeline(Mosaic::default());
    let first = pipeline.regenerate(&request, 96, 64).unwrap();
    let second = pipeline.regenerate(&request, 96, 64).unwrap();
    assert_eq!(first.markup, second.markup);
    assert_eq!(first.raster, second.raster);
}

#[test]
fn successful_run_caches_and_displays() {
    let calls = Rc::new(Cell::new(0));
    let mut pipeline = pipeline(counting(&calls));
    assert_eq!(pipeline.state(), &PipelineState::Idle);

    let artifact = pipeline.regenerate(&Request::default(), 40, 20).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(artifact.markup, solid_svg(40, 20));
    assert_eq!((artifact.width, artifact.height), (40, 20));
    assert_eq!(artifact.raster.dimensions(), (40, 20));
    assert_eq!(artifact.raster.get_pixel(10, 10).0, FILL);
    assert_eq!(pipeline.state(), &PipelineState::Valid(artifact.clone()));

    // With no viewport the raster is shown at full size
    let frame = pipeline.display().frame().unwrap();
    assert_eq!(frame.dimensions(), (40, 20));
}

#[test]
fn resize_never_regenerates() {
    let calls = Rc::new(Cell::new(0));
    let mut pipeline = pipeline(counting(&calls));
    pipeline.regenerate(&Request::default(), 200, 100).unwrap();
    assert_eq!(pipeline.display().frames_shown(), 1);

    assert!(pipeline.resize(100, 100));
    assert_eq!(pipeline.display().frame().unwrap().dimensions(), (100, 50));
    assert!(pipeline.resize(30, 10));
    assert_eq!(pipeline.display().frame().unwrap().dimensions(), (20, 10));

    assert_eq!(calls.get(), 1);
    assert_eq!(pipeline.display().frames_shown(), 3);
    // The cached artifact keeps its native resolution
    assert_eq!(pipeline.artifact().unwrap().raster.dimensions(), (200, 100));
}

#[test]
fn new_generations_are_scaled_to_the_viewport() {
    let calls = Rc::new(Cell::new(0));
    let mut pipeline = pipeline(counting(&calls));
    // Resizing before anything is generated has nothing to show
    assert!(!pipeline.resize(50, 50));
    assert!(pipeline.display().frame().is_none());

    pipeline.regenerate(&Request::default(), 100, 200).unwrap();
    assert_eq!(pipeline.display().frame().unwrap().dimensions(), (25, 50));
}

#[test]
fn malformed_markup_fails_and_exports_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.svg");
    let mut pipeline = pipeline(switchable());

    let broken = Request::default().with("broken", ParamValue::Int(1));
    let err = pipeline.regenerate(&broken, 10, 10).unwrap_err();
    assert!(matches!(err, PipelineError::MalformedMarkup(_)));
    assert_eq!(pipeline.state(), &PipelineState::Failed(err));
    assert!(pipeline.artifact().is_none());

    assert!(matches!(
        pipeline.export(&path, ExportKind::Vector),
        Err(ExportError::NoArtifact)
    ));
    assert!(!path.exists());
}

#[test]
fn failure_clears_the_previous_artifact() {
    let mut pipeline = pipeline(switchable());
    pipeline.regenerate(&Request::default(), 10, 10).unwrap();
    assert!(pipeline.display().frame().is_some());

    let broken = Request::default().with("broken", ParamValue::Int(1));
    assert!(pipeline.regenerate(&broken, 10, 10).is_err());
    assert!(pipeline.artifact().is_none());
    assert!(pipeline.display().frame().is_none());
    // Resizing can't bring the stale image back
    assert!(!pipeline.resize(5, 5));
    assert!(pipeline.display().frame().is_none());

    // Fixing the request recovers
    pipeline.regenerate(&Request::default(), 10, 10).unwrap();
    assert!(pipeline.artifact().is_some());
}

#[test]
fn generation_failures_are_distinct_from_malformed_markup() {
    let rejecting = |_: u32, _: u32, _: &Request| -> Result<String, GenerateError> {
        Err(GenerateError::InvalidValue {
            name: "rows".to_owned(),
            value: "0".to_owned(),
            reason: "too few".to_owned(),
        })
    };
    let mut pipeline = pipeline(rejecting);
    let err = pipeline.regenerate(&Request::default(), 10, 10).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Generation(GenerateError::InvalidValue { .. })
    ));
    assert!(matches!(pipeline.state(), PipelineState::Failed(_)));
}

#[test]
fn zero_size_is_rejected_before_generating() {
    let calls = Rc::new(Cell::new(0));
    let mut pipeline = pipeline(counting(&calls));
    let err = pipeline.regenerate(&Request::default(), 0, 10).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Generation(GenerateError::InvalidSize {
            width: 0,
            height: 10
        })
    );
    assert_eq!(calls.get(), 0);
}

#[test]
fn refresh_takes_size_from_request() {
    let calls = Rc::new(Cell::new(0));
    let config = Config {
        fallback_size: (16, 9),
        ..Config::default()
    };
    let mut pipeline = PreviewPipeline::with_config(
        counting(&calls),
        ResvgRasterizer::new(),
        FrameBuffer::new(),
        config,
    );

    let sized = Request::default()
        .with("width", ParamValue::Int(40))
        .with("height", ParamValue::Int(30));
    let artifact = pipeline.refresh(&sized).unwrap();
    assert_eq!((artifact.width, artifact.height), (40, 30));

    let no_height = Request::default().with("width", ParamValue::Int(32));
    let artifact = pipeline.refresh(&no_height).unwrap();
    assert_eq!((artifact.width, artifact.height), (32, 9));
}

#[test]
fn idle_pipeline_has_nothing_to_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");
    let pipeline = pipeline(switchable());
    assert!(matches!(
        pipeline.export_to(&path),
        Err(ExportError::NoArtifact)
    ));
    assert!(!path.exists());
}

#[test]
fn vector_export_is_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.svg");
    let mut pipeline = pipeline(switchable());
    pipeline.regenerate(&Request::default(), 12, 8).unwrap();

    pipeline.export_to(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), solid_svg(12, 8));
}

#[test]
fn raster_export_uses_generated_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = pipeline(switchable());
    pipeline.regenerate(&Request::default(), 24, 16).unwrap();
    // The display size doesn't affect exports
    pipeline.resize(6, 4);

    let png = dir.path().join("out.png");
    pipeline.export(&png, ExportKind::Raster).unwrap();
    let decoded = image::open(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (24, 16));
    assert_eq!(decoded.get_pixel(3, 3).0, FILL);

    let jpg = dir.path().join("out.jpg");
    pipeline.export_to(&jpg).unwrap();
    assert_eq!(image::open(&jpg).unwrap().to_rgb8().dimensions(), (24, 16));
}

#[test]
fn export_io_failure_leaves_state_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.svg");
    let mut pipeline = pipeline(switchable());
    let artifact = pipeline.regenerate(&Request::default(), 10, 10).unwrap();

    assert!(matches!(
        pipeline.export(&path, ExportKind::Vector),
        Err(ExportError::Io { .. })
    ));
    assert_eq!(pipeline.state(), &PipelineState::Valid(artifact));
}

#[test]
fn raster_export_needs_a_raster_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let mut pipeline = pipeline(switchable());
    pipeline.regenerate(&Request::default(), 10, 10).unwrap();
    assert!(matches!(
        pipeline.export(&path, ExportKind::Raster),
        Err(ExportError::UnsupportedFormat(_))
    ));
    assert!(!path.exists());
}

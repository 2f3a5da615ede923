use super::*;
use crate::{
    features::model::Feature,
    foundation::core::{Point, Rgba8},
    sequence::sink::InMemorySink,
};

fn solid(color: Rgba8) -> Image {
    Image::filled(4, 4, color).unwrap()
}

fn static_features() -> FeatureSet {
    FeatureSet::shared(vec![Feature::new(
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
    )])
}

fn moving_features() -> FeatureSet {
    FeatureSet::new(
        vec![Feature::new(Point::new(0.0, 0.0), Point::new(3.0, 1.0))],
        vec![Feature::new(Point::new(1.0, 0.0), Point::new(3.0, 3.0))],
    )
}

fn gradient() -> Image {
    let mut img = Image::new(4, 4).unwrap();
    for y in 0..4u8 {
        for x in 0..4u8 {
            img.set(
                i64::from(x),
                i64::from(y),
                Rgba8::opaque(x * 60, y * 60, 100),
            );
        }
    }
    img
}

struct FailingSink {
    reject: u64,
    accepted: Vec<FrameIndex>,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> MorphResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, _frame: &Image) -> MorphResult<()> {
        if idx.0 == self.reject {
            return Err(MorphError::validation("disk full"));
        }
        self.accepted.push(idx);
        Ok(())
    }

    fn end(&mut self) -> MorphResult<()> {
        Ok(())
    }
}

#[test]
fn frame_t_spans_zero_to_one() {
    assert_eq!(frame_t(0, 30), 0.0);
    assert_eq!(frame_t(15, 30), 0.5);
    assert_eq!(frame_t(30, 30), 1.0);
}

#[test]
fn default_run_emits_k_plus_one_frames_in_order() {
    let red = solid(Rgba8::opaque(255, 0, 0));
    let blue = solid(Rgba8::opaque(0, 0, 255));
    let mut sink = InMemorySink::new();

    let stats = generate_frames(
        &red,
        &blue,
        &static_features(),
        &SequenceOpts::default(),
        &mut sink,
    )
    .unwrap();

    assert_eq!(
        stats,
        SequenceStats {
            frames_total: 31,
            frames_written: 31,
            frames_failed: 0,
        }
    );
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.frames_total), (4, 4, 31));
    let indices = sink.frames().iter().map(|(i, _)| i.0).collect::<Vec<_>>();
    assert_eq!(indices, (0..31).collect::<Vec<_>>());
    assert_eq!(sink.frames()[0].1, red);
    assert_eq!(sink.frames()[30].1, blue);
}

#[test]
fn eased_midpoint_is_half_way() {
    let red = solid(Rgba8::opaque(255, 0, 0));
    let blue = solid(Rgba8::opaque(0, 0, 255));
    let opts = SequenceOpts {
        frames: 2,
        ..SequenceOpts::default()
    };
    let mid = render_frame(&red, &blue, &static_features(), FrameIndex(1), &opts).unwrap();
    let px = mid.get(2, 2).unwrap();
    assert!(px.r == 127 || px.r == 128, "{px:?}");
    assert!(px.b == 127 || px.b == 128, "{px:?}");
}

#[test]
fn sink_failures_are_counted_and_skipped() {
    let img = solid(Rgba8::opaque(9, 9, 9));
    let opts = SequenceOpts {
        frames: 4,
        ..SequenceOpts::default()
    };
    let mut sink = FailingSink {
        reject: 2,
        accepted: Vec::new(),
    };

    let stats = generate_frames(&img, &img, &static_features(), &opts, &mut sink).unwrap();

    assert_eq!(stats.frames_written, 4);
    assert_eq!(stats.frames_failed, 1);
    assert_eq!(
        sink.accepted,
        vec![FrameIndex(0), FrameIndex(1), FrameIndex(3), FrameIndex(4)]
    );
}

#[test]
fn zero_frames_is_rejected() {
    let img = solid(Rgba8::opaque(9, 9, 9));
    let opts = SequenceOpts {
        frames: 0,
        ..SequenceOpts::default()
    };
    let mut sink = InMemorySink::new();
    assert!(generate_frames(&img, &img, &static_features(), &opts, &mut sink).is_err());
    assert!(sink.config().is_none());
}

#[test]
fn invalid_features_fail_before_begin() {
    let img = solid(Rgba8::opaque(9, 9, 9));
    let features = FeatureSet::new(vec![], vec![]);
    let mut sink = InMemorySink::new();
    assert!(generate_frames(&img, &img, &features, &SequenceOpts::default(), &mut sink).is_err());
    assert!(sink.config().is_none());
}

#[test]
fn reversed_line_fails_before_any_frame_is_pushed() {
    let img = Image::filled(8, 8, Rgba8::opaque(9, 9, 9)).unwrap();
    let features = FeatureSet::new(
        vec![Feature::new(Point::new(1.0, 1.0), Point::new(6.0, 1.0))],
        vec![Feature::new(Point::new(6.0, 1.0), Point::new(1.0, 1.0))],
    );
    let mut sink = InMemorySink::new();

    let err = generate_frames(&img, &img, &features, &SequenceOpts::default(), &mut sink);

    assert!(matches!(err, Err(MorphError::Validation(_))));
    assert!(sink.config().is_none());
    assert!(sink.frames().is_empty());
}

#[test]
fn parallel_chunks_match_sequential_output() {
    let a = gradient();
    let b = solid(Rgba8::opaque(200, 100, 50));
    let features = moving_features();
    let sequential = SequenceOpts {
        frames: 6,
        ..SequenceOpts::default()
    };
    let parallel = SequenceOpts {
        threading: RenderThreading {
            parallel: true,
            chunk_size: 3,
            threads: Some(2),
        },
        ..sequential.clone()
    };

    let mut seq_sink = InMemorySink::new();
    let mut par_sink = InMemorySink::new();
    generate_frames(&a, &b, &features, &sequential, &mut seq_sink).unwrap();
    let stats = generate_frames(&a, &b, &features, &parallel, &mut par_sink).unwrap();

    assert_eq!(stats.frames_written, 7);
    assert_eq!(seq_sink.frames(), par_sink.frames());
}

#[test]
fn zero_threads_is_rejected() {
    let img = solid(Rgba8::opaque(9, 9, 9));
    let opts = SequenceOpts {
        threading: RenderThreading {
            parallel: true,
            chunk_size: 8,
            threads: Some(0),
        },
        ..SequenceOpts::default()
    };
    let mut sink = InMemorySink::new();
    assert!(generate_frames(&img, &img, &static_features(), &opts, &mut sink).is_err());
}

#[test]
fn chunk_size_zero_means_one() {
    assert_eq!(normalized_chunk_size(0), 1);
    assert_eq!(normalized_chunk_size(16), 16);
}

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use flash_shot_detector::{DetectionSettings, Frame, FrameGeometry, RawGrayDecoder, ShotDetector};

const SIDE: u32 = 240;

fn frames() -> [Vec<u8>; 2] {
    let g = FrameGeometry::new(SIDE, SIDE);
    let n = g.pixel_count().unwrap();
    // textured background with a small flash in the second frame
    let background: Vec<u8> = (0..n).map(|i| ((i * 7) % 200) as u8).collect();
    let mut flash = background.clone();
    for y in 100..104 {
        for x in 60..64 {
            flash[g.index(x, y).unwrap()] = 255;
        }
    }
    [background, flash]
}

fn bench_process(c: &mut Criterion) {
    let g = FrameGeometry::new(SIDE, SIDE);
    let [background, flash] = frames();

    c.bench_function("process_240x240_raw", |b| {
        let mut det = ShotDetector::new(DetectionSettings::default(), RawGrayDecoder::new(g))
            .expect("default settings");
        let mut toggle = false;
        b.iter(|| {
            toggle = !toggle;
            let data = if toggle { &flash } else { &background };
            let res = det
                .process(&Frame::new(black_box(data), SIDE, SIDE))
                .expect("buffers");
            black_box(res)
        })
    });
}

criterion_group!(benches, bench_process);
criterion_main!(benches);

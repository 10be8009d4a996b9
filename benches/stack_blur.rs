use backdrop_blur::{blur_sync, downscale, PixelBuffer, Rgba8};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn make_backdrop(w: u32, h: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(w, h);
    for y in 0..h {
        for x in 0..w {
            buf.set_pixel(x, y, Rgba8::new(x as u8, y as u8, (x ^ y) as u8, 255));
        }
    }
    buf
}

fn bench_blur_sync(c: &mut Criterion) {
    let src = make_backdrop(256, 256);
    let mut group = c.benchmark_group("blur_sync_256");
    for radius in [1u32, 4, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &r| {
            b.iter(|| blur_sync(black_box(&src), r).unwrap())
        });
    }
    group.finish();
}

fn bench_capture_and_blur(c: &mut Criterion) {
    let src = make_backdrop(1080, 720);
    c.bench_function("downscale_8_then_blur_2", |b| {
        b.iter(|| {
            let small = downscale(black_box(&src), 8.0).unwrap();
            blur_sync(&small, 2).unwrap()
        })
    });
}

criterion_group!(benches, bench_blur_sync, bench_capture_and_blur);
criterion_main!(benches);

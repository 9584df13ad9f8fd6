use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rasterizer_core::{FillingRule, RasterizerScanlineAa, ScanlineU8};

fn rasterize_triangle(ras: &mut RasterizerScanlineAa, sl: &mut ScanlineU8) {
    ras.reset();
    ras.filling_rule(FillingRule::NonZero);
    ras.move_to_d(10.0, 10.0);
    ras.line_to_d(590.0, 80.0);
    ras.line_to_d(300.0, 580.0);
    ras.close_polygon();

    if ras.rewind_scanlines() {
        sl.reset(ras.min_x(), ras.max_x());
        loop {
            if !ras.sweep_scanline(sl) {
                break;
            }
            black_box(sl.num_spans());
        }
    }
}

fn rasterize_many_small_triangles(ras: &mut RasterizerScanlineAa, sl: &mut ScanlineU8) {
    ras.reset();
    ras.filling_rule(FillingRule::NonZero);
    for row in 0..20 {
        for col in 0..20 {
            let x = (col * 30) as f64;
            let y = (row * 30) as f64;
            ras.move_to_d(x, y);
            ras.line_to_d(x + 20.0, y);
            ras.line_to_d(x + 10.0, y + 20.0);
            ras.close_polygon();
        }
    }

    if ras.rewind_scanlines() {
        sl.reset(ras.min_x(), ras.max_x());
        loop {
            if !ras.sweep_scanline(sl) {
                break;
            }
            black_box(sl.num_spans());
        }
    }
}

fn bench_single_triangle(c: &mut Criterion) {
    let mut ras = RasterizerScanlineAa::new();
    let mut sl = ScanlineU8::new();
    c.bench_function("rasterize_single_triangle_600x600", |b| {
        b.iter(|| rasterize_triangle(&mut ras, &mut sl));
    });
}

fn bench_many_triangles(c: &mut Criterion) {
    let mut ras = RasterizerScanlineAa::new();
    let mut sl = ScanlineU8::new();
    c.bench_function("rasterize_400_small_triangles", |b| {
        b.iter(|| rasterize_many_small_triangles(&mut ras, &mut sl));
    });
}

criterion_group!(benches, bench_single_triangle, bench_many_triangles);
criterion_main!(benches);

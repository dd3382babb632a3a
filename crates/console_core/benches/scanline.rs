use criterion::{criterion_group, criterion_main, Criterion};

use console_core::gb::MemoryController;
use console_core::gba::{Renderer, RendererOptions};

fn bench_draw_scanline(c: &mut Criterion) {
    let mut renderer = Renderer::new(RendererOptions::default());
    renderer.write_dispcnt(1 << 8 | 1 << 9 | 1 << 10 | 1 << 11); // all 4 BGs on, mode 0

    c.bench_function("draw_scanline_mode0", |b| {
        b.iter(|| {
            for y in 0..160 {
                renderer.draw_scanline(y);
            }
        })
    });
}

fn bench_dma_step(c: &mut Criterion) {
    let mut rom = vec![0u8; 0x10000];
    rom[0x147] = 0x00;
    let mut mem = MemoryController::new(rom);

    c.bench_function("dma_full_transfer", |b| {
        b.iter(|| {
            mem.store8(0xFF46, 0xC0);
            for _ in 0..200 {
                mem.step_dma(4);
            }
        })
    });
}

criterion_group!(benches, bench_draw_scanline, bench_dma_step);
criterion_main!(benches);

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use speedctl_core::mocks::RecordingDisplay;
use speedctl_core::{Bindings, Button, DynControlLoop, LatchMode, QuadratureDecoder};
use speedctl_hardware::{SimulatedActuator, SimulatedButton, SimulatedEncoder};
use speedctl_traits::clock::ManualClock;

// Phase trace of a knob wobbling back and forth, with occasional bounce
fn synth_phases(n: usize, seed: u32) -> Vec<(bool, bool)> {
    const CW_NEXT: [u8; 4] = [2, 0, 3, 1];
    const CCW_NEXT: [u8; 4] = [1, 3, 0, 2];
    let mut state = seed.max(1);
    let mut next = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        x
    };
    let mut s = 3u8;
    let mut v = Vec::with_capacity(n);
    for i in 0..n {
        let clockwise = (i / 400) % 2 == 0;
        // ~1 in 16 samples steps against the direction of travel
        let bounce = next() % 16 == 0;
        let table = if clockwise != bounce { &CW_NEXT } else { &CCW_NEXT };
        s = table[usize::from(s)];
        v.push((s & 1 != 0, s & 2 != 0));
    }
    v
}

fn group_settings(g: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>) {
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p speedctl_core --bench control_loop
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(10));
        }
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }
}

pub fn bench_decoder(c: &mut Criterion) {
    let mut g = c.benchmark_group("quadrature_decode");
    group_settings(&mut g);

    let trace = synth_phases(50_000, 0xC0FFEE);
    for mode in [LatchMode::Four3, LatchMode::Four0, LatchMode::Two03] {
        g.bench_function(format!("{mode:?}"), |b| {
            b.iter_batched(
                || QuadratureDecoder::new(mode),
                |mut dec| {
                    for &(a, bb) in black_box(&trace) {
                        dec.update(a, bb);
                    }
                    black_box(dec.position());
                },
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

pub fn bench_tick(c: &mut Criterion) {
    let mut g = c.benchmark_group("control_tick");
    group_settings(&mut g);

    let clock = ManualClock::new();
    let knob = SimulatedEncoder::new();
    let mut lp = match DynControlLoop::builder()
        .with_actuator(SimulatedActuator::new())
        .with_display(RecordingDisplay::new())
        .with_encoder(knob.clone())
        .with_button(Button::Encoder, SimulatedButton::new(true))
        .with_button(Button::Back, SimulatedButton::new(true))
        .with_button(Button::Confirm, SimulatedButton::new(true))
        .with_bindings(Bindings::default())
        .with_clock(Box::new(clock.clone()))
        .build()
    {
        Ok(lp) => lp,
        Err(e) => panic!("build loop: {e}"),
    };

    g.bench_function("idle", |b| {
        b.iter(|| {
            clock.advance_ms(5);
            black_box(lp.tick());
        })
    });
    g.bench_function("turning", |b| {
        let mut dir = 1;
        b.iter(|| {
            dir = -dir;
            knob.turn(dir);
            clock.advance_ms(6);
            black_box(lp.tick());
        })
    });
    g.finish();
}

criterion_group!(control_loop, bench_decoder, bench_tick);
criterion_main!(control_loop);

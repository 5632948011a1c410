use std::time::{Duration, Instant};

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use typestorm::session::clock::compute_wpm;
use typestorm::session::controller::{ControllerOptions, SessionController};
use typestorm::session::input::KeyPress;
use typestorm::session::phrase::PhraseSource;

const PHRASE: &str = "Stay hungry, stay foolish. Never let the noise of others' opinions drown out your own inner voice.";

fn fresh_controller(now: Instant) -> SessionController {
    let options = ControllerOptions { seed: Some(3) };
    let mut ctl = SessionController::new(PhraseSource::new(&[PHRASE]).unwrap(), options, now);
    ctl.engage();
    ctl
}

fn bench_full_phrase(c: &mut Criterion) {
    c.bench_function("type full phrase (clean)", |b| {
        b.iter(|| {
            let t0 = Instant::now();
            let mut ctl = fresh_controller(t0);
            for (i, ch) in PHRASE.chars().enumerate() {
                let now = t0 + Duration::from_millis(i as u64 * 80);
                ctl.handle_key(black_box(KeyPress::char(ch)), now);
                ctl.poll(now);
            }
            ctl
        })
    });
}

fn bench_noisy_phrase(c: &mut Criterion) {
    c.bench_function("type full phrase (every other key wrong)", |b| {
        b.iter(|| {
            let t0 = Instant::now();
            let mut ctl = fresh_controller(t0);
            for (i, ch) in PHRASE.chars().enumerate() {
                let now = t0 + Duration::from_millis(i as u64 * 80);
                ctl.handle_key(black_box(KeyPress::char('~')), now);
                ctl.handle_key(black_box(KeyPress::char(ch)), now);
                ctl.poll(now + Duration::from_millis(40));
            }
            ctl
        })
    });
}

fn bench_wpm(c: &mut Criterion) {
    c.bench_function("compute_wpm", |b| {
        b.iter(|| compute_wpm(black_box(97), black_box(Duration::from_millis(23_400))))
    });
}

criterion_group!(benches, bench_full_phrase, bench_noisy_phrase, bench_wpm);
criterion_main!(benches);

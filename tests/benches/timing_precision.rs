use criterion::{black_box, criterion_group, criterion_main, Criterion};
use morsepad_core::codec::{morse_to_text, text_to_morse};
use morsepad_core::test_utils::Script;
use morsepad_core::{calculate, IambicKeyer, KeyerConfig, PaddleSide, TimingEvaluator};

fn bench_calculate(c: &mut Criterion) {
    c.bench_function("calculate_timings", |b| {
        b.iter(|| calculate(black_box(23.5), black_box(true)))
    });
}

fn bench_codec(c: &mut Criterion) {
    let text = "CQ CQ DE JA1ZZZ [AR]";
    let morse = text_to_morse(text);
    c.bench_function("text_to_morse", |b| b.iter(|| text_to_morse(black_box(text))));
    c.bench_function("morse_to_text", |b| {
        b.iter(|| morse_to_text(black_box(morse.as_str()).split(' ')))
    });
}

fn bench_iambic_squeeze(c: &mut Criterion) {
    let script = Script::new()
        .paddle(PaddleSide::Left, 0, 2000)
        .paddle(PaddleSide::Right, 1, 2000);
    c.bench_function("iambic_squeeze_2s", |b| {
        b.iter(|| {
            let mut keyer = IambicKeyer::new(KeyerConfig::default(), TimingEvaluator::new())
                .expect("valid config");
            script.run(&mut keyer);
            black_box(keyer.into_observer().summary())
        })
    });
}

criterion_group!(benches, bench_calculate, bench_codec, bench_iambic_squeeze);
criterion_main!(benches);

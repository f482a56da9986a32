use blake2f_precompile::blake2::{self, algo, Blake2Input};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// EIP-152 vector 5 with the round count patched in.
fn input(rounds: u32) -> Vec<u8> {
    let mut input = blake2f_precompile::primitives::hex::decode(
        "\
        0000000c48c9bdf267e6096a3ba7ca8485ae67bb2bf894fe72f36e3cf1361d5f\
        3af54fa5d182e6ad7f520e511f6c3e2b8c68059b6bbd41fbabd9831f79217e13\
        19cde05b61626300000000000000000000000000000000000000000000000000\
        0000000000000000000000000000000000000000000000000000000000000000\
        0000000000000000000000000000000000000000000000000000000000000000\
        0000000000000000000000000000000000000000000000000000000000000000\
        000000000300000000000000000000000000000001",
    )
    .unwrap();
    input[..4].copy_from_slice(&rounds.to_be_bytes());
    input
}

/// Benchmarks the Blake2 `F` precompile end to end and the bare compression.
pub fn benchmark_blake2(c: &mut Criterion) {
    let mut group = c.benchmark_group("Blake2 F precompile");
    let group_name = |description: &str| format!("blake2f bench | {description}");

    for rounds in [12u32, 1_024] {
        let raw = input(rounds);
        group.bench_function(group_name(&format!("run {rounds} rounds")), |b| {
            b.iter(|| blake2::run(black_box(&raw), u64::MAX).unwrap())
        });

        let decoded = Blake2Input::decode(&raw).unwrap();
        group.bench_function(group_name(&format!("compress {rounds} rounds")), |b| {
            b.iter(|| {
                algo::compress(
                    black_box(decoded.rounds),
                    &decoded.h,
                    &decoded.m,
                    decoded.t,
                    decoded.f,
                )
            })
        });
    }

    group.bench_function(group_name("reject bad flag"), |b| {
        let mut raw = input(u32::MAX);
        raw[212] = 2;
        b.iter(|| blake2::run(black_box(&raw), u64::MAX).unwrap_err())
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = benchmark_blake2
}
criterion_main!(benches);

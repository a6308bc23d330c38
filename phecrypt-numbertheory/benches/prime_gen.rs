use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use phecrypt_numbertheory::{gen_prime_one_mod, gen_safe_prime};
use phecrypt_traits::randomness::GeneralRng;
use rand_core::OsRng;
use rug::Integer;

pub fn safe_prime_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("safe_prime_benchmark");
    group.sample_size(50);

    for bit_length in [128u32, 192u32, 256u32, 320u32, 384u32].iter() {
        let mut rng = GeneralRng::new(OsRng);
        group.bench_with_input(
            BenchmarkId::new("gen_safe_prime", bit_length),
            bit_length,
            |b, &bits| {
                b.iter(|| gen_safe_prime(black_box(bits), &mut rng));
            },
        );
    }

    group.finish();
}

pub fn prime_one_mod_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("prime_one_mod_benchmark");
    let modulus = Integer::from(199);

    for bit_length in [256u32, 512u32, 1024u32].iter() {
        let mut rng = GeneralRng::new(OsRng);
        group.bench_with_input(
            BenchmarkId::new("gen_prime_one_mod", bit_length),
            bit_length,
            |b, &bits| {
                b.iter(|| gen_prime_one_mod(black_box(bits), &modulus, &mut rng));
            },
        );
    }

    group.finish();
}

criterion_group!(primes, safe_prime_benchmark, prime_one_mod_benchmark);
criterion_main!(primes);

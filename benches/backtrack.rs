use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parsnip::prelude::*;

/// `n` groups of `!`s, each closed by `;`, and then one more `;`.
fn groups<'a, I: Input + ?Sized>(n: usize) -> impl Parser<'a, I, Output = ()> + Clone {
    let group = literal("!").star_consumed().then_ignore(literal(";"));
    let groups = (0..n).map(|_| group.clone()).collect::<Vec<_>>();
    custom(move |input: &'a I, mut offset: usize| {
        for group in &groups {
            offset = group.parse_at(input, offset)?.offset;
        }
        Ok(Success::new(offset, ()))
    })
    .then_ignore(literal(";"))
}

fn bench_backtrack(c: &mut Criterion) {
    let source = "!!!!;!!!!;!!!!;!!!!;;".repeat(1000);
    let text: Vec<char> = source.chars().collect();

    let mut group = c.benchmark_group("backtrack");

    let xs = groups::<[u8]>(5).or(groups(4)).star_consumed().complete();
    group.bench_with_input(BenchmarkId::new("bytes", source.len()), &source, |b, _| {
        b.iter(|| xs.parse(black_box(source.as_bytes())).unwrap())
    });

    let xs = groups::<[char]>(5).or(groups(4)).star_consumed().complete();
    group.bench_with_input(BenchmarkId::new("chars", text.len()), &text, |b, _| {
        b.iter(|| xs.parse(black_box(text.as_slice())).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_backtrack);
criterion_main!(benches);

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use jslex_automaton::{Automaton, Preset, RegexTokenizer, Tokenizer, tokenize_many};

const SPACED: &str = "function total ( items ) { var sum = 0 ; for ( i ) { sum += i ; } return sum ; } // done\n";

fn source(lines: usize) -> String {
    SPACED.repeat(lines)
}

fn bench_strategies(c: &mut Criterion) {
    let text = source(200);
    let mut group = c.benchmark_group("tokenize");
    group.throughput(Throughput::Bytes(text.len() as u64));

    for preset in Preset::ALL {
        let automaton = Automaton::with_preset(preset);
        group.bench_function(format!("automaton/{preset}"), |b| {
            b.iter(|| automaton.tokenize(black_box(&text)))
        });
    }

    let regex = RegexTokenizer::new();
    group.bench_function("regex", |b| b.iter(|| regex.tokenize(black_box(&text))));
    group.finish();
}

fn bench_many(c: &mut Criterion) {
    let sources: Vec<String> = (0..64).map(|_| source(50)).collect();
    let automaton = Automaton::with_preset(Preset::Extended);
    c.bench_function("tokenize_many/64", |b| {
        b.iter(|| tokenize_many(&automaton, black_box(&sources)))
    });
}

criterion_group!(benches, bench_strategies, bench_many);
criterion_main!(benches);

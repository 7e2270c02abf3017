// Criterion benchmarks for arcstd-transition.
//
// The corpus is synthetic: right-branching chains and balanced trees of a
// few typical sentence lengths, so no treebank is needed.
//
// Run:
//   cargo bench -p arcstd-transition

use std::hint::black_box;

use arcstd_core::Sentence;
use arcstd_transition::decoder::one_hot;
use arcstd_transition::{OperatorDecoder, TransitionOracle, TreeProjectivityFilter};
use criterion::{Criterion, criterion_group, criterion_main};

// ---------------------------------------------------------------------------
// Synthetic corpus
// ---------------------------------------------------------------------------

/// Every token attaches to its left neighbour.
fn chain(n: usize) -> Sentence {
    let heads: Vec<usize> = (0..n).collect();
    Sentence::from_heads(&heads)
}

/// Balanced binary tree: the middle token of each span heads both halves.
fn balanced(n: usize) -> Sentence {
    fn fill(lo: usize, hi: usize, parent: usize, heads: &mut [usize]) {
        if lo > hi {
            return;
        }
        let mid = (lo + hi) / 2;
        heads[mid - 1] = parent;
        fill(lo, mid - 1, mid, heads);
        fill(mid + 1, hi, mid, heads);
    }
    let mut heads = vec![0; n];
    fill(1, n, 0, &mut heads);
    Sentence::from_heads(&heads)
}

fn corpus() -> Vec<Sentence> {
    [5, 12, 25, 40, 80]
        .into_iter()
        .flat_map(|n| [chain(n), balanced(n)])
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_oracle(c: &mut Criterion) {
    let corpus = corpus();
    let oracle = TransitionOracle::new();
    c.bench_function("oracle_try_reduce", |b| {
        b.iter(|| {
            for sentence in &corpus {
                let _ = black_box(oracle.try_reduce(black_box(sentence)));
            }
        })
    });
}

fn bench_filter(c: &mut Criterion) {
    let mut corpus = corpus();
    // One crossing pair so the rejection path is exercised too.
    corpus.push(Sentence::from_heads(&[3, 4, 0, 3]));
    let filter = TreeProjectivityFilter::default();
    c.bench_function("filter_corpus", |b| {
        b.iter(|| black_box(filter.filter(black_box(corpus.clone()))))
    });
}

fn bench_decoder(c: &mut Criterion) {
    let corpus = corpus();
    let oracle = TransitionOracle::new();
    let scored: Vec<_> = corpus
        .iter()
        .filter_map(|s| {
            let ops = oracle.try_reduce(s).ok()?;
            Some((s, one_hot(ops.as_slice())))
        })
        .collect();
    let decoder = OperatorDecoder::new();
    c.bench_function("decoder_gold_scores", |b| {
        b.iter(|| {
            for (sentence, scores) in &scored {
                black_box(decoder.decode(sentence, black_box(scores)));
            }
        })
    });
}

criterion_group!(benches, bench_oracle, bench_filter, bench_decoder);
criterion_main!(benches);

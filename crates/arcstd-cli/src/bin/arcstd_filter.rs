// arcstd-filter: Keep only the projective sentences of a CoNLL-U corpus.
//
// Usage:
//   arcstd-filter [FILE]
//
// Options:
//   --stats       Print kept/rejected counts per failure kind to stderr
//   -h, --help    Print help

use std::collections::BTreeMap;
use std::io::{self, Write};

use arcstd_core::conllu::write_conllu;
use arcstd_transition::TreeProjectivityFilter;

fn main() {
    arcstd_cli::init_logging();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    if arcstd_cli::wants_help(&args) {
        println!("arcstd-filter: Drop sentences the arc-standard oracle cannot reduce.");
        println!();
        println!("Usage: arcstd-filter [OPTIONS] [FILE]");
        println!();
        println!("Reads CoNLL-U from FILE (or stdin) and writes the reducible");
        println!("sentences to stdout, in their original order.");
        println!();
        println!("Options:");
        println!("  --stats       Print counts per failure kind to stderr");
        println!("  -h, --help    Print this help");
        return;
    }

    let stats = arcstd_cli::take_flag(&mut args, "--stats");
    let corpus = arcstd_cli::read_corpus(args.first().map(String::as_str))
        .unwrap_or_else(|e| arcstd_cli::fatal(&e));
    let total = corpus.len();

    let filtered = TreeProjectivityFilter::default().filter(corpus);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let _ = out.write_all(write_conllu(&filtered.kept).as_bytes());
    let _ = out.flush();

    if stats {
        let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
        for r in &filtered.rejected {
            *by_kind.entry(format!("{:?}", r.failure.kind())).or_default() += 1;
        }
        eprintln!("kept {} of {} sentences", filtered.kept.len(), total);
        for (kind, count) in by_kind {
            eprintln!("  {kind:14} {count}");
        }
    }
}

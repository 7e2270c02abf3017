// arcstd-oracle: Print gold operator sequences for a CoNLL-U corpus.
//
// Each reducible sentence produces one output line. Sentences the oracle
// rejects are counted and listed on stderr.
//
// Usage:
//   arcstd-oracle [-c CONFIG] [OPTIONS] [FILE]
//
// Options:
//   -c, --config PATH   Parser configuration (JSON)
//   --names             Print operator names instead of integer codes
//   --samples           Print JSON samples (feature windows + operator)
//   -h, --help          Print help

use std::io::{self, Write};

use arcstd_core::FeatureVocabularies;
use arcstd_transition::filter::build_dataset;
use arcstd_transition::{FeatureExtractor, Rejection, TransitionOracle};

fn main() {
    arcstd_cli::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, mut args) = arcstd_cli::take_option(&args, "--config", "-c");

    if arcstd_cli::wants_help(&args) {
        println!("arcstd-oracle: Print gold arc-standard operator sequences.");
        println!();
        println!("Usage: arcstd-oracle [-c CONFIG] [OPTIONS] [FILE]");
        println!();
        println!("Reads CoNLL-U from FILE (or stdin) and prints one line per");
        println!("projective sentence: operator codes (shift=0, rightArc=1, leftArc=2).");
        println!();
        println!("Options:");
        println!("  -c, --config PATH   Parser configuration (JSON)");
        println!("  --names             Print operator names instead of codes");
        println!("  --samples           Print JSON samples with feature windows");
        println!("  -h, --help          Print this help");
        return;
    }

    let names = arcstd_cli::take_flag(&mut args, "--names");
    let samples = arcstd_cli::take_flag(&mut args, "--samples");

    let config = arcstd_cli::load_config(config_path.as_deref())
        .unwrap_or_else(|e| arcstd_cli::fatal(&e));
    let corpus = arcstd_cli::read_corpus(args.first().map(String::as_str))
        .unwrap_or_else(|e| arcstd_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let oracle = TransitionOracle::new();

    let rejected = if samples {
        let vocabs = FeatureVocabularies::build(&config.features, &corpus);
        let extractor = FeatureExtractor::new(&config, vocabs);
        let dataset = build_dataset(&oracle, &extractor, &corpus);
        for sentence_samples in &dataset.samples {
            let line = serde_json::to_string(sentence_samples)
                .unwrap_or_else(|e| arcstd_cli::fatal(&format!("failed to encode samples: {e}")));
            let _ = writeln!(out, "{line}");
        }
        dataset.rejected
    } else {
        let mut rejected = Vec::new();
        for (index, sentence) in corpus.iter().enumerate() {
            match oracle.try_reduce(sentence) {
                Ok(ops) => {
                    let line: Vec<String> = if names {
                        ops.iter().map(|op| op.name().to_string()).collect()
                    } else {
                        ops.codes().iter().map(u8::to_string).collect()
                    };
                    let _ = writeln!(out, "{}", line.join(" "));
                }
                Err(failure) => rejected.push(Rejection { index, failure }),
            }
        }
        rejected
    };
    let _ = out.flush();

    report_rejections(corpus.len(), &rejected);
}

fn report_rejections(total: usize, rejected: &[Rejection]) {
    if rejected.is_empty() {
        return;
    }
    eprintln!("skipped {} of {} sentences:", rejected.len(), total);
    for r in rejected {
        eprintln!("  sentence {}: {}", r.index + 1, r.failure);
    }
}

// arcstd-decode: Decode predicted operator scores and report attachment scores.
//
// The gold corpus is filtered the same way as for training, and the score
// file must hold one JSON line per kept sentence: an array of
// `[shift, rightArc, leftArc]` score triples, one per step.
//
// Usage:
//   arcstd-decode [-c CONFIG] -s SCORES [-l LABELS] [OPTIONS] [FILE]
//
// Options:
//   -c, --config PATH   Parser configuration (JSON)
//   -s, --scores PATH   JSON lines of per-step operator scores
//   -l, --labels PATH   JSON lines of per-arc label correctness (for LAS)
//   --per-sentence      Print per-sentence correctness as JSON lines
//   -h, --help          Print help

use std::io::{self, Write};
use std::path::Path;

use arcstd_transition::{
    AttachmentScore, OperatorDecoder, OperatorScores, SentenceScore, TreeProjectivityFilter,
};
use serde::de::DeserializeOwned;

fn main() {
    arcstd_cli::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, args) = arcstd_cli::take_option(&args, "--config", "-c");
    let (scores_path, args) = arcstd_cli::take_option(&args, "--scores", "-s");
    let (labels_path, mut args) = arcstd_cli::take_option(&args, "--labels", "-l");

    if arcstd_cli::wants_help(&args) {
        println!("arcstd-decode: Replay predicted operator scores and score attachments.");
        println!();
        println!("Usage: arcstd-decode [-c CONFIG] -s SCORES [-l LABELS] [OPTIONS] [FILE]");
        println!();
        println!("Reads the gold CoNLL-U corpus from FILE (or stdin), drops the");
        println!("sentences the oracle cannot reduce, and decodes one score line");
        println!("per remaining sentence.");
        println!();
        println!("Options:");
        println!("  -c, --config PATH   Parser configuration (JSON)");
        println!("  -s, --scores PATH   JSON lines of [shift, rightArc, leftArc] triples");
        println!("  -l, --labels PATH   JSON lines of per-arc label correctness");
        println!("  --per-sentence      Print per-sentence correctness as JSON lines");
        println!("  -h, --help          Print this help");
        return;
    }

    let per_sentence = arcstd_cli::take_flag(&mut args, "--per-sentence");
    let scores_path =
        scores_path.unwrap_or_else(|| arcstd_cli::fatal("--scores is required"));

    let config = arcstd_cli::load_config(config_path.as_deref())
        .unwrap_or_else(|e| arcstd_cli::fatal(&e));
    let corpus = arcstd_cli::read_corpus(args.first().map(String::as_str))
        .unwrap_or_else(|e| arcstd_cli::fatal(&e));
    let kept = TreeProjectivityFilter::default().filter(corpus).kept;

    let scores: Vec<Vec<OperatorScores>> =
        read_json_lines(&scores_path).unwrap_or_else(|e| arcstd_cli::fatal(&e));
    if scores.len() != kept.len() {
        arcstd_cli::fatal(&format!(
            "{} score lines for {} projective sentences",
            scores.len(),
            kept.len()
        ));
    }
    let labels: Option<Vec<Vec<bool>>> = labels_path.map(|p| {
        let labels: Vec<Vec<bool>> =
            read_json_lines(&p).unwrap_or_else(|e| arcstd_cli::fatal(&e));
        if labels.len() != kept.len() {
            arcstd_cli::fatal(&format!(
                "{} label lines for {} projective sentences",
                labels.len(),
                kept.len()
            ));
        }
        labels
    });

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let decoder = OperatorDecoder::new();
    let mut total = AttachmentScore::default();
    let mut incomplete = 0;

    for (index, (sentence, rows)) in kept.iter().zip(&scores).enumerate() {
        let budget = config.step_budget(sentence.len());
        if rows.len() != budget {
            tracing::debug!(index, steps = rows.len(), budget, "unexpected score count");
        }

        let decoded = decoder.decode(sentence, rows);
        if !decoded.complete {
            incomplete += 1;
        }

        let heads = &decoded.correctness;
        let label_row = labels.as_ref().map_or(heads.as_slice(), |l| l[index].as_slice());
        let score = SentenceScore::for_sentence(index, heads, label_row)
            .unwrap_or_else(|e| arcstd_cli::fatal(&e.to_string()));
        total.accumulate(score);

        if per_sentence {
            let line = serde_json::to_string(&decoded.correctness)
                .unwrap_or_else(|e| arcstd_cli::fatal(&format!("failed to encode output: {e}")));
            let _ = writeln!(out, "{line}");
        }
    }

    let _ = writeln!(out, "sentences:  {}", total.sentences);
    let _ = writeln!(out, "arcs:       {}", total.totals.total);
    let _ = writeln!(out, "incomplete: {incomplete}");
    let _ = writeln!(out, "UAS:        {}", format_ratio(total.uas()));
    if labels.is_some() {
        let _ = writeln!(out, "LAS:        {}", format_ratio(total.las()));
    }
    let _ = out.flush();
}

fn read_json_lines<T: DeserializeOwned>(path: &str) -> Result<Vec<T>, String> {
    let text = std::fs::read_to_string(Path::new(path))
        .map_err(|e| format!("failed to read {path}: {e}"))?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| format!("{path}:{}: {e}", i + 1))
        })
        .collect()
}

fn format_ratio(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "n/a".to_string(), |r| format!("{:.2}%", r * 100.0))
}

// CoNLL-U reading and writing.
//
// Only the basic token lines are kept: multiword-token ranges (`3-4`) and
// empty nodes (`5.1`) are skipped, as are comment lines. Column values are
// stored verbatim, so writing a parsed corpus back reproduces its token
// lines.

use std::fmt::Write as _;
use std::path::Path;

use crate::token::{ATTR_DEPS, ATTR_FEATS, ATTR_MISC, Sentence, Token};

const COLUMN_COUNT: usize = 10;

/// Error type for corpus input.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("line {line}: expected 10 tab-separated columns, found {found}")]
    ColumnCount { line: usize, found: usize },
    #[error("line {line}: invalid token id {value:?}")]
    InvalidId { line: usize, value: String },
    #[error("line {line}: invalid head {value:?}")]
    InvalidHead { line: usize, value: String },
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parse CoNLL-U text into sentences.
///
/// Sentences are separated by blank lines; a trailing sentence without a
/// final blank line is still returned. Sentences with no basic token lines
/// are dropped.
pub fn parse_conllu(text: &str) -> Result<Vec<Sentence>, CorpusError> {
    let mut sentences = Vec::new();
    let mut tokens = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() {
            if !tokens.is_empty() {
                sentences.push(Sentence::new(std::mem::take(&mut tokens)));
            }
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        if let Some(token) = parse_token_line(line, line_no)? {
            tokens.push(token);
        }
    }

    if !tokens.is_empty() {
        sentences.push(Sentence::new(tokens));
    }
    Ok(sentences)
}

/// Read and parse a CoNLL-U file.
pub fn read_conllu(path: &Path) -> Result<Vec<Sentence>, CorpusError> {
    let text = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_conllu(&text)
}

fn parse_token_line(line: &str, line_no: usize) -> Result<Option<Token>, CorpusError> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() != COLUMN_COUNT {
        return Err(CorpusError::ColumnCount {
            line: line_no,
            found: cols.len(),
        });
    }

    let id_col = cols[0];
    if id_col.contains('-') || id_col.contains('.') {
        return Ok(None);
    }
    let id = id_col
        .parse::<usize>()
        .ok()
        .filter(|&id| id > 0)
        .ok_or_else(|| CorpusError::InvalidId {
            line: line_no,
            value: id_col.to_string(),
        })?;

    let head = match cols[6] {
        "_" => None,
        value => Some(value.parse::<usize>().map_err(|_| CorpusError::InvalidHead {
            line: line_no,
            value: value.to_string(),
        })?),
    };

    let token = Token::new(id, head)
        .with_form(cols[1])
        .with_lemma(cols[2])
        .with_upos(cols[3])
        .with_xpos(cols[4])
        .with_attribute(ATTR_FEATS, cols[5])
        .with_deprel(cols[7])
        .with_attribute(ATTR_DEPS, cols[8])
        .with_attribute(ATTR_MISC, cols[9]);
    Ok(Some(token))
}

/// Serialize sentences as CoNLL-U, one blank line after each sentence.
/// Missing values are written as `_`.
pub fn write_conllu(sentences: &[Sentence]) -> String {
    let mut out = String::new();
    for sentence in sentences {
        for token in sentence.tokens() {
            let head = token
                .head()
                .map_or_else(|| "_".to_string(), |h| h.to_string());
            let cols = [
                token.id().to_string(),
                or_blank(token.form()),
                or_blank(token.lemma()),
                or_blank(token.upos()),
                or_blank(token.xpos()),
                or_blank(extra(token, ATTR_FEATS)),
                head,
                or_blank(token.deprel()),
                or_blank(extra(token, ATTR_DEPS)),
                or_blank(extra(token, ATTR_MISC)),
            ];
            let _ = writeln!(out, "{}", cols.join("\t"));
        }
        out.push('\n');
    }
    out
}

fn extra<'a>(token: &'a Token, name: &str) -> &'a str {
    token.attribute(name).unwrap_or("")
}

fn or_blank(value: &str) -> String {
    if value.is_empty() {
        "_".to_string()
    } else {
        value.to_string()
    }
}

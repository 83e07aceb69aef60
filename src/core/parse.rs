//! Decoding of the tagger's CoNLL output.
//!
//! Each output line is classified into a [`LineOutcome`]; documents are then
//! a fold over those outcomes, closed at every boundary (an exactly empty
//! line). Only lines with exactly two tabs are records: `tokens\ttags\tconf`.
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{LineOutcome, ParseMode, TaggedDocument, TaggedToken};

/// Classify one line of tagger output (line terminator already removed).
pub fn decode_line(line: &str) -> LineOutcome {
    if line.is_empty() {
        return LineOutcome::Boundary;
    }
    if line.matches('\t').count() != 2 {
        return LineOutcome::Ignored;
    }
    let mut parts = line.splitn(3, '\t');
    let (Some(text), Some(tag), Some(confidence)) = (parts.next(), parts.next(), parts.next())
    else {
        return LineOutcome::Ignored;
    };
    match confidence.trim().parse::<f64>() {
        Ok(confidence) => LineOutcome::Decoded(TaggedToken::new(
            text.to_string(),
            tag.to_string(),
            confidence,
        )),
        Err(e) => LineOutcome::Malformed(format!("confidence {:?}: {}", confidence, e)),
    }
}

/// Group a stream of tagger output lines into documents.
///
/// Errors yielded by the stream itself (I/O, abnormal exit, timeout) abort
/// the parse in every mode. A trailing group with no closing blank line is
/// kept as the last document if it holds at least one record line.
pub fn parse_lines<I>(lines: I, mode: ParseMode) -> Result<Vec<TaggedDocument>>
where
    I: IntoIterator<Item = Result<String>>,
{
    let mut documents: Vec<TaggedDocument> = Vec::new();
    let mut current: TaggedDocument = Vec::new();
    let mut pending = false;

    for (idx, line) in lines.into_iter().enumerate() {
        let line = line?;
        let line_number = idx + 1;
        match decode_line(&line) {
            LineOutcome::Boundary => {
                documents.push(std::mem::take(&mut current));
                pending = false;
            }
            LineOutcome::Decoded(token) => {
                current.push(token);
                pending = true;
            }
            LineOutcome::Ignored => {}
            LineOutcome::Malformed(reason) => match mode {
                ParseMode::Strict => {
                    return Err(Error::MalformedLine {
                        line_number,
                        line,
                        reason,
                    });
                }
                ParseMode::Lenient => {
                    debug!("Skipping malformed line {}: {}", line_number, reason);
                    pending = true;
                }
            },
        }
    }

    if pending {
        documents.push(current);
    }
    Ok(documents)
}

/// Parse output that has already been captured as a string.
pub fn parse_str(output: &str, mode: ParseMode) -> Result<Vec<TaggedDocument>> {
    parse_lines(
        output
            .lines()
            .map(|l| Ok(l.strip_suffix('\r').unwrap_or(l).to_string())),
        mode,
    )
}

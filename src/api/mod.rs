//! High-level, ergonomic library API: tag a file, tag in-memory texts, and
//! check that the tagger is reachable. Prefer these entrypoints over the
//! low-level `io` and `core` modules when integrating arktag.
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::core::params::TaggerParams;
use crate::core::parse::parse_lines;
use crate::error::{Error, Result};
use crate::io::invoker::InvocationSpec;
use crate::types::TaggedDocument;

pub use crate::io::presence::check_tagger_present;

/// Tag a plain-text file holding one input unit per line.
///
/// Document `i` of the result belongs to line `i` of the file, as long as
/// the tagger emits one block per line; that alignment is not checked here.
pub fn tag_file(input: &Path, params: &TaggerParams) -> Result<Vec<TaggedDocument>> {
    let spec = InvocationSpec::new(params.command.as_str(), input);
    let lines = spec.spawn(params.timeout())?;
    let documents = parse_lines(lines, params.parse_mode)?;
    info!(
        "Tagged {:?}: {} documents ({} mode)",
        input,
        documents.len(),
        params.parse_mode
    );
    Ok(documents)
}

/// Tag a list of texts by writing them, one per line, to a temporary file.
///
/// Texts must not contain line breaks: each one has to stay a single input
/// line for the results to line up with `texts`.
pub fn tag_texts<S: AsRef<str>>(texts: &[S], params: &TaggerParams) -> Result<Vec<TaggedDocument>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let mut file = NamedTempFile::new()?;
    for (idx, text) in texts.iter().enumerate() {
        let text = text.as_ref();
        if text.contains(['\n', '\r']) {
            return Err(Error::InvalidInput(format!(
                "text {} contains a line break",
                idx
            )));
        }
        writeln!(file, "{}", text)?;
    }
    file.flush()?;
    debug!("Wrote {} texts to {:?}", texts.len(), file.path());

    let documents = tag_file(file.path(), params)?;
    if documents.len() != texts.len() {
        warn!(
            "Tagger returned {} documents for {} texts; results may be misaligned",
            documents.len(),
            texts.len()
        );
    }
    Ok(documents)
}

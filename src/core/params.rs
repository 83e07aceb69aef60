use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ParseMode;

/// The launcher line from the tagger's own `runTagger.sh`.
pub const DEFAULT_RUN_TAGGER_CMD: &str =
    "java -XX:ParallelGCThreads=2 -Xmx500m -jar ark-tweet-nlp-0.3.2.jar";

/// Tagger parameters suitable for config files and the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerParams {
    /// Base command line; `--output-format conll <file>` is appended to it
    pub command: String,
    pub parse_mode: ParseMode,
    /// Kill the tagger after this many seconds; None waits forever
    pub timeout_secs: Option<u64>,
}

impl TaggerParams {
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for TaggerParams {
    fn default() -> Self {
        Self {
            command: DEFAULT_RUN_TAGGER_CMD.to_string(),
            parse_mode: ParseMode::Lenient,
            timeout_secs: None,
        }
    }
}

#![doc = r#"
arktag — run the ARK Tweet NLP part-of-speech tagger from Rust.

This crate is a thin wrapper around the CMU ARK Tweet NLP tagger
(`ark-tweet-nlp-0.3.2.jar`). It launches the tagger as a child process,
reads its CoNLL output and returns one document of
`(token, tag, confidence)` records per input line. All the linguistics live in
the external tool; arktag only builds the command line and decodes the output.

Requirements
------------
- A Java runtime and the ARK tagger jar reachable from the configured command.
- Rust 2024 edition toolchain.

Quick start: tag a file
-----------------------
```rust,no_run
use std::path::Path;
use arktag::{tag_file, TaggerParams};

fn main() -> arktag::Result<()> {
    let params = TaggerParams::default();
    for (i, doc) in tag_file(Path::new("tweets.txt"), &params)?.iter().enumerate() {
        println!("Tweet {}", i + 1);
        for token in doc {
            println!("{:?}", token.as_tuple());
        }
    }
    Ok(())
}
```

In-memory texts
---------------
```rust,no_run
use arktag::{tag_texts, ParseMode, TaggerParams};

fn main() -> arktag::Result<()> {
    let params = TaggerParams {
        command: "java -Xmx500m -jar /opt/ark/ark-tweet-nlp-0.3.2.jar".to_string(),
        parse_mode: ParseMode::Strict,
        timeout_secs: Some(60),
    };
    let docs = tag_texts(&["good morning", "bad news"], &params)?;
    assert_eq!(docs.len(), 2);
    Ok(())
}
```

Parsing captured output
-----------------------
```rust
use arktag::{parse_str, ParseMode};

let docs = parse_str("good\tA\t0.91\nmorning\tN\t0.88\n\n", ParseMode::Lenient).unwrap();
assert_eq!(docs[0][1].tag(), "N");
```

Error handling
--------------
All public functions return `arktag::Result<T>`; match on `arktag::Error`:

```rust,no_run
use std::path::Path;
use arktag::{tag_file, Error, TaggerParams};

fn main() {
    match tag_file(Path::new("tweets.txt"), &TaggerParams::default()) {
        Ok(docs) => println!("{} documents", docs.len()),
        Err(Error::ToolNotFound { command, .. }) => eprintln!("cannot launch {command}"),
        Err(Error::ToolInvocation { status, .. }) => eprintln!("tagger failed: {status}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`] — high-level entry points.
- [`types`] — `TaggedToken`, `TaggedDocument`, `LineOutcome`, `ParseMode`.
- [`io`] — the process invoker and the presence check.
- [`core`] — parameters and the output parser.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
pub use crate::core::params::{DEFAULT_RUN_TAGGER_CMD, TaggerParams};
pub use crate::core::parse::{decode_line, parse_lines, parse_str};
pub use error::{Error, Result};
pub use types::{LineOutcome, OutputFormat, ParseMode, TaggedDocument, TaggedToken};

pub use io::invoker::{CancelHandle, InvocationSpec, TaggerLines};
pub use io::presence::USAGE_BANNER;

pub use api::{check_tagger_present, tag_file, tag_texts};

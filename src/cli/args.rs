use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use arktag::{OutputFormat, ParseMode};

#[derive(Parser)]
#[command(name = "arktag", version, about = "ARK Tweet NLP tagger wrapper")]
pub struct CliArgs {
    /// Enable logging (RUST_LOG overrides the level)
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Tag a text file (one input unit per line) and print the results
    Tag(TagArgs),
    /// Check that the tagger can be launched and answers --help
    Check(CheckArgs),
}

#[derive(Args)]
pub struct TagArgs {
    /// Input text file, one tweet per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// Tagger command line (default: the runTagger.sh java invocation)
    #[arg(short, long)]
    pub command: Option<String>,

    /// JSON file with tagger parameters; explicit flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fail on malformed output lines instead of skipping them
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Kill the tagger after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format (json or tsv)
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

impl TagArgs {
    /// Parse mode requested on the command line, if any
    pub fn parse_mode(&self) -> Option<ParseMode> {
        self.strict.then_some(ParseMode::Strict)
    }
}

#[derive(Args)]
pub struct CheckArgs {
    /// Tagger command line (default: the runTagger.sh java invocation)
    #[arg(short, long)]
    pub command: Option<String>,
}

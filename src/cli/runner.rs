use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use arktag::{OutputFormat, TaggedDocument, TaggerParams, check_tagger_present, tag_file};

use super::args::{CheckArgs, CliArgs, CliCommand, TagArgs};
use super::errors::AppError;

fn load_params(path: &Path) -> Result<TaggerParams, AppError> {
    let raw = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_params(args: &TagArgs) -> Result<TaggerParams, AppError> {
    let mut params = match &args.config {
        Some(path) => load_params(path)?,
        None => TaggerParams::default(),
    };
    if let Some(command) = &args.command {
        params.command = command.clone();
    }
    if let Some(mode) = args.parse_mode() {
        params.parse_mode = mode;
    }
    if args.timeout.is_some() {
        params.timeout_secs = args.timeout;
    }
    Ok(params)
}

fn write_documents<W: Write>(
    out: &mut W,
    documents: &[TaggedDocument],
    format: OutputFormat,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, documents)?;
            writeln!(out)?;
        }
        OutputFormat::Tsv => {
            writeln!(out, "doc\ttoken\ttag\tconfidence")?;
            for (idx, doc) in documents.iter().enumerate() {
                for token in doc {
                    writeln!(
                        out,
                        "{}\t{}\t{}\t{}",
                        idx,
                        token.text(),
                        token.tag(),
                        token.confidence()
                    )?;
                }
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn run_tag(args: &TagArgs) -> Result<(), AppError> {
    let params = resolve_params(args)?;
    info!("Tagging {:?} with {:?}", args.input, params.command);

    let documents = tag_file(&args.input, &params)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_documents(&mut out, &documents, args.format)
}

fn run_check(args: &CheckArgs) -> Result<(), AppError> {
    let command = args
        .command
        .clone()
        .unwrap_or_else(|| TaggerParams::default().command);
    println!("Checking that we can see {:?}", command);
    if !check_tagger_present(&command) {
        return Err(AppError::TaggerMissing { command });
    }
    println!("Success.");
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    match &args.command {
        CliCommand::Tag(tag) => run_tag(tag)?,
        CliCommand::Check(check) => run_check(check)?,
    }
    Ok(())
}

use std::io::{BufRead, BufReader};
use std::process::{ChildStdout, Command, Stdio};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::io::invoker::split_command;

/// Expected in the first line of the tagger's `--help` output
pub const USAGE_BANNER: &str = "RunTagger [options]";

/// Check that the configured tagger can be launched and answers `--help`
/// with its usage banner. Launch failures are logged and reported as `false`.
pub fn check_tagger_present(command: &str) -> bool {
    match probe_usage(command) {
        Ok(true) => true,
        Ok(false) => {
            warn!(
                "Tagger {:?} ran, but the first line of its --help output lacks {:?}",
                command, USAGE_BANNER
            );
            false
        }
        Err(e) => {
            warn!(
                "Could not launch the tagger, have you specified the correct path to runTagger.sh? We are using {:?}: {}",
                command, e
            );
            false
        }
    }
}

fn probe_usage(command: &str) -> Result<bool> {
    let mut argv = split_command(command)?;
    argv.push("--help".to_string());
    debug!("Probing tagger: {:?}", argv);

    let mut child = Command::new(&argv[0])
        .args(&argv[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| Error::ToolNotFound {
            command: command.to_string(),
            source,
        })?;

    let first = match child.stdout.take() {
        Some(stdout) => read_first_line(stdout),
        None => Ok(String::new()),
    };
    child.wait()?;
    Ok(first?.contains(USAGE_BANNER))
}

fn read_first_line(stdout: ChildStdout) -> std::io::Result<String> {
    let mut reader = BufReader::new(stdout);
    let mut first = String::new();
    reader.read_line(&mut first)?;
    // Drain the rest so a long usage text cannot block the child.
    std::io::copy(&mut reader, &mut std::io::sink())?;
    Ok(first)
}

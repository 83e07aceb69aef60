//! End-to-end runs against a fabricated tagger: a shell script that accepts
//! the same arguments as runTagger.sh and prints CoNLL blocks.
#![cfg(unix)]

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use arktag::{
    Error, InvocationSpec, ParseMode, TaggedDocument, TaggerParams, check_tagger_present,
    parse_lines, tag_file, tag_texts,
};
use tempfile::TempDir;

/// Tags every whitespace-separated word of each input line as `N`.
const WORD_TAGGER: &str = r#"
[ "$1" = "--output-format" ] && [ "$2" = "conll" ] || exit 2
while IFS= read -r line; do
  for w in $line; do printf '%s\tN\t0.9\n' "$w"; done
  printf '\n'
done < "$3"
"#;

fn fake_tagger(dir: &TempDir, body: &str) -> String {
    let script = dir.path().join("runTagger.sh");
    fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
    format!("sh '{}'", script.display())
}

fn input_file(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("tweets.txt");
    fs::write(&path, contents).unwrap();
    path
}

fn texts(doc: &TaggedDocument) -> Vec<&str> {
    doc.iter().map(|t| t.text()).collect()
}

#[test]
fn documents_follow_input_line_order() {
    let dir = TempDir::new().unwrap();
    let params = TaggerParams::with_command(fake_tagger(&dir, WORD_TAGGER));
    let input = input_file(&dir, "good morning\nbad news\n");

    let docs = tag_file(&input, &params).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(texts(&docs[0]), vec!["good", "morning"]);
    assert_eq!(texts(&docs[1]), vec!["bad", "news"]);
    assert!(docs.iter().flatten().all(|t| t.tag() == "N" && t.confidence() == 0.9));
}

#[test]
fn fabricated_two_block_output() {
    let dir = TempDir::new().unwrap();
    let body = r#"printf 'good\tA\t0.9871\nmorning\tN\t0.9932\n\nbad\tA\t0.9764\nnews\tN\t0.9955\n'"#;
    let params = TaggerParams::with_command(fake_tagger(&dir, body));
    let input = input_file(&dir, "good morning\nbad news\n");

    let docs = tag_file(&input, &params).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0][0].as_tuple(), ("good", "A", 0.9871));
    assert_eq!(docs[0][1].as_tuple(), ("morning", "N", 0.9932));
    assert_eq!(docs[1][0].as_tuple(), ("bad", "A", 0.9764));
    assert_eq!(docs[1][1].as_tuple(), ("news", "N", 0.9955));
}

#[test]
fn tag_texts_yields_one_document_per_text() {
    let dir = TempDir::new().unwrap();
    let params = TaggerParams::with_command(fake_tagger(&dir, WORD_TAGGER));
    let tweets = ["ikr smh he asked fir yo last name", "@user lol", "so tired", "gm"];

    let docs = tag_texts(&tweets, &params).unwrap();
    assert_eq!(docs.len(), tweets.len());
    assert_eq!(texts(&docs[1]), vec!["@user", "lol"]);
    assert_eq!(texts(&docs[3]), vec!["gm"]);
}

#[test]
fn non_zero_exit_is_an_invocation_error() {
    let dir = TempDir::new().unwrap();
    let params = TaggerParams::with_command(fake_tagger(&dir, "printf 'a\\tN\\t0.5\\n\\n'\nexit 3"));
    let input = input_file(&dir, "a\n");

    match tag_file(&input, &params) {
        Err(Error::ToolInvocation { status, .. }) => assert_eq!(status.code(), Some(3)),
        other => panic!("expected ToolInvocation, got {:?}", other),
    }
}

#[test]
fn strict_and_lenient_modes_on_bad_confidence() {
    let dir = TempDir::new().unwrap();
    let body = r#"printf 'a b\tN N\tnotanumber\nc\tV\t0.5\n\n'"#;
    let command = fake_tagger(&dir, body);
    let input = input_file(&dir, "a b c\n");

    let lenient = tag_file(&input, &TaggerParams::with_command(command.as_str())).unwrap();
    assert_eq!(lenient.len(), 1);
    assert_eq!(texts(&lenient[0]), vec!["c"]);

    let strict = TaggerParams {
        parse_mode: ParseMode::Strict,
        ..TaggerParams::with_command(command.as_str())
    };
    assert!(matches!(
        tag_file(&input, &strict),
        Err(Error::MalformedLine { line_number: 1, .. })
    ));
}

#[test]
fn hung_tagger_times_out() {
    let dir = TempDir::new().unwrap();
    let params = TaggerParams {
        timeout_secs: Some(1),
        ..TaggerParams::with_command(fake_tagger(&dir, "exec sleep 10"))
    };
    let input = input_file(&dir, "a\n");

    match tag_file(&input, &params) {
        Err(Error::Timeout { secs, .. }) => assert_eq!(secs, 1),
        other => panic!("expected Timeout, got {:?}", other),
    }
}

// runTagger.sh style: the script stays alive and its child holds stdout.
#[test]
fn timeout_kills_the_launchers_children_too() {
    let dir = TempDir::new().unwrap();
    let params = TaggerParams {
        timeout_secs: Some(1),
        ..TaggerParams::with_command(fake_tagger(&dir, "sleep 10\necho done"))
    };
    let input = input_file(&dir, "a\n");

    let started = Instant::now();
    let result = tag_file(&input, &params);
    let elapsed = started.elapsed();
    assert!(matches!(result, Err(Error::Timeout { .. })), "{:?}", result);
    assert!(elapsed < Duration::from_secs(5), "took {:?}", elapsed);
}

#[test]
fn cancelled_run_discards_partial_output() {
    let dir = TempDir::new().unwrap();
    let command = fake_tagger(&dir, "printf 'a\\tN\\t0.5\\n'\nsleep 10\necho done");
    let input = input_file(&dir, "a\n");

    let mut lines = InvocationSpec::new(command, &input).spawn(None).unwrap();
    assert_eq!(lines.next().unwrap().unwrap(), "a\tN\t0.5");

    let handle = lines.cancel_handle();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        handle.cancel();
    });
    let started = Instant::now();
    assert!(matches!(
        parse_lines(lines, ParseMode::Lenient),
        Err(Error::Cancelled { .. })
    ));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn presence_check_reads_usage_banner() {
    let dir = TempDir::new().unwrap();
    let tagger = fake_tagger(
        &dir,
        r#"[ "$1" = "--help" ] && echo 'RunTagger [options] [ExamplesFilename]'"#,
    );
    assert!(check_tagger_present(&tagger));

    let other = TempDir::new().unwrap();
    let not_tagger = fake_tagger(&other, "echo 'usage: something else'");
    assert!(!check_tagger_present(&not_tagger));
}

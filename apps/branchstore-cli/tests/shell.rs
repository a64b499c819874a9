use std::io::Write;
use std::process::{Command, Stdio};

struct Run {
    stdout: String,
    stderr: String,
    success: bool,
}

fn run_shell(args: &[&str], script: impl AsRef<[u8]>) -> Run {
    let mut child = Command::new(env!("CARGO_BIN_EXE_branchstore"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn branchstore");
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(script.as_ref())
        .expect("write script");
    let output = child.wait_with_output().expect("wait for branchstore");
    Run {
        stdout: String::from_utf8(output.stdout).expect("utf8 stdout"),
        stderr: String::from_utf8(output.stderr).expect("utf8 stderr"),
        success: output.status.success(),
    }
}

#[test]
fn ranking_scenario_over_stdin() {
    let run = run_shell(
        &[],
        "CREATE a\nCREATE b\nINSERT a x\nINSERT b y\nINSERT b z\nRECENT_FILES 1\nBIGGEST_TREES\nREAD b\n",
    );
    assert!(run.success);
    assert_eq!(
        run.stdout,
        "Created file 'a'.\n\
         Created file 'b'.\n\
         Most Recently Modified Files:\n  - b (Last modified: t=5)\n\
         Files with Most Versions:\n  - a (2 versions)\n  - b (2 versions)\n\
         yz\n"
    );
    assert!(run.stderr.is_empty(), "unexpected stderr: {}", run.stderr);
}

#[test]
fn errors_and_warnings_do_not_stop_the_loop() {
    let run = run_shell(
        &[],
        "CREATE a\nCREATE a\nSNAPSHOT a again\nROLLBACK a\nROLLBACK a 7\nNOPE\nREAD a\n",
    );
    assert!(run.success);
    assert_eq!(run.stdout, "Created file 'a'.\n\n");
    let errors: Vec<&str> = run.stderr.lines().collect();
    assert_eq!(
        errors,
        vec![
            "Error: file 'a' already exists",
            "Warning: version 0 of 'a' is already a snapshot.",
            "Error: file 'a': version 0 is the root and has no parent",
            "Error: file 'a': version 7 does not exist",
            "Error: unknown command 'NOPE'",
        ]
    );
}

#[test]
fn invalid_utf8_line_keeps_session_going() {
    let run = run_shell(&[], b"CREATE a\nINSERT a caf\xe9\nCREATE b\nRECENT_FILES\n");
    assert!(run.success);
    assert_eq!(
        run.stdout,
        "Created file 'a'.\n\
         Created file 'b'.\n\
         Most Recently Modified Files:\n  - b (Last modified: t=3)\n  - a (Last modified: t=2)\n"
    );
    assert!(run.stderr.is_empty(), "unexpected stderr: {}", run.stderr);
}

#[test]
fn negative_rollback_id_moves_to_parent() {
    let run = run_shell(
        &[],
        "CREATE a\nINSERT a one\nSNAPSHOT a v1\nINSERT a two\nROLLBACK a -1\nREAD a\n",
    );
    assert!(run.success);
    assert_eq!(run.stdout, "Created file 'a'.\none\n");
    assert!(run.stderr.is_empty(), "unexpected stderr: {}", run.stderr);
}

#[test]
fn empty_input_exits_cleanly() {
    let run = run_shell(&[], "");
    assert!(run.success);
    assert!(run.stdout.is_empty());
}

#[test]
fn json_format_emits_one_object_per_command() {
    let run = run_shell(&["--format", "json"], "CREATE a\nINSERT a hi\nREAD nope\n");
    assert!(run.success);
    let lines: Vec<serde_json::Value> = run
        .stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["result"], "created");
    assert_eq!(lines[1]["result"], "written");
    assert_eq!(lines[1]["branched"], true);
    assert_eq!(lines[2]["result"], "failed");
    assert_eq!(lines[2]["kind"], "not_found");
    assert_eq!(lines[2]["file"], "nope");
}

#[test]
fn config_file_sets_root_message() {
    let mut config = tempfile::NamedTempFile::new().expect("temp config");
    config
        .write_all(b"root_message: genesis\n")
        .expect("write config");
    let path = config.path().to_str().expect("utf8 path").to_owned();

    let run = run_shell(&["--config", &path], "CREATE a\nHISTORY a\n");
    assert!(run.success);
    assert_eq!(
        run.stdout,
        "Created file 'a'.\nHistory for file: a\n  - Version 0: genesis (snapshot at t=1)\n"
    );
}

#[test]
fn unreadable_config_fails() {
    let run = run_shell(&["--config", "/definitely/not/here.yaml"], "CREATE a\n");
    assert!(!run.success);
    assert!(run.stderr.contains("not/here.yaml"));
}

use std::{
    fs,
    io::Write,
    path::PathBuf,
    process::{Command, Output, Stdio},
};

/// Board file in the temporary directory, deleted when dropped.
struct BoardFile {
    path: PathBuf,
}

impl BoardFile {
    fn new(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "wumpus-cli-{}-{name}.txt",
            std::process::id()
        ));
        fs::write(&path, contents).expect("temporary board is writable");
        Self { path }
    }

    fn arg(&self) -> &str {
        self.path.to_str().expect("utf-8 path")
    }
}

impl Drop for BoardFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn run(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_hunt-the-wumpus"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch hunt-the-wumpus");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("stdin accepts input");
    child.wait_with_output().expect("process completes")
}

#[test]
fn astar_mode_walks_to_the_gold() {
    let board = BoardFile::new("astar", "..G\n...\nA..\n");

    let output = run(
        &["--mode", "astar", "--board", board.arg()],
        "",
    );

    assert!(output.status.success(), "astar run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Welcome to Hunt the Wumpus!"));
    assert!(stdout.contains("Turn 4: right"));
    assert!(stdout.contains("You found the gold! You win!"));
}

#[test]
fn minimax_mode_respects_the_turn_cap() {
    let output = run(
        &[
            "--mode",
            "minimax",
            "--size",
            "5",
            "--seed",
            "7",
            "--depth",
            "2",
            "--moving-pit",
            "--max-turns",
            "1",
        ],
        "",
    );

    assert!(output.status.success(), "minimax run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Turn 1: "));
    assert!(!stdout.contains("Turn 2: "));
}

#[test]
fn text_mode_reads_commands_from_stdin() {
    let board = BoardFile::new("text", "..G\n[W]..\nA..\n");

    let output = run(
        &["--board", board.arg()],
        "d w\nq\n",
    );

    assert!(output.status.success(), "text run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("You killed the Wumpus!"));
    assert!(stdout.contains("Goodbye"));
}

#[test]
fn malformed_board_is_reported() {
    let board = BoardFile::new("ragged", "A..\n.[G\n...\n");

    let output = run(
        &["--mode", "astar", "--board", board.arg()],
        "",
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load board"));
    assert!(stderr.contains("never closed"));
}

#[test]
fn undersized_boards_are_rejected_by_the_parser() {
    let output = run(&["--mode", "astar", "--size", "2"], "");

    assert!(!output.status.success());
}

#[test]
fn rounds_replay_the_custom_board() {
    let board = BoardFile::new("rounds", "..G\n...\nA..\n");

    let output = run(
        &["--mode", "astar", "--board", board.arg(), "--rounds", "2"],
        "",
    );

    assert!(output.status.success(), "repeated astar run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Restarting the custom board...").count(), 1);
    assert_eq!(stdout.matches("You found the gold! You win!").count(), 2);
    assert_eq!(stdout.matches("Turn 4: right").count(), 2);
}

#[test]
fn board_files_are_removed_after_use() {
    let board = BoardFile::new("cleanup", "A..\n...\n..G\n");
    let path = board.path.clone();
    assert!(path.exists());

    drop(board);

    assert!(!path.exists());
}

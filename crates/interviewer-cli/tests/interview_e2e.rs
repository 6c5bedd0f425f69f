//! End-to-end interview runs against a mocked evaluation service.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EVALUATION: &str = "Score: 4/5\nFeedback: Solid answer.\nImprovement Tips: Give an example.";

async fn evaluation_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer file-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": EVALUATION}, "index": 0}],
            "model": "llama3-8b-8192"
        })))
        .mount(&server)
        .await;
    server
}

fn workspace(server: &MockServer, formats: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("interviewer.toml"),
        format!(
            "output_dir = \"transcripts\"\nformats = {formats}\n\n\
             [evaluator]\nbase_url = \"{}\"\ntimeout_secs = 5\n",
            server.uri()
        ),
    )
    .unwrap();
    std::fs::write(dir.path().join("secrets.toml"), "GROQ_API_KEY = \"file-key\"\n").unwrap();
    dir
}

fn run(dir: &TempDir, stdin: &'static str) -> assert_cmd::assert::Assert {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("interviewer").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("GROQ_API_KEY", "env-key-should-not-be-used")
        .arg("--seed")
        .arg("7")
        .write_stdin(stdin)
        .assert()
}

fn transcript_files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path().join("transcripts"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test(flavor = "multi_thread")]
async fn completes_interview_and_writes_transcript() {
    let server = evaluation_server().await;
    let dir = workspace(&server, r#"["text", "json"]"#);

    let dir = tokio::task::spawn_blocking(move || {
        run(&dir, "\nfirst\n\nsecond\nthird\nfourth\nfifth\nn\n")
            .success()
            .stdout(predicate::str::contains("Interview Completed!"))
            .stdout(predicate::str::contains("Average score: 4.0/5"))
            .stdout(predicate::str::contains("Transcript saved to"));
        dir
    })
    .await
    .unwrap();

    let files = transcript_files(&dir);
    assert_eq!(files.len(), 2, "unexpected files: {files:?}");
    assert!(files.iter().all(|f| f.starts_with("sample_transcript_")));

    let text_name = files.iter().find(|f| f.ends_with(".txt")).unwrap();
    let text = std::fs::read_to_string(dir.path().join("transcripts").join(text_name)).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // four logical lines per question; the feedback spans three physical lines
    assert_eq!(lines.len(), 5 * 6);
    assert!(lines[0].starts_with("Q1: "));
    assert_eq!(lines[1], "User Answer: first");
    assert_eq!(lines[2], "Score: 4/5");
    assert_eq!(lines[5], "-".repeat(50));
    assert_eq!(lines[7], "User Answer: second");
}

#[tokio::test(flavor = "multi_thread")]
async fn evaluation_failure_keeps_progress() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;
    let dir = workspace(&server, r#"["text"]"#);

    tokio::task::spawn_blocking(move || {
        run(&dir, "\nfirst\n")
            .success()
            .stdout(predicate::str::contains("HTTP 503"))
            .stdout(predicate::str::contains("Please try again."))
            .stdout(predicate::str::contains("Interview Completed!").not());
        assert!(!dir.path().join("transcripts").exists());
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn repeated_format_is_written_once() {
    let server = evaluation_server().await;
    let dir = workspace(&server, r#"["text", "json", "text"]"#);

    let dir = tokio::task::spawn_blocking(move || {
        let output = run(&dir, "\na\nb\nc\nd\ne\nn\n").success().get_output().stdout.clone();
        let stdout = String::from_utf8(output).unwrap();
        assert_eq!(stdout.matches("Transcript saved to").count(), 2, "{stdout}");
        dir
    })
    .await
    .unwrap();

    let files = transcript_files(&dir);
    assert_eq!(files.len(), 2, "unexpected files: {files:?}");
}

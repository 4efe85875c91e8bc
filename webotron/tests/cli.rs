use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn help_lists_every_subcommand() {
    let mut cmd = Command::cargo_bin("webotron").expect("Binary exists");

    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("list-buckets")
            .and(predicate::str::contains("list-bucket-objects"))
            .and(predicate::str::contains("setup-bucket"))
            .and(predicate::str::contains("sync")),
    );
}

#[test]
fn sync_requires_both_arguments() {
    let mut cmd = Command::cargo_bin("webotron").expect("Binary exists");

    cmd.arg("sync").arg("./site").assert().failure();
}

#[test]
fn sync_fails_on_missing_path_before_contacting_aws() {
    let dir = tempdir().expect("temp dir");
    let missing = dir.path().join("no-such-site");
    let mut cmd = Command::cargo_bin("webotron").expect("Binary exists");

    cmd.arg("sync")
        .arg(&missing)
        .arg("example-bucket")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path does not exist"));
}

#[test]
fn unreadable_config_file_is_reported() {
    let dir = tempdir().expect("temp dir");
    let mut cmd = Command::cargo_bin("webotron").expect("Binary exists");

    cmd.arg("--config")
        .arg(dir.path().join("missing.yaml"))
        .arg("list-buckets")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*; // needed for .with()
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use webotron::cli::{run, Cli, Commands};

    // A missing sync path fails before any client is built.
    let cli = Cli {
        config: None,
        profile: None,
        region: None,
        command: Commands::Sync {
            pathname: std::path::PathBuf::from("definitely/not/a/real/site"),
            bucket: "example-bucket".to_string(),
        },
    };

    let result = run(cli).await;
    assert!(result.is_err(), "Sync of a missing path should fail");

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}

// ABOUTME: Integration tests for the command runner.
// ABOUTME: Checks event reporting for local commands, remote commands, and uploads.

mod support;

use sunrise_deploy::exec::{CommandRunner, ExecOptions};
use sunrise_deploy::output::DeployEvent;
use support::RecordingSink;
use support::scripted_host::ScriptedHost;

#[tokio::test]
async fn local_command_reports_start_and_finish() {
    let host = ScriptedHost::new();
    let sink = RecordingSink::default();
    let runner = CommandRunner::new(&host, &sink);

    assert!(runner.local("true", "Say nothing", &ExecOptions::default()).await);

    assert_eq!(
        sink.events(),
        vec![
            DeployEvent::StepStarted {
                description: "Say nothing".to_string(),
                command: Some("true".to_string()),
            },
            DeployEvent::StepFinished {
                description: "Say nothing".to_string(),
                success: true,
            },
        ]
    );
}

#[tokio::test]
async fn silent_failure_surfaces_stderr() {
    let host = ScriptedHost::new();
    let sink = RecordingSink::default();
    let runner = CommandRunner::new(&host, &sink);

    let ok = runner
        .local("echo broken >&2; exit 4", "Break", &ExecOptions::silent())
        .await;

    assert!(!ok);
    assert_eq!(sink.finished("Break"), Some(false));
    assert_eq!(sink.warnings(), vec!["broken".to_string()]);
    assert!(matches!(
        &sink.events()[0],
        DeployEvent::StepStarted { command: None, .. }
    ));
}

#[tokio::test]
async fn local_command_honours_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let host = ScriptedHost::new();
    let sink = RecordingSink::default();
    let runner = CommandRunner::new(&host, &sink);

    assert!(
        runner
            .local("touch here", "Touch", &ExecOptions::in_dir(dir.path()))
            .await
    );
    assert!(dir.path().join("here").exists());
}

#[tokio::test]
async fn remote_command_shows_host() {
    let host = ScriptedHost::new();
    let sink = RecordingSink::default();
    let runner = CommandRunner::new(&host, &sink);

    assert!(runner.remote("ls", "List", &ExecOptions::default()).await);

    assert_eq!(host.commands(), vec!["ls".to_string()]);
    assert!(matches!(
        &sink.events()[0],
        DeployEvent::StepStarted { command: Some(c), .. } if c == "[deploy@test-host] ls"
    ));
}

#[tokio::test]
async fn remote_failure_returns_false() {
    let host = ScriptedHost::new().fail_on("rm");
    let sink = RecordingSink::default();
    let runner = CommandRunner::new(&host, &sink);

    assert!(!runner.remote("rm -rf /srv/x", "Remove", &ExecOptions::default()).await);
    assert_eq!(sink.finished("Remove"), Some(false));
}

#[tokio::test]
async fn upload_reports_bytes_sent() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("dist.zip");
    std::fs::write(&file, b"0123456789").unwrap();

    let host = ScriptedHost::new();
    let sink = RecordingSink::default();
    let runner = CommandRunner::new(&host, &sink);

    assert!(runner.upload(&file, "/srv/site/temp/dist.zip", "Upload").await);

    assert_eq!(host.uploaded("/srv/site/temp/dist.zip").unwrap(), b"0123456789");
    assert!(sink.events().contains(&DeployEvent::Notice {
        message: "sent 10 bytes".to_string()
    }));
}

#[tokio::test]
async fn missing_upload_source_fails() {
    let dir = tempfile::tempdir().unwrap();
    let host = ScriptedHost::new();
    let sink = RecordingSink::default();
    let runner = CommandRunner::new(&host, &sink);

    assert!(
        !runner
            .upload(&dir.path().join("nope.zip"), "/srv/site/temp/nope.zip", "Upload")
            .await
    );
    assert_eq!(sink.finished("Upload"), Some(false));
}

#[tokio::test]
async fn capturing_sink_keeps_local_output_off_the_terminal() {
    let host = ScriptedHost::new();
    let sink = RecordingSink::capturing();
    let runner = CommandRunner::new(&host, &sink);

    let ok = runner
        .local(
            "echo building; echo 'vite: missing entry' >&2; exit 1",
            "Build",
            &ExecOptions::default(),
        )
        .await;

    assert!(!ok);
    assert_eq!(sink.warnings(), vec!["vite: missing entry".to_string()]);
    assert!(matches!(
        &sink.events()[0],
        DeployEvent::StepStarted { command: Some(c), .. } if c.starts_with("echo building")
    ));
}

#[tokio::test]
async fn capturing_sink_disables_remote_echo() {
    let host = ScriptedHost::new();
    let sink = RecordingSink::capturing();
    let runner = CommandRunner::new(&host, &sink);

    assert!(runner.remote("ls", "List", &ExecOptions::default()).await);
    assert!(runner.remote("pwd", "Where", &ExecOptions::silent()).await);

    assert_eq!(host.echoed(), vec![false, false]);
}

#[tokio::test]
async fn passthrough_sink_echoes_only_non_silent_commands() {
    let host = ScriptedHost::new();
    let sink = RecordingSink::default();
    let runner = CommandRunner::new(&host, &sink);

    assert!(runner.remote("ls", "List", &ExecOptions::default()).await);
    assert!(runner.remote("pwd", "Where", &ExecOptions::silent()).await);

    assert_eq!(host.echoed(), vec![true, false]);
}

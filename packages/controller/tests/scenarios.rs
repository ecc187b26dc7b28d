use livepad_controller::{Controller, ControllerState, PipelineFailure, RunOutcome};
use livepad_sandbox::{ChannelHost, SandboxError, SandboxHost};
use livepad_synthesizer::{DefaultExport, PreviewDocument};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

/// Records every document it is asked to present
#[derive(Default)]
struct RecordingHost {
    presented: Mutex<Vec<PreviewDocument>>,
}

impl RecordingHost {
    fn presented(&self) -> Vec<PreviewDocument> {
        self.presented.lock().unwrap().clone()
    }
}

impl SandboxHost for RecordingHost {
    fn present(&self, doc: &PreviewDocument) -> Result<(), SandboxError> {
        self.presented.lock().unwrap().push(doc.clone());
        Ok(())
    }
}

struct FailingHost;

impl SandboxHost for FailingHost {
    fn present(&self, _doc: &PreviewDocument) -> Result<(), SandboxError> {
        Err(SandboxError::Browser("tab crashed".to_string()))
    }
}

/// Simulates the user typing while a document is being presented
#[derive(Default)]
struct EditingHost {
    controller: OnceLock<Controller>,
}

impl SandboxHost for EditingHost {
    fn present(&self, _doc: &PreviewDocument) -> Result<(), SandboxError> {
        if let Some(controller) = self.controller.get() {
            controller.on_change("export default () => 2;");
        }
        Ok(())
    }
}

fn recording_controller() -> (Controller, Arc<RecordingHost>) {
    let host = Arc::new(RecordingHost::default());
    let controller = Controller::new(host.clone(), Duration::from_millis(300)).unwrap();
    (controller, host)
}

#[tokio::test]
async fn test_simple_component_is_presented() {
    let (controller, host) = recording_controller();
    controller.on_change("export default function X(){ return 1; }");

    let run = controller.run_now();
    assert_eq!(run.outcome, RunOutcome::Presented);
    assert_eq!(controller.status().state, ControllerState::Idle);

    let presented = host.presented();
    assert_eq!(presented.len(), 1);
    assert_eq!(presented[0].default_export(), &DefaultExport::Named("X".into()));
    assert!(presented[0].html().contains("function X(){ return 1; }"));
}

#[tokio::test]
async fn test_disallowed_import_stops_pipeline() {
    let (controller, host) = recording_controller();
    controller.on_change("import Foo from \"some-lib\"");

    let run = controller.run_now();
    match run.outcome {
        RunOutcome::Failed(PipelineFailure::Dependency { module, message }) => {
            assert_eq!(module, "some-lib");
            assert!(message.contains("some-lib"));
        }
        other => panic!("expected dependency failure, got {:?}", other),
    }
    assert!(host.presented().is_empty());
}

#[tokio::test]
async fn test_syntax_error_reports_line() {
    let (controller, host) = recording_controller();
    controller.on_change("function( {");

    let run = controller.run_now();
    match run.outcome {
        RunOutcome::Failed(PipelineFailure::Transform { message, line, .. }) => {
            println!("Diagnostic: {}", message);
            assert!(message.starts_with("Line 1:"));
            assert!(!message.contains("usercode.jsx"));
            assert_eq!(line, Some(1));
        }
        other => panic!("expected transform failure, got {:?}", other),
    }
    assert!(host.presented().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_edit_burst_runs_once_with_last_edit() {
    let (controller, host) = recording_controller();

    controller.on_change("export default function First() { return null; }");
    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.on_change("export default function Second() { return null; }");

    tokio::time::sleep(Duration::from_millis(299)).await;
    assert!(host.presented().is_empty());
    assert_eq!(controller.status().state, ControllerState::Pending);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let presented = host.presented();
    assert_eq!(presented.len(), 1);
    assert_eq!(
        presented[0].default_export(),
        &DefaultExport::Named("Second".into())
    );
    assert_eq!(controller.status().version, 1);
    assert_eq!(controller.status().state, ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_failure_keeps_last_preview() {
    let host = Arc::new(ChannelHost::new());
    let controller = Controller::new(host.clone(), Duration::from_millis(300)).unwrap();
    let mut status = controller.subscribe();

    controller.on_change("export default function Good() { return null; }");
    tokio::time::sleep(Duration::from_millis(400)).await;
    let good = host.latest().unwrap();

    controller.on_change("export default function Bad() { return <div>; }");
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(status.has_changed().unwrap());
    let current = status.borrow_and_update().clone();
    assert_eq!(current.version, 2);
    assert!(matches!(
        current.state,
        ControllerState::Failed(PipelineFailure::Transform { .. })
    ));
    assert_eq!(host.latest(), Some(good));
}

#[tokio::test]
async fn test_sandbox_failure_is_reported() {
    let controller = Controller::new(Arc::new(FailingHost), Duration::from_millis(300)).unwrap();
    controller.on_change("export default () => null;");

    match controller.run_now().outcome {
        RunOutcome::Failed(PipelineFailure::Sandbox { message }) => {
            assert!(message.contains("tab crashed"));
        }
        other => panic!("expected sandbox failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_edit_during_run_stays_pending() {
    let host = Arc::new(EditingHost::default());
    let controller = Controller::new(host.clone(), Duration::from_millis(300)).unwrap();
    assert!(host.controller.set(controller.clone()).is_ok());

    controller.on_change("export default () => 1;");
    let run = controller.run_now();

    assert_eq!(run.outcome, RunOutcome::Presented);
    let status = controller.status();
    assert_eq!(status.version, 1);
    assert_eq!(status.state, ControllerState::Pending);
    assert!(controller.is_pending());
    assert_eq!(controller.source(), "export default () => 2;");
}

#[tokio::test(start_paused = true)]
async fn test_debounced_run_settles_after_concurrent_edit() {
    let host = Arc::new(EditingHost::default());
    let controller = Controller::new(host.clone(), Duration::from_millis(300)).unwrap();

    controller.on_change("export default () => 1;");
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(controller.status().state, ControllerState::Idle);

    assert!(host.controller.set(controller.clone()).is_ok());
    controller.on_change("export default () => 3;");
    tokio::time::sleep(Duration::from_millis(400)).await;

    // the second run edits the buffer while presenting, so another run is queued
    assert_eq!(controller.status().state, ControllerState::Pending);
    assert_eq!(controller.status().version, 2);
}

//! The workflow controller: one screen's worth of generation state.
//!
//! ## State machine
//!
//! ```text
//!            pick                        submit (file selected)
//!   IDLE ──────────▶ AWAITING_SELECTION    IDLE ──────────▶ SUBMITTING
//!    ▲                      │                                 │      │
//!    └──────────────────────┘                          success│      │failure
//!                                                             ▼      ▼
//!                                                       COMPLETE    FAILED
//!                                                             │      │
//!            next user action (pick / edit / toggle / submit) ▼      ▼
//!                                                            IDLE   IDLE
//! ```
//!
//! At most one transaction is in flight per controller. The in-flight flag
//! is set before the first await of a submit and cleared on every exit
//! path, including a dropped future, so a failed or abandoned attempt never
//! blocks the next one. Picking, toggling the mode and editing the output
//! name stay possible while a transaction runs; the running transaction
//! keeps using the values captured when it started.

use crate::config::ClientConfig;
use crate::error::ScheduleError;
use crate::observer::{Notice, NoopObserver, SharedObserver, Stage};
use crate::pipeline::materialize::{self, DocumentStorage, FsDocumentStorage};
use crate::pipeline::picker::{self, FilePicker, PathPicker, SelectedFile};
use crate::pipeline::request::{build_request, ViewMode};
use crate::pipeline::share::{self, ShareCapability, ShareOutcome, Unavailable};
use crate::pipeline::transfer::{HttpTransferClient, Transport};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Output name the controller starts with.
pub const DEFAULT_OUTPUT_NAME: &str = "Schedule";

/// Lifecycle of the current transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    #[default]
    Idle,
    AwaitingSelection,
    Submitting,
    Complete,
    Failed,
}

/// Read-only copy of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub state: TransactionState,
    pub selected: Option<SelectedFile>,
    pub mode: ViewMode,
    pub output_name: String,
    pub in_flight: bool,
}

impl WorkflowSnapshot {
    /// Whether the "Generate" action should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.in_flight
    }
}

#[derive(Debug)]
struct Fields {
    state: TransactionState,
    selected: Option<SelectedFile>,
    mode: ViewMode,
    output_name: String,
    in_flight: bool,
}

impl Fields {
    /// A settled transaction is acknowledged by the next user action.
    fn acknowledge(&mut self) {
        if matches!(
            self.state,
            TransactionState::Complete | TransactionState::Failed
        ) {
            self.state = TransactionState::Idle;
        }
    }

    fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            state: self.state,
            selected: self.selected.clone(),
            mode: self.mode,
            output_name: self.output_name.clone(),
            in_flight: self.in_flight,
        }
    }
}

/// Coordinates pick → build → send → save → share for one screen.
pub struct WorkflowController {
    config: ClientConfig,
    picker: Arc<dyn FilePicker>,
    transport: Arc<dyn Transport>,
    storage: Arc<dyn DocumentStorage>,
    share: Arc<dyn ShareCapability>,
    observer: SharedObserver,
    fields: Mutex<Fields>,
}

impl WorkflowController {
    /// Start building a controller for `config`.
    pub fn builder(config: ClientConfig) -> WorkflowControllerBuilder {
        WorkflowControllerBuilder {
            config,
            picker: None,
            transport: None,
            storage: None,
            share: None,
            observer: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.lock().snapshot()
    }

    pub fn can_submit(&self) -> bool {
        !self.lock().in_flight
    }

    /// Change the target view mode; the other mode is deselected.
    pub fn set_mode(&self, mode: ViewMode) {
        self.mutate(|f| {
            f.acknowledge();
            f.mode = mode;
        });
    }

    /// Switch between room and teacher view.
    pub fn toggle_mode(&self) {
        self.mutate(|f| {
            f.acknowledge();
            f.mode = f.mode.toggled();
        });
    }

    /// Replace the output name; normalised only at submit time.
    pub fn set_output_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.mutate(|f| {
            f.acknowledge();
            f.output_name = name;
        });
    }

    /// Ask the platform picker for a spreadsheet.
    ///
    /// A cancelled pick returns `Ok(None)` and leaves the previous selection
    /// in place, as does a failed one (which also raises a notice).
    pub async fn pick_file(&self) -> Result<Option<SelectedFile>, ScheduleError> {
        self.mutate(|f| {
            f.acknowledge();
            if !f.in_flight {
                f.state = TransactionState::AwaitingSelection;
            }
        });

        let result = picker::pick_file(Arc::clone(&self.picker)).await;

        self.mutate(|f| {
            if f.state == TransactionState::AwaitingSelection {
                f.state = TransactionState::Idle;
            }
            if let Ok(Some(file)) = &result {
                f.selected = Some(file.clone());
            }
        });
        if let Err(e) = &result {
            warn!("File selection failed: {e}");
            self.observer.on_notice(&Notice::from_error(e));
        }
        result
    }

    /// Run one generation transaction with the current selection.
    ///
    /// Rejected with [`ScheduleError::Busy`] while another transaction is in
    /// flight, and with [`ScheduleError::NoFileSelected`] (before any
    /// network call) when nothing has been picked.
    pub async fn submit(&self) -> Result<ShareOutcome, ScheduleError> {
        let started = {
            let mut f = self.lock();
            if f.in_flight {
                debug!("Submit ignored: transaction already in flight");
                return Err(ScheduleError::Busy);
            }
            f.acknowledge();
            match f.selected.clone() {
                Some(file) => {
                    f.state = TransactionState::Submitting;
                    f.in_flight = true;
                    Ok((file, f.mode, f.output_name.clone(), f.snapshot()))
                }
                None => {
                    f.state = TransactionState::Failed;
                    Err(f.snapshot())
                }
            }
        };

        let (file, mode, output_name, snapshot) = match started {
            Ok(captured) => captured,
            Err(snapshot) => {
                let err = ScheduleError::NoFileSelected;
                self.observer.on_state_change(&snapshot);
                self.observer.on_notice(&Notice::from_error(&err));
                return Err(err);
            }
        };
        self.observer.on_state_change(&snapshot);
        info!(
            "Generating {} schedule from '{}'",
            mode, file.display_name
        );

        let mut guard = InFlight {
            controller: self,
            armed: true,
        };
        let result = self.run(&file, mode, &output_name).await;
        guard.armed = false;

        self.mutate(|f| {
            f.in_flight = false;
            f.state = match result {
                Ok(_) => TransactionState::Complete,
                Err(_) => TransactionState::Failed,
            };
        });
        match &result {
            Ok(outcome) => {
                info!("Transaction complete: {}", outcome.path().display());
                self.observer.on_notice(&Notice::Completed(outcome.clone()));
            }
            Err(e) => {
                warn!("Transaction failed: {e}");
                self.observer.on_notice(&Notice::from_error(e));
            }
        }
        result
    }

    async fn run(
        &self,
        file: &SelectedFile,
        mode: ViewMode,
        output_name: &str,
    ) -> Result<ShareOutcome, ScheduleError> {
        let request = build_request(&self.config, file, mode, output_name);

        self.observer.on_stage(Stage::Uploading);
        let payload = self.transport.send(&request).await?;

        self.observer.on_stage(Stage::Saving);
        let path =
            materialize::materialize(Arc::clone(&self.storage), &payload, &request.output_name)
                .await?;

        self.observer.on_stage(Stage::Sharing);
        Ok(share::offer(Arc::clone(&self.share), path).await)
    }

    fn lock(&self) -> MutexGuard<'_, Fields> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `change` under the lock, then notify outside it.
    fn mutate(&self, change: impl FnOnce(&mut Fields)) {
        let snapshot = {
            let mut f = self.lock();
            change(&mut f);
            f.snapshot()
        };
        self.observer.on_state_change(&snapshot);
    }
}

/// Clears the in-flight flag if a submit future is dropped mid-transaction.
struct InFlight<'a> {
    controller: &'a WorkflowController,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Transaction abandoned before completion");
            self.controller.mutate(|f| {
                f.in_flight = false;
                f.state = TransactionState::Failed;
            });
        }
    }
}

/// Builder for [`WorkflowController`].
///
/// Unset capabilities fall back to the desktop defaults: a picker that
/// always cancels, [`HttpTransferClient`], [`FsDocumentStorage::documents`],
/// no share surface and no observer.
pub struct WorkflowControllerBuilder {
    config: ClientConfig,
    picker: Option<Arc<dyn FilePicker>>,
    transport: Option<Arc<dyn Transport>>,
    storage: Option<Arc<dyn DocumentStorage>>,
    share: Option<Arc<dyn ShareCapability>>,
    observer: Option<SharedObserver>,
}

impl WorkflowControllerBuilder {
    pub fn picker(mut self, picker: Arc<dyn FilePicker>) -> Self {
        self.picker = Some(picker);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn storage(mut self, storage: Arc<dyn DocumentStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn share(mut self, share: Arc<dyn ShareCapability>) -> Self {
        self.share = Some(share);
        self
    }

    pub fn observer(mut self, observer: SharedObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn build(self) -> Result<WorkflowController, ScheduleError> {
        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransferClient::new(&self.config)?),
        };

        Ok(WorkflowController {
            picker: self
                .picker
                .unwrap_or_else(|| Arc::new(PathPicker::default())),
            transport,
            storage: self
                .storage
                .unwrap_or_else(|| Arc::new(FsDocumentStorage::documents())),
            share: self.share.unwrap_or_else(|| Arc::new(Unavailable)),
            observer: self.observer.unwrap_or_else(|| Arc::new(NoopObserver)),
            config: self.config,
            fields: Mutex::new(Fields {
                state: TransactionState::Idle,
                selected: None,
                mode: ViewMode::default(),
                output_name: DEFAULT_OUTPUT_NAME.to_string(),
                in_flight: false,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::observer::WorkflowObserver;
    use crate::pipeline::request::UploadRequest;
    use crate::pipeline::transfer::SuccessPayload;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use tokio::sync::Notify;
    use tracing_subscriber::EnvFilter;

    /// Transport answering from a script; counts calls and records requests.
    struct FakeTransport {
        calls: AtomicUsize,
        requests: Mutex<Vec<UploadRequest>>,
        reply: fn() -> Result<SuccessPayload, ScheduleError>,
        gate: Option<Arc<Notify>>,
    }

    impl FakeTransport {
        fn new(reply: fn() -> Result<SuccessPayload, ScheduleError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
                reply,
                gate: None,
            })
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, request: &UploadRequest) -> Result<SuccessPayload, ScheduleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            (self.reply)()
        }
    }

    struct FixedPicker(Option<SelectedFile>);

    impl FilePicker for FixedPicker {
        fn pick(&self, _accept: &[&str]) -> Result<Option<SelectedFile>, ScheduleError> {
            Ok(self.0.clone())
        }
    }

    /// Answers successive picks from a script; cancels once it runs out.
    struct ScriptedPicker(Mutex<VecDeque<Result<Option<SelectedFile>, ScheduleError>>>);

    impl ScriptedPicker {
        fn new(script: Vec<Result<Option<SelectedFile>, ScheduleError>>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(script.into())))
        }
    }

    impl FilePicker for ScriptedPicker {
        fn pick(&self, _accept: &[&str]) -> Result<Option<SelectedFile>, ScheduleError> {
            self.0.lock().unwrap().pop_front().unwrap_or(Ok(None))
        }
    }

    #[derive(Default)]
    struct Recorder {
        states: Mutex<Vec<TransactionState>>,
        stages: Mutex<Vec<Stage>>,
        notices: Mutex<Vec<Notice>>,
    }

    impl WorkflowObserver for Recorder {
        fn on_state_change(&self, snapshot: &WorkflowSnapshot) {
            self.states.lock().unwrap().push(snapshot.state);
        }

        fn on_stage(&self, stage: Stage) {
            self.stages.lock().unwrap().push(stage);
        }

        fn on_notice(&self, notice: &Notice) {
            self.notices.lock().unwrap().push(notice.clone());
        }
    }

    fn classes() -> SelectedFile {
        SelectedFile {
            uri: PathBuf::from("/cache/Classes.xlsx"),
            display_name: "Classes.xlsx".into(),
            mime_type: None,
        }
    }

    fn rooms() -> SelectedFile {
        SelectedFile {
            uri: PathBuf::from("/cache/Rooms.xlsx"),
            display_name: "Rooms.xlsx".into(),
            mime_type: None,
        }
    }

    fn ok_payload() -> Result<SuccessPayload, ScheduleError> {
        Ok(SuccessPayload(Bytes::from_static(b"PK\x03\x04generated")))
    }

    fn server_500() -> Result<SuccessPayload, ScheduleError> {
        Err(ScheduleError::Server {
            status: 500,
            body: "invalid sheet".into(),
        })
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn scripted_controller(
        dir: &TempDir,
        picker: Arc<dyn FilePicker>,
        transport: Arc<FakeTransport>,
        observer: Arc<Recorder>,
    ) -> WorkflowController {
        init_tracing();
        WorkflowController::builder(ClientConfig::default())
            .picker(picker)
            .transport(transport)
            .storage(Arc::new(FsDocumentStorage::new(dir.path())))
            .observer(observer)
            .build()
            .unwrap()
    }

    fn controller(
        dir: &TempDir,
        picked: Option<SelectedFile>,
        transport: Arc<FakeTransport>,
        observer: Arc<Recorder>,
    ) -> WorkflowController {
        scripted_controller(dir, Arc::new(FixedPicker(picked)), transport, observer)
    }

    #[tokio::test]
    async fn starts_idle_with_room_mode() {
        let dir = TempDir::new().unwrap();
        let c = controller(&dir, None, FakeTransport::new(ok_payload), Default::default());
        let snap = c.snapshot();
        assert_eq!(snap.state, TransactionState::Idle);
        assert_eq!(snap.mode, ViewMode::Room);
        assert_eq!(snap.output_name, DEFAULT_OUTPUT_NAME);
        assert!(snap.selected.is_none());
        assert!(snap.can_submit());
    }

    #[tokio::test]
    async fn submit_without_file_never_sends() {
        let dir = TempDir::new().unwrap();
        let transport = FakeTransport::new(ok_payload);
        let recorder = Arc::new(Recorder::default());
        let c = controller(&dir, None, transport.clone(), recorder.clone());

        let err = c.submit().await.unwrap_err();
        assert!(matches!(err, ScheduleError::NoFileSelected));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert_eq!(c.snapshot().state, TransactionState::Failed);
        assert!(c.can_submit());

        let notices = recorder.notices.lock().unwrap();
        assert!(matches!(
            notices.as_slice(),
            [Notice::Error {
                kind: ErrorKind::Validation,
                ..
            }]
        ));
    }

    #[tokio::test]
    async fn successful_transaction_completes_and_saves() {
        let dir = TempDir::new().unwrap();
        let transport = FakeTransport::new(ok_payload);
        let recorder = Arc::new(Recorder::default());
        let c = controller(&dir, Some(classes()), transport.clone(), recorder.clone());

        c.pick_file().await.unwrap();
        c.set_output_name("Fall2024");
        let outcome = c.submit().await.unwrap();

        assert_eq!(
            outcome,
            ShareOutcome::SavedOnly {
                path: dir.path().join("Fall2024.xlsx")
            }
        );
        assert_eq!(
            std::fs::read(outcome.path()).unwrap(),
            b"PK\x03\x04generated"
        );
        let snap = c.snapshot();
        assert_eq!(snap.state, TransactionState::Complete);
        assert!(!snap.in_flight);

        let sent = transport.requests.lock().unwrap();
        assert_eq!(sent[0].url, "http://127.0.0.1:5001/api/schedule/room");
        assert_eq!(sent[0].output_name, "Fall2024.xlsx");

        assert_eq!(
            *recorder.stages.lock().unwrap(),
            vec![Stage::Uploading, Stage::Saving, Stage::Sharing]
        );
        let states = recorder.states.lock().unwrap();
        assert!(states.contains(&TransactionState::AwaitingSelection));
        assert!(states.contains(&TransactionState::Submitting));
        assert_eq!(states.last(), Some(&TransactionState::Complete));
    }

    #[tokio::test]
    async fn server_failure_clears_flag_and_keeps_selection() {
        let dir = TempDir::new().unwrap();
        let recorder = Arc::new(Recorder::default());
        let c = controller(
            &dir,
            Some(classes()),
            FakeTransport::new(server_500),
            recorder.clone(),
        );
        c.pick_file().await.unwrap();

        let err = c.submit().await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("500") && msg.contains("invalid sheet"), "got: {msg}");

        let snap = c.snapshot();
        assert_eq!(snap.state, TransactionState::Failed);
        assert!(!snap.in_flight);
        assert_eq!(snap.selected, Some(classes()));

        let notices = recorder.notices.lock().unwrap();
        assert_eq!(notices.last().map(Notice::message), Some(msg));
    }

    #[tokio::test]
    async fn retry_reuses_previous_selection() {
        let dir = TempDir::new().unwrap();
        let transport = FakeTransport::new(server_500);
        let c = controller(&dir, Some(classes()), transport.clone(), Default::default());
        c.pick_file().await.unwrap();

        assert!(c.submit().await.is_err());
        assert!(c.submit().await.is_err());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
        let sent = transport.requests.lock().unwrap();
        assert_eq!(sent[0], sent[1]);
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_rejected() {
        let dir = TempDir::new().unwrap();
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(FakeTransport {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            reply: ok_payload,
            gate: Some(gate.clone()),
        });
        let c = controller(&dir, Some(classes()), transport.clone(), Default::default());
        c.pick_file().await.unwrap();

        let first = c.submit();
        let second = async {
            // Let the first submit reach the transport.
            while transport.calls.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
            assert!(!c.can_submit());
            assert_eq!(c.snapshot().state, TransactionState::Submitting);
            let rejected = c.submit().await;
            gate.notify_one();
            rejected
        };
        let (first, second) = tokio::join!(first, second);

        assert!(first.is_ok());
        assert!(matches!(second, Err(ScheduleError::Busy)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!(c.can_submit());
    }

    #[tokio::test]
    async fn dropped_submit_releases_flag() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(FakeTransport {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            reply: ok_payload,
            gate: Some(Arc::new(Notify::new())),
        });
        let c = controller(&dir, Some(classes()), transport, Default::default());
        c.pick_file().await.unwrap();

        let pending = tokio::time::timeout(std::time::Duration::from_millis(50), c.submit()).await;
        assert!(pending.is_err());
        assert!(c.can_submit());
        assert_eq!(c.snapshot().state, TransactionState::Failed);
    }

    #[tokio::test]
    async fn failed_pick_keeps_previous_selection() {
        let dir = TempDir::new().unwrap();
        let recorder = Arc::new(Recorder::default());
        let picker = ScriptedPicker::new(vec![
            Ok(Some(classes())),
            Err(ScheduleError::Picker {
                reason: "permission denied".into(),
            }),
        ]);
        let transport = FakeTransport::new(ok_payload);
        let c = scripted_controller(&dir, picker, transport, recorder.clone());

        assert_eq!(c.pick_file().await.unwrap(), Some(classes()));
        assert!(c.pick_file().await.is_err());

        let snap = c.snapshot();
        assert_eq!(snap.state, TransactionState::Idle);
        assert_eq!(snap.selected, Some(classes()));
        assert!(matches!(
            recorder.notices.lock().unwrap().as_slice(),
            [Notice::Error {
                kind: ErrorKind::Picker,
                ..
            }]
        ));
    }

    #[tokio::test]
    async fn cancelled_pick_keeps_previous_selection() {
        let dir = TempDir::new().unwrap();
        let recorder = Arc::new(Recorder::default());
        let picker = ScriptedPicker::new(vec![Ok(Some(classes())), Ok(None)]);
        let transport = FakeTransport::new(ok_payload);
        let c = scripted_controller(&dir, picker, transport, recorder.clone());

        assert_eq!(c.pick_file().await.unwrap(), Some(classes()));
        assert_eq!(c.pick_file().await.unwrap(), None);

        let snap = c.snapshot();
        assert_eq!(snap.state, TransactionState::Idle);
        assert_eq!(snap.selected, Some(classes()));
        assert!(recorder.notices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_pick_replaces_selection_for_next_transaction_only() {
        let dir = TempDir::new().unwrap();
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(FakeTransport {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            reply: ok_payload,
            gate: Some(gate.clone()),
        });
        let picker = ScriptedPicker::new(vec![Ok(Some(classes())), Ok(Some(rooms()))]);
        let c = scripted_controller(&dir, picker, transport.clone(), Default::default());
        c.pick_file().await.unwrap();

        let first = c.submit();
        let repick = async {
            while transport.calls.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
            assert_eq!(c.pick_file().await.unwrap(), Some(rooms()));
            assert_eq!(c.snapshot().state, TransactionState::Submitting);
            gate.notify_one();
        };
        let (first, ()) = tokio::join!(first, repick);
        assert!(first.is_ok());
        assert_eq!(c.snapshot().selected, Some(rooms()));

        gate.notify_one();
        c.submit().await.unwrap();

        let sent = transport.requests.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].file.source, classes().uri);
        assert_eq!(sent[1].file.source, rooms().uri);
        assert_eq!(sent[1].file.file_name, "Rooms.xlsx");
    }

    #[tokio::test]
    async fn persistence_failure_fails_transaction_and_keeps_selection() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("documents");
        std::fs::write(&not_a_dir, b"plain file").unwrap();
        let recorder = Arc::new(Recorder::default());
        let c = WorkflowController::builder(ClientConfig::default())
            .picker(Arc::new(FixedPicker(Some(classes()))))
            .transport(FakeTransport::new(ok_payload))
            .storage(Arc::new(FsDocumentStorage::new(&not_a_dir)))
            .observer(recorder.clone())
            .build()
            .unwrap();
        c.pick_file().await.unwrap();

        let err = c.submit().await.unwrap_err();
        assert!(matches!(err, ScheduleError::Persistence { .. }), "got: {err:?}");

        let snap = c.snapshot();
        assert_eq!(snap.state, TransactionState::Failed);
        assert!(!snap.in_flight);
        assert_eq!(snap.selected, Some(classes()));
        assert!(matches!(
            recorder.notices.lock().unwrap().last(),
            Some(Notice::Error {
                kind: ErrorKind::Persistence,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn mode_toggle_is_exclusive_and_acknowledges() {
        let dir = TempDir::new().unwrap();
        let c = controller(&dir, None, FakeTransport::new(ok_payload), Default::default());
        let _ = c.submit().await;
        assert_eq!(c.snapshot().state, TransactionState::Failed);

        c.toggle_mode();
        assert_eq!(c.snapshot().mode, ViewMode::Teacher);
        assert_eq!(c.snapshot().state, TransactionState::Idle);
        c.set_mode(ViewMode::Room);
        assert_eq!(c.snapshot().mode, ViewMode::Room);
        c.set_mode(ViewMode::Room);
        assert_eq!(c.snapshot().mode, ViewMode::Room);
    }
}

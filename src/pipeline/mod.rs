//! The submission orchestrator.
//!
//! One [`SubmissionOrchestrator`] is bound to one form. Each submission intent
//! runs snapshot → render → restore → download → submit, and the outcome
//! decides between the confirmation panel, a recoverable alert, or the
//! form's native submission.

pub mod state;

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use kuchiki::NodeRef;
use thiserror::Error;
use uuid::Uuid;

use crate::dom;
use crate::download::{DownloadLink, Downloader};
use crate::render::{Blob, RenderError, RenderOptions, Renderer};
use crate::snapshot::{FieldSnapshotBuilder, Restorer, Snapshot};
use crate::submission::{FormMethod, FormPayload, NativeSubmit, SubmitError, Submitter};
use crate::ui::{FormSelectors, Notifier, PrintLayout, UiStateController, UiText};

pub use state::PipelineState;

pub const ATTACHMENT_FIELD: &str = "_attachment";

#[derive(Debug, Error)]
pub enum BindError {
    #[error("no form matches {0}")]
    MissingForm(String),
    #[error("form has no action URL")]
    MissingAction,
}

/// The external capabilities a run depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub renderer: Rc<dyn Renderer>,
    pub submitter: Rc<dyn Submitter>,
    pub native: Rc<dyn NativeSubmit>,
    pub downloader: Rc<dyn Downloader>,
    pub notifier: Rc<dyn Notifier>,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Template; the filename is filled in per run.
    pub render_options: RenderOptions,
    pub attachment_field: String,
    /// `None` waits for the renderer indefinitely.
    pub render_timeout: Option<Duration>,
    /// `None` waits for the endpoint indefinitely.
    pub submit_timeout: Option<Duration>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            render_options: RenderOptions::default(),
            attachment_field: ATTACHMENT_FIELD.to_string(),
            render_timeout: None,
            submit_timeout: None,
        }
    }
}

/// How one submission intent ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The intent arrived while a run was in flight or after success.
    Ignored,
    Submitted { filename: String, status: u16 },
    RecoverableFailure { filename: String, reason: String },
    FatalFallback { reason: String, native_submitted: bool },
}

impl std::fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionOutcome::Ignored => write!(f, "ignored"),
            SubmissionOutcome::Submitted { filename, status } => {
                write!(f, "submitted {} (status {})", filename, status)
            }
            SubmissionOutcome::RecoverableFailure { filename, reason } => {
                write!(f, "downloaded {} but submission failed: {}", filename, reason)
            }
            SubmissionOutcome::FatalFallback {
                reason,
                native_submitted,
            } => write!(
                f,
                "document generation failed ({}); native submission {}",
                reason,
                if *native_submitted { "sent" } else { "failed" }
            ),
        }
    }
}

pub struct SubmissionOrchestrator {
    ui: UiStateController,
    action: String,
    method: FormMethod,
    collaborators: Collaborators,
    settings: PipelineSettings,
    state: Cell<PipelineState>,
    history: RefCell<Vec<PipelineState>>,
}

impl SubmissionOrchestrator {
    /// Bind to the first form in `document` matching `selectors.form`.
    pub fn bind(
        document: &NodeRef,
        selectors: FormSelectors,
        text: UiText,
        collaborators: Collaborators,
        settings: PipelineSettings,
    ) -> Result<Self, BindError> {
        let form = dom::select_first(document, &selectors.form)
            .ok_or_else(|| BindError::MissingForm(selectors.form.clone()))?;
        let action = dom::attr(&form, "action")
            .map(|action| action.trim().to_string())
            .filter(|action| !action.is_empty())
            .ok_or(BindError::MissingAction)?;
        let method = FormMethod::from_attr(dom::attr(&form, "method").as_deref());

        Ok(Self {
            ui: UiStateController::new(document.clone(), form, selectors, text),
            action,
            method,
            collaborators,
            settings,
            state: Cell::new(PipelineState::Idle),
            history: RefCell::new(vec![PipelineState::Idle]),
        })
    }

    pub fn state(&self) -> PipelineState {
        self.state.get()
    }

    /// Every state this binding has been in, oldest first.
    pub fn history(&self) -> Vec<PipelineState> {
        self.history.borrow().clone()
    }

    pub fn ui(&self) -> &UiStateController {
        &self.ui
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Handle one submission intent.
    ///
    /// An intent arriving while the submit control is disabled, or after a
    /// successful submission, is ignored without side effects.
    pub async fn dispatch_submit(&self) -> SubmissionOutcome {
        if !self.state().accepts_intent() || !self.ui.is_submit_enabled() {
            log::debug!("Ignoring submit intent while {}", self.state());
            return SubmissionOutcome::Ignored;
        }

        let run_id = Uuid::new_v4();
        self.transition(run_id, PipelineState::Generating);
        self.ui.disable_submit(&self.ui.text().generating_label);

        let title = self.ui.document_title();
        let filename = self.ui.document_filename();
        log::info!("[{}] Generating {}", run_id, filename);

        let root = self.ui.render_root();
        let layout = self.ui.apply_print_layout();
        let mut guard = RunGuard {
            orchestrator: self,
            run_id,
            snapshot: FieldSnapshotBuilder::snapshot(&root),
            layout: Some(layout),
            settled: false,
        };
        let options = self
            .settings
            .render_options
            .clone()
            .with_filename(filename.clone());

        let rendered = bounded(
            self.settings.render_timeout,
            self.collaborators.renderer.render(&root, &options),
            RenderError::TimedOut,
        )
        .await;

        let blob = match rendered {
            Ok(blob) => blob,
            Err(e) => {
                self.transition(run_id, PipelineState::FatalFallback);
                log::error!("[{}] PDF generation failed: {}", run_id, e);
                guard.restore();
                self.ui.enable_submit();
                let outcome = self.submit_natively(run_id, e).await;
                guard.settle();
                return outcome;
            }
        };

        self.transition(run_id, PipelineState::Restoring);
        let restored = guard.restore();
        log::debug!("[{}] Restored {} fields", run_id, restored);

        self.transition(run_id, PipelineState::Downloading);
        DownloadLink::new(&filename, &blob).activate(self.collaborators.downloader.as_ref());

        self.transition(run_id, PipelineState::Submitting);
        self.ui.set_submit_label(&self.ui.text().submitting_label);
        let outcome = self.submit(run_id, filename, &title, &blob).await;
        guard.settle();
        outcome
    }

    async fn submit(
        &self,
        run_id: Uuid,
        filename: String,
        title: &str,
        blob: &Blob,
    ) -> SubmissionOutcome {
        let payload = FormPayload::from_form(self.ui.form()).with_attachment(
            &self.settings.attachment_field,
            &filename,
            blob,
        );
        let submitted = bounded(
            self.settings.submit_timeout,
            self.collaborators.submitter.submit(&self.action, payload),
            SubmitError::TimedOut,
        )
        .await;

        let failure = match submitted {
            Ok(response) if response.is_ok() => {
                self.transition(run_id, PipelineState::Success);
                self.ui.show_confirmation(title);
                log::info!("[{}] Submitted {} ({})", run_id, filename, response.status);
                return SubmissionOutcome::Submitted {
                    filename,
                    status: response.status,
                };
            }
            Ok(response) => SubmitError::Status(response.status),
            Err(e) => e,
        };

        self.transition(run_id, PipelineState::RecoverableFailure);
        log::warn!("[{}] Submission failed: {}", run_id, failure);
        self.ui.enable_submit();
        self.ui
            .alert_submission_failure(self.collaborators.notifier.as_ref());
        SubmissionOutcome::RecoverableFailure {
            filename,
            reason: failure.to_string(),
        }
    }

    /// Last resort after a render failure: the form's ordinary submission,
    /// exactly once, without the document.
    async fn submit_natively(&self, run_id: Uuid, cause: RenderError) -> SubmissionOutcome {
        let payload = FormPayload::from_form(self.ui.form());
        let native_submitted = match self
            .collaborators
            .native
            .submit_natively(&self.action, self.method, payload)
            .await
        {
            Ok(response) => {
                log::info!("[{}] Native submission answered {}", run_id, response.status);
                true
            }
            Err(e) => {
                log::error!("[{}] Native submission failed: {}", run_id, e);
                false
            }
        };

        self.transition(run_id, PipelineState::Idle);
        SubmissionOutcome::FatalFallback {
            reason: cause.to_string(),
            native_submitted,
        }
    }

    fn transition(&self, run_id: Uuid, next: PipelineState) {
        let current = self.state.get();
        if !current.can_transition_to(next) {
            log::warn!("[{}] Unexpected transition {} -> {}", run_id, current, next);
        }
        log::debug!("[{}] {} -> {}", run_id, current, next);
        self.state.set(next);
        self.history.borrow_mut().push(next);
    }
}

/// Page changes of one run that has not settled yet.
///
/// Dropping an unsettled guard (the run's future was cancelled, or a
/// collaborator panicked) restores the fields and print layout, re-enables
/// the control and returns the binding to `Idle`.
struct RunGuard<'a> {
    orchestrator: &'a SubmissionOrchestrator,
    run_id: Uuid,
    snapshot: Snapshot,
    layout: Option<PrintLayout>,
    settled: bool,
}

impl RunGuard<'_> {
    /// Put the fields and the layout back. Harmless to repeat.
    fn restore(&mut self) -> usize {
        let restored = Restorer::restore(&mut self.snapshot);
        if let Some(layout) = self.layout.take() {
            layout.revert();
        }
        restored
    }

    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let orchestrator = self.orchestrator;
        log::warn!(
            "[{}] Run abandoned while {}, restoring the form",
            self.run_id,
            orchestrator.state()
        );
        self.restore();
        orchestrator.ui.enable_submit();
        orchestrator.transition(self.run_id, PipelineState::Idle);
    }
}

/// Await `future`, optionally bounded; on expiry yield `on_timeout(limit)`.
async fn bounded<T, E>(
    limit: Option<Duration>,
    future: impl Future<Output = Result<T, E>>,
    on_timeout: impl FnOnce(Duration) -> E,
) -> Result<T, E> {
    match limit {
        Some(limit) => match tokio::time::timeout(limit, future).await {
            Ok(result) => result,
            Err(_) => Err(on_timeout(limit)),
        },
        None => future.await,
    }
}

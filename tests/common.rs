//! Shared fixtures and in-memory collaborators for the integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use formpress::download::{DownloadError, Downloader};
use formpress::pipeline::{Collaborators, PipelineSettings, SubmissionOrchestrator};
use formpress::render::{Blob, RenderError, RenderOptions, Renderer};
use formpress::submission::{
    FormMethod, FormPayload, NativeSubmit, SubmitError, SubmitResponse, Submitter,
};
use formpress::ui::{FormSelectors, Notifier, UiText};
use kuchiki::NodeRef;

pub const CONTACT: &str = "office@example.test";

pub const INTAKE_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>New Client Intake | Little Steps</title></head>
<body>
  <h1 class="print-title" style="display:none">Intake Form</h1>
  <div class="section">
    <div class="info-box">Please complete every section.</div>
    <form action="https://forms.example.test/f/abc" method="POST">
      <input type="hidden" name="_form_type" value="Intake Form">
      <p><label>Name</label> <input type="text" name="Name" value="Jane Doe"></p>
      <p><label>Email</label> <input type="email" name="Email" value="jane@example.test"></p>
      <p><label>Phone</label> <input type="tel" name="Phone" value=""></p>
      <p><textarea name="Concerns">Sleep
Diet</textarea></p>
      <p><input type="checkbox" name="Consent" checked> I consent</p>
      <p><input type="checkbox" name="Newsletter"> Newsletter</p>
      <p><input type="radio" name="Visit" value="first" checked> First
         <input type="radio" name="Visit" value="return"> Return</p>
      <div class="text-center"><button type="submit" class="form-submit">Submit Form</button></div>
    </form>
  </div>
</body></html>"#;

pub fn page() -> NodeRef {
    formpress::dom::parse_document(INTAKE_PAGE)
}

/// What the renderer should do when called.
#[derive(Clone, Copy)]
pub enum RenderBehavior {
    Succeed,
    Fail,
    /// Yield to the scheduler a few times before succeeding.
    SucceedAfterYield,
    Hang,
}

pub struct FakeRenderer {
    pub behavior: Cell<RenderBehavior>,
    pub calls: Cell<usize>,
    /// Serialized subtree as seen at render time.
    pub seen_html: RefCell<Vec<String>>,
    pub seen_options: RefCell<Vec<RenderOptions>>,
}

impl FakeRenderer {
    pub fn new(behavior: RenderBehavior) -> Rc<Self> {
        Rc::new(Self {
            behavior: Cell::new(behavior),
            calls: Cell::new(0),
            seen_html: RefCell::new(Vec::new()),
            seen_options: RefCell::new(Vec::new()),
        })
    }
}

#[async_trait(?Send)]
impl Renderer for FakeRenderer {
    async fn render(&self, root: &NodeRef, options: &RenderOptions) -> Result<Blob, RenderError> {
        self.calls.set(self.calls.get() + 1);
        self.seen_html.borrow_mut().push(root.to_string());
        self.seen_options.borrow_mut().push(options.clone());

        match self.behavior.get() {
            RenderBehavior::Succeed => Ok(Blob::pdf(b"%PDF-1.7 fake".to_vec())),
            RenderBehavior::Fail => Err(RenderError::Engine("canvas tainted".to_string())),
            RenderBehavior::SucceedAfterYield => {
                for _ in 0..3 {
                    tokio::task::yield_now().await;
                }
                Ok(Blob::pdf(b"%PDF-1.7 fake".to_vec()))
            }
            RenderBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

#[derive(Clone, Copy)]
pub enum SubmitBehavior {
    Status(u16),
    Hang,
}

pub struct FakeSubmitter {
    pub behavior: Cell<SubmitBehavior>,
    pub payloads: RefCell<Vec<(String, FormPayload)>>,
    pub native_calls: RefCell<Vec<(String, FormMethod, FormPayload)>>,
}

impl FakeSubmitter {
    pub fn new(behavior: SubmitBehavior) -> Rc<Self> {
        Rc::new(Self {
            behavior: Cell::new(behavior),
            payloads: RefCell::new(Vec::new()),
            native_calls: RefCell::new(Vec::new()),
        })
    }
}

#[async_trait(?Send)]
impl Submitter for FakeSubmitter {
    async fn submit(&self, action: &str, payload: FormPayload) -> Result<SubmitResponse, SubmitError> {
        self.payloads.borrow_mut().push((action.to_string(), payload));
        match self.behavior.get() {
            SubmitBehavior::Status(status) => Ok(SubmitResponse::new(status)),
            SubmitBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

#[async_trait(?Send)]
impl NativeSubmit for FakeSubmitter {
    async fn submit_natively(
        &self,
        action: &str,
        method: FormMethod,
        payload: FormPayload,
    ) -> Result<SubmitResponse, SubmitError> {
        self.native_calls
            .borrow_mut()
            .push((action.to_string(), method, payload));
        Ok(SubmitResponse::new(200))
    }
}

#[derive(Default)]
pub struct MemoryDownloader {
    pub saved: RefCell<Vec<(String, Blob)>>,
}

impl Downloader for MemoryDownloader {
    fn save(&self, filename: &str, blob: &Blob) -> Result<PathBuf, DownloadError> {
        self.saved
            .borrow_mut()
            .push((filename.to_string(), blob.clone()));
        Ok(PathBuf::from(filename))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub alerts: RefCell<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

pub struct Harness {
    pub document: NodeRef,
    pub renderer: Rc<FakeRenderer>,
    pub submitter: Rc<FakeSubmitter>,
    pub downloader: Rc<MemoryDownloader>,
    pub notifier: Rc<RecordingNotifier>,
    pub orchestrator: SubmissionOrchestrator,
}

pub fn harness(render: RenderBehavior, submit: SubmitBehavior) -> Harness {
    harness_with(render, submit, PipelineSettings::default())
}

pub fn harness_with(
    render: RenderBehavior,
    submit: SubmitBehavior,
    settings: PipelineSettings,
) -> Harness {
    let document = page();
    let renderer = FakeRenderer::new(render);
    let submitter = FakeSubmitter::new(submit);
    let downloader = Rc::new(MemoryDownloader::default());
    let notifier = Rc::new(RecordingNotifier::default());

    let collaborators = Collaborators {
        renderer: renderer.clone(),
        submitter: submitter.clone(),
        native: submitter.clone(),
        downloader: downloader.clone(),
        notifier: notifier.clone(),
    };
    let text = UiText {
        contact_email: CONTACT.to_string(),
        ..UiText::default()
    };
    let orchestrator =
        SubmissionOrchestrator::bind(&document, FormSelectors::default(), text, collaborators, settings)
            .expect("intake page has a bindable form");

    Harness {
        document,
        renderer,
        submitter,
        downloader,
        notifier,
        orchestrator,
    }
}

pub fn short_timeout() -> Option<Duration> {
    Some(Duration::from_millis(50))
}

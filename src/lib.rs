//! Turn a filled-in HTML form into a PDF at submit time, hand the PDF to the
//! submitter, and forward the field data with the PDF attached.

use std::fs;
use std::rc::Rc;

use anyhow::Context;
use serde_json::{Map, Value};

pub mod config;
pub mod dom;
pub mod download;
pub mod pipeline;
pub mod render;
pub mod snapshot;
pub mod submission;
pub mod ui;

pub use crate::config::PipelineConfig;
pub use crate::pipeline::{
    Collaborators, PipelineSettings, PipelineState, SubmissionOrchestrator, SubmissionOutcome,
};

const RESULT_PAGE: &str = "page.html";

/// Host runner: load a page, fill it in, and dispatch one submission.
///
/// Must be driven on a single-threaded runtime; the page tree is not `Send`.
pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_env()?;
    let inputs = config::RunnerInputs::from_env()?;

    let html = fs::read_to_string(&inputs.form_html)
        .with_context(|| format!("failed to read {}", inputs.form_html.display()))?;
    let document = dom::parse_document(&html);

    if let Some(path) = &inputs.fields_json {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let values: Map<String, Value> = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a JSON object", path.display()))?;
        dom::fill_fields(&document, &values);
    }

    let submitter = Rc::new(submission::HttpSubmitter::new()?);
    let collaborators = Collaborators {
        renderer: Rc::new(render::CommandRenderer::new(
            config.render_program.clone(),
            config.render_args.clone(),
        )),
        submitter: submitter.clone(),
        native: submitter,
        downloader: Rc::new(download::FileDownloader::new(&config.download_dir)),
        notifier: Rc::new(ui::LogNotifier),
    };

    let orchestrator = SubmissionOrchestrator::bind(
        &document,
        ui::FormSelectors::default(),
        config.ui_text(),
        collaborators,
        config.settings(),
    )?;
    log::info!("Bound form posting to {}", orchestrator.action());

    let outcome = orchestrator.dispatch_submit().await;
    log::info!("Submission finished in state {}", orchestrator.state());
    println!("{}", outcome);

    fs::create_dir_all(&config.download_dir)?;
    let page_path = config.download_dir.join(RESULT_PAGE);
    fs::write(&page_path, document.to_string())
        .with_context(|| format!("failed to write {}", page_path.display()))?;

    Ok(())
}

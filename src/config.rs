//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::pipeline::PipelineSettings;
use crate::ui::{BackLink, UiText};

const DEFAULT_RENDER_PROGRAM: &str = "html2pdf-cli";
const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub contact_email: String,
    pub render_program: String,
    pub render_args: Vec<String>,
    pub download_dir: PathBuf,
    pub render_timeout: Option<Duration>,
    pub submit_timeout: Option<Duration>,
    pub back_link: Option<BackLink>,
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let contact_email =
            get("FORMPRESS_CONTACT_EMAIL").ok_or(ConfigError::Missing("FORMPRESS_CONTACT_EMAIL"))?;
        if !contact_email.contains('@') {
            return Err(ConfigError::Invalid {
                name: "FORMPRESS_CONTACT_EMAIL",
                reason: format!("'{}' is not an email address", contact_email),
            });
        }

        Ok(Self {
            contact_email,
            render_program: get("FORMPRESS_RENDER_PROGRAM")
                .unwrap_or_else(|| DEFAULT_RENDER_PROGRAM.to_string()),
            render_args: get("FORMPRESS_RENDER_ARGS")
                .map(|args| args.split_whitespace().map(str::to_owned).collect())
                .unwrap_or_default(),
            download_dir: get("FORMPRESS_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR)),
            render_timeout: parse_secs(
                "FORMPRESS_RENDER_TIMEOUT_SECS",
                get("FORMPRESS_RENDER_TIMEOUT_SECS"),
            )?,
            submit_timeout: parse_secs(
                "FORMPRESS_SUBMIT_TIMEOUT_SECS",
                get("FORMPRESS_SUBMIT_TIMEOUT_SECS"),
            )?,
            back_link: get("FORMPRESS_BACK_LINK").and_then(|value| BackLink::parse(&value)),
        })
    }

    pub fn ui_text(&self) -> UiText {
        UiText {
            contact_email: self.contact_email.clone(),
            back_link: self.back_link.clone(),
            ..UiText::default()
        }
    }

    pub fn settings(&self) -> PipelineSettings {
        PipelineSettings {
            render_timeout: self.render_timeout,
            submit_timeout: self.submit_timeout,
            ..PipelineSettings::default()
        }
    }
}

/// Inputs for the bundled host runner.
#[derive(Debug, Clone)]
pub struct RunnerInputs {
    pub form_html: PathBuf,
    pub fields_json: Option<PathBuf>,
}

impl RunnerInputs {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let form_html = env::var("FORMPRESS_FORM_HTML")
            .map_err(|_| ConfigError::Missing("FORMPRESS_FORM_HTML"))?;
        Ok(Self {
            form_html: PathBuf::from(form_html),
            fields_json: env::var("FORMPRESS_FIELDS_JSON").ok().map(PathBuf::from),
        })
    }
}

fn parse_secs(name: &'static str, value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let secs: f64 = value.parse().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("'{}' is not a number of seconds", value),
    })?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::Invalid {
            name,
            reason: "must be a positive number of seconds".to_string(),
        });
    }
    Duration::try_from_secs_f64(secs)
        .map(Some)
        .map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        })
}

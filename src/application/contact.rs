//! Contact form submission through the third-party email relay.

use std::sync::Arc;

use async_trait::async_trait;
use datastar::prelude::ElementPatchMode;
use metrics::counter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    application::{error::HttpError, stream::StreamBuilder},
    presentation::views::{FormMessageKind, FormMessageTemplate, FormMessageView, render_fragment},
};

const SOURCE: &str = "application::contact::ContactService";
const METRIC_CONTACT_SUBMISSIONS: &str = "folio_contact_submissions_total";

pub const FORM_MESSAGE_SELECTOR: &str = "#form-message";
pub const SUCCESS_MESSAGE: &str =
    "Thank you! Your message has been sent successfully. I'll get back to you soon.";
pub const REJECTED_MESSAGE: &str =
    "Sorry, there was an error sending your message. Please try again.";
pub const NETWORK_MESSAGE: &str =
    "Sorry, there was an error sending your message. Please check your connection and try again.";
pub const INCOMPLETE_MESSAGE: &str = "Please fill in your name, email and message.";

const RESET_SCRIPT: &str = "document.getElementById('contact-form')?.reset()";

/// Form fields as posted by the contact form and forwarded to the relay.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ContactSubmission {
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub from_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    /// Honeypot field; the relay discards submissions that fill it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub botcheck: String,
}

impl ContactSubmission {
    fn is_complete(&self) -> bool {
        let filled = |value: &str| !value.trim().is_empty();
        filled(&self.name) && filled(&self.message) && self.email.contains('@')
    }
}

/// Body returned by the relay.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RelayResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("contact relay unreachable: {0}")]
    Transport(String),
    #[error("contact relay returned an unreadable response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ContactRelay: Send + Sync {
    async fn submit(&self, submission: &ContactSubmission) -> Result<RelayResponse, RelayError>;
}

/// Status message for the form plus whether the form should be cleared.
#[derive(Debug, Clone)]
pub struct ContactOutcome {
    pub view: FormMessageView,
}

impl ContactOutcome {
    fn success() -> Self {
        Self {
            view: FormMessageView {
                kind: FormMessageKind::Success,
                message: SUCCESS_MESSAGE.to_string(),
            },
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            view: FormMessageView {
                kind: FormMessageKind::Error,
                message: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.view.is_success()
    }

    /// Patch the message region; only a successful send clears the form.
    pub fn into_stream(self) -> Result<StreamBuilder, HttpError> {
        let reset = self.is_success();
        let markup = render_fragment(&FormMessageTemplate { view: self.view }, SOURCE)?;
        let mut stream = StreamBuilder::new();
        stream.push_patch(markup, FORM_MESSAGE_SELECTOR, ElementPatchMode::Inner);
        if reset {
            stream.push_script(RESET_SCRIPT.to_string());
        }
        Ok(stream)
    }
}

#[derive(Clone)]
pub struct ContactService {
    relay: Arc<dyn ContactRelay>,
}

impl ContactService {
    pub fn new(relay: Arc<dyn ContactRelay>) -> Self {
        Self { relay }
    }

    pub async fn submit(&self, submission: ContactSubmission) -> ContactOutcome {
        if !submission.is_complete() {
            counter!(METRIC_CONTACT_SUBMISSIONS, "outcome" => "incomplete").increment(1);
            return ContactOutcome::error(INCOMPLETE_MESSAGE);
        }

        match self.relay.submit(&submission).await {
            Ok(response) if response.success => {
                counter!(METRIC_CONTACT_SUBMISSIONS, "outcome" => "sent").increment(1);
                info!(target = "folio::contact", "contact message relayed");
                ContactOutcome::success()
            }
            Ok(response) => {
                counter!(METRIC_CONTACT_SUBMISSIONS, "outcome" => "rejected").increment(1);
                warn!(
                    target = "folio::contact",
                    relay_message = response.message.as_deref().unwrap_or_default(),
                    "contact relay rejected submission"
                );
                let message = response
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| REJECTED_MESSAGE.to_string());
                ContactOutcome::error(message)
            }
            Err(err) => {
                counter!(METRIC_CONTACT_SUBMISSIONS, "outcome" => "failed").increment(1);
                warn!(target = "folio::contact", error = %err, "contact relay failed");
                ContactOutcome::error(NETWORK_MESSAGE)
            }
        }
    }
}

//! UI-agnostic conversation state machine.
//!
//! The session never performs I/O. `submit` decides what should happen and,
//! when the model has to answer, hands back a [`GenerationRequest`] for the
//! caller to run; the outcome is fed back through `finish_generation`.

use tracing::{info, warn};

use crate::cat;
use crate::error::{ChatError, OllamaError};
use crate::mood::Mood;
use crate::prompt;
use crate::state::ChatMessage;

/// Used when the server cannot tell us which models it has.
pub const FALLBACK_MODEL: &str = "gemma3n:e4b";

/// Shown in place of a reply when generation fails.
pub const BROKEN_BRAIN_REPLY: &str = "*hiss* My brain is broken, friend! Try again. Mrow.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing changed: busy, blank input, or no model yet.
    Rejected,
    /// Answered locally with a canned line.
    Canned,
    /// The caller must issue exactly this request.
    Dispatched(GenerationRequest),
}

pub struct ChatSession {
    /// Text being composed. Cleared when a submission is accepted.
    pub pending_input: String,
    transcript: Vec<ChatMessage>,
    selected_model: Option<String>,
    preferred_model: Option<String>,
    mood: Mood,
    awaiting_response: bool,
}

impl ChatSession {
    pub fn new(mood: Mood, preferred_model: Option<String>) -> Self {
        Self {
            pending_input: String::new(),
            transcript: Vec::new(),
            selected_model: preferred_model.clone(),
            preferred_model,
            mood,
            awaiting_response: false,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn selected_model(&self) -> Option<&str> {
        self.selected_model.as_deref()
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    /// Whether the input should accept a submission at all.
    pub fn can_submit(&self) -> bool {
        !self.awaiting_response && self.selected_model.is_some()
    }

    /// Apply the result of the startup model listing.
    pub fn finish_discovery(&mut self, result: Result<Vec<String>, OllamaError>) {
        let (discovered, failure) = match result {
            Ok(models) => match models.into_iter().next() {
                Some(first) => (Some(first), None),
                None => (None, Some(ChatError::NoModels)),
            },
            Err(source) => (None, Some(ChatError::Discovery(source))),
        };

        if let Some(err) = failure {
            match &self.preferred_model {
                Some(preferred) => {
                    warn!(error = %err, model = %preferred, "model discovery failed, keeping configured model");
                }
                None => warn!(error = %err, fallback = FALLBACK_MODEL, "using fallback model"),
            }
        }

        let model = self
            .preferred_model
            .clone()
            .or(discovered)
            .unwrap_or_else(|| FALLBACK_MODEL.to_string());

        info!(%model, "model selected");
        self.selected_model = Some(model);
    }

    /// Try to send `pending_input`.
    pub fn submit(&mut self) -> Submission {
        if self.awaiting_response || self.pending_input.trim().is_empty() {
            return Submission::Rejected;
        }
        let Some(model) = self.selected_model.clone() else {
            return Submission::Rejected;
        };

        let input = std::mem::take(&mut self.pending_input);

        if let Some(reply) = cat::canned_reply(&input) {
            self.transcript.push(ChatMessage::user(input));
            self.transcript.push(ChatMessage::assistant(reply));
            return Submission::Canned;
        }

        // History for the prompt excludes the message being sent
        let prompt = prompt::build_prompt(&self.transcript, &input, self.mood);
        self.transcript.push(ChatMessage::user(input));
        self.awaiting_response = true;

        info!(%model, "dispatching generation request");
        Submission::Dispatched(GenerationRequest { model, prompt })
    }

    /// Record the outcome of a dispatched request.
    pub fn finish_generation(&mut self, result: Result<String, OllamaError>) {
        if !self.awaiting_response {
            warn!("ignoring completion with no request in flight");
            return;
        }

        let content = match result {
            Ok(text) => text,
            Err(source) => {
                let err = ChatError::Generation(source);
                warn!(error = %err, "replying with fallback line");
                BROKEN_BRAIN_REPLY.to_string()
            }
        };

        self.transcript.push(ChatMessage::assistant(content));
        self.awaiting_response = false;
    }
}

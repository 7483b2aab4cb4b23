//! # Conversation State Machine
//!
//! The client-side half of the protocol. It owns the turn history, the single
//! pending question and the lead form, and it drives a [`SupportBackend`].
//!
//! Every request is split into a `begin_*` step that applies the guard and the
//! optimistic update, and a `finish_*` step that applies the response. The async
//! helpers [`Conversation::send_message`] and [`Conversation::submit_lead`] simply
//! await the backend between the two, which keeps the transitions testable without
//! any I/O.
//!
//! | from | event | to |
//! |---|---|---|
//! | `Idle`, `LeadCapture` | question | `AwaitingCompletion` |
//! | `AwaitingCompletion` | direct answer | `Idle` |
//! | `AwaitingCompletion` | fallback | `LeadCapture` |
//! | `AwaitingCompletion` | failure | `LeadCapture` if a question is pending, else `Idle` |
//! | `LeadCapture` | lead submitted | `SubmittingLead` |
//! | `SubmittingLead` | ok | `Idle` |
//! | `SubmittingLead` | failure | `LeadCapture` |

use crate::{
    client::SupportClient,
    constants::{DEFAULT_GREETING, DEFAULT_THANK_YOU},
    errors::SupportError,
    types::{AssistantReply, Turn},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// The lead payload sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub phone: String,
    pub question: String,
}

/// The two calls a conversation makes.
#[async_trait]
pub trait SupportBackend: Send + Sync {
    async fn ask(&self, message: &str) -> Result<AssistantReply, SupportError>;
    async fn submit_lead(&self, lead: &LeadRequest) -> Result<(), SupportError>;
}

/// Lets a conversation run in-process against a [`SupportClient`].
#[async_trait]
impl SupportBackend for SupportClient {
    async fn ask(&self, message: &str) -> Result<AssistantReply, SupportError> {
        self.answer(message).await
    }

    async fn submit_lead(&self, lead: &LeadRequest) -> Result<(), SupportError> {
        SupportClient::submit_lead(self, lead.name.as_deref(), &lead.phone, &lead.question)
            .await
            .map(|_| ())
    }
}

/// Guard violations. None of them changes the conversation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversationError {
    #[error("message is empty")]
    EmptyInput,
    #[error("a request is already in flight")]
    Busy,
    #[error("no request is in flight")]
    NotInFlight,
    #[error("there is no pending question to attach contact details to")]
    NoPendingQuestion,
    #[error("a mobile number is required")]
    PhoneRequired,
}

/// Where the conversation is in the protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A question has been sent and its answer is outstanding.
    AwaitingCompletion { question: String },
    /// The last fallback is waiting for contact details.
    LeadCapture,
    /// Contact details have been sent and the acknowledgement is outstanding.
    SubmittingLead,
}

/// The append-only turn history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// The only mutation a transcript supports.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

/// The contact fields the user fills in during lead capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadForm {
    pub name: String,
    pub phone: String,
}

/// Fixed assistant texts produced on the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationMessages {
    pub greeting: String,
    pub thank_you: String,
}

impl Default for ConversationMessages {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            thank_you: DEFAULT_THANK_YOU.to_string(),
        }
    }
}

/// One user's conversation with the support assistant.
#[derive(Debug, Clone)]
pub struct Conversation {
    transcript: Transcript,
    phase: Phase,
    pending_question: Option<String>,
    lead_form: LeadForm,
    messages: ConversationMessages,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(ConversationMessages::default())
    }
}

impl Conversation {
    /// Starts a conversation with the greeting as its first turn.
    pub fn new(messages: ConversationMessages) -> Self {
        let mut transcript = Transcript::default();
        transcript.append(Turn::assistant(messages.greeting.clone()));
        Self {
            transcript,
            phase: Phase::Idle,
            pending_question: None,
            lead_form: LeadForm::default(),
            messages,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn pending_question(&self) -> Option<&str> {
        self.pending_question.as_deref()
    }

    pub fn lead_form(&self) -> &LeadForm {
        &self.lead_form
    }

    /// `true` when the lead form should be shown.
    pub fn needs_lead(&self) -> bool {
        self.pending_question.is_some()
    }

    /// Only `Idle` and `LeadCapture` accept a new question.
    pub fn accepts_questions(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::LeadCapture)
    }

    pub fn set_lead_name(&mut self, name: impl Into<String>) {
        self.lead_form.name = name.into();
    }

    pub fn set_lead_phone(&mut self, phone: impl Into<String>) {
        self.lead_form.phone = phone.into();
    }

    /// Applies the guard for a new question and records it optimistically.
    ///
    /// Returns the trimmed question to send.
    pub fn begin_question(&mut self, input: &str) -> Result<String, ConversationError> {
        if !self.accepts_questions() {
            return Err(ConversationError::Busy);
        }
        let question = input.trim();
        if question.is_empty() {
            return Err(ConversationError::EmptyInput);
        }

        self.transcript.append(Turn::user(question));
        self.phase = Phase::AwaitingCompletion {
            question: question.to_string(),
        };
        Ok(question.to_string())
    }

    /// Applies the backend's answer to the outstanding question.
    pub fn finish_question(
        &mut self,
        result: Result<AssistantReply, SupportError>,
    ) -> Result<(), ConversationError> {
        let question = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::AwaitingCompletion { question } => question,
            other => {
                self.phase = other;
                return Err(ConversationError::NotInFlight);
            }
        };

        match result {
            Ok(reply) if reply.needs_lead => {
                self.transcript.append(Turn::assistant(reply.reply));
                if self.pending_question.is_some() {
                    debug!("Newer fallback supersedes the pending question.");
                }
                self.pending_question = Some(question);
                self.phase = Phase::LeadCapture;
            }
            Ok(reply) => {
                self.transcript.append(Turn::assistant(reply.reply));
                self.pending_question = None;
                self.phase = Phase::Idle;
            }
            Err(e) => {
                warn!("Question failed: {e}");
                self.transcript.append(Turn::assistant(format!("Error: {e}")));
                // A lead that was already pending stays available for retry.
                self.phase = if self.pending_question.is_some() {
                    Phase::LeadCapture
                } else {
                    Phase::Idle
                };
            }
        }
        Ok(())
    }

    /// Applies the guard for a lead submission and builds the payload.
    pub fn begin_lead_submission(&mut self) -> Result<LeadRequest, ConversationError> {
        match self.phase {
            Phase::LeadCapture => {}
            Phase::Idle => return Err(ConversationError::NoPendingQuestion),
            Phase::AwaitingCompletion { .. } | Phase::SubmittingLead => {
                return Err(ConversationError::Busy)
            }
        }
        let question = self
            .pending_question
            .clone()
            .ok_or(ConversationError::NoPendingQuestion)?;
        let phone = self.lead_form.phone.trim();
        if phone.is_empty() {
            return Err(ConversationError::PhoneRequired);
        }
        let name = self.lead_form.name.trim();

        let request = LeadRequest {
            name: (!name.is_empty()).then(|| name.to_string()),
            phone: phone.to_string(),
            question,
        };
        self.phase = Phase::SubmittingLead;
        Ok(request)
    }

    /// Applies the backend's acknowledgement of the outstanding lead.
    pub fn finish_lead_submission(
        &mut self,
        result: Result<(), SupportError>,
    ) -> Result<(), ConversationError> {
        if self.phase != Phase::SubmittingLead {
            return Err(ConversationError::NotInFlight);
        }

        match result {
            Ok(()) => {
                self.transcript
                    .append(Turn::assistant(self.messages.thank_you.clone()));
                self.pending_question = None;
                self.lead_form = LeadForm::default();
                self.phase = Phase::Idle;
            }
            Err(e) => {
                warn!("Lead submission failed: {e}");
                self.transcript.append(Turn::assistant(format!("Error: {e}")));
                self.phase = Phase::LeadCapture;
            }
        }
        Ok(())
    }

    /// Sends a question and applies the answer.
    pub async fn send_message(
        &mut self,
        backend: &dyn SupportBackend,
        input: &str,
    ) -> Result<(), ConversationError> {
        let question = self.begin_question(input)?;
        let result = backend.ask(&question).await;
        self.finish_question(result)
    }

    /// Sends the lead form for the pending question and applies the acknowledgement.
    pub async fn submit_lead(
        &mut self,
        backend: &dyn SupportBackend,
    ) -> Result<(), ConversationError> {
        let request = self.begin_lead_submission()?;
        let result = backend.submit_lead(&request).await;
        self.finish_lead_submission(result)
    }
}

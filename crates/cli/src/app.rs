//! # Chat Application State
//!
//! This module defines the state and logic for the interactive chat session. It
//! turns input lines into conversation transitions and tracks which turns have
//! already been printed.

use supportpilot::{
    conversation::{Conversation, ConversationError, SupportBackend},
    types::{Role, Turn},
};

/// One parsed line of user input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// A question for the assistant.
    Message(String),
    /// `/name <text>`: sets the optional name on the lead form.
    Name(String),
    /// `/phone <text>`: sets the mobile number on the lead form.
    Phone(String),
    /// `/submit`: sends the lead form.
    Submit,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub const HELP_TEXT: &str = "Type a question and press Enter.\n\
When a question needs a human, leave your details:\n  \
/name <your name>   (optional)\n  \
/phone <mobile>     (required)\n  \
/submit             send them\n\
/help shows this text, /quit exits.";

/// Parses one line of input. Anything not starting with `/` is a message.
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Message(line.to_string());
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };
    match name {
        "name" => Input::Name(rest.to_string()),
        "phone" => Input::Phone(rest.to_string()),
        "submit" => Input::Submit,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

/// The core state for the chat session.
pub struct App<B: SupportBackend> {
    /// `true` while the session should keep reading input.
    pub running: bool,
    /// A message to display below the transcript, cleared on every line.
    pub status: String,
    pub conversation: Conversation,
    backend: B,
    /// How many transcript turns have been printed so far.
    rendered: usize,
}

impl<B: SupportBackend> App<B> {
    pub fn new(backend: B) -> Self {
        Self {
            running: true,
            status: String::new(),
            conversation: Conversation::default(),
            backend,
            rendered: 0,
        }
    }

    /// Handles one line of input and updates `status`.
    pub async fn handle_line(&mut self, line: &str) {
        self.status.clear();
        match parse_input(line) {
            Input::Message(text) => {
                let result = self
                    .conversation
                    .send_message(&self.backend, &text)
                    .await;
                self.report(result);
                if self.conversation.needs_lead() {
                    self.status =
                        "Leave your details with /name and /phone, then /submit.".to_string();
                }
            }
            Input::Name(name) => {
                self.conversation.set_lead_name(name);
                self.status = "Name saved.".to_string();
            }
            Input::Phone(phone) => {
                self.conversation.set_lead_phone(phone);
                self.status = "Mobile number saved.".to_string();
            }
            Input::Submit => {
                let result = self.conversation.submit_lead(&self.backend).await;
                self.report(result);
            }
            Input::Help => self.status = HELP_TEXT.to_string(),
            Input::Quit => self.running = false,
            Input::Empty => {}
            Input::Unknown(command) => {
                self.status = format!("Unknown command '/{command}'. Type /help.");
            }
        }
    }

    fn report(&mut self, result: Result<(), ConversationError>) {
        if let Err(e) = result {
            self.status = format!("Cannot do that now: {e}.");
        }
    }

    /// Returns the turns appended since the last call.
    pub fn take_new_turns(&mut self) -> Vec<Turn> {
        let turns = self.conversation.transcript().turns();
        let fresh = turns[self.rendered.min(turns.len())..].to_vec();
        self.rendered = turns.len();
        fresh
    }
}

/// Formats a turn for the terminal. User turns are already on screen as typed.
pub fn render_turn(turn: &Turn) -> Option<String> {
    match turn.role {
        Role::Assistant => Some(format!("assistant> {}", turn.text)),
        Role::User => None,
    }
}

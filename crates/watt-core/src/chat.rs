//! The chat session — owns one transcript, answers from the trigger table after
//! a simulated typing delay. Runs as an independent tokio task when driven
//! through [`ChatSession::run`].

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::events::ChatEvent;
use crate::responder::{TriggerTable, DEFAULT_TABLE, GREETING, SUGGESTIONS};
use crate::types::*;

/// Fixed delay before a bot reply is appended.
pub const TYPING_DELAY: Duration = Duration::from_millis(1000);

/// Messages that can be sent TO a session (from API/TUI)
#[derive(Debug)]
pub enum ChatCommand {
    Submit(String),
    Suggestion(usize),
    Transcript(oneshot::Sender<Vec<Message>>),
    Stop,
}

/// Cloneable handle to a session running in its own task.
#[derive(Clone)]
pub struct SessionHandle {
    pub id: String,
    command_tx: mpsc::Sender<ChatCommand>,
    event_tx: broadcast::Sender<ChatEvent>,
}

impl SessionHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.event_tx.subscribe()
    }

    /// Returns false once the session task has exited.
    pub async fn send(&self, cmd: ChatCommand) -> bool {
        self.command_tx.send(cmd).await.is_ok()
    }

    pub async fn transcript(&self) -> Option<Vec<Message>> {
        let (tx, rx) = oneshot::channel();
        if !self.send(ChatCommand::Transcript(tx)).await {
            return None;
        }
        rx.await.ok()
    }
}

pub struct ChatSession {
    pub id: String,
    table: &'static TriggerTable,
    transcript: Vec<Message>,
    input: String,
    pending: JoinSet<Message>,
    idle_timeout: Option<Duration>,

    event_tx: broadcast::Sender<ChatEvent>,
    command_tx: mpsc::Sender<ChatCommand>,
    command_rx: Option<mpsc::Receiver<ChatCommand>>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_table(&DEFAULT_TABLE)
    }

    pub fn with_table(table: &'static TriggerTable) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        let (command_tx, command_rx) = mpsc::channel(32);

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            table,
            transcript: vec![Message::bot(GREETING)],
            input: String::new(),
            pending: JoinSet::new(),
            idle_timeout: None,
            event_tx,
            command_tx,
            command_rx: Some(command_rx),
        }
    }

    /// Make [`ChatSession::run`] exit after `timeout` with no commands and
    /// no reply typing.
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.event_tx.subscribe()
    }

    pub fn command_sender(&self) -> mpsc::Sender<ChatCommand> {
        self.command_tx.clone()
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            id: self.id.clone(),
            command_tx: self.command_tx.clone(),
            event_tx: self.event_tx.clone(),
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Quick replies, offered only while nobody has said anything yet.
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.transcript.len() == 1 {
            SUGGESTIONS
        } else {
            &[]
        }
    }

    pub fn state(&self) -> ChatState {
        if self.pending.is_empty() {
            ChatState::Idle
        } else {
            ChatState::Typing
        }
    }

    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    fn broadcast(&self, event: ChatEvent) {
        let _ = self.event_tx.send(event);
    }

    fn broadcast_status(&self) {
        self.broadcast(ChatEvent::Status(StatusData {
            state: self.state(),
            pending: self.pending.len(),
        }));
    }

    fn append(&mut self, message: Message) -> &Message {
        self.broadcast(ChatEvent::Message(message.clone()));
        self.transcript.push(message);
        &self.transcript[self.transcript.len() - 1]
    }

    /// Submit whatever is in the input buffer, clearing it.
    pub fn submit_input(&mut self) -> Option<&Message> {
        let text = std::mem::take(&mut self.input);
        self.submit(&text)
    }

    /// Append the user's message now and schedule the bot's reply after
    /// [`TYPING_DELAY`]. Blank input is ignored.
    pub fn submit(&mut self, input: &str) -> Option<&Message> {
        if input.trim().is_empty() {
            return None;
        }

        let reply = self.table.select(input);
        let truncated: String = input.chars().take(120).collect();
        info!("[{}] user: {}", self.id, truncated);

        self.pending.spawn(async move {
            tokio::time::sleep(TYPING_DELAY).await;
            Message::bot(reply)
        });

        // Status goes out after the user message so subscribers see them in order.
        let index = self.transcript.len();
        self.append(Message::user(input));
        self.broadcast_status();
        self.transcript.get(index)
    }

    /// Same submission path as typing the suggestion by hand.
    pub fn choose_suggestion(&mut self, index: usize) -> Option<&Message> {
        let text = *self.suggestions().get(index)?;
        self.set_input(text);
        self.submit_input()
    }

    /// Wait for the next scheduled reply to finish typing and append it.
    /// Returns `None` when nothing is pending.
    pub async fn next_reply(&mut self) -> Option<Message> {
        while let Some(result) = self.pending.join_next().await {
            match result {
                Ok(message) => return Some(self.land_reply(message)),
                Err(e) if e.is_cancelled() => continue,
                Err(e) => warn!("[{}] reply task failed: {}", self.id, e),
            }
        }
        None
    }

    /// Wait until every scheduled reply has been appended.
    pub async fn settle(&mut self) {
        while self.next_reply().await.is_some() {}
    }

    fn land_reply(&mut self, message: Message) -> Message {
        let truncated: String = message.text.chars().take(120).collect();
        info!("[{}] bot: {}", self.id, truncated);
        let landed = self.append(message).clone();
        self.broadcast_status();
        landed
    }

    /// Drop every reply still typing. The transcript keeps what it has.
    pub fn stop(&mut self) {
        if !self.pending.is_empty() {
            debug!("[{}] dropping {} pending replies", self.id, self.pending.len());
        }
        self.pending.abort_all();
        self.broadcast(ChatEvent::Closed);
    }

    /// Command loop. Exits on `Stop`, or once the idle timeout passes, cancelling
    /// replies that have not landed yet.
    pub async fn run(&mut self) {
        let Some(mut command_rx) = self.command_rx.take() else {
            warn!("[{}] session is already running", self.id);
            return;
        };
        info!("[{}] chat session started", self.id);

        let idle_timeout = self.idle_timeout;
        let idle = tokio::time::sleep(idle_timeout.unwrap_or_default());
        tokio::pin!(idle);

        loop {
            tokio::select! {
                cmd = command_rx.recv() => {
                    match cmd {
                        Some(ChatCommand::Submit(text)) => {
                            self.submit(&text);
                        }
                        Some(ChatCommand::Suggestion(index)) => {
                            if self.choose_suggestion(index).is_none() {
                                debug!("[{}] ignoring suggestion {}", self.id, index);
                            }
                        }
                        Some(ChatCommand::Transcript(reply)) => {
                            let _ = reply.send(self.transcript.clone());
                        }
                        Some(ChatCommand::Stop) | None => break,
                    }
                }
                Some(result) = self.pending.join_next(), if !self.pending.is_empty() => {
                    match result {
                        Ok(message) => {
                            self.land_reply(message);
                        }
                        Err(e) if e.is_cancelled() => {}
                        Err(e) => warn!("[{}] reply task failed: {}", self.id, e),
                    }
                }
                () = &mut idle, if idle_timeout.is_some() && self.pending.is_empty() => {
                    info!("[{}] chat session idle, closing", self.id);
                    break;
                }
            }

            if let Some(timeout) = idle_timeout {
                idle.as_mut().reset(tokio::time::Instant::now() + timeout);
            }
        }

        self.stop();
        info!("[{}] chat session stopped", self.id);
    }

    /// Move the session onto its own task.
    pub fn spawn(mut self) -> (SessionHandle, tokio::task::JoinHandle<()>) {
        let handle = self.handle();
        let task = tokio::spawn(async move {
            self.run().await;
        });
        (handle, task)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

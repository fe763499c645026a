//! App state, input handling, event loop.

use chrono::Local;
use tokio::sync::mpsc;

use watt_core::appliances::{ApplianceCatalog, ApplianceReport};
use watt_core::billing::{Bill, BillSummary};
use watt_core::chat::ChatCommand;
use watt_core::config::Config;
use watt_core::events::ChatEvent;
use watt_core::profile::{welcome_line, IdentityProvider, StaticIdentity};
use watt_core::responder::SUGGESTIONS;
use watt_core::types::*;

/// The main application state.
pub struct App {
    pub messages: Vec<Message>,
    pub state: ChatState,
    pub pending: usize,
    pub appliances: Vec<ApplianceReport>,
    pub bill: BillSummary,
    pub welcome: String,
    pub scroll_offset: usize,
    pub input: String,
    pub input_focused: bool,
    pub should_quit: bool,
    pub command_tx: mpsc::Sender<ChatCommand>,
}

impl App {
    pub fn new(config: &Config, seed: &[Message], command_tx: mpsc::Sender<ChatCommand>) -> Self {
        let viewer = StaticIdentity::from_config(config).viewer();
        let bill = Bill::sample(Local::now().date_naive(), config.rate_per_kwh);

        App {
            messages: seed.to_vec(),
            state: ChatState::Idle,
            pending: 0,
            appliances: ApplianceCatalog::with_samples().reports(config.rate_per_kwh),
            bill: bill.summary(),
            welcome: welcome_line(&viewer),
            scroll_offset: 0,
            input: String::new(),
            input_focused: true,
            should_quit: false,
            command_tx,
        }
    }

    /// Quick replies are offered until the first exchange.
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.messages.len() == 1 {
            SUGGESTIONS
        } else {
            &[]
        }
    }

    pub fn handle_event(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Message(message) => {
                self.messages.push(message);
                // Auto-scroll to bottom
                self.scroll_offset = 0;
            }
            ChatEvent::Status(status) => {
                self.state = status.state;
                self.pending = status.pending;
            }
            ChatEvent::Closed => {
                self.state = ChatState::Idle;
                self.pending = 0;
            }
        }
    }

    /// Send the input line to the session. The session echoes it back as a
    /// `Message` event, so nothing is appended here.
    pub async fn send_message(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.input);
        let _ = self.command_tx.send(ChatCommand::Submit(text)).await;
    }

    /// Put the quick reply in the input line and send it, exactly as if typed.
    pub async fn choose_suggestion(&mut self, index: usize) {
        if let Some(text) = self.suggestions().get(index) {
            self.input = text.to_string();
            self.send_message().await;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (App, mpsc::Receiver<ChatCommand>) {
        let (tx, rx) = mpsc::channel(8);
        let seed = vec![Message::bot("hello")];
        (App::new(&Config::default(), &seed, tx), rx)
    }

    #[tokio::test]
    async fn test_send_message_clears_input() {
        let (mut app, mut rx) = app();
        app.input = "how does this system work".into();
        app.send_message().await;
        assert!(app.input.is_empty());
        match rx.recv().await {
            Some(ChatCommand::Submit(text)) => assert_eq!(text, "how does this system work"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_input_not_sent() {
        let (mut app, mut rx) = app();
        app.input = "   ".into();
        app.send_message().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_suggestions_hide_after_first_message() {
        let (mut app, mut rx) = app();
        assert_eq!(app.suggestions().len(), SUGGESTIONS.len());

        app.input = "half-typed".into();
        app.choose_suggestion(1).await;
        assert!(app.input.is_empty());
        match rx.recv().await {
            Some(ChatCommand::Submit(text)) => assert_eq!(text, "Tips for saving energy"),
            other => panic!("unexpected command: {:?}", other),
        }
        app.choose_suggestion(SUGGESTIONS.len()).await;
        assert!(rx.try_recv().is_err());

        app.handle_event(ChatEvent::Message(Message::user("Tips for saving energy")));
        assert!(app.suggestions().is_empty());
        app.choose_suggestion(0).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_status_events() {
        let (tx, _rx) = mpsc::channel(1);
        let mut app = App::new(&Config::default(), &[Message::bot("hi")], tx);
        app.handle_event(ChatEvent::Status(StatusData {
            state: ChatState::Typing,
            pending: 2,
        }));
        assert_eq!(app.state, ChatState::Typing);
        app.handle_event(ChatEvent::Closed);
        assert_eq!(app.pending, 0);
        assert_eq!(app.appliances.len(), 9);
        assert_eq!(app.appliances[0].daily_cost, 0.42);
    }
}

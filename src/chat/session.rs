use std::collections::VecDeque;
use std::fmt::Write;

pub const USER_SENDER: &str = "You";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }
}

// Input buffer plus displayed history, newest first
#[derive(Debug, Clone)]
pub struct ChatSession {
    assistant_name: String,
    messages: VecDeque<ChatMessage>,
    input: String,
}

impl ChatSession {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            messages: VecDeque::new(),
            input: String::new(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    // Blank input is left in place
    pub fn submit(&mut self) -> Option<String> {
        if self.input.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.input);
        self.messages
            .push_front(ChatMessage::new(USER_SENDER, text.clone()));
        Some(text)
    }

    pub fn receive_reply(&mut self, reply: impl Into<String>) -> &ChatMessage {
        let message = ChatMessage::new(self.assistant_name.clone(), reply);
        self.messages.push_front(message);
        &self.messages[0]
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for message in &self.messages {
            let _ = writeln!(out, "{}: {}", message.sender, message.text);
        }
        out
    }
}

use std::sync::Arc;

use log::error;
use tokio::task::JoinHandle;

use super::client::Relay;
use super::session::{ChatMessage, ChatSession};
use super::speech::Speaker;

// Drives one chat exchange: record the user's message, ask the relay,
// record and optionally speak the reply. Failures are logged only.
pub struct ChatController {
    session: ChatSession,
    relay: Arc<dyn Relay>,
    speaker: Option<Speaker>,
    speech: Option<JoinHandle<()>>,
}

impl ChatController {
    pub fn new(session: ChatSession, relay: Arc<dyn Relay>, speaker: Option<Speaker>) -> Self {
        Self {
            session,
            relay,
            speaker,
            speech: None,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    pub fn is_speaking(&self) -> bool {
        self.speaker.as_ref().map_or(false, Speaker::is_speaking)
    }

    // Returns the reply message when one arrived. Speech plays in the
    // background; utterances queue behind each other.
    pub async fn send_input(&mut self) -> Option<ChatMessage> {
        let text = self.session.submit()?;

        let reply = match self.relay.send(&text).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Error sending message: {:#}", e);
                return None;
            }
        };

        let message = self.session.receive_reply(reply).clone();

        if let Some(speaker) = self.speaker.clone() {
            let previous = self.speech.take();
            let text = message.text.clone();
            self.speech = Some(tokio::spawn(async move {
                if let Some(previous) = previous {
                    let _ = previous.await;
                }
                if let Err(e) = speaker.speak(&text).await {
                    error!("Speech failed: {:#}", e);
                }
            }));
        }

        Some(message)
    }

    // Waits for queued speech to finish playing.
    pub async fn finish_speaking(&mut self) {
        if let Some(speech) = self.speech.take() {
            let _ = speech.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use crate::chat::speech::{SpeechOutput, Utterance};
    use crate::chat::voice::Voice;

    struct StubRelay {
        reply: Option<&'static str>,
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Relay for StubRelay {
        async fn send(&self, message: &str) -> Result<String> {
            self.sent.lock().unwrap().push(message.to_string());
            self.reply
                .map(str::to_string)
                .ok_or_else(|| anyhow!("connection refused"))
        }
    }

    #[derive(Default)]
    struct StubSpeech {
        spoken: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SpeechOutput for StubSpeech {
        async fn voices(&self) -> Result<Vec<Voice>> {
            Ok(Vec::new())
        }

        async fn speak(&self, utterance: &Utterance) -> Result<()> {
            self.spoken.lock().unwrap().push(utterance.text.clone());
            Ok(())
        }
    }

    fn controller(reply: Option<&'static str>) -> (ChatController, Arc<StubRelay>, Arc<StubSpeech>) {
        let relay = Arc::new(StubRelay {
            reply,
            sent: Mutex::new(Vec::new()),
        });
        let speech = Arc::new(StubSpeech::default());
        let controller = ChatController::new(
            ChatSession::new("Snowball"),
            relay.clone(),
            Some(Speaker::new(speech.clone())),
        );
        (controller, relay, speech)
    }

    #[tokio::test]
    async fn test_reply_is_prepended_and_spoken() {
        let (mut controller, relay, speech) = controller(Some("hi there"));
        controller.session_mut().set_input("hello");

        let reply = controller.send_input().await.unwrap();
        controller.finish_speaking().await;
        assert_eq!(reply, ChatMessage::new("Snowball", "hi there"));
        assert!(!controller.is_speaking());
        assert_eq!(controller.session().input(), "");

        let history: Vec<&ChatMessage> = controller.session().messages().collect();
        assert_eq!(history[0], &ChatMessage::new("Snowball", "hi there"));
        assert_eq!(history[1], &ChatMessage::new("You", "hello"));

        assert_eq!(relay.sent.lock().unwrap().as_slice(), ["hello".to_string()]);
        assert_eq!(speech.spoken.lock().unwrap().as_slice(), ["hi there".to_string()]);
    }

    #[tokio::test]
    async fn test_relay_failure_keeps_user_message_only() {
        let (mut controller, _relay, speech) = controller(None);
        controller.session_mut().set_input("hello");

        assert!(controller.send_input().await.is_none());
        controller.finish_speaking().await;
        let history: Vec<&ChatMessage> = controller.session().messages().collect();
        assert_eq!(history, vec![&ChatMessage::new("You", "hello")]);
        assert!(speech.spoken.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_input_sends_nothing() {
        let (mut controller, relay, _speech) = controller(Some("unused"));
        controller.session_mut().set_input("  ");

        assert!(controller.send_input().await.is_none());
        assert!(relay.sent.lock().unwrap().is_empty());
        assert!(controller.session().is_empty());
    }

    #[tokio::test]
    async fn test_muted_controller_does_not_speak() {
        let relay = Arc::new(StubRelay {
            reply: Some("hi there"),
            sent: Mutex::new(Vec::new()),
        });
        let mut controller = ChatController::new(ChatSession::new("Snowball"), relay, None);
        controller.session_mut().set_input("hello");
        assert!(controller.send_input().await.is_some());
        assert!(!controller.is_speaking());
        controller.finish_speaking().await;
    }

    #[tokio::test]
    async fn test_every_reply_is_spoken() {
        let (mut controller, _relay, speech) = controller(Some("hi there"));
        for input in ["one", "two", "three"] {
            controller.session_mut().set_input(input);
            controller.send_input().await.unwrap();
        }
        controller.finish_speaking().await;
        assert_eq!(speech.spoken.lock().unwrap().len(), 3);
    }
}

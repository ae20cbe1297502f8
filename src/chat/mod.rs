pub mod client;
pub mod controller;
pub mod session;
pub mod speech;
pub mod voice;

pub use client::{Relay, RelayClient};
pub use controller::ChatController;
pub use session::{ChatMessage, ChatSession, USER_SENDER};
pub use speech::{CommandSpeech, Speaker, SpeechOutput, Utterance};
pub use voice::{select_voice, Voice};

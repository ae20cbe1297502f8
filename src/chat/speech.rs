use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;

use super::voice::{select_voice, Voice};

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Option<Voice>,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
            lang: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

#[async_trait]
pub trait SpeechOutput: Send + Sync {
    async fn voices(&self) -> Result<Vec<Voice>>;

    // Resolves once the utterance has finished playing.
    async fn speak(&self, utterance: &Utterance) -> Result<()>;
}

// Picks a voice for each reply and tracks whether something is playing.
#[derive(Clone)]
pub struct Speaker {
    output: Arc<dyn SpeechOutput>,
    speaking: Arc<AtomicBool>,
}

impl Speaker {
    pub fn new(output: Arc<dyn SpeechOutput>) -> Self {
        Self {
            output,
            speaking: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    pub async fn speak(&self, text: &str) -> Result<()> {
        let mut utterance = Utterance::new(text);
        match self.output.voices().await {
            Ok(voices) => utterance.voice = select_voice(&voices).cloned(),
            Err(e) => warn!("Could not list voices, using the default: {:#}", e),
        }
        debug!("Speaking with voice {:?}", utterance.voice.as_ref().map(|v| &v.name));

        self.speaking.store(true, Ordering::SeqCst);
        let result = self.output.speak(&utterance).await;
        self.speaking.store(false, Ordering::SeqCst);
        result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    // macOS `say`
    Say,
    // `espeak-ng`, common on Linux
    Espeak,
}

impl Engine {
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Engine::Say
        } else {
            Engine::Espeak
        }
    }

    fn program(&self) -> &'static str {
        match self {
            Engine::Say => "say",
            Engine::Espeak => "espeak-ng",
        }
    }
}

// Speech through the host's command-line TTS.
pub struct CommandSpeech {
    engine: Engine,
}

impl CommandSpeech {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn detect() -> Self {
        Self::new(Engine::detect())
    }

    fn speak_args(&self, utterance: &Utterance) -> Vec<String> {
        let mut args = Vec::new();
        match self.engine {
            Engine::Say => {
                if let Some(voice) = &utterance.voice {
                    args.push("-v".to_string());
                    args.push(voice.name.clone());
                }
                if (utterance.rate - 1.0).abs() > f32::EPSILON {
                    args.push("-r".to_string());
                    args.push(format!("{}", (175.0 * utterance.rate).round() as u32));
                }
            }
            Engine::Espeak => {
                args.push("-v".to_string());
                args.push(match &utterance.voice {
                    Some(voice) => voice.name.clone(),
                    None => utterance.lang.to_lowercase(),
                });
                args.push("-s".to_string());
                args.push(format!("{}", (175.0 * utterance.rate).round() as u32));
                args.push("-p".to_string());
                args.push(format!("{}", (50.0 * utterance.pitch).round().clamp(0.0, 99.0) as u32));
                args.push("--".to_string());
            }
        }
        args.push(utterance.text.clone());
        args
    }
}

#[async_trait]
impl SpeechOutput for CommandSpeech {
    async fn voices(&self) -> Result<Vec<Voice>> {
        let args: &[&str] = match self.engine {
            Engine::Say => &["-v", "?"],
            Engine::Espeak => &["--voices"],
        };

        let output = Command::new(self.engine.program())
            .args(args)
            .output()
            .await
            .map_err(|e| anyhow!("Failed to run {}: {}", self.engine.program(), e))?;

        if !output.status.success() {
            return Err(anyhow!("{} exited with {}", self.engine.program(), output.status));
        }

        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(match self.engine {
            Engine::Say => parse_say_voices(&listing),
            Engine::Espeak => parse_espeak_voices(&listing),
        })
    }

    async fn speak(&self, utterance: &Utterance) -> Result<()> {
        let status = Command::new(self.engine.program())
            .args(self.speak_args(utterance))
            .status()
            .await
            .map_err(|e| anyhow!("Failed to run {}: {}", self.engine.program(), e))?;

        if !status.success() {
            return Err(anyhow!("{} exited with {}", self.engine.program(), status));
        }
        Ok(())
    }
}

// Lines look like `Tammy               en_US    # Hello, my name is Tammy.`
fn parse_say_voices(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .filter_map(|line| {
            let head = line.split('#').next()?.trim();
            let (name, lang) = head.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(Voice::new(name, lang.replace('_', "-")))
        })
        .collect()
}

// Columns: Pty Language Age/Gender VoiceName File [Other Languages]
fn parse_espeak_voices(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let _priority = cols.next()?;
            let lang = cols.next()?;
            let _age_gender = cols.next()?;
            let name = cols.next()?;
            Some(Voice::new(name, lang))
        })
        .collect()
}

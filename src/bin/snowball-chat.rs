use std::sync::Arc;

use dotenv::dotenv;
use log::info;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use snowball_relay::chat::{ChatController, ChatSession, CommandSpeech, RelayClient, Speaker};
use snowball_relay::config::ClientSettings;

const QUIT_COMMAND: &str = "/quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let settings = ClientSettings::from_env();
    info!("Talking to {} (speech: {})", settings.backend_url, settings.speech_enabled);

    let speaker = settings
        .speech_enabled
        .then(|| Speaker::new(Arc::new(CommandSpeech::detect())));
    let mut controller = ChatController::new(
        ChatSession::new(settings.assistant_name.clone()),
        Arc::new(RelayClient::new(&settings.backend_url)),
        speaker,
    );

    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();

    stdout
        .write_all(format!("❄️ {}\nType your message and press Enter...\n", settings.assistant_name).as_bytes())
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim() == QUIT_COMMAND {
            break;
        }

        controller.session_mut().set_input(line);
        controller.send_input().await;
        if controller.session().is_empty() {
            continue;
        }

        let history = controller.session().render();
        stdout.write_all(format!("\n{}\n", history).as_bytes()).await?;
        stdout.flush().await?;
    }

    if controller.is_speaking() {
        info!("Waiting for speech to finish");
    }
    controller.finish_speaking().await;

    Ok(())
}

mod common;
mod config;
mod network;
mod ui;

use clap::Parser;
use dotenvy::dotenv;
use network::{ChatApi, ChatClient};
use tokio::sync::mpsc;
use ui::{ChatApp, ChatSession};

#[derive(Parser)]
#[command(
    name = "help_chat",
    version,
    about = "Desktop chat window for a help session"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Base URL of the chat server
    #[arg(long, value_name = "URL")]
    server: Option<String>,
    /// Help session to join
    #[arg(long, value_name = "ID")]
    help_id: Option<i64>,
    /// Your participant name
    #[arg(long, value_name = "NAME")]
    me: Option<String>,
    /// The other participant's name
    #[arg(long, value_name = "NAME")]
    peer: Option<String>,
    /// Poll interval in milliseconds
    #[arg(long, value_name = "MS")]
    poll_ms: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            server_url: self.server.clone(),
            poll_interval_ms: self.poll_ms,
            help_id: self.help_id,
            me: self.me.clone(),
            peer: self.peer.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);
    let settings = match config::resolve(app_config, cli.overrides()) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Invalid configuration: {err}");
            return Err(err.into());
        }
    };

    run_client(settings).await?;
    Ok(())
}

async fn run_client(settings: config::Settings) -> Result<(), Box<dyn std::error::Error>> {
    let api = ChatApi::new(&settings.server_url, settings.request_timeout)?;

    // UI -> Network
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Network -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    let context = settings.context.clone();
    log::info!(
        "Joining help session {} as {} with {} on {}",
        context.help_id,
        context.me,
        context.peer,
        settings.server_url
    );

    let client = ChatClient::new(event_tx, cmd_rx, api, context, settings.poll_interval);
    tokio::spawn(client.run());

    let options = eframe::NativeOptions::default();
    let mut parts = Some((ChatSession::new(settings.context), cmd_tx, event_rx));

    eframe::run_native(
        "Help Chat",
        options,
        Box::new(move |cc| {
            let (session, command_sender, event_receiver) = parts
                .take()
                .ok_or("ChatApp should only be initialized once")?;

            Ok(Box::new(ChatApp::new(
                cc,
                session,
                command_sender,
                event_receiver,
            )))
        }),
    )?;

    Ok(())
}

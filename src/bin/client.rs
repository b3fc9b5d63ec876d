//! CLI front end for the stream consumer.
//!
//! Sends one message to the mock chat server and prints the committed
//! reply paragraphs once the terminal event arrives. Run with
//! `RUST_LOG=debug` to watch the in-progress accumulation.

use clap::Parser;
use futures::StreamExt;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ellm_chat::client::{ChatClient, TurnUpdate};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the chat server
    #[arg(long, env = "ELLM_SERVER_URL", default_value = "http://127.0.0.1:9090")]
    server_url: String,

    /// Message to send
    message: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let client = ChatClient::new(&cli.server_url);

    let mut updates = client.send(cli.message).await?;
    while let Some(update) = updates.next().await {
        match update? {
            TurnUpdate::Delta { paragraphs } => {
                debug!(paragraphs = paragraphs.len(), "Reply in progress");
            }
            TurnUpdate::Committed { paragraphs } => {
                for paragraph in &paragraphs {
                    let paragraph = paragraph.trim();
                    if !paragraph.is_empty() {
                        println!("{paragraph}\n");
                    }
                }
            }
        }
    }

    Ok(())
}

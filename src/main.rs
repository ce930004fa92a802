use std::io::Write;

use docs_chat::infrastructure::{build_engine, Config};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docs_chat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let engine = build_engine(&config).await?;

    println!("Initializing documentation assistant...");
    if let Err(e) = engine.initialize().await {
        eprintln!("Initialization failed: {e}");
        return Ok(());
    }
    info!("assistant ready");

    println!("Ready. Ask a question, or use /clear to reset the conversation, /quit to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                engine.clear_memory().await;
                println!("Conversation history cleared.");
            }
            question => {
                let result = engine.chat(question).await;
                println!("\n{}\n", result.answer);

                if !result.sources.is_empty() {
                    println!("Sources:");
                    let mut seen = Vec::new();
                    for source in &result.sources {
                        let url = &source.chunk.metadata.source_url;
                        if seen.contains(url) {
                            continue;
                        }
                        seen.push(url.clone());
                        println!("  - {} ({})", source.chunk.metadata.title, url);
                    }
                    println!();
                }
            }
        }
    }

    Ok(())
}

//! `chatmirror once` — one prompt, one request, one answer. For prompt
//! debugging without waiting on the poll loop.

use std::path::PathBuf;

use chatmirror_client::OpenAiCompatClient;
use chatmirror_config::WidgetConfig;
use chatmirror_core::{CompletionClient, CompletionRequest};
use chatmirror_widget::prompt;

pub async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        super::load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for an API key early — give a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    CHATMIRROR_API_KEY");
        eprintln!("    OPENAI_API_KEY");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!(
            "    {}",
            WidgetConfig::config_dir().join("config.toml").display()
        );
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let messages = prompt::assemble(&config)?;

    println!("Assembled prompt:");
    for msg in &messages {
        println!("  [{}] {}", msg.role, msg.content);
    }
    println!();

    let client = OpenAiCompatClient::from_config(&config);
    let request = CompletionRequest {
        model: config.model.clone(),
        messages,
    };

    let text = client
        .complete(request)
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    println!("{text}");
    Ok(())
}

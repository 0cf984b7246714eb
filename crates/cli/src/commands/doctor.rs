//! `chatmirror doctor` — Diagnose configuration and endpoint health.

use std::path::PathBuf;

use chatmirror_client::OpenAiCompatClient;
use chatmirror_config::WidgetConfig;
use chatmirror_core::CompletionClient;

pub async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🪞 ChatMirror Doctor — System Diagnostics");
    println!("=========================================\n");

    let mut issues = 0;

    let path = config_path.unwrap_or_else(|| WidgetConfig::config_dir().join("config.toml"));
    if path.exists() {
        match WidgetConfig::load_with_env(&path) {
            Ok(config) => {
                println!("  ✅ Config file valid: {}", path.display());

                if config.has_api_key() {
                    println!("  ✅ API key configured");
                } else {
                    println!("  ⚠️  No API key — set CHATMIRROR_API_KEY or add api_key to the config");
                    issues += 1;
                }

                println!(
                    "  ✅ {} prompt variant(s), {} initial prompt message(s)",
                    config.prompts.len(),
                    config.initial_prompt.len()
                );

                let client = OpenAiCompatClient::from_config(&config);
                match client.health_check().await {
                    Ok(_) => println!("  ✅ Endpoint reachable: {}", config.endpoint),
                    Err(e) => {
                        println!("  ⚠️  Endpoint unreachable: {e}");
                        issues += 1;
                    }
                }
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ❌ No config file at {}", path.display());
        println!("     Create one with at least one prompt variant, for example:\n");
        println!("       prompts = [[ {{ role = \"user\", content = \"Give me a quote for {{{{date}}}}.\" }} ]]");
        issues += 1;
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

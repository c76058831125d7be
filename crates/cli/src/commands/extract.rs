//! `wayfinder extract`: Run the extraction engine on one piece of text.

use wayfinder_config::AppConfig;
use wayfinder_tools::Extractor;

pub async fn run(text: &str, offline: bool) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = if offline {
        Extractor::offline()
    } else {
        let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
        Extractor::new(wayfinder_providers::router::model_from_config(&config)?)
    };

    let record = extractor.extract(text).await;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

//! `wayfinder config`: Configuration management commands.

use wayfinder_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load().and_then(|config| config.validate().map(|()| config)) {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if !config.has_api_key() && config.default_provider != "ollama" {
                warnings.push(
                    "No API key set (set WAYFINDER_API_KEY, OPENROUTER_API_KEY or OPENAI_API_KEY)",
                );
            }

            if !config.geocoding.base_url.starts_with("http") {
                warnings.push("geocoding.base_url is not an http(s) URL");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Provider:    {}", config.default_provider);
            println!("   Model:       {}", config.default_model);
            println!("   Iterations:  {}", config.agent.max_iterations);
            println!("   Geocoder:    {}", config.geocoding.base_url);
            println!("   Search:      {} results per provider", config.search.max_results);
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&redacted(config))?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

/// Mask every API key so `show` never prints secrets.
fn redacted(mut config: AppConfig) -> AppConfig {
    let mask = |key: &mut Option<String>| {
        if key.is_some() {
            *key = Some("***".into());
        }
    };
    mask(&mut config.api_key);
    for provider in config.providers.values_mut() {
        mask(&mut provider.api_key);
    }
    config
}

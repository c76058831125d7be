//! `wayfinder resolve`: Run the agent on one location description.

use std::io::Write;
use std::sync::Arc;

use serde_json::{Map, Value};
use wayfinder_agent::{AgentResult, Dispatcher, ReactAgent};
use wayfinder_config::AppConfig;
use wayfinder_tools::{Extractor, GeoService, NominatimGeocoder, WebSearch};

pub struct ResolveOptions {
    pub max_iterations: Option<u32>,
    pub quiet: bool,
    pub json: bool,
    pub verbose: bool,
}

pub async fn run(query: Option<String>, options: ResolveOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let query = match query {
        Some(q) => q,
        None => prompt_for_query()?,
    };
    let query = query.trim();
    if query.is_empty() {
        return Err("No location description given".into());
    }

    let model = wayfinder_providers::router::model_from_config(&config)?;
    let dispatcher = Dispatcher::new(
        Extractor::new(model.clone()),
        WebSearch::from_config(&config.search)?,
        GeoService::new(Arc::new(NominatimGeocoder::new(&config.geocoding)?)),
    );
    let max_iterations = options.max_iterations.unwrap_or(config.agent.max_iterations);
    let agent = ReactAgent::new(model, dispatcher).with_max_iterations(max_iterations);
    tracing::debug!(%query, max_iterations, "Resolving location");

    if !options.json {
        println!();
        println!("  Provider:  {}", config.default_provider);
        println!("  Model:     {}", config.default_model);
        println!("  Budget:    {max_iterations} iterations");
        println!();
    }

    let result = agent.run(query).await?;

    let show_trace = (config.agent.verbose || options.verbose) && !options.quiet;
    if show_trace && !options.json {
        print!("{}", result.render_trace());
        println!();
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result.answer)?);
    } else {
        print!("{}", render_summary(&result));
    }

    Ok(())
}

fn prompt_for_query() -> Result<String, Box<dyn std::error::Error>> {
    print!("Enter location description: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line)
}

fn render_summary(result: &AgentResult) -> String {
    let mut out = String::new();
    if result.is_answered() {
        out.push_str("  Final answer:\n");
    } else {
        out.push_str("  No answer:\n");
    }
    out.push_str(&render_answer(&result.answer));
    out.push_str(&format!(
        "\n  Iterations: {}, tool calls: {}\n",
        result.iterations, result.tool_calls_made
    ));
    if result.is_answered()
        && let Err(e) = result.validated()
    {
        out.push_str(&format!("  ⚠️  {e}\n"));
    }
    out
}

/// One `key: value` line per answer field, absent values shown as `-`.
fn render_answer(answer: &Map<String, Value>) -> String {
    answer
        .iter()
        .map(|(key, value)| {
            let shown = match value {
                Value::Null => "-".to_string(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("    {key:<9} {shown}\n")
        })
        .collect()
}

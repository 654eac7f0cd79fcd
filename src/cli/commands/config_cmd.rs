//! Configuration management commands.

use console::style;

use super::Context;
use crate::cli::helpers::print_json;
use crate::config::StoreBackend;

/// Show the effective configuration. API keys are never printed.
pub fn cmd_config_show(ctx: &Context) -> anyhow::Result<()> {
    let settings = &ctx.settings;
    let config = &ctx.config;
    let llm = &config.llm;
    let analysis = config.analyzer_settings();

    let store = match settings.store {
        StoreBackend::File => "file",
        StoreBackend::Sqlite => "sqlite",
    };
    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string());

    if ctx.json {
        return print_json(&serde_json::json!({
            "config_file": source,
            "data_dir": settings.data_dir,
            "store": store,
            "database": settings.database_path(),
            "server": { "host": settings.host, "port": settings.port },
            "analysis": {
                "jurisdiction": analysis.jurisdiction,
                "max_content_chars": analysis.max_content_chars,
            },
            "llm": {
                "enabled": llm.enabled(),
                "provider": llm.provider_name(),
                "endpoint": llm.endpoint(),
                "model": llm.model(),
                "speech_model": llm.speech_model(),
                "speech_voice": llm.speech_voice(),
                "api_key_set": llm.api_key().is_some(),
                "temperature": llm.temperature(),
                "max_tokens": llm.max_tokens(),
                "timeout_secs": llm.timeout_secs(),
            },
        }));
    }

    println!("{}", style("Configuration").bold());
    println!(
        "  Config file:   {}",
        source.as_deref().unwrap_or("(none, using defaults)")
    );
    println!("  Data dir:      {}", settings.data_dir.display());
    println!("  Store:         {}", store);
    if settings.store == StoreBackend::Sqlite {
        println!("  Database:      {}", settings.database_path().display());
    }
    println!("  Server:        {}:{}", settings.host, settings.port);
    println!("  Jurisdiction:  {}", analysis.jurisdiction);
    println!();
    println!("{}", style("LLM").bold());
    println!("  Enabled:       {}", llm.enabled());
    println!("  Provider:      {}", llm.provider_name());
    println!("  Endpoint:      {}", llm.endpoint());
    println!("  Model:         {}", llm.model());
    if llm.speech_model().is_empty() {
        println!("  Speech:        {}", style("not available").yellow());
    } else {
        println!(
            "  Speech:        {} ({})",
            llm.speech_model(),
            llm.speech_voice()
        );
    }
    println!(
        "  API key:       {}",
        if llm.api_key().is_some() {
            style("set").green()
        } else {
            style("not set").yellow()
        }
    );
    println!("  Temperature:   {}", llm.temperature());
    println!("  Max tokens:    {}", llm.max_tokens());
    println!("  Max content:   {} chars", llm.max_content_chars());

    Ok(())
}

//! Web server command.

use console::style;

use super::Context;

/// Start the JSON API server. Flags override the configured address.
pub async fn cmd_serve(ctx: &Context, host: Option<&str>, port: Option<u16>) -> anyhow::Result<()> {
    let host = host.unwrap_or(&ctx.settings.host);
    let port = port.unwrap_or(ctx.settings.port);

    if ctx.config.llm.api_key().is_none() && ctx.config.llm.provider().requires_api_key() {
        eprintln!(
            "{} {}",
            style("!").yellow(),
            ctx.config.llm.availability_hint()
        );
    }

    println!(
        "{} Starting Nomiko server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(&ctx.settings, &ctx.config, host, port).await
}

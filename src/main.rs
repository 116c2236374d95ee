use clap::Parser;
use link_fixer::adapters::http;
use link_fixer::config::load_rules;
use link_fixer::core::ConfigProvider;
use link_fixer::utils::error::ErrorSeverity;
use link_fixer::utils::{logger, validation::Validate};
use link_fixer::{CliConfig, DiscordWebhook, LinkFixError, LinkFixService};
use std::sync::Arc;

fn exit_with(e: &LinkFixError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

    let exit_code = match e.severity() {
        ErrorSeverity::Critical => 3,
        _ => 1,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在也沒關係
    dotenvy::dotenv().ok();

    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting link-fixer");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let rules = match load_rules(&config) {
        Ok(rules) => Arc::new(rules),
        Err(e) => exit_with(&e),
    };
    tracing::info!("📝 Supported platforms: {}", rules.platforms().join(", "));

    let relay = DiscordWebhook::new(
        config.webhook_url().map(str::to_string),
        config.webhook_timeout(),
    );
    if relay.url().is_some() {
        tracing::info!("🔗 Discord relay enabled");
    } else {
        tracing::info!("Discord relay disabled (DISCORD_WEBHOOK_URL not set)");
    }

    let service =
        LinkFixService::new(rules, relay).with_default_username(config.default_username());
    let addr = config.socket_addr()?;

    http::serve(addr, http::router(Arc::new(service))).await?;
    Ok(())
}

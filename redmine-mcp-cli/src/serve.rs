//! The `serve` command

use crate::cli::ConnectionArgs;
use crate::error::{CliError, CliResult};
use crate::exit_codes::EXIT_FAILURE;
use redmine_mcp::{Config, McpServer};
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use tokio_util::sync::CancellationToken;

/// Build the connection settings: `.env`, then the environment, then flags
pub fn resolve_config(args: &ConnectionArgs) -> CliResult<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring unreadable .env file: {e}"),
    }

    let config = apply_overrides(Config::from_env(), args);
    config.validate()?;
    Ok(config)
}

/// Apply command line overrides on top of a loaded configuration
pub fn apply_overrides(mut config: Config, args: &ConnectionArgs) -> Config {
    if let Some(url) = &args.url {
        config = config.with_base_url(url.as_str());
    }
    if let Some(key) = &args.api_key {
        config = config.with_api_key(key.as_str());
    }
    if args.insecure {
        config = config.with_tls_verify(false);
    }
    config
}

/// Serve the tracker tools on stdio until the client disconnects or Ctrl-C
pub async fn run_server(args: ConnectionArgs) -> CliResult<()> {
    let config = resolve_config(&args)?;
    let server = McpServer::new(config)?;

    let ct = CancellationToken::new();
    let ct_signal = ct.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!("failed to listen for ctrl+c: {e}"),
        }
        ct_signal.cancel();
    });

    let running = serve_server(server, stdio())
        .await
        .map_err(|e| CliError::new(format!("MCP server error: {e}"), EXIT_FAILURE))?;
    tracing::info!("MCP server started");

    tokio::select! {
        _ = ct.cancelled() => {
            tracing::info!("MCP server stopping");
        }
        quit = running.waiting() => {
            match quit {
                Ok(reason) => tracing::info!("MCP client disconnected: {reason:?}"),
                Err(e) => return Err(CliError::new(format!("MCP server task failed: {e}"), EXIT_FAILURE)),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use redmine_mcp::ConfigError;

    #[test]
    fn test_flags_override_environment() {
        let loaded = Config::new("https://env.example.com", "env-key");
        let args = ConnectionArgs {
            url: Some("https://flag.example.com/".to_string()),
            api_key: None,
            insecure: true,
        };

        let config = apply_overrides(loaded, &args);

        assert_eq!(config.base_url, "https://flag.example.com");
        assert_eq!(config.api_key, "env-key");
        assert!(!config.tls_verify);
    }

    #[test]
    fn test_no_flags_keep_loaded_values() {
        let loaded = Config::new("https://env.example.com", "env-key");
        let config = apply_overrides(loaded.clone(), &ConnectionArgs::default());
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_missing_key_is_a_config_error() {
        let config = apply_overrides(
            Config::default(),
            &ConnectionArgs {
                url: Some("https://redmine.example.com".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(
            config.validate(),
            Err(ConfigError::Missing {
                key: "REDMINE_API_KEY".to_string()
            })
        );
    }
}

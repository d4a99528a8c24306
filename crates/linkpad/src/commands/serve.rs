//! `linkpad serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use linkpad_config::{CliSettings, Config};
use linkpad_server::{run_server, server_config_from_linkpad_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Markdown file to watch and preview.
    #[arg(default_value = "pad.md")]
    file: PathBuf,

    /// Path to configuration file (default: auto-discover linkpad.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long)]
    kroki_url: Option<String>,

    /// Preview theme, light or dark (overrides config).
    #[arg(long)]
    theme: Option<String>,

    /// Quiet period between a save and its render, in milliseconds
    /// (overrides config).
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Share link to seed the document from before serving.
    #[arg(long)]
    from_link: Option<String>,

    /// Overwrite an existing document when seeding from a link.
    #[arg(long, requires = "from_link")]
    force: bool,

    /// Enable verbose output (show render timing and watcher logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        // Build CLI settings from args
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            theme: self.theme,
            debounce_ms: self.debounce_ms,
            kroki_url: self.kroki_url,
        };

        // Load config
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // Print startup info
        output.highlight(&format!("Linkpad v{version}"));
        output.info(&format!("Document: {}", self.file.display()));
        output.info(&format!(
            "Preview: http://{}:{}/",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Theme: {}, debounce: {} ms",
            config.preview.theme, config.preview.debounce_ms
        ));

        if let Some(kroki_url) = &config.diagrams_resolved.kroki_url {
            output.info(&format!("Kroki URL: {kroki_url}"));
        } else {
            output.info("Diagram rendering: disabled (no kroki_url in config)");
        }

        // Build server config and run
        let mut server_config =
            server_config_from_linkpad_config(&config, self.file, version.to_string());
        server_config.from_link = self.from_link;
        server_config.force_seed = self.force;
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}

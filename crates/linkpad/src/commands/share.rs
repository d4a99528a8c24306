//! `linkpad share` command implementation.

use std::path::PathBuf;

use clap::Args;
use linkpad_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the share command.
#[derive(Args)]
pub(crate) struct ShareArgs {
    /// Markdown file to share.
    file: PathBuf,

    /// Base URL for the link (overrides config, default: the local
    /// preview address).
    #[arg(long)]
    base_url: Option<String>,

    /// Path to configuration file (default: auto-discover linkpad.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ShareArgs {
    /// Execute the share command.
    ///
    /// Prints the share link on stdout so it can be piped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is empty.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let text = std::fs::read_to_string(&self.file)?;
        if text.trim().is_empty() {
            return Err(CliError::Validation(format!(
                "{} is empty, nothing to share",
                self.file.display()
            )));
        }

        let config = Config::load(self.config.as_deref(), None)?;
        if self.base_url.is_none() && config.share.base_url.is_none() {
            let output = Output::new();
            output.warning("No share base URL configured, the link points at the local preview");
        }
        let base_url = resolve_base_url(self.base_url, &config);

        println!("{}", linkpad_share::share_url(&base_url, &text));
        Ok(())
    }
}

/// Pick the base URL: flag, then config, then the local preview address.
fn resolve_base_url(flag: Option<String>, config: &Config) -> String {
    flag.or_else(|| config.share.base_url.clone())
        .unwrap_or_else(|| format!("http://{}:{}/", config.server.host, config.server.port))
}

//! `linkpad decode` command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the decode command.
#[derive(Args)]
pub(crate) struct DecodeArgs {
    /// Share link or bare token to decode.
    input: String,

    /// Write the document here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl DecodeArgs {
    /// Execute the decode command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input carries no document or the output
    /// file cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let Some(text) = recover_document(&self.input) else {
            return Err(CliError::Validation(
                "the input carries no document (bad token or missing content parameter)"
                    .to_string(),
            ));
        };

        match self.output {
            Some(path) => {
                std::fs::write(&path, text)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => print!("{text}"),
        }

        Ok(())
    }
}

/// Recover the document from a share link, a bare fragment, or a token.
fn recover_document(input: &str) -> Option<String> {
    linkpad_share::document_from_url(input).or_else(|| linkpad_share::decode(input))
}

// src/config.rs
use crate::convert::MarkdownDialect;
use crate::error::AppError;
use crate::types::{AccessToken, PageId};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Parsed and validated command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Page URL or ID (e.g., "https://www.notion.so/...")
    pub page_input: String,

    /// Output file for the converted document (defaults to stdout)
    #[arg(short, long)]
    pub output_file: Option<String>,

    /// Print the plaintext rendition instead of markdown
    #[arg(long, default_value_t = false)]
    pub plaintext: bool,

    /// Target markdown dialect
    #[arg(long, value_enum, default_value_t = DialectArg::Github)]
    pub dialect: DialectArg,

    /// Retries permitted per request after the initial attempt
    #[arg(long, default_value_t = crate::constants::DEFAULT_RETRY_BUDGET)]
    pub retries: u32,

    /// Overall deadline in seconds; pending retries abort past it
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// CLI-level dialect choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    /// GitHub-flavored markdown (allows raw HTML for underline/toggles)
    Github,
    /// Pure CommonMark (no raw HTML)
    Commonmark,
}

impl std::fmt::Display for DialectArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialectArg::Github => write!(f, "github"),
            DialectArg::Commonmark => write!(f, "commonmark"),
        }
    }
}

impl From<DialectArg> for MarkdownDialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Github => MarkdownDialect::Github,
            DialectArg::Commonmark => MarkdownDialect::CommonMark,
        }
    }
}

/// Resolved converter configuration — validated and ready to run.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    pub page_id: PageId,
    pub token: AccessToken,
    pub dialect: MarkdownDialect,
    pub retry_budget: u32,
    pub deadline: Option<Duration>,
    pub output_file: Option<PathBuf>,
    pub plaintext: bool,
    pub verbose: bool,
}

impl ConverterConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let token_str = std::env::var("NOTION_API_KEY").map_err(|_| {
            AppError::MissingConfiguration(
                "NOTION_API_KEY environment variable not set".to_string(),
            )
        })?;

        let token = AccessToken::new(token_str)?;
        let page_id = PageId::parse(&cli.page_input)?;

        Ok(ConverterConfig {
            page_id,
            token,
            dialect: cli.dialect.into(),
            retry_budget: cli.retries,
            deadline: cli.deadline_secs.map(Duration::from_secs),
            output_file: cli.output_file.map(PathBuf::from),
            plaintext: cli.plaintext,
            verbose: cli.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_mapping() {
        assert_eq!(
            MarkdownDialect::from(DialectArg::Github),
            MarkdownDialect::Github
        );
        assert_eq!(
            MarkdownDialect::from(DialectArg::Commonmark),
            MarkdownDialect::CommonMark
        );
    }
}

// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notiondown::{
    convert_page, ApiClient, CommandLineInput, ConverterConfig, RetryPolicy,
};
use std::fs;
use std::time::Instant;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notiondown.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Fetches, converts, and delivers one page.
async fn run(config: &ConverterConfig) -> anyhow::Result<()> {
    let policy = RetryPolicy {
        max_retries: config.retry_budget,
        ..RetryPolicy::default()
    };

    let mut client = ApiClient::new(&config.token, policy)?;
    if let Some(deadline) = config.deadline {
        client = client.with_deadline(Instant::now() + deadline);
    }

    log::info!("Converting page {}", config.page_id);
    let document = convert_page(&client, &config.page_id, config.dialect).await?;

    let output = if config.plaintext {
        &document.plain_text
    } else {
        &document.markdown
    };

    match &config.output_file {
        Some(path) => {
            fs::write(path, output)
                .with_context(|| format!("writing output to {}", path.display()))?;
            eprintln!("✓ Converted document saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("logging setup failed: {e}"))?;

    let config = ConverterConfig::resolve(cli)?;

    run(&config).await
}

use brightcove_video_report::{Config, load_dotenv, run};
use eyre::Context;
use std::io::IsTerminal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // before the subscriber, so RUST_LOG can come from .env
    let dotenv = load_dotenv();

    // stdout carries the report, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    match dotenv {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "loaded .env file"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "failed to load .env file"),
    }

    let config = Config::from_env();
    let today = jiff::Zoned::now().date();

    let mut stdout = std::io::stdout();
    run(&config, today, &mut stdout)
        .await
        .context("produce Brightcove video report")?;

    Ok(())
}

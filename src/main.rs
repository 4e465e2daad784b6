use anyhow::Result;
use clap::Parser;
use scriv::build::build_site;
use scriv::config::Config;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Builds a static blog from a directory of markdown posts.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The project directory, holding `posts/`, `styles.css` and `index.html`
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Where to write the site [default: <ROOT>/dist]
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = Config::from_directory(&args.root)?;
    if let Some(output) = args.output {
        config = config.with_output_directory(output);
    }

    build_site(&config)?;
    println!("Build complete!");
    Ok(())
}

// Logs go to stderr so stdout carries only the completion message. Verbosity
// follows RUST_LOG and defaults to `info`.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

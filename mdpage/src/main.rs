use std::time::Instant;

use tracing_subscriber::EnvFilter;

use folio::error::Result;

mod config;
mod flags;

use config::Settings;

pub const CONFIG_FILE: &str = "mdpage.toml";

fn run(flags: &flags::Mdpage) -> Result<()> {
    let settings = Settings::discover(flags.config.as_deref())?.merge(flags);
    tracing::debug!(?settings, "resolved settings");

    settings.converter().build(&settings.generator(), &settings.source, &settings.output)?;
    println!("Converted {} to {}", settings.source.display(), settings.output.display());
    Ok(())
}

pub fn main() {
    let flags = flags::Mdpage::from_env_or_exit();

    // `--verbose` forces `info`; otherwise `RUST_LOG`, falling back to `warn`.
    let filter = match flags.verbose {
        true => EnvFilter::new("info"),
        false => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();
    let result = run(&flags);
    tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "finished");

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

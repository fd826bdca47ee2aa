use anyhow::{Context, Result};
use clap::Parser;
use flock_cli::{run, Args};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Flock runner starting...");
    log::info!("World: {}x{}", args.width, args.height);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&args, &mut out).context("Simulation failed")?;

    Ok(())
}

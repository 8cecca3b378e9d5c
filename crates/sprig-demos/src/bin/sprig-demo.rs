//! Play a demo scene against the logging backend.

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use sprig::Config;
use sprig_demos::{LogBackend, Scenario, Scene};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// CLI flags for the demo runner.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Scene to build.
    #[clap(short, long, value_enum, default_value_t = Scenario::Gallery)]
    scenario: Scenario,

    /// JSON configuration file.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Print the tree after the script has run.
    #[clap(short, long)]
    dump: bool,
}

/// Run the demo.
pub fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let backend = LogBackend::new();
    let stats = backend.stats();
    let mut scene = Scene::build(args.scenario, config, Box::new(backend))?;
    scene.play()?;

    if args.dump {
        println!("{}", scene.sprig.dump()?);
    }
    {
        let stats = stats.borrow();
        info!(
            frames = stats.frames,
            commands = stats.commands,
            texts = stats.texts,
            "done"
        );
    }
    scene.sprig.destroy()?;
    Ok(())
}

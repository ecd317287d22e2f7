use std::env;
use std::process;

use anyhow::Result;
use log::*;

use engine::{Engine, EngineConfig};

fn main() {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    if let Err(error) = run() {
        error!("{:#}", error);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = EngineConfig::from_env();
    info!("Starting {} ({}x{}).", config.title, config.width, config.height);

    let engine = Engine::new(config)?;
    engine.run()
}

mod app;
mod config;
mod input;
mod render;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    app::run(config::Args::parse())
}

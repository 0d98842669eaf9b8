mod game;
mod layer;

use anyhow::Result;
use clap::Parser;
use layer::BreakoutLayer;
use mamba_app::{App, AppArgs, AppSpecification};

#[derive(Parser)]
#[command(name = "breakout", about = "Breakout on the Mamba 2D renderer")]
struct Cli {
    #[command(flatten)]
    app: AppArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.app.init_logging();

    let spec = cli
        .app
        .specification(AppSpecification::new("Breakout", 800, 600))?;
    tracing::info!("breakout starting");

    let mut app = App::new(spec);
    app.push_layer(BreakoutLayer::new);
    app.run()?;

    Ok(())
}

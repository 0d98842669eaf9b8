mod button;
mod camera_demo;
mod colors;

use anyhow::Result;
use button::ButtonLayer;
use camera_demo::CameraLayer;
use clap::{Parser, ValueEnum};
use colors::{Color, ColorLayer};
use mamba_app::{App, AppArgs, AppSpecification};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Demo {
    /// Click anywhere to cycle red, green and blue
    Colors,
    /// Click the button to cycle the background layer
    Button,
    /// Pan and zoom over a field of shapes
    Camera,
}

#[derive(Parser)]
#[command(name = "sandbox", about = "Mamba 2D demo layers")]
struct Cli {
    /// Which demo to run
    #[arg(long, value_enum, default_value = "button")]
    demo: Demo,

    #[command(flatten)]
    app: AppArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.app.init_logging();

    let spec = cli
        .app
        .specification(AppSpecification::new("Example", 800, 600))?;
    tracing::info!("sandbox starting with the {:?} demo", cli.demo);

    let mut app = App::new(spec);
    match cli.demo {
        Demo::Colors => {
            app.push_layer(|_| Ok(ColorLayer::cycling(Color::Red)));
        }
        Demo::Button => {
            app.push_layer(ButtonLayer::new);
            app.push_layer(|_| Ok(ColorLayer::new(Color::Red)));
        }
        Demo::Camera => {
            app.push_layer(CameraLayer::new);
        }
    }
    app.run()?;

    Ok(())
}

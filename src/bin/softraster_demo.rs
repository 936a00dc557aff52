//! softraster-demo: render a built-in vector scene to PNG.
//!
//! Run: `softraster-demo --output demo.png --sample-rate 4`

use clap::Parser;
use softraster::prelude::*;
use std::f32::consts::PI;
use std::path::PathBuf;
use std::sync::Arc;

/// Render a demo scene with the software rasterizer
#[derive(Parser, Debug)]
#[command(name = "softraster-demo")]
#[command(version)]
#[command(about = "Render a built-in 2D vector scene to a PNG file", long_about = None)]
struct Cli {
    /// Output PNG path
    #[arg(short, long, default_value = "softraster-demo.png")]
    output: PathBuf,

    /// Target width in pixels
    #[arg(long, default_value = "480")]
    width: u32,

    /// Target height in pixels
    #[arg(long, default_value = "360")]
    height: u32,

    /// Config file path (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured sample rate
    #[arg(short, long)]
    sample_rate: Option<u32>,

    /// Zoom factor around the canvas center (> 1 zooms in)
    #[arg(long, default_value = "1.0")]
    zoom: f32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::new(),
    };

    let scene = demo_scene()?;

    let mut renderer = SoftwareRenderer::new(config);
    if let Some(rate) = cli.sample_rate {
        renderer.set_sample_rate(rate)?;
    }
    renderer.set_render_target(cli.width, cli.height)?;

    let mut viewport = Viewport::for_canvas(scene.width, scene.height)?;
    viewport.update_viewbox(0.0, 0.0, 1.0 / cli.zoom)?;
    renderer.set_viewport(&viewport)?;

    let fb = renderer.render(&scene)?;
    PngEncoder::write_to_file(&fb, &cli.output)?;
    log::info!(
        "rendered {} elements at {}x sampling to {}",
        scene.element_count(),
        renderer.sample_rate(),
        cli.output.display()
    );
    Ok(())
}

fn demo_scene() -> Result<Scene> {
    let mut checker = Vec::with_capacity(64 * 64 * 4);
    for y in 0..64u32 {
        for x in 0..64u32 {
            let on = ((x / 8) + (y / 8)) % 2 == 0;
            checker.extend_from_slice(&if on { [40, 40, 160, 255] } else { [240, 220, 120, 255] });
        }
    }
    let texture = Arc::new(Texture::from_rgba(64, 64, checker)?);

    let star: Vec<Point> = (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { 40.0 } else { 16.0 };
            let a = i as f32 * PI / 5.0 - PI / 2.0;
            Point::new(r * a.cos(), r * a.sin())
        })
        .collect();

    let wave: Vec<Point> = (0..=40)
        .map(|i| {
            let x = i as f32 * 10.0;
            Point::new(x, 20.0 * (x / 30.0).sin())
        })
        .collect();

    Ok(Scene::new(400.0, 300.0)
        .with_element(
            Element::rect(Point::new(20.0, 20.0), Point::new(160.0, 110.0))
                .with_fill(Color::rgb(0.85, 0.2, 0.2))
                .with_stroke(Color::BLACK),
        )
        .with_element(
            Element::rect(Point::new(90.0, 60.0), Point::new(160.0, 110.0))
                .with_fill(Color::rgb(0.2, 0.4, 0.9).with_alpha(0.5)),
        )
        .with_element(
            Element::polygon(star)
                .with_transform(Transform::translate(310.0, 80.0) * Transform::rotate(0.2))
                .with_fill(Color::rgb(1.0, 0.8, 0.1))
                .with_stroke(Color::rgb(0.5, 0.3, 0.0)),
        )
        .with_element(
            Element::polyline(wave)
                .with_transform(Transform::translate(0.0, 230.0))
                .with_stroke(Color::rgb(0.1, 0.5, 0.2)),
        )
        .with_element(Element::group(vec![
            Element::image(Point::new(0.0, 0.0), Point::new(96.0, 96.0), Arc::clone(&texture)),
            Element::image(Point::new(110.0, 30.0), Point::new(24.0, 24.0), texture),
            Element::ellipse(Point::new(170.0, 48.0), Point::new(20.0, 10.0)),
        ])
        .with_transform(Transform::translate(200.0, 150.0) * Transform::scale(1.0, 0.8)))
        .with_element(Element::point(Point::new(200.0, 140.0)).with_fill(Color::RED)))
}

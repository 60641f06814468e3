//! Scripted range session for debugging without a camera: builds a canvas
//! with a synthetic plate target and feeds a few shots through the pipeline.

use anyhow::Result;
use dryfire::{Canvas, DrawableSurface, RangeConfig, RangePipeline, ShotEvent};
use image::{Rgba, RgbaImage};
use range_model::{Region, Shot, ShotColor, Target};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

struct LogSurface;

impl DrawableSurface for LogSurface {
    fn add_marker(&self, shot: &Shot) {
        info!("marker at ({:.0}, {:.0})", shot.x, shot.y);
    }

    fn remove_marker(&self, shot: &Shot) {
        info!("marker removed at ({:.0}, {:.0})", shot.x, shot.y);
    }

    fn set_marker_visible(&self, _shot: &Shot, _visible: bool) {}
}

fn plate_frames() -> Vec<RgbaImage> {
    // Frame 0: standing plate (opaque disc), frame 1: knocked down (mostly
    // transparent).
    let standing = RgbaImage::from_fn(100, 100, |x, y| {
        let dx = x as f64 - 50.0;
        let dy = y as f64 - 50.0;
        if (dx * dx + dy * dy).sqrt() < 45.0 {
            Rgba([200, 200, 210, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    let down = RgbaImage::from_fn(100, 100, |x, y| {
        if y > 85 && x > 10 && x < 90 {
            Rgba([120, 120, 130, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    vec![standing, down]
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dryfire=debug,range_hit=debug".into()),
        )
        .init();

    let config = RangeConfig::load(Path::new("range.json"))?;

    let mut canvas = Canvas::new("sim0", 640.0, 480.0, config, Arc::new(LogSurface));
    canvas.add_target(Target::new(
        "plate.target",
        vec![Region::image(200.0, 150.0, 100.0, 100.0, plate_frames())
            .with_tag("name", "plate_1")
            .with_tag("command", "animate")],
        true,
    ));

    let canvas = Arc::new(Mutex::new(canvas));
    let pipeline = RangePipeline::start(canvas.clone());
    let tx = pipeline.shot_sender();

    // Center hit, corner miss (transparent pixel), and a far miss.
    let script = [
        (250.0, 200.0, 10),
        (205.0, 155.0, 40),
        (500.0, 400.0, 70),
    ];
    for (x, y, frame) in script {
        tx.send(ShotEvent {
            color: ShotColor::Red,
            x,
            y,
            frame,
        })
        .await?;
    }

    tokio::time::sleep(Duration::from_millis(200)).await;

    let status = pipeline.status();
    println!("{}", serde_json::to_string_pretty(&status)?);
    {
        let canvas = canvas.lock().expect("canvas lock");
        info!("shots on canvas: {}", canvas.shots().len());
        let plate = canvas.targets()[0].regions()[0].as_image().expect("plate");
        info!("plate frame after session: {}", plate.frame_index());
    }

    pipeline.stop();
    Ok(())
}

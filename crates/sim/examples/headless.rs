//! Headless demo: drives a session with a scripted pointer drag and the
//! audio fallback frame, writing periodic PPM snapshots.
//!
//! Run with `cargo run --example headless --release`. Frames land in
//! `./headless_out/`.

use std::fs;
use std::io::Write;

use sim::{AudioFrame, FluidSession, SimulationConfig};

const WIDTH: usize = 512;
const HEIGHT: usize = 512;
const FRAMES: usize = 240;
const SNAPSHOT_EVERY: usize = 60;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SimulationConfig {
        palette: "nebula".to_string(),
        ..Default::default()
    };
    let mut session = FluidSession::new(config, WIDTH, HEIGHT)?;
    session.update_with_audio(AudioFrame::FALLBACK);

    fs::create_dir_all("headless_out")?;

    for frame in 0..FRAMES {
        // Circular pointer drag around the center.
        let t = frame as f32 * 0.05;
        let x = WIDTH as f32 * 0.5 + t.cos() * 120.0;
        let y = HEIGHT as f32 * 0.5 + t.sin() * 120.0;
        let dx = -t.sin() * 6.0;
        let dy = t.cos() * 6.0;
        session.add_velocity(x, y, dx, dy);
        if frame % 4 == 0 {
            session.add_density(x, y, "nebula");
        }

        session.step();
        let rgba = session.render();

        if frame % SNAPSHOT_EVERY == 0 {
            write_ppm(&format!("headless_out/frame_{frame:04}.ppm"), rgba)?;
            log::info!("wrote frame {frame}");
        }
    }
    Ok(())
}

fn write_ppm(path: &str, rgba: &[u8]) -> std::io::Result<()> {
    let mut out = Vec::with_capacity(WIDTH * HEIGHT * 3 + 32);
    write!(out, "P6\n{WIDTH} {HEIGHT}\n255\n")?;
    for px in rgba.chunks(4) {
        out.extend_from_slice(&px[..3]);
    }
    fs::write(path, out)
}

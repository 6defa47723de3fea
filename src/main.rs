//! Pinhole Raster: minimal software 3D rasterizer
//!
//! Projects world-space meshes through a translate-only pinhole camera and
//! draws them into a packed RGBA framebuffer, which is uploaded to a
//! texture and shown each frame.
//!
//! Controls: WASD/QE move the camera, hold Left Shift for wireframe,
//! F12 saves a screenshot, Escape quits.
//!
//! Usage: `pinhole-raster [scene.ron]` or `pinhole-raster --write-demo [path]`

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod input;
mod logging;
mod rasterizer;
mod world;

use std::sync::OnceLock;

use macroquad::prelude::*;
use input::FrameInput;
use logging::init_logging;
use rasterizer::Framebuffer;
use world::{load_scene, save_scene, Scene};

const SCREENSHOT_PATH: &str = "screenshot.png";

/// Scene from the first CLI argument, or the built-in demo.
/// `--write-demo [path]` saves the demo scene and exits.
///
/// Loaded once: the window configuration needs it before `main` runs.
fn startup_scene() -> &'static Scene {
    static SCENE: OnceLock<Scene> = OnceLock::new();
    SCENE.get_or_init(|| {
        init_logging(log::LevelFilter::Info);

        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.first().map(String::as_str) == Some("--write-demo") {
            let path = args.get(1).map(String::as_str).unwrap_or("demo.ron");
            let code = match save_scene(&Scene::demo(), path) {
                Ok(()) => {
                    log::info!("Wrote demo scene to {}", path);
                    0
                }
                Err(e) => {
                    log::error!("Failed to write {}: {}", path, e);
                    1
                }
            };
            std::process::exit(code);
        }

        match args.into_iter().next() {
            Some(path) => match load_scene(&path) {
                Ok(scene) => {
                    log::info!("Loaded scene {}", path);
                    scene
                }
                Err(e) => {
                    log::error!("Failed to load {}: {}, using demo scene", path, e);
                    Scene::demo()
                }
            },
            None => Scene::demo(),
        }
    })
}

fn window_conf() -> Conf {
    let scene = startup_scene();
    let zoom = scene.window.zoom.max(1.0);
    Conf {
        window_title: format!("{} - Pinhole Raster v{}", scene.window.title, VERSION),
        window_width: (scene.camera.width as f32 * zoom) as i32,
        window_height: (scene.camera.height as f32 * zoom) as i32,
        window_resizable: true,
        ..Default::default()
    }
}

/// Upload the framebuffer and draw it over the whole window
fn present(fb: &Framebuffer) {
    clear_background(BLACK);

    // Camera::new caps both sides at u16::MAX
    let texture = Texture2D::from_rgba8(fb.width() as u16, fb.height() as u16, &fb.to_rgba8());
    texture.set_filter(FilterMode::Nearest);

    draw_texture_ex(
        &texture,
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(screen_width(), screen_height())),
            ..Default::default()
        },
    );
}

#[macroquad::main(window_conf)]
async fn main() {
    let scene = startup_scene();

    let mut camera = match scene.build_camera() {
        Ok(camera) => camera,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };
    let mut meshes = match scene.build_meshes() {
        Ok(meshes) => meshes,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };
    let configured_wireframe: Vec<bool> = meshes.iter().map(|m| m.wireframe).collect();

    log::info!("=== Pinhole Raster v{} ===", VERSION);

    loop {
        let input = FrameInput::poll();
        if input.quit {
            break;
        }

        camera.translate(input.movement(scene.move_speed));
        for (mesh, configured) in meshes.iter_mut().zip(&configured_wireframe) {
            mesh.wireframe = *configured || input.wireframe;
        }

        camera.clear();
        for mesh in &meshes {
            let stats = camera.render(mesh);
            if stats.skipped > 0 {
                log::trace!("{} triangles skipped", stats.skipped);
            }
        }

        if input.screenshot {
            match camera.framebuffer().save_png(SCREENSHOT_PATH) {
                Ok(()) => log::info!("Saved {}", SCREENSHOT_PATH),
                Err(e) => log::warn!("Failed to save {}: {}", SCREENSHOT_PATH, e),
            }
        }

        present(camera.framebuffer());
        next_frame().await
    }
}

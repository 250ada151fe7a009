use std::collections::HashSet;

use glam::{Vec2, Vec3, Vec4};
use glow::HasContext;
use sdl2::keyboard::Keycode;

use glyphquad::abs::App;
use glyphquad::config::DemoConfig;
use glyphquad::cube::Cube;
use glyphquad::error::Result;
use glyphquad::logging;
use glyphquad::text::{FontAtlas, TextRenderer};

const CONFIG_PATH: &str = "glyphquad.json";
/// Degrees per frame while a rotation key is held.
const ROTATION_SPEED: f32 = 1.0;

fn main() {
    if let Err(e) = logging::init(log::LevelFilter::Info) {
        eprintln!("failed to install logger: {e}");
    }
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = DemoConfig::load(CONFIG_PATH)?;
    let mut app = App::new("Font and Cube", config.window_width, config.window_height)?;

    unsafe {
        app.gl.enable(glow::BLEND);
        app.gl
            .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        app.gl.enable(glow::DEPTH_TEST);
        log::info!(
            "OpenGL loaded: version {}",
            app.gl.get_parameter_string(glow::VERSION)
        );
    }

    let atlas = FontAtlas::from_file(
        &app.gl,
        &config.font_path,
        config.font_size,
        app.content_scale(),
    )?;
    let text_renderer = TextRenderer::new(&app.gl)?;
    let cube = Cube::new(&app.gl, &config.cube_texture_path)?;

    let [red, green, blue, alpha] = config.clear_color;
    let white = Vec4::ONE;
    let mut rotation = Vec3::ZERO;
    let mut held: HashSet<Keycode> = HashSet::new();
    let mut minimized = false;

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                sdl2::event::Event::Quit { .. } => break 'running,
                sdl2::event::Event::Window { win_event, .. } => match win_event {
                    sdl2::event::WindowEvent::Close => break 'running,
                    sdl2::event::WindowEvent::Resized(width, height) => unsafe {
                        app.gl.viewport(0, 0, width, height);
                    },
                    sdl2::event::WindowEvent::Minimized => minimized = true,
                    sdl2::event::WindowEvent::Restored => minimized = false,
                    _ => {}
                },
                sdl2::event::Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => {
                    held.insert(keycode);
                }
                sdl2::event::Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    held.remove(&keycode);
                }
                _ => {}
            }
        }

        if minimized {
            std::thread::sleep(std::time::Duration::from_millis(10));
            continue;
        }

        if held.contains(&Keycode::Q) {
            rotation.x += ROTATION_SPEED;
        }
        if held.contains(&Keycode::A) {
            rotation.x -= ROTATION_SPEED;
        }
        if held.contains(&Keycode::W) {
            rotation.y += ROTATION_SPEED;
        }
        if held.contains(&Keycode::S) {
            rotation.y -= ROTATION_SPEED;
        }
        if held.contains(&Keycode::E) {
            rotation.z += ROTATION_SPEED;
        }
        if held.contains(&Keycode::D) {
            rotation.z -= ROTATION_SPEED;
        }

        let viewport = app.viewport();
        unsafe {
            app.gl.clear_color(red, green, blue, alpha);
            app.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        cube.draw(rotation, viewport);

        let mut pen = Vec2::new(25.0, 150.0);
        text_renderer.draw(
            &atlas,
            "Hello World! QWEASD to spin",
            &mut pen,
            viewport,
            white,
        )?;

        app.window.gl_swap_window();
    }

    Ok(())
}

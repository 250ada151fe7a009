use std::time::Instant;

use glam::{Vec2, Vec4};
use glow::HasContext;

use glyphquad::abs::App;
use glyphquad::config::DemoConfig;
use glyphquad::error::Result;
use glyphquad::logging;
use glyphquad::text::{FontAtlas, TextRenderer};

const CONFIG_PATH: &str = "glyphquad.json";

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
    let mut app = App::new("Glyphquad Text", config.window_width, config.window_height)?;

    unsafe {
        app.gl.enable(glow::BLEND);
        app.gl
            .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
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
    let renderer = TextRenderer::new(&app.gl)?;

    let [red, green, blue, alpha] = config.clear_color;
    let white = Vec4::ONE;
    let mut minimized = false;
    let mut frames_in_window = 0u32;
    let mut window_elapsed = 0.0f32;
    let mut fps = 0.0f32;
    let mut last_frame_time = Instant::now();

    'running: loop {
        let now = Instant::now();
        let delta_time = now.duration_since(last_frame_time).as_secs_f32();
        last_frame_time = now;

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
                _ => {}
            }
        }

        if minimized {
            std::thread::sleep(std::time::Duration::from_millis(10));
            continue;
        }

        frames_in_window += 1;
        window_elapsed += delta_time;
        if window_elapsed >= 0.5 {
            fps = frames_in_window as f32 / window_elapsed;
            frames_in_window = 0;
            window_elapsed = 0.0;
        }

        let viewport = app.viewport();
        unsafe {
            app.gl.clear_color(red, green, blue, alpha);
            app.gl.clear(glow::COLOR_BUFFER_BIT);
        }

        // Two calls on one baseline; the pen carries the advance across them.
        let mut pen = Vec2::new(100.0, 100.0);
        renderer.draw(&atlas, "Hello, ", &mut pen, viewport, white)?;
        renderer.draw(&atlas, "World!", &mut pen, viewport, white)?;

        let mut fps_pen = Vec2::new(100.0, 100.0 + atlas.metrics().line_height());
        renderer.draw(
            &atlas,
            &format!("{fps:.1} FPS"),
            &mut fps_pen,
            viewport,
            white,
        )?;

        app.window.gl_swap_window();
    }

    Ok(())
}

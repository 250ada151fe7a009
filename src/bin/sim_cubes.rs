use std::time::Instant;

use glam::{Mat4, Vec2, Vec3, Vec4};
use glow::HasContext;
use hecs::World;

use glyphquad::abs::App;
use glyphquad::config::DemoConfig;
use glyphquad::cube::{self, Cube};
use glyphquad::error::Result;
use glyphquad::logging;
use glyphquad::sim::{self, Name, Parent, Position, Spin, Transform, Velocity};
use glyphquad::text::{FontAtlas, TextRenderer};

const CONFIG_PATH: &str = "glyphquad.json";
const CAMERA_POS: Vec3 = Vec3::new(0.0, 0.0, 5.0);

fn main() {
    if let Err(e) = logging::init(log::LevelFilter::Info) {
        eprintln!("failed to install logger: {e}");
    }
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn spawn_world(world: &mut World, satellite_count: u32) {
    let parent = world.spawn((
        Name("ParentCube".to_string()),
        Transform::default(),
        Spin(Vec3::new(0.0, 30.0, 0.0)),
    ));
    world.spawn((
        Name("ChildCube".to_string()),
        Transform {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: Vec3::new(0.0, 45.0, 0.0),
            ..Transform::default()
        },
        Parent(parent),
    ));

    for i in 0..satellite_count {
        let position = Vec3::new(
            rand::random_range(-2.0..2.0),
            rand::random_range(-1.5..1.5),
            rand::random_range(-1.0..1.0),
        );
        let spin = Vec3::new(
            rand::random_range(-90.0..90.0),
            rand::random_range(-90.0..90.0),
            rand::random_range(-90.0..90.0),
        );
        world.spawn((
            Name(format!("Satellite{i}")),
            Transform {
                position,
                scale: Vec3::splat(0.3),
                ..Transform::default()
            },
            Spin(spin),
            Parent(parent),
        ));
    }

    // Drifts off-screen; only its logged position matters.
    world.spawn((
        Name("Bob".to_string()),
        Position(Vec2::new(10.0, 20.0)),
        Velocity(Vec2::new(1.0, 2.0)),
    ));

    for (_, name) in world.query_mut::<&Name>() {
        log::info!("spawned {}", name.0);
    }
}

fn run() -> Result<()> {
    let config = DemoConfig::load(CONFIG_PATH)?;
    let mut app = App::new("Cube Hierarchy", config.window_width, config.window_height)?;

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

    let mut world = World::new();
    spawn_world(&mut world, config.sim_cube_count);

    let [red, green, blue, alpha] = config.clear_color;
    let white = Vec4::ONE;
    let mut minimized = false;
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

        sim::advance_spins(&mut world, delta_time);
        sim::advance_positions(&mut world, delta_time);

        let viewport = app.viewport();
        unsafe {
            app.gl.clear_color(red, green, blue, alpha);
            app.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        let view = Mat4::look_at_rh(CAMERA_POS, Vec3::ZERO, Vec3::Y);
        let projection = cube::projection_matrix(viewport);
        let drawable: Vec<hecs::Entity> = world
            .query_mut::<&Transform>()
            .into_iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in drawable {
            cube.draw_with(sim::world_matrix(&world, entity), view, projection);
        }

        let mut pen = Vec2::new(100.0, 100.0);
        text_renderer.draw(&atlas, "Hello, World!", &mut pen, viewport, white)?;

        // One HUD line per moving entity; full positions go to the debug log.
        let line_height = atlas.metrics().line_height();
        let mut line_y = 100.0 + line_height;
        for (_, (name, position)) in world.query_mut::<(&Name, &Position)>() {
            log::debug!(
                "{} moved to ({:.2}, {:.2})",
                name.0,
                position.0.x,
                position.0.y
            );
            let mut pen = Vec2::new(100.0, line_y);
            text_renderer.draw(
                &atlas,
                &format!("{} ({:.2}, {:.2})", name.0, position.0.x, position.0.y),
                &mut pen,
                viewport,
                white,
            )?;
            line_y += line_height;
        }

        app.window.gl_swap_window();
    }

    Ok(())
}

//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

use crate::error::{Error, Result};

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
///
/// All GPU-owning types in this crate share the [`App`]'s `Arc<glow::Context>`;
/// the context is only ever touched from the thread that created it.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
    content_scale: f32,
}

impl App {
    /// Creates a new [`App`] with the specified title and size, a GL 3.3 core
    /// context current on the calling thread, and vsync enabled.
    ///
    /// The requested size is multiplied by the display content scale so the
    /// window covers the same physical area on high-density displays.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let sdl = sdl2::init().map_err(Error::sdl)?;
        let video_subsystem = sdl.video().map_err(Error::sdl)?;

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);

        let content_scale = video_subsystem
            .display_dpi(0)
            .map(|(ddpi, _, _)| (ddpi / 96.0).max(1.0))
            .unwrap_or(1.0);

        let window = video_subsystem
            .window(
                title,
                (width as f32 * content_scale) as u32,
                (height as f32 * content_scale) as u32,
            )
            .opengl()
            .resizable()
            .position_centered()
            .build()
            .map_err(Error::sdl)?;

        let gl_context = window.gl_create_context().map_err(Error::sdl)?;
        window.gl_make_current(&gl_context).map_err(Error::sdl)?;

        if let Err(e) = video_subsystem.gl_set_swap_interval(sdl2::video::SwapInterval::VSync) {
            log::warn!("vsync unavailable, continuing without: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump().map_err(Error::sdl)?;
        let gl = Arc::new(gl);

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl,
            event_pump,
            content_scale,
        })
    }

    /// The display content scale the window was created with.
    pub fn content_scale(&self) -> f32 {
        self.content_scale
    }

    /// Current window size in pixels.
    pub fn viewport(&self) -> (u32, u32) {
        self.window.size()
    }
}

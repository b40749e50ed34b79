use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Instant;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::NativeGl;

use crate::config::WindowConfig;
use crate::demos::{Demo, DemoError};
use crate::window::{DemoEvent, Dispatch, Key, KeyState, WindowState};

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    demo: Box<dyn Demo>,
    state: WindowState,
    renderer: GlRenderer,
}

impl App {
    pub fn new(config: &WindowConfig, mut demo: Box<dyn Demo>) -> Result<Self, AppError> {
        let title = config.title.as_deref().unwrap_or(demo.title());

        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                config.width,
                config.height,
            )))
            .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
            .with_resizable(true)
            .with_visible(false)
            .with_title(title);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        let (window, gl_config) = display_builder
            // glutin returns BadConfig before calling the picker when nothing
            // matches the template, so the iterator is never empty
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|best, c| {
                        if c.num_samples() > best.num_samples() {
                            c
                        } else {
                            best
                        }
                    })
                    .expect("glutin yields at least one config")
            })
            .map_err(|e| AppError::Display(e.to_string()))?;

        let window = window.ok_or(AppError::NoWindow)?;
        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr) }?
            .make_current(&gl_window.surface)?;

        gl::load_with(|s| match CString::new(s) {
            Ok(s) => gl_display.get_proc_address(s.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_window.surface.set_swap_interval(&gl_context, interval) {
            log::warn!("could not set swap interval: {e}");
        }

        // the context was made current on this thread above
        let gl = unsafe { NativeGl::current() };
        demo.init(&gl)?;

        let (width, height): (u32, u32) = gl_window.window.inner_size().into();
        let renderer = GlRenderer::new();
        renderer.resize(width, height);

        gl_window.window.set_visible(true);
        log::info!("{title}: {width}x{height}, vsync {}", config.vsync);

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            demo,
            state: WindowState::new(width, height),
            renderer,
        })
    }

    pub fn run(self) -> ! {
        let Self {
            event_loop,
            gl_context,
            gl_window,
            mut demo,
            mut state,
            mut renderer,
        } = self;

        let start = Instant::now();

        event_loop.run(move |event, _window_target, control_flow| {
            *control_flow = ControlFlow::Poll;

            let demo_event = match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(size) => Some(DemoEvent::Resized {
                        width: size.width,
                        height: size.height,
                    }),
                    WindowEvent::KeyboardInput { input, .. } => Some(DemoEvent::Key {
                        key: translate_key(input.virtual_keycode),
                        state: match input.state {
                            ElementState::Pressed => KeyState::Pressed,
                            ElementState::Released => KeyState::Released,
                        },
                    }),
                    WindowEvent::CloseRequested => Some(DemoEvent::CloseRequested),
                    _ => None,
                },
                Event::MainEventsCleared => {
                    gl_window.window.request_redraw();
                    None
                }
                Event::RedrawRequested(_) => {
                    let [r, g, b, a] = demo.clear_color();
                    renderer.clear_color(r, g, b, a);
                    demo.render(&mut renderer, start.elapsed());

                    if let Err(e) = gl_window.surface.swap_buffers(&gl_context) {
                        log::error!("could not swap buffers: {e}");
                        control_flow.set_exit();
                    }
                    None
                }
                Event::LoopDestroyed => {
                    demo.release();
                    log::debug!("demo resources released");
                    None
                }
                _ => None,
            };

            let Some(demo_event) = demo_event else {
                return;
            };

            match state.dispatch(demo_event, demo.as_mut()) {
                Dispatch::Resized { width, height } => {
                    if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height))
                    {
                        gl_window.surface.resize(&gl_context, w, h);
                    }
                    renderer.resize(width, height);
                }
                Dispatch::Close => {
                    log::info!("closing window");
                    control_flow.set_exit();
                }
                Dispatch::Forwarded | Dispatch::Ignored => {}
            }
        })
    }
}

fn translate_key(code: Option<VirtualKeyCode>) -> Key {
    match code {
        Some(VirtualKeyCode::Escape) => Key::Escape,
        Some(VirtualKeyCode::Up) => Key::Up,
        Some(VirtualKeyCode::Down) => Key::Down,
        _ => Key::Other,
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let (width, height) = match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(AppError::ZeroSizedWindow),
        };
        let attrs =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(raw_window_handle, width, height);

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not create display: {0}")]
    Display(String),
    #[error("display builder did not create a window")]
    NoWindow,
    #[error("window has a zero size")]
    ZeroSizedWindow,
    #[error("GL error: {0}")]
    Gl(#[from] glutin::error::Error),
    #[error(transparent)]
    Demo(#[from] DemoError),
}

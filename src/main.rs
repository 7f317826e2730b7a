use linklabel::config::Config;
use linklabel::font;
use linklabel::renderer::{Palette, Renderer};
use linklabel::{Error, LinkLabel, SystemOpener};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{CursorIcon, WindowBuilder};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        error!("linklabel failed to start: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let config = Config::load()?;
    let alignment = config.alignment()?;
    let line_break = config.line_break()?;

    let (font, font_path) = font::load_label_font(config.font.path.as_deref())?;
    info!(path = %font_path.display(), "font loaded");

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("linklabel")
        .with_inner_size(LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
        .with_resizable(true)
        .build(&event_loop)?;

    let palette = Palette {
        background: config.background(),
        foreground: config.foreground(),
        link: config.link_color(),
    };
    let scale = window.scale_factor() as f32;
    let mut renderer = Renderer::new(font, config.font.size * scale, palette);

    let size = window.inner_size();
    let bounds = renderer.label_bounds_for_pixels(size.width as usize, size.height as usize);
    let matcher = config.matcher()?.build();
    let mut label = LinkLabel::with_matcher(config.label.text.clone(), bounds, Some(matcher));
    label.config.alignment = alignment;
    label.config.line_break = line_break;
    label.config.max_lines = config.label.max_lines;
    info!(
        links = label.styled_text().links().count(),
        "label ready"
    );

    let context = unsafe { softbuffer::Context::new(&window) }
        .map_err(|e| Error::Surface(format!("context: {e}")))?;
    let mut surface = unsafe { softbuffer::Surface::new(&context, &window) }
        .map_err(|e| Error::Surface(format!("surface: {e}")))?;

    let mut opener = SystemOpener;
    let mut mouse_pos = PhysicalPosition::new(0.0f64, 0.0f64);
    let mut hovering_link = false;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::Resized(new_size) => {
                    label.set_bounds(renderer.label_bounds_for_pixels(
                        new_size.width as usize,
                        new_size.height as usize,
                    ));
                    window.request_redraw();
                }
                WindowEvent::ScaleFactorChanged {
                    scale_factor,
                    new_inner_size,
                } => {
                    renderer.set_font_size(config.font.size * scale_factor as f32);
                    label.set_bounds(renderer.label_bounds_for_pixels(
                        new_inner_size.width as usize,
                        new_inner_size.height as usize,
                    ));
                    window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    mouse_pos = position;
                    let point = renderer.to_label_point(position.x, position.y);
                    let over_link = label.link_at(point, &renderer.font).is_some();
                    if over_link != hovering_link {
                        hovering_link = over_link;
                        window.set_cursor_icon(if over_link {
                            CursorIcon::Hand
                        } else {
                            CursorIcon::Default
                        });
                    }
                }
                WindowEvent::MouseInput {
                    state: ElementState::Released,
                    button: MouseButton::Left,
                    ..
                } => {
                    let point = renderer.to_label_point(mouse_pos.x, mouse_pos.y);
                    label.tap(point, &renderer.font, &mut opener);
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let size = window.inner_size();
                let (w_nz, h_nz) = Renderer::nonzero_dims(size.width, size.height);
                if let Err(e) = surface.resize(w_nz, h_nz) {
                    error!("surface resize failed: {e}");
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                renderer.render(&label, size.width as usize, size.height as usize);

                match surface.buffer_mut() {
                    Ok(mut buffer) => {
                        if buffer.len() == renderer.canvas.pixels.len() {
                            buffer.copy_from_slice(&renderer.canvas.pixels);
                        } else {
                            for (dst, src) in buffer
                                .iter_mut()
                                .zip(renderer.canvas.pixels.iter().copied())
                            {
                                *dst = src;
                            }
                        }
                        if let Err(e) = buffer.present() {
                            error!("present failed: {e}");
                            *control_flow = ControlFlow::Exit;
                        }
                    }
                    Err(e) => {
                        error!("failed to get draw buffer: {e}");
                        *control_flow = ControlFlow::Exit;
                    }
                }
            }
            _ => {}
        }
    });
}

mod config;
mod frame;
mod render;
mod targets;
mod textures;

use glam::Vec2;
use winit::{event::*, event_loop::EventLoop, window::CursorIcon, window::WindowBuilder};

use bubble_core::{arm_entrances, generate_with, Camera, CameraController, CursorVariant, Hover};

use crate::frame::{FieldEvent, FrameContext};
use crate::textures::TextureLoader;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cfg = config::load_or_default();
    config::ensure_saved(&cfg);
    let mode = cfg.mode.into();
    let projects = cfg.projects();
    let params = cfg.layout_params();
    let mut bubbles = generate_with(mode, cfg.bubble_count, &projects, cfg.seed, &params);
    log::info!(
        "[layout] mode={:?} seed={} placed {} bubbles ({} content)",
        mode,
        cfg.seed,
        bubbles.len(),
        bubbles.iter().filter(|b| b.project.is_some()).count()
    );
    if cfg.entrance_enabled {
        arm_entrances(&mut bubbles, cfg.entrance_delay_sec, cfg.seed.wrapping_add(7919));
    }

    let event_loop = EventLoop::new().expect("event loop");
    let window = WindowBuilder::new()
        .with_title("Bubble Field")
        .with_transparent(cfg.transparent_background)
        .build(&event_loop)
        .expect("window");

    let gpu = pollster::block_on(render::GpuState::new(
        &window,
        cfg.refraction_enabled,
        cfg.transparent_background,
    ))
    .expect("gpu");
    if !gpu.refraction_active() {
        log::info!("[gpu] refraction off, glass bubbles use flat tint");
    }

    let size = window.inner_size();
    let camera = Camera::new(size.width.max(1) as f32 / size.height.max(1) as f32);
    let controller = CameraController::new(cfg.zoom_speed, cfg.rotate_speed);
    let hover = Hover::new(cfg.touch_only);
    let loader = TextureLoader::spawn();

    let mut ctx = FrameContext::new(gpu, bubbles, camera, controller, hover, loader);
    ctx.resize(size.width.max(1), size.height.max(1));

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => ctx.resize(size.width, size.height),
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => elwt.exit(),
            Event::WindowEvent {
                event: WindowEvent::CursorMoved { position, .. },
                ..
            } => ctx.pointer_moved(Vec2::new(position.x as f32, position.y as f32)),
            Event::WindowEvent {
                event:
                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => ctx.pointer_pressed(),
                ElementState::Released => ctx.pointer_released(),
            },
            Event::WindowEvent {
                event: WindowEvent::MouseWheel { delta, .. },
                ..
            } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 60.0,
                };
                ctx.scroll(steps);
            }
            Event::AboutToWait => {
                match ctx.frame() {
                    Ok(_) => ctx.gpu.window.request_redraw(),
                    Err(wgpu::SurfaceError::Lost) => {
                        let size = ctx.gpu.window.inner_size();
                        ctx.resize(size.width, size.height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                    Err(_) => {}
                }
                for ev in ctx.take_events() {
                    match ev {
                        FieldEvent::Navigate(uri) => log::info!("[nav] route to {uri}"),
                        FieldEvent::OpenDetail(p) => {
                            log::info!("[detail] open project '{}' ({})", p.title, p.id)
                        }
                        FieldEvent::Cursor(cursor) => {
                            let icon = match cursor.variant {
                                CursorVariant::Default => CursorIcon::Default,
                                CursorVariant::View | CursorVariant::Label => CursorIcon::Pointer,
                            };
                            ctx.gpu.window.set_cursor_icon(icon);
                            if let Some(label) = &cursor.label {
                                log::debug!("[cursor] label '{label}'");
                            }
                        }
                    }
                }
            }
            _ => {}
        })
        .unwrap();
}

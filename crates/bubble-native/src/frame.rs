use glam::{Vec2, Vec4};
use std::time::Instant;

use bubble_core::{
    click_action, pick, Bubble, BubbleId, Camera, CameraController, ClickAction, CursorState,
    Hover, PressTracker, VisualRole, GLASS_TINT_STRENGTH, HOVER_BRIGHTEN, SCENE_EXTENT,
};

use crate::render::{FrameBubble, GpuState, RecordMaterial};
use crate::textures::TextureLoader;

/// What the field asks of its host this frame.
#[derive(Clone, Debug)]
pub enum FieldEvent {
    Navigate(String),
    OpenDetail(bubble_core::Project),
    Cursor(CursorState),
}

/// Owns everything the per-refresh callback touches. One `frame()` call
/// advances animation, resolves hover, drains texture loads, updates the
/// camera dynamics and runs both compositor passes.
pub struct FrameContext<'w> {
    pub gpu: GpuState<'w>,
    pub bubbles: Vec<Bubble>,
    pub camera: Camera,
    pub controller: CameraController,
    pub hover: Hover,
    pub press: PressTracker,
    pub loader: TextureLoader,

    pointer: Vec2,
    pointer_valid: bool,
    last_frame: Instant,
    time: f32,
    events: Vec<FieldEvent>,
}

impl<'w> FrameContext<'w> {
    pub fn new(
        mut gpu: GpuState<'w>,
        bubbles: Vec<Bubble>,
        camera: Camera,
        controller: CameraController,
        hover: Hover,
        loader: TextureLoader,
    ) -> Self {
        for (slot, b) in bubbles.iter().enumerate() {
            if b.refractive {
                gpu.register_refractive(slot);
            }
            if let Some(p) = &b.project {
                loader.request(slot, &p.thumbnail_url, false);
                if let Some(hover_url) = &p.hover_thumbnail_url {
                    loader.request(slot, hover_url, true);
                }
            }
        }
        Self {
            gpu,
            bubbles,
            camera,
            controller,
            hover,
            press: PressTracker::default(),
            loader,
            pointer: Vec2::ZERO,
            pointer_valid: false,
            last_frame: Instant::now(),
            time: 0.0,
            events: Vec::new(),
        }
    }

    pub fn take_events(&mut self) -> Vec<FieldEvent> {
        std::mem::take(&mut self.events)
    }

    fn viewport(&self) -> Vec2 {
        let size = self.gpu.window.inner_size();
        Vec2::new(size.width.max(1) as f32, size.height.max(1) as f32)
    }

    fn slot_of(&self, id: &BubbleId) -> Option<usize> {
        self.bubbles.iter().position(|b| &b.id == id)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.camera.aspect = width.max(1) as f32 / height.max(1) as f32;
        self.controller.auto_fit(&mut self.camera, SCENE_EXTENT);
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        let delta = position - self.pointer;
        self.pointer = position;
        self.pointer_valid = true;
        if self.press.is_down() {
            self.press.motion(position);
            if self.press.is_drag() {
                self.controller.mark_user_interaction();
                let speed = self.controller.frame_rotate_speed();
                self.controller
                    .orbit(&mut self.camera, -delta.x * speed, -delta.y * speed);
            }
        }
    }

    pub fn pointer_pressed(&mut self) {
        self.press.begin(self.pointer);
    }

    /// Release ends either a drag (ignored) or a click, which routes to
    /// navigation or the detail callback.
    pub fn pointer_released(&mut self) {
        if !self.press.finish() {
            return;
        }
        let Some(i) = pick(
            &self.camera,
            &self.bubbles,
            self.pointer,
            self.viewport(),
            self.time,
        ) else {
            return;
        };
        match click_action(&self.bubbles[i]) {
            Some(ClickAction::Navigate(uri)) => self.events.push(FieldEvent::Navigate(uri)),
            Some(ClickAction::OpenDetail(p)) => self.events.push(FieldEvent::OpenDetail(p)),
            None => {}
        }
    }

    pub fn scroll(&mut self, steps: f32) {
        let amount = steps * self.controller.frame_zoom_speed();
        self.controller.zoom(&mut self.camera, amount);
    }

    fn resolve_hover(&mut self) {
        if !self.pointer_valid {
            return;
        }
        let picked = pick(
            &self.camera,
            &self.bubbles,
            self.pointer,
            self.viewport(),
            self.time,
        )
        .filter(|&i| self.bubbles[i].is_interactive());

        let current = self.hover.hovered().cloned();
        let picked_id = picked.map(|i| self.bubbles[i].id.clone());
        if picked_id == current {
            return;
        }
        if let Some(old) = current {
            if let Some(cursor) = self.hover.pointer_leave(&old) {
                self.events.push(FieldEvent::Cursor(cursor));
            }
        }
        if let Some(i) = picked {
            if let Some(cursor) = self.hover.pointer_enter(&self.bubbles[i]) {
                self.events.push(FieldEvent::Cursor(cursor));
            }
        }
    }

    fn build_records(&self) -> Vec<FrameBubble> {
        let hovered_slot = self.hover.hovered().and_then(|id| self.slot_of(id));
        self.bubbles
            .iter()
            .enumerate()
            .map(|(slot, b)| {
                let hovered = hovered_slot == Some(slot);
                let highlight = if hovered { HOVER_BRIGHTEN } else { 0.0 };
                let opacity = b.anim.opacity();
                let (material, color) = match b.role {
                    VisualRole::SolidLandmark => {
                        (RecordMaterial::Solid, Vec4::from((b.color, 1.0)))
                    }
                    VisualRole::ImageThumbnail => (
                        RecordMaterial::Thumbnail { hover: hovered },
                        Vec4::from((b.color, 1.0)),
                    ),
                    VisualRole::GlassFiller => (
                        RecordMaterial::Glass,
                        Vec4::from((b.color, GLASS_TINT_STRENGTH)),
                    ),
                };
                FrameBubble {
                    slot,
                    position: b.anim.position(self.time),
                    radius: b.radius,
                    color,
                    soft_edge: if b.gradient_masked { 1.0 } else { 0.0 },
                    highlight,
                    opacity,
                    material,
                }
            })
            .collect()
    }

    pub fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.25);
        self.last_frame = now;
        self.time += dt;

        for b in &mut self.bubbles {
            b.anim.advance(dt);
        }

        self.resolve_hover();

        for loaded in self.loader.drain() {
            if loaded.slot < self.bubbles.len() {
                self.gpu.upload_thumbnail(
                    loaded.slot,
                    loaded.hover,
                    loaded.width,
                    loaded.height,
                    &loaded.rgba,
                );
            }
        }

        self.controller.update_dynamics(&self.camera, &self.bubbles);

        let records = self.build_records();
        self.gpu.render(&records, &self.camera, self.time)
    }
}

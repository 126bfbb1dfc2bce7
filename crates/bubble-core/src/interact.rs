use glam::{Mat4, Vec2, Vec3, Vec4};
use smallvec::SmallVec;

use crate::bubble::{Bubble, BubbleId, Project};
use crate::camera::Camera;
use crate::constants::CLICK_DRAG_THRESHOLD_PX;

/// Cursor affordance surfaced to the host's cursor presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum CursorVariant {
    #[default]
    Default,
    /// Generic "open this" affordance over a content thumbnail.
    View,
    /// Labelled affordance over a landmark; the text is the bubble's label.
    Label,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CursorState {
    pub variant: CursorVariant,
    pub label: Option<String>,
}

/// What a resolved click asks the host to do.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickAction {
    Navigate(String),
    OpenDetail(Project),
}

/// Single owner of the hovered-bubble id and cursor state for the whole
/// field. Bubbles never hold their own hovered flag.
#[derive(Clone, Debug)]
pub struct Hover {
    hovered: Option<BubbleId>,
    cursor: CursorState,
    touch_only: bool,
}

impl Hover {
    pub fn new(touch_only: bool) -> Self {
        Self {
            hovered: None,
            cursor: CursorState::default(),
            touch_only,
        }
    }

    pub fn hovered(&self) -> Option<&BubbleId> {
        self.hovered.as_ref()
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    /// Record a pointer-enter. Returns the new cursor state when it changed.
    /// Touch-only devices suppress hover semantics entirely.
    pub fn pointer_enter(&mut self, bubble: &Bubble) -> Option<CursorState> {
        if self.touch_only {
            return None;
        }
        self.hovered = Some(bubble.id.clone());
        let next = cursor_for(bubble);
        if next == self.cursor {
            return None;
        }
        self.cursor = next.clone();
        Some(next)
    }

    /// Record a pointer-leave. A stale leave from a bubble that is no
    /// longer the recorded one is a no-op.
    pub fn pointer_leave(&mut self, id: &BubbleId) -> Option<CursorState> {
        if self.hovered.as_ref() != Some(id) {
            return None;
        }
        self.hovered = None;
        self.cursor = CursorState::default();
        Some(self.cursor.clone())
    }
}

fn cursor_for(bubble: &Bubble) -> CursorState {
    match (&bubble.label, &bubble.project) {
        (Some(label), _) => CursorState {
            variant: CursorVariant::Label,
            label: Some(label.clone()),
        },
        (None, Some(_)) => CursorState {
            variant: CursorVariant::View,
            label: None,
        },
        _ => CursorState::default(),
    }
}

/// Tracks one press and its cumulative travel so a drag never fires a
/// click.
#[derive(Clone, Copy, Debug, Default)]
pub struct PressTracker {
    down_at: Option<Vec2>,
    last: Vec2,
    travelled: f32,
}

impl PressTracker {
    pub fn begin(&mut self, position: Vec2) {
        self.down_at = Some(position);
        self.last = position;
        self.travelled = 0.0;
    }

    pub fn motion(&mut self, position: Vec2) -> f32 {
        if self.down_at.is_some() {
            self.travelled += position.distance(self.last);
            self.last = position;
        }
        self.travelled
    }

    pub fn is_down(&self) -> bool {
        self.down_at.is_some()
    }

    pub fn is_drag(&self) -> bool {
        self.down_at.is_some() && self.travelled > CLICK_DRAG_THRESHOLD_PX
    }

    /// End the press; `true` when the whole gesture stayed under the drag
    /// threshold and should count as a click.
    pub fn finish(&mut self) -> bool {
        let was_click = self.down_at.is_some() && self.travelled <= CLICK_DRAG_THRESHOLD_PX;
        self.down_at = None;
        self.travelled = 0.0;
        was_click
    }
}

/// Resolve what a click on `bubble` should do. Navigation wins over the
/// detail card; plain fillers do nothing.
pub fn click_action(bubble: &Bubble) -> Option<ClickAction> {
    if let Some(uri) = &bubble.nav_target {
        return Some(ClickAction::Navigate(uri.clone()));
    }
    bubble
        .project
        .as_ref()
        .map(|p| ClickAction::OpenDetail(p.clone()))
}

#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// World-space ray through a viewport pixel.
pub fn screen_ray(camera: &Camera, pixel: Vec2, viewport: Vec2) -> (Vec3, Vec3) {
    let ndc_x = (2.0 * pixel.x / viewport.x.max(1.0)) - 1.0;
    let ndc_y = 1.0 - (2.0 * pixel.y / viewport.y.max(1.0));
    let inv: Mat4 = camera.view_proj().inverse();
    let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    let p_far: Vec3 = p_far.truncate() / p_far.w;
    let ro = camera.eye;
    let rd = (p_far - ro).normalize();
    (ro, rd)
}

/// Nearest bubble under a viewport pixel. The hit sphere is the bubble's
/// full radius at its rendered position, independent of flicker opacity:
/// an invisible glass bubble is still hoverable.
pub fn pick(camera: &Camera, bubbles: &[Bubble], pixel: Vec2, viewport: Vec2, time: f32) -> Option<usize> {
    let (ro, rd) = screen_ray(camera, pixel, viewport);
    let mut hits: SmallVec<[(usize, f32); 4]> = SmallVec::new();
    for (i, b) in bubbles.iter().enumerate() {
        if let Some(t) = ray_sphere(ro, rd, b.anim.position(time), b.radius) {
            hits.push((i, t));
        }
    }
    hits.iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|&(i, _)| i)
}

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::bubble::Bubble;
use crate::constants::*;

/// Right-handed perspective camera orbiting a target point.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 28.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: aspect.max(1e-3),
            fovy_radians: DEFAULT_FOVY,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn orbit_distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    /// Unit vector from target toward the eye. Degenerate geometry falls
    /// back to a fixed default so distance math stays finite.
    pub fn view_direction(&self) -> Vec3 {
        let dir = self.eye - self.target;
        let len = dir.length();
        if len <= 1e-6 {
            Vec3::Z
        } else {
            dir / len
        }
    }

    /// Project a world point to normalized device coordinates. `None` when
    /// the point is at or behind the eye plane.
    pub fn ndc_of(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_proj() * Vec4::from((world, 1.0));
        if clip.w <= 1e-6 {
            return None;
        }
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }

    /// Camera-space basis used by the renderer for billboarding.
    pub fn right_up(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.eye).normalize_or_zero();
        let forward = if forward == Vec3::ZERO { -Vec3::Z } else { forward };
        let right = forward.cross(self.up).normalize_or_zero();
        let right = if right == Vec3::ZERO { Vec3::X } else { right };
        let up = right.cross(forward);
        (right, up)
    }
}

/// Distance from the orbit target needed to fit `extent` in both axes.
/// The horizontal requirement is the vertical one divided by the aspect
/// ratio; the larger of the two wins.
pub fn fit_distance(extent: f32, fovy_radians: f32, aspect: f32) -> f32 {
    let vertical = extent / (fovy_radians * 0.5).tan();
    let horizontal = vertical / aspect.max(1e-3);
    vertical.max(horizontal)
}

/// Index of the bubble whose projection lies nearest the screen center,
/// restricted to bubbles in front of the camera and within the
/// center-proximity threshold.
pub fn centered_bubble(camera: &Camera, bubbles: &[Bubble]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, b) in bubbles.iter().enumerate() {
        let Some(ndc) = camera.ndc_of(b.position) else {
            continue;
        };
        let d = ndc.length();
        if d > CENTER_PICK_NDC_RADIUS {
            continue;
        }
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Zoom damping inside the friction zone around a centered bubble. The
/// zone is bounded by a comfortable near distance and a generous outer one,
/// both scaled by the bubble's radius; inside it the factor eases
/// quadratically from `FRICTION_MIN_ZOOM` back up to 1.
pub fn friction_zoom_factor(orbit_distance: f32, bubble_radius: f32) -> f32 {
    let near = bubble_radius * FRICTION_NEAR_FACTOR;
    let far = bubble_radius * FRICTION_FAR_FACTOR;
    if orbit_distance >= far {
        return 1.0;
    }
    if orbit_distance <= near {
        return FRICTION_MIN_ZOOM;
    }
    let t = (orbit_distance - near) / (far - near);
    FRICTION_MIN_ZOOM + (1.0 - FRICTION_MIN_ZOOM) * t * t
}

/// Camera behaviors layered over direct user manipulation.
#[derive(Clone, Debug)]
pub struct CameraController {
    pub zoom_speed: f32,
    pub rotate_speed: f32,
    /// Set on drag-start, never cleared for the session: auto-fit must not
    /// fight the user.
    pub user_interacting: bool,
    /// Re-derived every frame so friction never compounds.
    frame_zoom_speed: f32,
    frame_rotate_speed: f32,
}

impl CameraController {
    pub fn new(zoom_speed: f32, rotate_speed: f32) -> Self {
        Self {
            zoom_speed,
            rotate_speed,
            user_interacting: false,
            frame_zoom_speed: zoom_speed,
            frame_rotate_speed: rotate_speed,
        }
    }

    pub fn mark_user_interaction(&mut self) {
        self.user_interacting = true;
    }

    /// Fit the layout extent into view along the current view direction.
    /// Skipped entirely once the user has taken over.
    pub fn auto_fit(&self, camera: &mut Camera, extent: f32) {
        if self.user_interacting {
            return;
        }
        let dist = fit_distance(extent, camera.fovy_radians, camera.aspect);
        camera.eye = camera.target + camera.view_direction() * dist;
    }

    /// Per-frame magnetic dynamics: reset both speeds to their configured
    /// values, then damp zoom if a bubble sits near screen center and the
    /// camera is inside its friction zone. Rotation scales with orbit
    /// distance so close-ups do not whip.
    pub fn update_dynamics(&mut self, camera: &Camera, bubbles: &[Bubble]) {
        self.frame_zoom_speed = self.zoom_speed;
        self.frame_rotate_speed = self.rotate_speed;

        let dist = camera.orbit_distance();
        if let Some(i) = centered_bubble(camera, bubbles) {
            self.frame_zoom_speed *= friction_zoom_factor(dist, bubbles[i].radius);
        }
        let rotate_factor = (dist / ROTATE_REFERENCE_DISTANCE).clamp(ROTATE_MIN_FACTOR, 1.0);
        self.frame_rotate_speed *= rotate_factor;
    }

    pub fn frame_zoom_speed(&self) -> f32 {
        self.frame_zoom_speed
    }

    pub fn frame_rotate_speed(&self) -> f32 {
        self.frame_rotate_speed
    }

    /// Move the eye along the view direction by `amount` (positive zooms
    /// in), already scaled by the caller with `frame_zoom_speed`.
    pub fn zoom(&self, camera: &mut Camera, amount: f32) {
        let dist = (camera.orbit_distance() - amount).max(MIN_ORBIT_DISTANCE);
        camera.eye = camera.target + camera.view_direction() * dist;
    }

    /// Orbit the eye around the target by yaw/pitch radians.
    pub fn orbit(&self, camera: &mut Camera, yaw: f32, pitch: f32) {
        let offset = camera.eye - camera.target;
        let dist = offset.length().max(MIN_ORBIT_DISTANCE);
        let mut cur_pitch = (offset.y / dist).clamp(-1.0, 1.0).asin();
        let mut cur_yaw = offset.x.atan2(offset.z);
        cur_yaw += yaw;
        cur_pitch = (cur_pitch + pitch).clamp(-1.45, 1.45);
        let (sp, cp) = cur_pitch.sin_cos();
        let (sy, cy) = cur_yaw.sin_cos();
        camera.eye = camera.target + Vec3::new(cp * sy, sp, cp * cy) * dist;
    }
}

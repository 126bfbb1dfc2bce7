use glam::Vec3;

use crate::bubble::{Bubble, Project, VisualRole};
use crate::constants::*;
use crate::rng::Lcg;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldMode {
    Home,
    Gallery,
}

/// Placement tuning. The retry caps and padding are configuration defaults,
/// not fill-density guarantees; a dense request may come back short.
#[derive(Clone, Debug)]
pub struct LayoutParams {
    pub half_extent: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub content_radius_floor: f32,
    pub padding: f32,
    pub retry_cap: u32,
}

impl LayoutParams {
    pub fn for_mode(mode: FieldMode) -> Self {
        Self {
            half_extent: FIELD_HALF_EXTENT,
            radius_min: FILLER_RADIUS_MIN,
            radius_max: FILLER_RADIUS_MAX,
            content_radius_floor: CONTENT_RADIUS_FLOOR,
            padding: PLACEMENT_PADDING,
            retry_cap: match mode {
                FieldMode::Home => HOME_RETRY_CAP,
                FieldMode::Gallery => GALLERY_RETRY_CAP,
            },
        }
    }
}

/// The two fixed navigational bubbles of the home field. Placed first and
/// exempt from collision checks; everything after must avoid them.
fn landmarks() -> [Bubble; 2] {
    [
        Bubble::landmark(
            "work",
            Vec3::new(-4.2, 1.6, 0.5),
            2.4,
            VisualRole::SolidLandmark,
            Vec3::from(LANDMARK_SOLID_COLOR),
            "/work",
            "Selected work",
            Vec3::new(0.0, -3.1, 0.0),
        ),
        Bubble::landmark(
            "about",
            Vec3::new(4.4, -1.2, -1.5),
            2.0,
            VisualRole::GlassFiller,
            Vec3::from(LANDMARK_GLASS_COLOR),
            "/about",
            "About me",
            Vec3::new(0.0, 2.7, 0.0),
        ),
    ]
}

fn overlaps(accepted: &[Bubble], position: Vec3, radius: f32, padding: f32) -> bool {
    accepted.iter().any(|b| {
        let min_dist = b.radius + radius + padding;
        b.position.distance_squared(position) < min_dist * min_dist
    })
}

/// Generate the full bubble set for one mount.
///
/// Bounded-retry random packing: candidates are sampled from the seeded
/// stream and rejected on overlap; once `retry_cap` rejections accumulate
/// the field is returned as-is, shorter than requested. Callers must
/// tolerate a short result.
pub fn generate(mode: FieldMode, requested: usize, projects: &[Project], seed: u32) -> Vec<Bubble> {
    generate_with(mode, requested, projects, seed, &LayoutParams::for_mode(mode))
}

pub fn generate_with(
    mode: FieldMode,
    requested: usize,
    projects: &[Project],
    seed: u32,
    params: &LayoutParams,
) -> Vec<Bubble> {
    let mut rng = Lcg::new(seed);
    let mut accepted: Vec<Bubble> = Vec::new();

    let target = match mode {
        FieldMode::Home => {
            accepted.extend(landmarks());
            requested.max(HOME_MIN_FILL)
        }
        FieldMode::Gallery => requested.max(projects.len()),
    };

    let mut rejected = 0u32;
    let mut content_bound = 0usize;
    let mut filler_index = 0u32;

    while accepted.len() < target && rejected < params.retry_cap {
        let position = Vec3::new(
            rng.range(-params.half_extent, params.half_extent),
            rng.range(-params.half_extent, params.half_extent),
            rng.range(-params.half_extent, params.half_extent),
        );
        let mut radius = rng.range(params.radius_min, params.radius_max);
        let bind_content = mode == FieldMode::Gallery && content_bound < projects.len();
        if bind_content {
            radius = radius.max(params.content_radius_floor);
        }
        if overlaps(&accepted, position, radius, params.padding) {
            rejected += 1;
            continue;
        }
        if bind_content {
            let project = projects[content_bound].clone();
            content_bound += 1;
            accepted.push(Bubble::thumbnail(project, position, radius));
        } else {
            let tint = Vec3::from(FILLER_BASE_COLOR)
                + Vec3::new(
                    rng.range(-0.08, 0.08),
                    rng.range(-0.08, 0.08),
                    rng.range(-0.06, 0.06),
                );
            accepted.push(Bubble::filler(filler_index, position, radius, tint));
            filler_index += 1;
        }
    }

    if accepted.len() < target {
        log::warn!(
            "[layout] retry cap reached: placed {} of {} requested bubbles",
            accepted.len(),
            target
        );
    }
    accepted
}

/// Arm the explosion entrance across a freshly generated field. Each bubble
/// holds `delay_step` longer than the previous one, so the field blooms
/// outward in placement order.
pub fn arm_entrances(bubbles: &mut [Bubble], delay_step: f32, seed: u32) {
    let mut rng = Lcg::new(seed);
    for (i, b) in bubbles.iter_mut().enumerate() {
        b.arm_entrance(delay_step * i as f32, &mut rng);
    }
}

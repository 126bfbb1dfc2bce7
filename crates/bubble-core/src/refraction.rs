//! CPU mirror of the glass fragment shading in `shaders/glass.wgsl`.
//!
//! The depth-compare rule below decides whether a fragment may apply its
//! screen-space refraction offset. Keeping it in Rust lets the host test
//! suite exercise the rule directly; the WGSL copies this logic.

use glam::{Vec2, Vec3};

use crate::constants::REFRACTION_DEPTH_BIAS;

/// Hemisphere normal implied by a disc fragment. `offset` is the 2D
/// position relative to the disc center in units of the radius (length 1 at
/// the rim). `None` outside the disc — the shader discards there.
pub fn disc_normal(offset: Vec2) -> Option<Vec3> {
    let d2 = offset.length_squared();
    if d2 > 1.0 {
        return None;
    }
    Some(Vec3::new(offset.x, offset.y, (1.0 - d2).sqrt()))
}

/// Screen-space UV offset for a refracted sample, proportional to the
/// normal's XY deflection.
pub fn refraction_offset(normal: Vec3, strength: f32) -> Vec2 {
    Vec2::new(normal.x, normal.y) * strength
}

/// View-space distance recovered from a `[0, 1]` perspective depth value
/// (wgpu depth range).
pub fn linearize_depth(depth: f32, znear: f32, zfar: f32) -> f32 {
    znear * zfar / (zfar - depth * (zfar - znear))
}

/// Whether the captured scene point at the offset UV sits in front of this
/// fragment. A capture made before the glass pass can contain foreground
/// geometry; bending it would read as the bubble refracting something in
/// front of itself, so such samples keep the unoffset UV.
pub fn capture_occludes(sample_linear: f32, fragment_linear: f32) -> bool {
    sample_linear + REFRACTION_DEPTH_BIAS < fragment_linear
}

/// The full per-fragment UV decision: offset UV when the captured point is
/// behind the bubble surface, unoffset UV when it is in front.
pub fn refracted_sample_uv(
    frag_uv: Vec2,
    offset: Vec2,
    captured_depth_at_offset: f32,
    fragment_depth: f32,
    znear: f32,
    zfar: f32,
) -> Vec2 {
    let sample_linear = linearize_depth(captured_depth_at_offset, znear, zfar);
    let fragment_linear = linearize_depth(fragment_depth, znear, zfar);
    if capture_occludes(sample_linear, fragment_linear) {
        frag_uv
    } else {
        frag_uv + offset
    }
}

/// Rim term from the angle between the surface normal and the view
/// direction; the billboard faces the camera, so `normal.z` is the cosine.
pub fn fresnel(cos_theta: f32, power: f32) -> f32 {
    (1.0 - cos_theta.clamp(0.0, 1.0)).powf(power)
}

/// Eight-tap ring used by the frosted blur, plus the center tap taken by
/// the caller. Offsets are in pixels; the shader divides by resolution.
pub fn blur_ring(radius_px: f32) -> [Vec2; 8] {
    let mut taps = [Vec2::ZERO; 8];
    for (i, tap) in taps.iter_mut().enumerate() {
        let a = std::f32::consts::TAU * i as f32 / 8.0;
        *tap = Vec2::new(a.cos(), a.sin()) * radius_px;
    }
    taps
}

/// Tint weight at a disc fragment: strongest at the center, fading to the
/// rim.
pub fn tint_weight(dist_from_center: f32, tint_strength: f32) -> f32 {
    tint_strength * (1.0 - dist_from_center.clamp(0.0, 1.0))
}

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::*;
use crate::rng::Lcg;

/// Entrance state for one bubble. The world position is fixed at placement;
/// only the rendered position moves during the explosion entrance.
#[derive(Clone, Debug)]
pub struct Entrance {
    pub target: Vec3,
    pub rendered: Vec3,
    /// 0 at spawn, 1 once at rest.
    pub progress: f32,
    delay_left: f32,
    initial_dist: f32,
}

impl Entrance {
    /// No entrance animation: rendered position starts pinned to the target.
    pub fn settled(target: Vec3) -> Self {
        Self {
            target,
            rendered: target,
            progress: 1.0,
            delay_left: 0.0,
            initial_dist: 0.0,
        }
    }

    /// Explosion entrance: spawn jittered around the origin, hold for
    /// `delay`, then ease out to the target.
    pub fn exploding(target: Vec3, delay: f32, rng: &mut Lcg) -> Self {
        let jitter = Vec3::new(
            rng.range(-ENTRANCE_JITTER, ENTRANCE_JITTER),
            rng.range(-ENTRANCE_JITTER, ENTRANCE_JITTER),
            rng.range(-ENTRANCE_JITTER, ENTRANCE_JITTER),
        );
        let rendered = jitter;
        Self {
            target,
            rendered,
            progress: 0.0,
            delay_left: delay.max(0.0),
            initial_dist: (target - rendered).length().max(1e-4),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if self.progress >= 1.0 {
            return;
        }
        if self.delay_left > 0.0 {
            self.delay_left -= dt;
            return;
        }
        let alpha = 1.0 - (-ENTRANCE_EASE_RATE * dt).exp();
        self.rendered += (self.target - self.rendered) * alpha;
        let dist = (self.target - self.rendered).length();
        if dist < ENTRANCE_SETTLE_EPS {
            self.rendered = self.target;
            self.progress = 1.0;
        } else {
            self.progress = (1.0 - dist / self.initial_dist).clamp(0.0, 1.0);
        }
    }

    pub fn is_settled(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Continuous floating bob layered on the rendered position. Display only;
/// collision and camera logic never see it.
#[derive(Clone, Copy, Debug)]
pub struct Bob {
    pub amplitude: f32,
    pub speed: f32,
    pub phase: f32,
}

impl Bob {
    pub fn from_rng(rng: &mut Lcg) -> Self {
        Self {
            amplitude: rng.range(BOB_AMPLITUDE_MIN, BOB_AMPLITUDE_MAX),
            speed: rng.range(BOB_SPEED_MIN, BOB_SPEED_MAX),
            phase: rng.range(0.0, std::f32::consts::TAU),
        }
    }

    pub fn offset(&self, time: f32) -> Vec3 {
        let a = time * self.speed + self.phase;
        Vec3::new(
            (a * 0.7).cos() * self.amplitude * 0.35,
            a.sin() * self.amplitude,
            0.0,
        )
    }
}

/// Glass-filler flicker loop: a seeded visibility target toggles after a
/// randomized dwell and the displayed opacity eases toward it.
#[derive(Clone, Debug)]
pub struct Flicker {
    rng: StdRng,
    pub visible_target: bool,
    pub dwell_left: f32,
    pub opacity: f32,
}

impl Flicker {
    pub fn new(seed: u32) -> Self {
        // Same seed-spreading mix the per-voice generators use, so nearby
        // ids do not share schedules.
        let mixed = (seed as u64) ^ (seed as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut rng = StdRng::seed_from_u64(mixed);
        let dwell_left = rng.gen_range(FLICKER_DWELL_MIN_SEC..FLICKER_DWELL_MAX_SEC);
        Self {
            rng,
            visible_target: true,
            dwell_left,
            opacity: 1.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.dwell_left -= dt;
        if self.dwell_left <= 0.0 {
            self.visible_target = !self.visible_target;
            self.dwell_left = self
                .rng
                .gen_range(FLICKER_DWELL_MIN_SEC..FLICKER_DWELL_MAX_SEC);
        }
        let target = if self.visible_target { 1.0 } else { 0.0 };
        let alpha = 1.0 - (-FLICKER_EASE_RATE * dt).exp();
        self.opacity += (target - self.opacity) * alpha;
    }
}

/// Animation sub-state bundle carried by every bubble.
#[derive(Clone, Debug)]
pub struct BubbleAnim {
    pub entrance: Entrance,
    pub bob: Bob,
    pub flicker: Option<Flicker>,
}

impl BubbleAnim {
    pub fn advance(&mut self, dt: f32) {
        self.entrance.advance(dt);
        if let Some(f) = &mut self.flicker {
            f.advance(dt);
        }
    }

    /// Rendered center for this frame.
    pub fn position(&self, time: f32) -> Vec3 {
        self.entrance.rendered + self.bob.offset(time)
    }

    pub fn opacity(&self) -> f32 {
        self.flicker.as_ref().map(|f| f.opacity).unwrap_or(1.0)
    }
}

use glam::Vec3;

use crate::anim::{Bob, BubbleAnim, Entrance, Flicker};
use crate::rng::{seed_from_id, Lcg};

/// Content record supplied by the host page for an image-thumbnail bubble.
#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub hover_thumbnail_url: Option<String>,
    pub link: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualRole {
    ImageThumbnail,
    SolidLandmark,
    GlassFiller,
}

/// Stable identity: content bubbles carry their project id, filler bubbles a
/// sequential index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BubbleId {
    Content(String),
    Filler(u32),
}

impl BubbleId {
    /// Seed for this bubble's private flicker/bob schedule.
    pub fn schedule_seed(&self) -> u32 {
        match self {
            BubbleId::Content(s) => seed_from_id(s),
            BubbleId::Filler(i) => seed_from_id(&format!("filler-{i}")),
        }
    }
}

impl std::fmt::Display for BubbleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BubbleId::Content(s) => write!(f, "{s}"),
            BubbleId::Filler(i) => write!(f, "filler-{i}"),
        }
    }
}

/// One element of the field. Position and radius are immutable after
/// placement; only `anim` mutates across frames.
#[derive(Clone, Debug)]
pub struct Bubble {
    pub id: BubbleId,
    pub position: Vec3,
    pub radius: f32,
    pub role: VisualRole,
    pub color: Vec3,
    pub nav_target: Option<String>,
    pub project: Option<Project>,
    pub label: Option<String>,
    pub label_offset: Vec3,
    pub gradient_masked: bool,
    pub refractive: bool,
    pub anim: BubbleAnim,
}

impl Bubble {
    pub fn filler(index: u32, position: Vec3, radius: f32, color: Vec3) -> Self {
        let id = BubbleId::Filler(index);
        let mut schedule = Lcg::new(id.schedule_seed());
        Self {
            id,
            position,
            radius,
            role: VisualRole::GlassFiller,
            color,
            nav_target: None,
            project: None,
            label: None,
            label_offset: Vec3::ZERO,
            gradient_masked: true,
            refractive: true,
            anim: BubbleAnim {
                entrance: Entrance::settled(position),
                bob: Bob::from_rng(&mut schedule),
                flicker: Some(Flicker::new(schedule.next_u31())),
            },
        }
    }

    pub fn thumbnail(project: Project, position: Vec3, radius: f32) -> Self {
        let id = BubbleId::Content(project.id.clone());
        let mut schedule = Lcg::new(id.schedule_seed());
        let nav_target = project.link.clone();
        Self {
            id,
            position,
            radius,
            role: VisualRole::ImageThumbnail,
            color: Vec3::ONE,
            nav_target,
            project: Some(project),
            label: None,
            label_offset: Vec3::ZERO,
            gradient_masked: false,
            refractive: false,
            anim: BubbleAnim {
                entrance: Entrance::settled(position),
                bob: Bob::from_rng(&mut schedule),
                flicker: None,
            },
        }
    }

    pub fn landmark(
        id: &str,
        position: Vec3,
        radius: f32,
        role: VisualRole,
        color: Vec3,
        nav_target: &str,
        label: &str,
        label_offset: Vec3,
    ) -> Self {
        let id = BubbleId::Content(id.to_string());
        let mut schedule = Lcg::new(id.schedule_seed());
        Self {
            id,
            position,
            radius,
            role,
            color,
            nav_target: Some(nav_target.to_string()),
            project: None,
            label: Some(label.to_string()),
            label_offset,
            gradient_masked: matches!(role, VisualRole::GlassFiller),
            refractive: matches!(role, VisualRole::GlassFiller),
            anim: BubbleAnim {
                entrance: Entrance::settled(position),
                bob: Bob::from_rng(&mut schedule),
                flicker: None,
            },
        }
    }

    /// Landmarks never flicker; fillers do. Content bubbles stay opaque so
    /// thumbnails are always readable.
    pub fn is_interactive(&self) -> bool {
        self.nav_target.is_some() || self.project.is_some()
    }

    /// Arm the explosion entrance for this bubble with the given hold delay.
    pub fn arm_entrance(&mut self, delay: f32, rng: &mut Lcg) {
        self.anim.entrance = Entrance::exploding(self.position, delay, rng);
    }
}

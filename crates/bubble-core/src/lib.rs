pub mod anim;
pub mod bubble;
pub mod camera;
pub mod constants;
pub mod interact;
pub mod layout;
pub mod refraction;
pub mod rng;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static GLASS_WGSL: &str = include_str!("../shaders/glass.wgsl");

pub use anim::*;
pub use bubble::*;
pub use camera::*;
pub use constants::*;
pub use interact::*;
pub use layout::*;
pub use rng::*;

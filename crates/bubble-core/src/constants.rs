// Shared tuning constants used by the layout, camera, interaction and
// animation layers. The renderer reads the refraction group directly.

// Placement volume and bubble sizing
pub const FIELD_HALF_EXTENT: f32 = 9.0; // cubic placement volume half-size
pub const FILLER_RADIUS_MIN: f32 = 0.35;
pub const FILLER_RADIUS_MAX: f32 = 1.3;
pub const CONTENT_RADIUS_FLOOR: f32 = 1.05; // thumbnails stay legible
pub const PLACEMENT_PADDING: f32 = 0.2; // minimum gap between accepted spheres
pub const HOME_RETRY_CAP: u32 = 500;
pub const GALLERY_RETRY_CAP: u32 = 1000;
pub const HOME_MIN_FILL: usize = 3; // home never drops below this many slots

// Camera auto-fit extent: placement volume plus the largest landmark radius
pub const SCENE_EXTENT: f32 = FIELD_HALF_EXTENT + 2.4;

// Camera dynamics
pub const DEFAULT_FOVY: f32 = std::f32::consts::FRAC_PI_4;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 120.0;
pub const CENTER_PICK_NDC_RADIUS: f32 = 0.8; // how close to screen center counts
pub const FRICTION_NEAR_FACTOR: f32 = 4.0; // inner friction bound, times bubble radius
pub const FRICTION_FAR_FACTOR: f32 = 30.0; // outer friction bound, times bubble radius
pub const FRICTION_MIN_ZOOM: f32 = 0.15; // zoom never fully stalls inside the zone
pub const ROTATE_REFERENCE_DISTANCE: f32 = 24.0; // full rotation speed at/above this
pub const ROTATE_MIN_FACTOR: f32 = 0.08;
pub const MIN_ORBIT_DISTANCE: f32 = 1.5;

// Interaction
pub const CLICK_DRAG_THRESHOLD_PX: f32 = 6.0; // cumulative travel before a press is a drag

// Entrance animation
pub const ENTRANCE_JITTER: f32 = 0.6; // spawn scatter around the origin
pub const ENTRANCE_EASE_RATE: f32 = 4.2; // per-second exponential approach
pub const ENTRANCE_SETTLE_EPS: f32 = 0.01;

// Float bob
pub const BOB_AMPLITUDE_MIN: f32 = 0.05;
pub const BOB_AMPLITUDE_MAX: f32 = 0.22;
pub const BOB_SPEED_MIN: f32 = 0.3;
pub const BOB_SPEED_MAX: f32 = 1.1;

// Glass flicker
pub const FLICKER_DWELL_MIN_SEC: f32 = 2.0;
pub const FLICKER_DWELL_MAX_SEC: f32 = 10.0;
pub const FLICKER_EASE_RATE: f32 = 2.5;

// Refraction shading
pub const REFRACTION_STRENGTH: f32 = 0.08; // uv offset per unit of normal.xy
pub const REFRACTION_DEPTH_BIAS: f32 = 0.05; // world units, avoids self-compare flicker
pub const FRESNEL_POWER: f32 = 3.0;
pub const GLASS_BLUR_RADIUS_PX: f32 = 6.0;

// Hover highlight applied by the renderer
pub const HOVER_BRIGHTEN: f32 = 0.4;

// Default filler palette, tinted per bubble by the layout RNG
pub const FILLER_BASE_COLOR: [f32; 3] = [0.62, 0.74, 0.92];
pub const LANDMARK_SOLID_COLOR: [f32; 3] = [0.95, 0.62, 0.35];
pub const LANDMARK_GLASS_COLOR: [f32; 3] = [0.55, 0.8, 0.85];

// Glass tint weight at the disc center (fades to the rim)
pub const GLASS_TINT_STRENGTH: f32 = 0.35;

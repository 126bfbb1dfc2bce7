use bubble_core::{
    click_action, pick, ray_sphere, screen_ray, Bubble, Camera, ClickAction, CursorVariant,
    Hover, PressTracker, Project, VisualRole, CLICK_DRAG_THRESHOLD_PX,
};
use glam::{Vec2, Vec3};

fn filler_at(index: u32, position: Vec3) -> Bubble {
    Bubble::filler(index, position, 1.0, Vec3::splat(0.5))
}

fn thumb_at(id: &str, position: Vec3, link: Option<&str>) -> Bubble {
    Bubble::thumbnail(
        Project {
            id: id.to_string(),
            title: id.to_uppercase(),
            thumbnail_url: format!("assets/{id}.jpg"),
            hover_thumbnail_url: None,
            link: link.map(str::to_string),
        },
        position,
        1.2,
    )
}

fn landmark() -> Bubble {
    Bubble::landmark(
        "work",
        Vec3::new(-4.0, 1.0, 0.0),
        2.0,
        VisualRole::SolidLandmark,
        Vec3::ONE,
        "/work",
        "Selected work",
        Vec3::ZERO,
    )
}

// ---------------- hover ownership ----------------

#[test]
fn at_most_one_bubble_is_hovered() {
    let a = thumb_at("a", Vec3::ZERO, None);
    let b = thumb_at("b", Vec3::X * 5.0, None);
    let c = landmark();
    let mut hover = Hover::new(false);

    hover.pointer_enter(&a);
    assert_eq!(hover.hovered(), Some(&a.id));
    hover.pointer_enter(&b);
    assert_eq!(hover.hovered(), Some(&b.id));
    hover.pointer_enter(&c);
    assert_eq!(hover.hovered(), Some(&c.id));
    // Whatever the interleaving, there is exactly one record.
}

#[test]
fn stale_leave_does_not_clobber_new_hover() {
    let a = thumb_at("a", Vec3::ZERO, None);
    let b = thumb_at("b", Vec3::X * 5.0, None);
    let mut hover = Hover::new(false);

    hover.pointer_enter(&a);
    hover.pointer_enter(&b);
    // A leave from the previously hovered bubble arrives late.
    assert!(hover.pointer_leave(&a.id).is_none());
    assert_eq!(hover.hovered(), Some(&b.id));

    assert!(hover.pointer_leave(&b.id).is_some());
    assert_eq!(hover.hovered(), None);
}

#[test]
fn duplicate_leave_is_a_noop() {
    let a = thumb_at("a", Vec3::ZERO, None);
    let mut hover = Hover::new(false);
    hover.pointer_enter(&a);
    assert!(hover.pointer_leave(&a.id).is_some());
    assert!(hover.pointer_leave(&a.id).is_none());
    assert!(hover.pointer_leave(&a.id).is_none());
}

#[test]
fn touch_only_suppresses_hover() {
    let a = thumb_at("a", Vec3::ZERO, None);
    let mut hover = Hover::new(true);
    assert!(hover.pointer_enter(&a).is_none());
    assert_eq!(hover.hovered(), None);
}

#[test]
fn cursor_variants_follow_bubble_kind() {
    let mut hover = Hover::new(false);

    let lm = landmark();
    let cursor = hover.pointer_enter(&lm).expect("cursor change");
    assert_eq!(cursor.variant, CursorVariant::Label);
    assert_eq!(cursor.label.as_deref(), Some("Selected work"));

    let t = thumb_at("a", Vec3::ZERO, None);
    let cursor = hover.pointer_enter(&t).expect("cursor change");
    assert_eq!(cursor.variant, CursorVariant::View);
    assert_eq!(cursor.label, None);

    let cursor = hover.pointer_leave(&t.id).expect("cursor reset");
    assert_eq!(cursor.variant, CursorVariant::Default);
}

// ---------------- click vs drag ----------------

#[test]
fn small_movement_counts_as_click_exactly_once() {
    let mut press = PressTracker::default();
    let mut clicks = 0;

    press.begin(Vec2::new(100.0, 100.0));
    press.motion(Vec2::new(101.5, 100.0));
    press.motion(Vec2::new(102.5, 101.0));
    if press.finish() {
        clicks += 1;
    }
    if press.finish() {
        clicks += 1; // a second release must not re-fire
    }
    assert_eq!(clicks, 1);
}

#[test]
fn large_movement_is_a_drag_not_a_click() {
    let mut press = PressTracker::default();
    press.begin(Vec2::new(100.0, 100.0));
    press.motion(Vec2::new(100.0 + CLICK_DRAG_THRESHOLD_PX + 1.0, 100.0));
    assert!(press.is_drag());
    assert!(!press.finish());
}

#[test]
fn cumulative_movement_counts_even_when_returning() {
    // Out and back: net displacement is zero, travel is not.
    let mut press = PressTracker::default();
    press.begin(Vec2::new(50.0, 50.0));
    press.motion(Vec2::new(50.0 + CLICK_DRAG_THRESHOLD_PX, 50.0));
    press.motion(Vec2::new(50.0, 50.0));
    assert!(!press.finish());
}

// ---------------- click routing ----------------

#[test]
fn navigation_target_wins_over_detail_card() {
    let b = thumb_at("a", Vec3::ZERO, Some("https://example.com/a"));
    match click_action(&b) {
        Some(ClickAction::Navigate(uri)) => assert_eq!(uri, "https://example.com/a"),
        other => panic!("expected navigation, got {other:?}"),
    }
}

#[test]
fn content_without_link_opens_detail() {
    let b = thumb_at("a", Vec3::ZERO, None);
    match click_action(&b) {
        Some(ClickAction::OpenDetail(p)) => assert_eq!(p.id, "a"),
        other => panic!("expected detail card, got {other:?}"),
    }
}

#[test]
fn plain_filler_clicks_do_nothing() {
    let b = filler_at(0, Vec3::ZERO);
    assert!(click_action(&b).is_none());
}

// ---------------- picking ----------------

#[test]
fn ray_sphere_hit_and_miss() {
    let hit = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 2.0);
    assert!(hit.is_some());
    assert!(hit.unwrap() > 0.0 && hit.unwrap() < 5.0);

    let miss = ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 5.0), 2.0);
    assert!(miss.is_none());

    let behind = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -5.0), 2.0);
    assert!(behind.is_none());
}

#[test]
fn screen_center_ray_points_at_target() {
    let camera = Camera::new(800.0 / 600.0);
    let (ro, rd) = screen_ray(&camera, Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0));
    assert_eq!(ro, camera.eye);
    let to_target = (camera.target - camera.eye).normalize();
    assert!(rd.dot(to_target) > 0.999, "center ray looks at the target");
}

#[test]
fn pick_prefers_the_nearest_bubble() {
    let camera = Camera::new(800.0 / 600.0);
    let near = filler_at(0, Vec3::new(0.0, 0.0, 10.0));
    let far = filler_at(1, Vec3::new(0.0, 0.0, -5.0));
    let bubbles = vec![far, near];
    let hit = pick(
        &camera,
        &bubbles,
        Vec2::new(400.0, 300.0),
        Vec2::new(800.0, 600.0),
        0.0,
    );
    // Camera sits on +Z looking at the origin; index 1 is closer to it.
    assert_eq!(hit, Some(1));
}

#[test]
fn pick_misses_empty_space() {
    let camera = Camera::new(800.0 / 600.0);
    let bubbles = vec![filler_at(0, Vec3::new(0.0, 0.0, 0.0))];
    let hit = pick(
        &camera,
        &bubbles,
        Vec2::new(5.0, 5.0),
        Vec2::new(800.0, 600.0),
        0.0,
    );
    assert_eq!(hit, None);
}

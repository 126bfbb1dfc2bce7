use bubble_core::{
    generate, generate_with, FieldMode, LayoutParams, Project, VisualRole,
};

fn sample_projects(n: usize) -> Vec<Project> {
    (1..=n)
        .map(|i| Project {
            id: format!("p{i}"),
            title: format!("Project {i}"),
            thumbnail_url: format!("assets/p{i}.jpg"),
            hover_thumbnail_url: None,
            link: None,
        })
        .collect()
}

fn is_landmark(b: &bubble_core::Bubble) -> bool {
    b.label.is_some()
}

fn assert_pairwise_clear(bubbles: &[bubble_core::Bubble], padding: f32) {
    for i in 0..bubbles.len() {
        for j in (i + 1)..bubbles.len() {
            if is_landmark(&bubbles[i]) && is_landmark(&bubbles[j]) {
                continue;
            }
            let a = &bubbles[i];
            let b = &bubbles[j];
            let dist = a.position.distance(b.position);
            assert!(
                dist + 1e-4 >= a.radius + b.radius + padding,
                "bubbles {i} and {j} overlap: dist {dist}, radii {} + {}",
                a.radius,
                b.radius
            );
        }
    }
}

#[test]
fn layout_is_deterministic_for_fixed_inputs() {
    let projects = sample_projects(4);
    let a = generate(FieldMode::Gallery, 10, &projects, 777);
    let b = generate(FieldMode::Gallery, 10, &projects, 777);
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.id, y.id);
        assert_eq!(x.position, y.position);
        assert_eq!(x.radius, y.radius);
        assert_eq!(x.role, y.role);
        assert_eq!(x.color, y.color);
    }
}

#[test]
fn different_seeds_differ() {
    let a = generate(FieldMode::Home, 10, &[], 1);
    let b = generate(FieldMode::Home, 10, &[], 2);
    let fillers_a: Vec<_> = a.iter().filter(|x| !is_landmark(x)).collect();
    let fillers_b: Vec<_> = b.iter().filter(|x| !is_landmark(x)).collect();
    assert!(
        fillers_a
            .iter()
            .zip(fillers_b.iter())
            .any(|(x, y)| x.position != y.position),
        "filler placement should depend on the seed"
    );
}

#[test]
fn home_field_has_two_landmarks_and_no_overlap() {
    let bubbles = generate(FieldMode::Home, 14, &[], 12345);
    let landmarks = bubbles.iter().filter(|b| is_landmark(b)).count();
    assert_eq!(landmarks, 2);
    assert!(bubbles.len() <= 14);
    assert_eq!(bubbles.len(), 14, "typical config should fill every slot");
    assert_pairwise_clear(&bubbles, bubble_core::PLACEMENT_PADDING);

    for b in bubbles.iter().filter(|b| is_landmark(b)) {
        assert!(b.nav_target.is_some(), "landmarks navigate on click");
    }
    for b in bubbles.iter().filter(|b| !is_landmark(b)) {
        assert_eq!(b.role, VisualRole::GlassFiller);
        assert!(b.refractive);
        assert!(b.radius > 0.0);
    }
}

#[test]
fn home_count_never_drops_below_minimum() {
    let bubbles = generate(FieldMode::Home, 0, &[], 5);
    assert!(bubbles.len() >= 3);
}

#[test]
fn gallery_raises_target_to_content_count_and_binds_in_order() {
    let projects = sample_projects(5);
    let bubbles = generate(FieldMode::Gallery, 3, &projects, 2024);
    assert_eq!(bubbles.len(), 5);

    let thumbs: Vec<_> = bubbles
        .iter()
        .filter(|b| b.role == VisualRole::ImageThumbnail)
        .collect();
    assert_eq!(thumbs.len(), 5);
    for (i, b) in thumbs.iter().enumerate() {
        let p = b.project.as_ref().expect("content bubble carries project");
        assert_eq!(p.id, format!("p{}", i + 1), "bound out of input order");
        assert!(
            b.radius >= bubble_core::CONTENT_RADIUS_FLOOR,
            "thumbnails keep a legible radius"
        );
        assert!(!b.refractive);
    }
    assert_pairwise_clear(&bubbles, bubble_core::PLACEMENT_PADDING);
}

#[test]
fn gallery_with_nothing_requested_is_empty() {
    let bubbles = generate(FieldMode::Gallery, 0, &[], 99);
    assert!(bubbles.is_empty());
}

#[test]
fn impossible_volume_terminates_short() {
    // A volume that cannot hold fifty spheres of this size: the generator
    // must stop at the retry cap and hand back whatever fit.
    let params = LayoutParams {
        half_extent: 0.5,
        radius_min: 2.0,
        radius_max: 2.0,
        content_radius_floor: 2.0,
        padding: 0.2,
        retry_cap: 200,
    };
    let bubbles = generate_with(FieldMode::Gallery, 50, &[], 11, &params);
    assert!(bubbles.len() < 50);
    assert!(bubbles.len() >= 1, "at least the first candidate fits");
}

#[test]
fn retry_cap_zero_places_nothing_but_landmarks() {
    let params = LayoutParams {
        retry_cap: 0,
        ..LayoutParams::for_mode(FieldMode::Home)
    };
    let bubbles = generate_with(FieldMode::Home, 14, &[], 3, &params);
    assert_eq!(bubbles.len(), 2);
}

#[test]
fn entrance_arming_moves_rendered_position_only() {
    let mut bubbles = generate(FieldMode::Home, 8, &[], 42);
    let placed: Vec<_> = bubbles.iter().map(|b| b.position).collect();
    bubble_core::arm_entrances(&mut bubbles, 0.05, 43);
    for (b, before) in bubbles.iter().zip(placed.iter()) {
        assert_eq!(b.position, *before, "world position is immutable");
        assert_eq!(b.anim.entrance.target, *before);
        assert!(b.anim.entrance.progress < 1.0);
        assert!(
            b.anim.entrance.rendered.length() < before.length() + 2.0,
            "spawn starts near the origin"
        );
    }
}

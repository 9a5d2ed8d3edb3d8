use ball_packing::geometry::{
    centroid, is_point_inside_polygon, segment_intersection, triangle_area, triangulate,
};
use ball_packing::outline::OutlineDocument;
use ball_packing::settings::PhysicsSettings;
use ball_packing::shapes::Playfield;
use ball_packing::sim::{
    FillSession, SessionPhase, SizeClass, TickInput, TickLoop, add_particle, step_simulation,
};
use ball_packing::{GeometryError, Settings};
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn square(size: f32) -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(size, 0.0),
        Vec2::new(size, size),
        Vec2::new(0.0, size),
    ]
}

#[test]
fn square_triangulates_into_two_triangles() {
    let tris = triangulate(&square(10.0));
    assert_eq!(tris.len(), 2);
    let total: f32 = tris.iter().map(triangle_area).sum();
    assert!((total - 100.0).abs() < 1e-4);
}

#[test]
fn diagonals_cross_at_center() {
    let p = segment_intersection(
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 10.0),
        Vec2::new(0.0, 10.0),
        Vec2::new(10.0, 0.0),
    );
    assert_eq!(p, Some(Vec2::new(5.0, 5.0)));
}

#[test]
fn parallel_segments_do_not_intersect() {
    let p = segment_intersection(
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(10.0, 1.0),
    );
    assert_eq!(p, None);
}

#[test]
fn centroid_of_nothing_is_an_error() {
    assert_eq!(centroid(&[]), Err(GeometryError::EmptyInput));
}

#[test]
fn dropped_particle_falls() {
    let outline = square(100.0);
    let spout = Vec2::new(50.0, 30.0);
    assert!(is_point_inside_polygon(spout, &outline));

    let particle = add_particle(0, spout, &SizeClass::new("test", 5.0, 1.0), 0xffffff);
    let out = step_simulation(&[particle], &outline, &PhysicsSettings::default());
    assert!(out[0].pos.y > spout.y);
    assert_eq!(out[0].pos.x, spout.x);
}

#[test]
fn particles_settle_inside_the_outline() {
    let outline = square(100.0);
    let physics = PhysicsSettings::default();
    let class = SizeClass::new("test", 4.0, 1.0);
    let mut particles = Vec::new();
    for frame in 0..600u32 {
        if frame % 20 == 0 {
            let spout = Vec2::new(30.0 + (frame % 60) as f32, 10.0);
            particles.push(add_particle(frame, spout, &class, 0));
        }
        particles = step_simulation(&particles, &outline, &physics);
    }
    assert_eq!(particles.len(), 30);
    for p in &particles {
        assert!(is_point_inside_polygon(p.pos, &outline), "{:?} escaped", p.pos);
        assert!(p.vel.length() < 15.0);
    }
}

#[test]
fn session_is_reproducible_from_its_seed() {
    let run = |seed| {
        let mut session = FillSession::new(seed, Settings::default());
        let mut tick_loop = TickLoop::new();
        let handle = tick_loop.start();
        for frame in 0..200 {
            let input = TickInput {
                select_spout: Some(frame % 3),
                drop: frame % 10 == 0,
                reset: false,
            };
            tick_loop.run_frame(handle, &mut session, &input);
        }
        (session.playfield().clone(), session.particles().to_vec())
    };
    assert_eq!(run(2024), run(2024));
}

#[test]
fn session_wins_and_stops() {
    let mut settings = Settings::default();
    settings.win_threshold = 2.0;
    let mut session = FillSession::new(8, settings);
    let mut tick_loop = TickLoop::new();
    let handle = tick_loop.start();
    let drop = TickInput {
        drop: true,
        ..Default::default()
    };

    let mut frames = 0;
    while tick_loop.run_frame(handle, &mut session, &drop) {
        frames += 1;
        assert!(frames < 10_000, "never won");
    }
    assert_eq!(session.phase(), SessionPhase::Won);
    assert!(session.fill_percentage() >= 2.0);
    let count = session.particles().len();
    assert!(session.drop_particle().is_none());
    assert_eq!(session.particles().len(), count);
}

#[test]
fn settings_file_tunes_the_session() {
    let settings = Settings::from_json(
        r#"{
            "spouts": { "min_spouts": 2, "max_spouts": 2 },
            "size_classes": [{ "name": "only", "radius": 3.0, "weight": 1.0 }]
        }"#,
    )
    .unwrap();
    let mut session = FillSession::new(5, settings);
    assert!(session.spouts().len() <= 2);
    assert_eq!(session.drop_particle().map(|p| p.radius), Some(3.0));
}

#[test]
fn outline_document_drives_a_session() {
    let json = r#"{
        "vertices": [[0, 0], [50, 0], [50, 20], [30, 20], [30, 50], [0, 50]],
        "spoutPoints": [[10, 0]],
        "originalWidth": 50,
        "originalHeight": 50
    }"#;
    let doc = OutlineDocument::from_json(json).unwrap();
    let settings = Settings::default();
    let mut rng = Pcg32::seed_from_u64(1);
    let playfield: Playfield = doc.into_playfield(400.0, 400.0, &settings, &mut rng).unwrap();
    assert_eq!(playfield.triangles.len(), 4);

    let mut session = FillSession::from_playfield(1, settings, playfield.clone());
    let input = TickInput {
        drop: true,
        ..Default::default()
    };
    for _ in 0..50 {
        ball_packing::sim::tick(&mut session, &input);
    }
    assert_eq!(session.particles().len(), 50);
    assert!(session.fill_percentage() > 0.0);

    ball_packing::sim::tick(
        &mut session,
        &TickInput {
            reset: true,
            ..Default::default()
        },
    );
    assert_eq!(session.playfield(), &playfield);
    assert!(session.particles().is_empty());
}

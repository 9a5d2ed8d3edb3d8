//! Session state and particle types
//!
//! A session owns its RNG, so a seed reproduces the playfield, the particle
//! sizes and the particle colors.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::score::compute_fill_percentage;
use super::step::step_simulation;
use crate::geometry::{Point, Triangle};
use crate::hsl_to_rgb;
use crate::settings::Settings;
use crate::shapes::{Playfield, generate_compound_shape};

/// A simulated disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Packed 0xRRGGBB
    pub color: u32,
}

impl Particle {
    pub fn area(&self) -> f32 {
        std::f32::consts::PI * self.radius * self.radius
    }
}

/// One bucket of the weighted particle size table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeClass {
    pub name: String,
    pub radius: f32,
    /// Relative probability; the table is normalized to sum to 1
    pub weight: f32,
}

impl SizeClass {
    pub fn new(name: impl Into<String>, radius: f32, weight: f32) -> Self {
        Self {
            name: name.into(),
            radius,
            weight,
        }
    }
}

pub fn default_size_classes() -> Vec<SizeClass> {
    vec![
        SizeClass::new("huge", 12.0, 0.05),
        SizeClass::new("large", 10.0, 0.15),
        SizeClass::new("medium", 8.0, 0.35),
        SizeClass::new("small", 6.0, 0.20),
        SizeClass::new("tiny", 4.0, 0.25),
    ]
}

/// Weighted draw from the size table (cumulative weights)
pub fn pick_size_class<'a>(classes: &'a [SizeClass], rng: &mut impl Rng) -> Option<&'a SizeClass> {
    let total: f32 = classes.iter().map(|c| c.weight.max(0.0)).sum();
    if total <= 0.0 {
        return classes.first();
    }
    let roll = rng.random::<f32>() * total;
    let mut cumulative = 0.0;
    for class in classes {
        cumulative += class.weight.max(0.0);
        if roll < cumulative {
            return Some(class);
        }
    }
    classes.last()
}

/// New particle at rest on a spout
pub fn add_particle(id: u32, spout: Point, size_class: &SizeClass, color: u32) -> Particle {
    Particle {
        id,
        pos: spout,
        vel: Vec2::ZERO,
        radius: size_class.radius,
        color,
    }
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Accepting particles
    Filling,
    /// Fill threshold reached; terminal until reset
    Won,
}

/// RNG description for reproducible sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }

    /// Move to the next independent stream
    pub fn advance(&mut self) {
        self.stream = self.stream.wrapping_add(1);
    }
}

/// Where the session's playfield comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayfieldSource {
    /// Procedurally generated; regenerated on reset
    Generated,
    /// Supplied by the caller (e.g. an outline document); kept on reset
    Fixed,
}

/// One round of the fill game
#[derive(Debug, Clone)]
pub struct FillSession {
    settings: Settings,
    rng_state: RngState,
    rng: Pcg32,
    source: PlayfieldSource,
    playfield: Playfield,
    selected_spout: usize,
    particles: Vec<Particle>,
    phase: SessionPhase,
    fill_percentage: f32,
    ticks: u64,
    next_id: u32,
}

impl FillSession {
    /// Start a session on a freshly generated playfield
    pub fn new(seed: u64, settings: Settings) -> Self {
        let settings = settings.validated();
        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();
        let playfield = generate_compound_shape(
            settings.canvas_width,
            settings.canvas_height,
            &settings,
            &mut rng,
        );
        Self::with_playfield(settings, rng_state, rng, PlayfieldSource::Generated, playfield)
    }

    /// Start a session on a caller-supplied playfield
    pub fn from_playfield(seed: u64, settings: Settings, playfield: Playfield) -> Self {
        let rng_state = RngState::new(seed);
        let rng = rng_state.to_rng();
        Self::with_playfield(
            settings.validated(),
            rng_state,
            rng,
            PlayfieldSource::Fixed,
            playfield,
        )
    }

    fn with_playfield(
        settings: Settings,
        rng_state: RngState,
        rng: Pcg32,
        source: PlayfieldSource,
        playfield: Playfield,
    ) -> Self {
        log::info!(
            "New session (seed {}): {} outline points, {} spouts",
            rng_state.seed,
            playfield.outline.len(),
            playfield.spouts.len()
        );
        Self {
            settings,
            rng_state,
            rng,
            source,
            playfield,
            selected_spout: 0,
            particles: Vec::new(),
            phase: SessionPhase::Filling,
            fill_percentage: 0.0,
            ticks: 0,
            next_id: 0,
        }
    }

    /// Clear all particles and start over. Generated playfields are replaced
    /// by a new shape drawn from the next RNG stream.
    pub fn reset(&mut self) {
        self.rng_state.advance();
        self.rng = self.rng_state.to_rng();
        if self.source == PlayfieldSource::Generated {
            self.playfield = generate_compound_shape(
                self.settings.canvas_width,
                self.settings.canvas_height,
                &self.settings,
                &mut self.rng,
            );
        }
        self.particles.clear();
        self.selected_spout = 0;
        self.phase = SessionPhase::Filling;
        self.fill_percentage = 0.0;
        self.ticks = 0;
        self.next_id = 0;
        log::info!(
            "Session reset (seed {}, stream {})",
            self.rng_state.seed,
            self.rng_state.stream
        );
    }

    /// Select the active spout; out-of-range indices are ignored
    pub fn select_spout(&mut self, index: usize) {
        if index < self.playfield.spouts.len() {
            self.selected_spout = index;
        }
    }

    /// Drop a particle from the selected spout.
    ///
    /// Returns `None` once the session is won or when there is no spout.
    pub fn drop_particle(&mut self) -> Option<&Particle> {
        if self.phase == SessionPhase::Won {
            return None;
        }
        let spout = *self.playfield.spouts.get(self.selected_spout)?;
        let size_class = pick_size_class(&self.settings.size_classes, &mut self.rng)?;
        let color = hsl_to_rgb(self.rng.random_range(0.0..360.0), 0.7, 0.5);

        let particle = add_particle(self.next_id, spout, size_class, color);
        self.next_id += 1;
        self.particles.push(particle);
        self.particles.last()
    }

    /// Advance the particles by one tick and rescore.
    ///
    /// Won sessions stay frozen.
    pub fn step(&mut self) {
        if self.phase == SessionPhase::Won {
            return;
        }
        self.particles =
            step_simulation(&self.particles, &self.playfield.outline, &self.settings.physics);
        self.ticks += 1;
        self.refresh_fill();
    }

    /// Recompute the fill percentage and enter `Won` at the threshold
    pub fn refresh_fill(&mut self) -> f32 {
        self.fill_percentage = compute_fill_percentage(&self.playfield.triangles, &self.particles);
        if self.phase == SessionPhase::Filling
            && !self.particles.is_empty()
            && self.fill_percentage >= self.settings.win_threshold
        {
            self.phase = SessionPhase::Won;
            log::info!(
                "Won after {} ticks with {} particles ({:.1}% filled)",
                self.ticks,
                self.particles.len(),
                self.fill_percentage
            );
        }
        self.fill_percentage
    }

    pub fn is_won(&self) -> bool {
        self.phase == SessionPhase::Won
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn fill_percentage(&self) -> f32 {
        self.fill_percentage
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn outline(&self) -> &[Point] {
        &self.playfield.outline
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.playfield.triangles
    }

    pub fn spouts(&self) -> &[Point] {
        &self.playfield.spouts
    }

    pub fn selected_spout(&self) -> usize {
        self.selected_spout
    }

    pub fn source(&self) -> PlayfieldSource {
        self.source
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn rng_state(&self) -> RngState {
        self.rng_state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn square_playfield() -> Playfield {
        let outline = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
        ];
        Playfield::from_outline(&outline, vec![Vec2::new(50.0, 20.0), Vec2::new(20.0, 20.0)])
            .unwrap()
    }

    #[test]
    fn test_size_class_weights() {
        let classes = default_size_classes();
        let total: f32 = classes.iter().map(|c| c.weight).sum();
        assert!((total - 1.0).abs() < 1e-6);

        let mut rng = Pcg32::seed_from_u64(9);
        let mut medium = 0;
        for _ in 0..2000 {
            let class = pick_size_class(&classes, &mut rng).unwrap();
            if class.name == "medium" {
                medium += 1;
            }
        }
        // 35% expected
        assert!((550..850).contains(&medium), "medium drawn {medium} times");
        assert!(pick_size_class(&[], &mut rng).is_none());
    }

    #[test]
    fn test_add_particle_at_rest() {
        let class = SizeClass::new("test", 5.0, 1.0);
        let p = add_particle(3, Vec2::new(10.0, 20.0), &class, 0xFF0000);
        assert_eq!(p.id, 3);
        assert_eq!(p.pos, Vec2::new(10.0, 20.0));
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.radius, 5.0);
        assert!((p.area() - 25.0 * std::f32::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn test_drop_uses_selected_spout() {
        let mut session = FillSession::from_playfield(1, Settings::default(), square_playfield());
        session.select_spout(1);
        session.select_spout(7);
        assert_eq!(session.selected_spout(), 1);
        let p = session.drop_particle().unwrap().clone();
        assert_eq!(p.pos, Vec2::new(20.0, 20.0));
        assert_eq!(p.id, 0);
        assert_eq!(session.drop_particle().unwrap().id, 1);
    }

    #[test]
    fn test_particle_colors_are_mid_lightness() {
        let mut session = FillSession::from_playfield(9, Settings::default(), square_playfield());
        for _ in 0..20 {
            let color = session.drop_particle().unwrap().color;
            let channels = [(color >> 16) & 0xFF, (color >> 8) & 0xFF, color & 0xFF];
            let max = *channels.iter().max().unwrap();
            let min = *channels.iter().min().unwrap();
            // 70% saturation at 50% lightness spans 0.15..=0.85
            assert!(max.abs_diff(217) <= 1, "{color:06x}");
            assert!(min.abs_diff(38) <= 1, "{color:06x}");
        }
    }

    #[test]
    fn test_win_blocks_drops_until_reset() {
        let mut settings = Settings::default();
        settings.win_threshold = 0.1;
        let mut session = FillSession::from_playfield(1, settings, square_playfield());
        session.drop_particle();
        session.step();
        assert!(session.is_won());
        assert!(session.drop_particle().is_none());

        let before = session.particles().to_vec();
        session.step();
        assert_eq!(session.particles(), &before[..]);

        session.reset();
        assert_eq!(session.phase(), SessionPhase::Filling);
        assert!(session.particles().is_empty());
        assert_eq!(session.fill_percentage(), 0.0);
        // Fixed playfields survive a reset
        assert_eq!(session.playfield(), &square_playfield());
        assert!(session.drop_particle().is_some());
    }

    #[test]
    fn test_reset_regenerates_generated_playfield() {
        let mut session = FillSession::new(77, Settings::default());
        let first = session.playfield().clone();
        session.reset();
        assert_eq!(session.rng_state().stream, 1);
        assert_ne!(session.playfield(), &first);

        let replay = FillSession::new(77, Settings::default());
        assert_eq!(replay.playfield(), &first);
    }

    #[test]
    fn test_same_seed_same_particles() {
        let run = |seed| {
            let mut session = FillSession::new(seed, Settings::default());
            for _ in 0..5 {
                session.drop_particle();
                session.step();
            }
            session.particles().to_vec()
        };
        assert_eq!(run(11), run(11));
    }
}

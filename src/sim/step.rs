//! One physics tick over the whole particle set
//!
//! The update runs in two phases so no particle observes a half-updated
//! neighbor:
//! 1. every particle independently gets gravity, integration and wall
//!    containment, producing a candidate state;
//! 2. every particle resolves overlaps against the frozen candidates of all
//!    others (private copy), then damping is applied and all copies are
//!    committed together.
//!
//! The result does not depend on particle order, and two overlapping
//! particles always end the tick at least the sum of their radii apart.

use glam::Vec2;

use super::collision::{Containment, particle_contact};
use super::state::Particle;
use crate::geometry::Point;
use crate::settings::PhysicsSettings;

/// Phase-one state of a particle
#[derive(Debug, Clone)]
struct Candidate {
    particle: Particle,
    /// Already bounced off the wall this tick
    bounced: bool,
}

/// Advance every particle by one tick.
///
/// Pure: the output depends only on the arguments. Outlines with fewer than
/// 3 points impose no containment.
pub fn step_simulation(
    particles: &[Particle],
    outline: &[Point],
    physics: &PhysicsSettings,
) -> Vec<Particle> {
    let containment = Containment::new(
        outline,
        physics.correction_step,
        physics.max_correction_steps,
    );

    let candidates: Vec<Candidate> = particles
        .iter()
        .map(|p| integrate(p, containment.as_ref(), physics))
        .collect();

    (0..candidates.len())
        .map(|i| resolve(i, &candidates, containment.as_ref(), physics))
        .collect()
}

/// Gravity, position update and wall correction
fn integrate(
    particle: &Particle,
    containment: Option<&Containment>,
    physics: &PhysicsSettings,
) -> Candidate {
    let mut next = particle.clone();
    next.vel.y += physics.gravity;
    next.pos += next.vel;

    let mut bounced = false;
    if let Some(fixed) = containment.and_then(|c| c.correct(next.pos)) {
        next.pos = fixed;
        next.vel = -next.vel * physics.bounce_factor;
        bounced = true;
    }

    Candidate {
        particle: next,
        bounced,
    }
}

/// Push candidate `index` out of every neighbor it overlaps, then damp
fn resolve(
    index: usize,
    candidates: &[Candidate],
    containment: Option<&Containment>,
    physics: &PhysicsSettings,
) -> Particle {
    let Candidate { particle, bounced } = &candidates[index];
    let mut next = particle.clone();

    let mut exchanged = Vec2::ZERO;
    let mut contacts = 0u32;
    for (other_index, other) in candidates.iter().enumerate() {
        if other_index == index {
            continue;
        }
        let other = &other.particle;
        // Overlap is measured against the frozen candidate position so that
        // both particles of a pair see the same offset
        let Some(contact) = particle_contact(
            next.id,
            particle.pos,
            next.radius,
            other.id,
            other.pos,
            other.radius,
        ) else {
            continue;
        };
        next.pos += contact.normal * contact.penetration;
        exchanged += other.vel;
        contacts += 1;
    }

    if contacts > 0 {
        next.vel = exchanged / contacts as f32 * physics.bounce_factor;

        // A push-out may leave the outline; put it back without a second bounce
        if let Some(fixed) = containment.and_then(|c| c.correct(next.pos)) {
            next.pos = fixed;
            if !bounced {
                next.vel = -next.vel * physics.bounce_factor;
            }
        }
    }

    next.vel *= physics.damping;
    next
}

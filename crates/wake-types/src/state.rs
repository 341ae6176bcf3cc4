// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul};

/// Transverse (x, y) pair used for centroids and kick vectors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

/// Kick vectors share the representation of positions.
pub type Vector2D = Point2D;

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point2D {
    fn add_assign(&mut self, rhs: Point2D) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;
    fn mul(self, rhs: f64) -> Point2D {
        Point2D::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point2D {
    type Output = Point2D;
    fn div(self, rhs: f64) -> Point2D {
        Point2D::new(self.x / rhs, self.y / rhs)
    }
}

/// Macro-particle phase-space coordinates.
///
/// `z` is the longitudinal position relative to the reference particle
/// (ct), positive towards the head of the bunch. `weight` is the signed
/// number of real particles this macro-particle carries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub xp: f64,
    pub y: f64,
    pub yp: f64,
    pub z: f64,
    pub dp: f64,
    pub weight: f64,
}

impl Particle {
    /// Particle at rest in momentum space at (x, y, z).
    pub fn at(x: f64, y: f64, z: f64, weight: f64) -> Self {
        Particle {
            x,
            y,
            z,
            weight,
            ..Default::default()
        }
    }
}

/// Ordered collection of macro-particles sharing a reference momentum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticleBunch {
    particles: Vec<Particle>,
    /// Reference momentum (GeV/c).
    p0: f64,
}

impl ParticleBunch {
    pub fn new(p0: f64, particles: Vec<Particle>) -> Self {
        ParticleBunch { particles, p0 }
    }

    /// Assigns `total_charge / n` to every particle so the weights add up
    /// to `total_charge`.
    pub fn with_total_charge(p0: f64, total_charge: f64, mut particles: Vec<Particle>) -> Self {
        if !particles.is_empty() {
            let share = total_charge / particles.len() as f64;
            for p in particles.iter_mut() {
                p.weight = share;
            }
        }
        ParticleBunch { particles, p0 }
    }

    pub fn reference_momentum(&self) -> f64 {
        self.p0
    }

    /// Sum of per-particle weights.
    pub fn total_charge(&self) -> f64 {
        self.particles.iter().map(|p| p.weight).sum()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Removes the particles for which `keep` returns false.
    pub fn retain<F: FnMut(&Particle) -> bool>(&mut self, keep: F) {
        self.particles.retain(keep);
    }

    /// Mean longitudinal position and its RMS spread.
    pub fn z_moments(&self) -> (f64, f64) {
        let n = self.particles.len();
        if n == 0 {
            return (0.0, 0.0);
        }
        let nf = n as f64;
        let z0 = self.particles.iter().map(|p| p.z).sum::<f64>() / nf;
        let var = self
            .particles
            .iter()
            .map(|p| (p.z - z0).powi(2))
            .sum::<f64>()
            / nf;
        (z0, var.sqrt())
    }
}

// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Bunch Slicer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Longitudinal slicing of a particle bunch.
//!
//! The slicer never reorders the bunch. It returns a z-sorted permutation
//! of particle indices plus `nbins + 1` boundaries into that permutation.

use ndarray::Array1;
use wake_types::error::{WakeError, WakeResult};
use wake_types::state::{ParticleBunch, Point2D};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BunchSlicer {
    nbins: usize,
    nsig: f64,
}

/// Partition of a bunch into contiguous longitudinal bins.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceTable {
    order: Vec<usize>,
    boundaries: Vec<usize>,
    pub z0: f64,
    pub sigz: f64,
    pub zmin: f64,
    pub zmax: f64,
    pub dz: f64,
    /// Summed particle weight of each slice.
    slice_charge: Vec<f64>,
    total_charge: f64,
    particle_count: usize,
}

impl BunchSlicer {
    pub fn new(nbins: usize, nsig: f64) -> WakeResult<Self> {
        if nbins == 0 {
            return Err(WakeError::ConfigError("nbins must be >= 1".to_string()));
        }
        if !nsig.is_finite() || nsig <= 0.0 {
            return Err(WakeError::ConfigError(format!(
                "nsig must be finite and > 0, got {nsig}"
            )));
        }
        Ok(BunchSlicer { nbins, nsig })
    }

    pub fn nbins(&self) -> usize {
        self.nbins
    }

    /// Bins the bunch over `[z0 - nsig·σz, z0 + nsig·σz)`.
    pub fn slice(&self, bunch: &ParticleBunch) -> WakeResult<SliceTable> {
        if bunch.is_empty() {
            return Err(WakeError::PhysicsViolation(
                "cannot slice an empty bunch".to_string(),
            ));
        }
        let particles = bunch.particles();
        if particles.iter().any(|p| !p.z.is_finite()) {
            return Err(WakeError::PhysicsViolation(
                "particle z coordinates must be finite".to_string(),
            ));
        }
        let (z0, sigz) = bunch.z_moments();
        if !sigz.is_finite() || sigz <= 0.0 {
            return Err(WakeError::PhysicsViolation(format!(
                "bunch length must be finite and > 0, got sigz={sigz}"
            )));
        }
        let zmin = z0 - self.nsig * sigz;
        let zmax = z0 + self.nsig * sigz;
        let dz = (zmax - zmin) / self.nbins as f64;

        // Stable: equal z keeps bunch order.
        let mut order: Vec<usize> = (0..particles.len()).collect();
        order.sort_by(|&a, &b| particles[a].z.total_cmp(&particles[b].z));

        let mut boundaries = Vec::with_capacity(self.nbins + 1);
        for i in 0..self.nbins {
            let edge = zmin + i as f64 * dz;
            boundaries.push(order.partition_point(|&k| particles[k].z < edge));
        }
        boundaries.push(order.partition_point(|&k| particles[k].z < zmax));

        let outside = boundaries[0] + (order.len() - boundaries[self.nbins]);
        if outside > 0 {
            log::debug!(
                "{outside} of {} particles outside the slicing window [{zmin:.4e}, {zmax:.4e}]",
                order.len()
            );
        }

        let slice_charge: Vec<f64> = boundaries
            .windows(2)
            .map(|b| order[b[0]..b[1]].iter().map(|&k| particles[k].weight).sum())
            .collect();

        Ok(SliceTable {
            order,
            boundaries,
            slice_charge,
            total_charge: bunch.total_charge(),
            z0,
            sigz,
            zmin,
            zmax,
            dz,
            particle_count: particles.len(),
        })
    }
}

impl SliceTable {
    pub fn nbins(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// `nbins + 1` positions into the z-sorted permutation.
    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    /// Number of particles the table was built for.
    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    /// Bunch indices of the particles in slice `i`, sorted by z.
    pub fn slice_indices(&self, i: usize) -> &[usize] {
        &self.order[self.boundaries[i]..self.boundaries[i + 1]]
    }

    pub fn slice_len(&self, i: usize) -> usize {
        self.boundaries[i + 1] - self.boundaries[i]
    }

    /// Slice containing longitudinal position `z`, if inside the window.
    pub fn slice_of(&self, z: f64) -> Option<usize> {
        if !(z >= self.zmin && z < self.zmax) {
            return None;
        }
        let i = ((z - self.zmin) / self.dz) as usize;
        Some(i.min(self.nbins() - 1))
    }

    /// Summed particle weight in slice `i`.
    pub fn slice_charge(&self, i: usize) -> f64 {
        self.slice_charge[i]
    }

    /// Charge-weighted mean (x, y) of slice `i`. Empty slices give (0, 0);
    /// slices without net weight fall back to the plain mean.
    pub fn centroid(&self, bunch: &ParticleBunch, i: usize) -> Point2D {
        let particles = bunch.particles();
        let indices = self.slice_indices(i);
        match indices {
            [] => Point2D::default(),
            [k] => Point2D::new(particles[*k].x, particles[*k].y),
            _ => {
                let q = self.slice_charge[i];
                let mut c = Point2D::default();
                if q != 0.0 && q.is_finite() {
                    for &k in indices {
                        let p = &particles[k];
                        c += Point2D::new(p.x, p.y) * p.weight;
                    }
                    c / q
                } else {
                    for &k in indices {
                        c += Point2D::new(particles[k].x, particles[k].y);
                    }
                    c / indices.len() as f64
                }
            }
        }
    }

    /// Centroids of all slices, plus the last one repeated for the
    /// closing boundary.
    pub fn centroids(&self, bunch: &ParticleBunch) -> Vec<Point2D> {
        let nbins = self.nbins();
        let mut xyc = Vec::with_capacity(nbins + 1);
        for i in 0..nbins {
            xyc.push(self.centroid(bunch, i));
        }
        xyc.push(xyc[nbins - 1]);
        xyc
    }

    /// Normalised line density `q_i / (Q·dz)`; sums to the in-window
    /// charge fraction divided by `dz`. A bunch without net weight is
    /// counted by particle number instead.
    pub fn line_density(&self) -> Array1<f64> {
        if self.total_charge != 0.0 && self.total_charge.is_finite() {
            let norm = self.total_charge * self.dz;
            Array1::from_shape_fn(self.nbins(), |i| self.slice_charge[i] / norm)
        } else {
            let norm = self.particle_count as f64 * self.dz;
            Array1::from_shape_fn(self.nbins(), |i| self.slice_len(i) as f64 / norm)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Property-Based Tests (proptest) for wake-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for wake-types using proptest.
//!
//! Covers: bunch charge bookkeeping, z-moment invariants,
//! configuration serialization roundtrip.

use proptest::prelude::*;
use wake_types::config::{ImpulseLocation, WakeConfig, WakeKinds};
use wake_types::state::{Particle, ParticleBunch};

// ── Bunch Invariants ─────────────────────────────────────────────────

proptest! {
    /// Distributing a total charge over n particles conserves it.
    #[test]
    fn total_charge_conserved(
        n in 1usize..500,
        q in -1.0e11f64..1.0e11,
    ) {
        let bunch = ParticleBunch::with_total_charge(1.0, q, vec![Particle::default(); n]);
        prop_assert_eq!(bunch.len(), n);
        prop_assert!((bunch.total_charge() - q).abs() <= 1e-9 * q.abs().max(1.0));
    }

    /// The mean z lies within the sampled range and σz is non-negative.
    #[test]
    fn z_moments_bounded(zs in prop::collection::vec(-1.0f64..1.0, 1..200)) {
        let particles = zs.iter().map(|&z| Particle::at(0.0, 0.0, z, 1.0)).collect();
        let bunch = ParticleBunch::new(1.0, particles);
        let (z0, sigz) = bunch.z_moments();
        let lo = zs.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = zs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(z0 >= lo - 1e-12 && z0 <= hi + 1e-12);
        prop_assert!(sigz >= 0.0);
        prop_assert!(sigz <= (hi - lo) + 1e-12);
    }
}

// ── Config Serialization ─────────────────────────────────────────────

proptest! {
    /// WakeConfig survives a JSON roundtrip and still validates.
    #[test]
    fn wake_config_json_roundtrip(
        nbins in 1usize..1000,
        nsig in 0.5f64..10.0,
        priority in -10i32..10,
        at_exit in any::<bool>(),
    ) {
        let mut cfg = WakeConfig::new(priority, nbins, nsig).unwrap();
        cfg.impulse_location = if at_exit { ImpulseLocation::AtExit } else { ImpulseLocation::AtCentre };
        cfg.wake_kinds = WakeKinds::Transverse;
        let json = serde_json::to_string(&cfg).unwrap();
        let back: WakeConfig = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&back, &cfg);
        prop_assert!(back.validate().is_ok());
    }
}

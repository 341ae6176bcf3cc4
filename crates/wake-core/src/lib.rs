// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Wake Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Bunch slicing and wake-field processes.
//!
//! Slicing and wake potentials first, then the base and coupler
//! processes and a minimal tracker driving them.

pub mod component;
pub mod coupler;
pub mod distribution;
pub mod potentials;
pub mod process;
pub mod slicer;
pub mod tracker;

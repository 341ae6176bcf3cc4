// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical constants and the unit system.
//!
//! Energies and momenta are in GeV, lengths in metres. A quantity in volts
//! is converted to the internal unit by multiplying with [`VOLT`].

/// Elementary charge (C)
pub const ELECTRON_CHARGE: f64 = 1.602176634e-19;

/// Base energy unit.
pub const GEV: f64 = 1.0;

/// 1 MeV in GeV.
pub const MEV: f64 = 1.0e-3;

/// 1 V expressed in GeV per unit charge.
pub const VOLT: f64 = 1.0e-9;

/// Electron rest mass (MeV)
pub const ELECTRON_MASS_MEV: f64 = 0.51099895;

/// Proton rest mass (GeV)
pub const PROTON_MASS_GEV: f64 = 0.93827208816;

/// Avogadro constant (1/mol)
pub const AVOGADRO: f64 = 6.02214076e23;

/// 1 barn in m².
pub const BARN: f64 = 1.0e-28;

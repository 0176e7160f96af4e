// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Drawing unit of a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Unitless; converts like millimetres.
    #[default]
    None,
    /// Inch.
    Inch,
    /// Foot.
    Foot,
    /// Yard.
    Yard,
    /// Millimetre.
    Millimeter,
    /// Centimetre.
    Centimeter,
    /// Metre.
    Meter,
    /// Micrometre.
    Micron,
}

impl Unit {
    /// Length of one of this unit in millimetres.
    #[must_use]
    pub fn millimeters(self) -> f64 {
        match self {
            Self::None | Self::Millimeter => 1.0,
            Self::Inch => 25.4,
            Self::Foot => 304.8,
            Self::Yard => 914.4,
            Self::Centimeter => 10.0,
            Self::Meter => 1000.0,
            Self::Micron => 0.001,
        }
    }

    /// Converts `value` from `from` units to `to` units.
    #[must_use]
    pub fn convert(value: f64, from: Self, to: Self) -> f64 {
        if from == to {
            return value;
        }
        value * from.millimeters() / to.millimeters()
    }
}

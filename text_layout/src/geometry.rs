// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Differences below this are treated as equal when comparing sizes.
pub const MACHINE_EPSILON_1000: f32 = 1.0e-3;

/// A 2D point or offset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component, growing downwards.
    pub y: f32,
}

impl Vector2 {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a vector.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width and a height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// An unconstrained size, used to measure text without wrapping.
    pub const MAX: Self = Self {
        width: f32::MAX,
        height: f32::MAX,
    };

    /// Creates a size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are within [`MACHINE_EPSILON_1000`] of `other`.
    pub fn approx_eq(&self, other: &Self) -> bool {
        (self.width - other.width).abs() < MACHINE_EPSILON_1000
            && (self.height - other.height).abs() < MACHINE_EPSILON_1000
    }

    /// Whether either dimension is within [`MACHINE_EPSILON_1000`] of zero.
    pub fn is_degenerate(&self) -> bool {
        self.width < MACHINE_EPSILON_1000 || self.height < MACHINE_EPSILON_1000
    }
}

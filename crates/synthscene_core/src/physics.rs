//! Physical properties of simulated objects
//!
//! Assets ship default values in their property files. Callers may pin any
//! subset explicitly; explicit values always win.

use serde::{Serialize, Deserialize};
use synthscene_math::Aabb;

/// Physical properties passed to the simulator alongside the collision file
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalProperties {
    /// Mass in kilograms
    pub mass: f32,
    /// Friction coefficient (0.0 = ice, 1.0 = rubber)
    pub friction: f32,
    /// Restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: f32,
    /// Object-space bounding box, when known
    #[serde(default)]
    pub bounds: Option<Aabb>,
}

impl Default for PhysicalProperties {
    fn default() -> Self {
        Self {
            mass: 1.0,
            friction: 0.5,
            restitution: 0.5,
            bounds: None,
        }
    }
}

impl PhysicalProperties {
    /// Ice-like surface: very low friction, slight bounce
    pub const ICE: Self = Self {
        mass: 1.0,
        friction: 0.05,
        restitution: 0.1,
        bounds: None,
    };

    /// Rubber-like surface: high friction, very bouncy
    pub const RUBBER: Self = Self {
        mass: 1.0,
        friction: 0.9,
        restitution: 0.8,
        bounds: None,
    };

    /// Whether friction and restitution lie in [0, 1] and mass is not negative
    pub fn is_physically_valid(&self) -> bool {
        self.mass >= 0.0
            && (0.0..=1.0).contains(&self.friction)
            && (0.0..=1.0).contains(&self.restitution)
    }
}

/// Caller-supplied values that take precedence over asset defaults
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalOverrides {
    #[serde(default)]
    pub mass: Option<f32>,
    #[serde(default)]
    pub friction: Option<f32>,
    #[serde(default)]
    pub restitution: Option<f32>,
    #[serde(default)]
    pub bounds: Option<Aabb>,
}

impl PhysicalOverrides {
    /// No overrides
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = Some(friction);
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = Some(restitution);
        self
    }

    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Fill every unset value from `defaults`
    pub fn or(self, defaults: PhysicalOverrides) -> Self {
        Self {
            mass: self.mass.or(defaults.mass),
            friction: self.friction.or(defaults.friction),
            restitution: self.restitution.or(defaults.restitution),
            bounds: self.bounds.or(defaults.bounds),
        }
    }

    /// Final properties, falling back to [`PhysicalProperties::default`]
    pub fn resolve(self) -> PhysicalProperties {
        let base = PhysicalProperties::default();
        PhysicalProperties {
            mass: self.mass.unwrap_or(base.mass),
            friction: self.friction.unwrap_or(base.friction),
            restitution: self.restitution.unwrap_or(base.restitution),
            bounds: self.bounds.or(base.bounds),
        }
    }
}

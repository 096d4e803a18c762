/*!
Simulation settings and tolerances.

These constants centralize the parameters used by the integrator, the
collision pipeline and impulse response. Keeping them together makes tuning
easier and keeps the tick deterministic across platforms.

Notes
- Distances are in meters, time in seconds, mass in kilograms.
- Restitution and positional correction are global: there are no per-body
  material properties.
- [`SimulationSettings`] carries these as defaults; hosts can override any of
  them when creating a world.
*/

use crate::error::PhysicsError;

/// Vertical gravity acceleration (m/s^2). Negative means "down" (-Y).
pub const GRAVITY_Y: f32 = -9.8;

/// Elasticity applied to every contact (0 = inelastic, 1 = elastic).
pub const RESTITUTION: f32 = 0.8;

/// Fixed distance each non-static body is pushed along the contact normal
/// after an impulse. Not proportional to penetration depth.
pub const POSITION_CORRECTION: f32 = 0.1;

/// Mass used for static bodies. Treated as infinite by the solver.
pub const STATIC_MASS: f32 = 1.0e6;

/// Mass assigned to every dynamic body at registration.
pub const DYNAMIC_MASS: f32 = 10.0;

/// Reference radius used for the scalar moment of inertia: `I = 2/5 * m * r^2`.
pub const INERTIA_REFERENCE_RADIUS: f32 = 1.0;

/// Rotations whose magnitude is at or below this are left untouched instead of
/// being renormalized.
pub const ROTATION_EPS: f32 = 1.0e-6;

/// SAT cross-product axes shorter than this come from (nearly) parallel edges
/// and are skipped.
pub const SAT_PARALLEL_EPS: f32 = 1.0e-3;

/// Contact normals shorter than this (coincident centers) are degenerate.
pub const NORMAL_EPS: f32 = 1.0e-6;

/// Log stage timings once every this many ticks when timing is enabled.
pub const TIMING_SAMPLE_INTERVAL: u64 = 60;

/// Scalar moment of inertia for a body of the given mass.
#[inline]
pub fn moment_of_inertia(mass: f32) -> f32 {
    0.4 * mass * INERTIA_REFERENCE_RADIUS * INERTIA_REFERENCE_RADIUS
}

/// Tunable parameters for a [`crate::PhysicsWorld`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationSettings {
    /// Vertical acceleration applied to dynamic bodies every tick.
    pub gravity_y: f32,
    /// Restitution coefficient in `[0, 1]`.
    pub restitution: f32,
    /// Positional correction offset along the contact normal.
    pub correction_offset: f32,
    /// Mass sentinel for static bodies.
    pub static_mass: f32,
    /// Default mass for dynamic bodies.
    pub dynamic_mass: f32,
    /// Emit per-stage timings through `log::debug!`.
    pub log_stage_timings: bool,
    /// Tick interval between sampled timing logs (0 disables sampling).
    pub timing_sample_interval: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            gravity_y: GRAVITY_Y,
            restitution: RESTITUTION,
            correction_offset: POSITION_CORRECTION,
            static_mass: STATIC_MASS,
            dynamic_mass: DYNAMIC_MASS,
            log_stage_timings: false,
            timing_sample_interval: TIMING_SAMPLE_INTERVAL,
        }
    }
}

impl SimulationSettings {
    pub fn with_gravity(mut self, gravity_y: f32) -> Self {
        self.gravity_y = gravity_y;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_correction_offset(mut self, offset: f32) -> Self {
        self.correction_offset = offset;
        self
    }

    pub fn with_stage_timings(mut self, every_n_ticks: u64) -> Self {
        self.log_stage_timings = every_n_ticks > 0;
        self.timing_sample_interval = every_n_ticks;
        self
    }

    /// Reject settings that would make the solver produce NaNs or push bodies
    /// in the wrong direction.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.gravity_y.is_finite() {
            return Err(PhysicsError::InvalidSettings("gravity must be finite"));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(PhysicsError::InvalidSettings(
                "restitution must be within [0, 1]",
            ));
        }
        if !(self.correction_offset >= 0.0 && self.correction_offset.is_finite()) {
            return Err(PhysicsError::InvalidSettings(
                "correction offset must be finite and non-negative",
            ));
        }
        if !(self.static_mass > 0.0 && self.dynamic_mass > 0.0) {
            return Err(PhysicsError::InvalidSettings("masses must be positive"));
        }
        Ok(())
    }

    /// Whether stage timings should be logged on `tick`.
    #[inline]
    pub fn should_sample_timings(&self, tick: u64) -> bool {
        self.log_stage_timings
            && self.timing_sample_interval > 0
            && tick % self.timing_sample_interval == 0
    }
}

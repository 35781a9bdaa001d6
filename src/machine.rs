//! The interface boundary toward the rest of the machine.
//!
//! The interpreter drives motion, spindle, coolant and the persisted settings
//! store exclusively through these traits; it has no awareness of registers,
//! ports or pins. Implementations may block the calling thread (a bounded
//! motion queue refusing a new segment is the intended backpressure) but are
//! not expected to fail recoverably: a hardware-level fault is fatal one
//! layer below this interface.

#[cfg(feature = "arc-motion")]
use crate::state::Plane;
use crate::state::SpindleDirection;

/// The trajectory planner and pulse generator.
pub trait MotionControl {
    /// Queue a straight move to `target` (X, Y, Z in millimeters, C in
    /// degrees). `rate` is millimeters per second, or, when
    /// `is_inverse_time`, the number of seconds the whole move must take.
    fn line(&mut self, target: [f64; 4], rate: f64, is_inverse_time: bool);

    /// Hold motion for the given number of milliseconds.
    fn dwell(&mut self, milliseconds: u32);

    /// Run the homing cycle.
    fn go_home(&mut self);

    /// Redefine where the machine believes it is, without moving.
    fn set_current_position(&mut self, position: [f64; 4]);

    /// Queue a circular move to `target` in the given `plane`, with the arc
    /// center at `offset` (I, J, K relative to the current position) unless
    /// `radius` is given. Feed semantics match [`MotionControl::line`]; the
    /// circle geometry itself is the planner's concern.
    #[cfg(feature = "arc-motion")]
    #[allow(clippy::too_many_arguments)]
    fn arc(
        &mut self,
        target: [f64; 4],
        offset: [f64; 3],
        radius: Option<f64>,
        plane: Plane,
        clockwise: bool,
        rate: f64,
        is_inverse_time: bool,
    );
}

/// The spindle actuator.
pub trait SpindleControl {
    /// Run at `speed` (RPM/100) in the given direction.
    fn run(&mut self, direction: SpindleDirection, speed: i16);

    fn stop(&mut self);
}

/// The coolant actuator. A single flood flag; mist (M7) is unsupported.
pub trait CoolantControl {
    fn set_flood(&mut self, on: bool);
}

/// The persisted parameter store behind `$` configuration lines.
pub trait SettingsStore {
    /// Default feed rate in millimeters per minute, as the operator entered it.
    fn default_feed_rate(&self) -> f64;

    /// Default seek rate in millimeters per minute.
    fn default_seek_rate(&self) -> f64;

    /// Print every numbered parameter with its units annotation.
    fn dump(&self);

    /// Validate `index` against the recognized parameter table and persist
    /// `value`. An unknown index is reported by the store, not persisted,
    /// and is not an interpreter error.
    fn store(&mut self, index: u32, value: f64);
}

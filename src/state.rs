//! The persistent modal record the interpreter carries from line to line.

use crate::machine::SettingsStore;
use crate::Error;

pub(crate) const MM_PER_INCH: f64 = 25.4;

/// Index of an axis within a position or target vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
    /// Rotary axis, degrees.
    C = 3,
}

/// The active working plane: an ordered triple of pairwise-distinct axes.
///
/// Only circular motion consumes it; it is carried modally regardless so a
/// later `G2` sees the plane selected lines ago.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plane {
    pub axis_0: Axis,
    pub axis_1: Axis,
    pub axis_2: Axis,
}

impl Plane {
    /// G17
    pub const XY: Plane = Plane {
        axis_0: Axis::X,
        axis_1: Axis::Y,
        axis_2: Axis::Z,
    };
    /// G18
    pub const XZ: Plane = Plane {
        axis_0: Axis::X,
        axis_1: Axis::Z,
        axis_2: Axis::Y,
    };
    /// G19
    pub const YZ: Plane = Plane {
        axis_0: Axis::Y,
        axis_1: Axis::Z,
        axis_2: Axis::X,
    };
}

/// G0/G1/G2/G3/G80. Persists until a later line changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    Seek,
    Linear,
    #[cfg(feature = "arc-motion")]
    ArcCw,
    #[cfg(feature = "arc-motion")]
    ArcCcw,
    Cancel,
}

/// G20/G21.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Millimeters,
    Inches,
}

/// G90/G91.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMode {
    Absolute,
    Relative,
}

/// G93/G94: how an `F` word is to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedRateMode {
    UnitsPerMinute,
    InverseTime,
}

/// M0/M1 pause, M2/M30/M60 complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramFlow {
    Running,
    Paused,
    Completed,
}

/// Spindle rotation sense. "Off" is the absence of a direction, which keeps
/// [`crate::machine::SpindleControl::run`] from ever being handed a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpindleDirection {
    Cw,
    Ccw,
}

/// Where the interpreter believes the machine is and how it will read the
/// next line. One instance lives as long as the firmware; it is mutated only
/// by a line that parsed and dispatched completely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModalState {
    pub motion_mode: MotionMode,
    pub plane: Plane,
    pub units: Units,
    pub distance_mode: DistanceMode,
    pub feed_rate_mode: FeedRateMode,
    pub program_flow: ProgramFlow,
    /// Millimeters per second.
    pub feed_rate: f64,
    /// Millimeters per second.
    pub seek_rate: f64,
    /// X, Y, Z in millimeters, C in degrees. Authoritative for parsing even
    /// while the physical tool is still mid-motion.
    pub position: [f64; 4],
    /// Last `T` word.
    pub tool: u8,
    pub spindle: Option<SpindleDirection>,
    /// RPM/100.
    pub spindle_speed: i16,
    pub coolant_flood: bool,
    /// Outcome of the most recent line; cleared when a new line starts.
    pub status: Option<Error>,
}

impl ModalState {
    /// The power-on state: seek mode, XY plane, millimeters, absolute,
    /// units-per-minute feed, everything else off, with feed and seek rates
    /// seeded from the settings store's per-minute defaults.
    pub fn initial<P: SettingsStore>(settings: &P) -> Self {
        ModalState {
            motion_mode: MotionMode::Seek,
            plane: Plane::XY,
            units: Units::Millimeters,
            distance_mode: DistanceMode::Absolute,
            feed_rate_mode: FeedRateMode::UnitsPerMinute,
            program_flow: ProgramFlow::Running,
            feed_rate: settings.default_feed_rate() / 60.0,
            seek_rate: settings.default_seek_rate() / 60.0,
            position: [0.0; 4],
            tool: 0,
            spindle: None,
            spindle_speed: 0,
            coolant_flood: false,
            status: None,
        }
    }

    /// Converts an input value to millimeters under the current units mode.
    /// Applied exactly once, at the point a word's value is consumed.
    pub(crate) fn to_millimeters(&self, value: f64) -> f64 {
        match self.units {
            Units::Inches => value * MM_PER_INCH,
            Units::Millimeters => value,
        }
    }
}

//! The line interpreter: two passes over the scanned words, then dispatch.
//!
//! Pass 1 settles every modal selection carried by the line (motion mode,
//! plane, units, distance mode, feed rate mode, program flow, spindle,
//! coolant, tool, deferred one-shot action). Pass 2 re-scans the same text
//! and computes the numeric operands against those selections. Both passes
//! and the dispatcher work on a scratch copy of the modal state; the copy is
//! committed only once the whole line has succeeded, so a failing line
//! cannot leak partially-applied mode changes.


use log::{debug, trace};

use crate::machine::{CoolantControl, MotionControl, SettingsStore, SpindleControl};
use crate::settings;
use crate::state::{
    Axis, DistanceMode, FeedRateMode, ModalState, MotionMode, Plane, ProgramFlow,
    SpindleDirection, Units,
};
use crate::words::Words;
use crate::Error;

/// One-shot operation deferred to the dispatch phase, mutually exclusive
/// with the line's motion mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum NextAction {
    #[default]
    Motion,
    Dwell,
    GoHome,
    SetOffsets,
}

/// Per-line scratch: the operands pass 2 resolves, discarded once the line
/// has been dispatched.
#[derive(Debug)]
struct Block {
    next_action: NextAction,
    /// Starts as a copy of the current position; axis words replace or add
    /// to it depending on the distance mode.
    target: [f64; 4],
    /// I, J, K arc center offsets. Resolved even when circular motion is
    /// compiled out, so a line like `G1X1I2` stays accepted.
    #[cfg_attr(not(feature = "arc-motion"), allow(dead_code))]
    offset: [f64; 3],
    #[cfg_attr(not(feature = "arc-motion"), allow(dead_code))]
    radius: Option<f64>,
    /// Raw `P` word; dwell duration in seconds.
    p: f64,
    /// Seconds for this motion only; never persisted.
    inverse_feed_rate: Option<f64>,
    /// G53: absolute positioning for this line only.
    absolute_override: bool,
}

impl Block {
    fn new(position: [f64; 4]) -> Self {
        Block {
            next_action: NextAction::default(),
            target: position,
            offset: [0.0; 3],
            radius: None,
            p: 0.0,
            inverse_feed_rate: None,
            absolute_override: false,
        }
    }
}

/// The interpreter: persistent modal state plus the machine collaborators it
/// dispatches to. Single-threaded and run-to-completion; `execute_line` does
/// not return until every action the line implies has been handed over.
pub struct Interpreter<M, S, C, P> {
    state: ModalState,
    motion: M,
    spindle: S,
    coolant: C,
    settings: P,
}

impl<M, S, C, P> Interpreter<M, S, C, P>
where
    M: MotionControl,
    S: SpindleControl,
    C: CoolantControl,
    P: SettingsStore,
{
    pub fn new(motion: M, spindle: S, coolant: C, settings: P) -> Self {
        let state = ModalState::initial(&settings);
        Interpreter {
            state,
            motion,
            spindle,
            coolant,
            settings,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }

    pub fn spindle(&self) -> &S {
        &self.spindle
    }

    pub fn coolant(&self) -> &C {
        &self.coolant
    }

    pub fn settings_store(&self) -> &P {
        &self.settings
    }

    /// Executes one line of G-code. The line is assumed to be upper-cased,
    /// whitespace-free ASCII, as the serial front end produces it.
    ///
    /// A line opening with `(` is a comment and does nothing. A leading `/`
    /// (block delete) is consumed but does not suppress execution; the skip
    /// behavior is not implemented. A line opening with
    /// `$` is a configuration command routed to the settings store. Anything
    /// else runs through the two G-code passes; on success the resolved
    /// action is dispatched and the new modal state committed, on failure the
    /// modal state is untouched apart from [`ModalState::status`].
    pub fn execute_line(&mut self, line: &str) -> Result<(), Error> {
        self.state.status = None;
        let result = self.interpret(line);
        if let Err(e) = result {
            debug!("line {:?} rejected: {}", line, e);
            self.state.status = Some(e);
        }
        result
    }

    fn interpret(&mut self, line: &str) -> Result<(), Error> {
        let mut start = 0;
        match line.as_bytes().first() {
            Some(b'(') => return Ok(()),
            Some(b'$') => return settings::execute(&mut self.settings, line),
            Some(b'/') => start = 1,
            _ => {}
        }

        let mut gc = self.state;
        let mut block = Block::new(gc.position);

        resolve_commands(line, start, &mut gc, &mut block)?;
        resolve_parameters(line, start, &mut gc, &mut block)?;
        self.dispatch(&gc, &block);

        gc.position = block.target;
        self.state = gc;
        Ok(())
    }

    /// Issues the line's side effects in order: spindle, coolant, then the
    /// deferred action or motion. Spindle and coolant intent is re-asserted
    /// on every line, changed or not.
    fn dispatch(&mut self, gc: &ModalState, block: &Block) {
        match gc.spindle {
            Some(direction) => self.spindle.run(direction, gc.spindle_speed),
            None => self.spindle.stop(),
        }
        self.coolant.set_flood(gc.coolant_flood);

        match block.next_action {
            NextAction::GoHome => self.motion.go_home(),
            NextAction::Dwell => self.motion.dwell((block.p * 1000.0) as u32),
            NextAction::SetOffsets => self.motion.set_current_position(block.target),
            NextAction::Motion => match gc.motion_mode {
                MotionMode::Cancel => {}
                MotionMode::Seek => {
                    trace!("seek to {:?} at {} mm/s", block.target, gc.seek_rate);
                    self.motion.line(block.target, gc.seek_rate, false);
                }
                MotionMode::Linear => {
                    let (rate, is_inverse_time) = feed_selection(gc, block);
                    trace!("feed to {:?} at {}", block.target, rate);
                    self.motion.line(block.target, rate, is_inverse_time);
                }
                #[cfg(feature = "arc-motion")]
                MotionMode::ArcCw | MotionMode::ArcCcw => {
                    let (rate, is_inverse_time) = feed_selection(gc, block);
                    self.motion.arc(
                        block.target,
                        block.offset,
                        block.radius,
                        gc.plane,
                        gc.motion_mode == MotionMode::ArcCw,
                        rate,
                        is_inverse_time,
                    );
                }
            },
        }
    }
}

/// Pass 1: modal selections only. Operand letters are left for pass 2.
fn resolve_commands(
    line: &str,
    start: usize,
    gc: &mut ModalState,
    block: &mut Block,
) -> Result<(), Error> {
    for word in Words::new(line, start) {
        let word = word?;
        let int_value = word.value as i32;
        match word.letter {
            'G' => match int_value {
                0 => gc.motion_mode = MotionMode::Seek,
                1 => gc.motion_mode = MotionMode::Linear,
                #[cfg(feature = "arc-motion")]
                2 => gc.motion_mode = MotionMode::ArcCw,
                #[cfg(feature = "arc-motion")]
                3 => gc.motion_mode = MotionMode::ArcCcw,
                4 => block.next_action = NextAction::Dwell,
                17 => gc.plane = Plane::XY,
                18 => gc.plane = Plane::XZ,
                19 => gc.plane = Plane::YZ,
                20 => gc.units = Units::Inches,
                21 => gc.units = Units::Millimeters,
                28 | 30 => block.next_action = NextAction::GoHome,
                53 => block.absolute_override = true,
                80 => gc.motion_mode = MotionMode::Cancel,
                90 => gc.distance_mode = DistanceMode::Absolute,
                91 => gc.distance_mode = DistanceMode::Relative,
                92 => block.next_action = NextAction::SetOffsets,
                93 => gc.feed_rate_mode = FeedRateMode::InverseTime,
                94 => gc.feed_rate_mode = FeedRateMode::UnitsPerMinute,
                _ => return Err(Error::UnsupportedStatement),
            },
            'M' => match int_value {
                0 | 1 => gc.program_flow = ProgramFlow::Paused,
                2 | 30 | 60 => gc.program_flow = ProgramFlow::Completed,
                3 => gc.spindle = Some(SpindleDirection::Cw),
                4 => gc.spindle = Some(SpindleDirection::Ccw),
                5 => gc.spindle = None,
                8 => gc.coolant_flood = true,
                9 => gc.coolant_flood = false,
                _ => return Err(Error::UnsupportedStatement),
            },
            'T' => gc.tool = word.value as u8,
            _ => {}
        }
    }
    Ok(())
}

/// Pass 2: numeric operands, interpreted against the modes pass 1 settled.
fn resolve_parameters(
    line: &str,
    start: usize,
    gc: &mut ModalState,
    block: &mut Block,
) -> Result<(), Error> {
    for word in Words::new(line, start) {
        let word = word?;
        let unit_converted = gc.to_millimeters(word.value);
        match word.letter {
            'F' => {
                if gc.feed_rate_mode == FeedRateMode::InverseTime {
                    block.inverse_feed_rate = Some(unit_converted);
                } else if gc.motion_mode == MotionMode::Seek {
                    gc.seek_rate = unit_converted / 60.0;
                } else {
                    gc.feed_rate = unit_converted / 60.0;
                }
            }
            'I' | 'J' | 'K' => {
                block.offset[(word.letter as u8 - b'I') as usize] = unit_converted;
            }
            'P' => block.p = word.value,
            'R' => block.radius = Some(unit_converted),
            'S' => gc.spindle_speed = word.value as i16,
            'X' | 'Y' | 'Z' => {
                apply_target(gc, block, (word.letter as u8 - b'X') as usize, unit_converted);
            }
            'C' => apply_target(gc, block, Axis::C as usize, unit_converted),
            _ => {}
        }
    }
    Ok(())
}

fn apply_target(gc: &ModalState, block: &mut Block, axis: usize, value: f64) {
    if gc.distance_mode == DistanceMode::Absolute || block.absolute_override {
        block.target[axis] = value;
    } else {
        block.target[axis] += value;
    }
}

/// Picks the rate argument for a feed move. In inverse time mode a negative
/// rate marks a move whose `F` word was omitted; the planner is expected to
/// reject it.
fn feed_selection(gc: &ModalState, block: &Block) -> (f64, bool) {
    match gc.feed_rate_mode {
        FeedRateMode::InverseTime => (block.inverse_feed_rate.unwrap_or(-1.0), true),
        FeedRateMode::UnitsPerMinute => (gc.feed_rate, false),
    }
}

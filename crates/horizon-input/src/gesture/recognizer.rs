//! The recognizer interface.

use std::ops::BitOr;
use std::time::Duration;

use horizon_input_core::{WidgetId, WidgetTree};
use slotmap::new_key_type;

use super::{Gesture, GestureId, GestureTimerId, GestureTimers};
use crate::events::Event;

new_key_type! {
    /// Handle of a registered recognizer.
    pub struct RecognizerId;
}

/// A recognizer's verdict for one event.
///
/// The low byte holds exactly one state (`IGNORE`, `MAYBE`, `TRIGGER`,
/// `FINISH`, `CANCEL`); hints such as `CONSUME` are or-ed on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecognizerResult(u16);

impl RecognizerResult {
    /// The event is not relevant to the gesture.
    pub const IGNORE: RecognizerResult = RecognizerResult(0x01);
    /// The event may be part of a gesture; nothing is delivered yet.
    pub const MAYBE: RecognizerResult = RecognizerResult(0x02);
    /// The gesture started or was updated.
    pub const TRIGGER: RecognizerResult = RecognizerResult(0x04);
    /// The gesture finished.
    pub const FINISH: RecognizerResult = RecognizerResult(0x08);
    /// The event ruled the gesture out.
    pub const CANCEL: RecognizerResult = RecognizerResult(0x10);
    /// Hint: do not deliver the event to widgets.
    pub const CONSUME: RecognizerResult = RecognizerResult(0x100);

    const STATE_MASK: u16 = 0x00ff;

    /// The state part of the verdict.
    pub fn state(self) -> RecognizerResult {
        RecognizerResult(self.0 & Self::STATE_MASK)
    }

    /// Whether the consume hint is set.
    pub fn consumes(self) -> bool {
        self.0 & Self::CONSUME.0 != 0
    }
}

impl BitOr for RecognizerResult {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        RecognizerResult(self.0 | rhs.0)
    }
}

/// What a recognizer may touch while it runs.
pub struct RecognizerContext<'a> {
    gesture: GestureId,
    tree: &'a WidgetTree,
    timers: &'a mut GestureTimers,
}

impl<'a> RecognizerContext<'a> {
    pub(crate) fn new(gesture: GestureId, tree: &'a WidgetTree, timers: &'a mut GestureTimers) -> Self {
        Self { gesture, tree, timers }
    }

    /// The gesture being recognized.
    pub fn gesture_id(&self) -> GestureId {
        self.gesture
    }

    /// Read access to the widget tree.
    pub fn tree(&self) -> &WidgetTree {
        self.tree
    }

    /// Start a single-shot timer. When it fires, the recognizer receives an
    /// [`Event::Timer`] with the returned id.
    pub fn start_timer(&mut self, delay: Duration) -> GestureTimerId {
        self.timers.start(self.gesture, delay)
    }

    /// Stop a timer started by [`start_timer`](Self::start_timer).
    pub fn kill_timer(&mut self, timer: GestureTimerId) {
        self.timers.kill(timer);
    }
}

/// A gesture recognizer.
///
/// One recognizer instance serves every widget with a context for its
/// gesture type; per-widget data lives in the [`Gesture`] payload.
pub trait GestureRecognizer {
    /// Create a gesture object for `target`.
    ///
    /// Called with `None` once at registration to learn the gesture type.
    /// A recognizer for a custom gesture returns a [`GestureType::Custom`]
    /// gesture; the manager replaces its id with the assigned one.
    ///
    /// [`GestureType::Custom`]: super::GestureType::Custom
    fn create(&mut self, target: Option<WidgetId>, tree: &mut WidgetTree) -> Option<Gesture>;

    /// Look at one event sent to `watched` and return a verdict.
    fn recognize(
        &mut self,
        gesture: &mut Gesture,
        watched: WidgetId,
        event: &Event,
        ctx: &mut RecognizerContext<'_>,
    ) -> RecognizerResult;

    /// Clear the payload at the end of a cycle. State, hot spot and cancel
    /// policy are reset by the manager.
    fn reset(&mut self, _gesture: &mut Gesture, _ctx: &mut RecognizerContext<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_state_and_hints() {
        let result = RecognizerResult::FINISH | RecognizerResult::CONSUME;
        assert_eq!(result.state(), RecognizerResult::FINISH);
        assert!(result.consumes());
        assert!(!RecognizerResult::TRIGGER.consumes());
        assert_eq!(RecognizerResult::MAYBE.state(), RecognizerResult::MAYBE);
    }
}

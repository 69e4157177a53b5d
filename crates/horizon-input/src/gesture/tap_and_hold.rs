use std::time::Duration;

use horizon_input_core::{WidgetAttributes, WidgetId, WidgetTree};

use super::{
    Gesture, GesturePayload, GestureRecognizer, GestureType, RecognizerContext, RecognizerResult,
    TapAndHoldGesture,
};
use crate::events::{Event, EventType};

/// How long a press must be held before the gesture finishes.
pub const DEFAULT_TAP_AND_HOLD_TIMEOUT: Duration = Duration::from_millis(700);

/// How far, as a Manhattan distance in pixels, the press may move while held.
const TAP_AND_HOLD_RADIUS: f32 = 40.0;

/// Recognizes a press held in place, from touch or mouse input.
///
/// The gesture stays "maybe" until its timer fires, so nothing is delivered
/// for a hold that is released or moved too early.
#[derive(Debug, Clone)]
pub struct TapAndHoldRecognizer {
    timeout: Duration,
}

impl Default for TapAndHoldRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_TAP_AND_HOLD_TIMEOUT)
    }
}

impl TapAndHoldRecognizer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn restart_timer(&self, hold: &mut TapAndHoldGesture, ctx: &mut RecognizerContext<'_>) {
        if let Some(timer) = hold.timer.take() {
            ctx.kill_timer(timer);
        }
        hold.timer = Some(ctx.start_timer(self.timeout));
    }
}

impl GestureRecognizer for TapAndHoldRecognizer {
    fn create(&mut self, target: Option<WidgetId>, tree: &mut WidgetTree) -> Option<Gesture> {
        if let Some(target) = target {
            let _ = tree.set_attribute(target, WidgetAttributes::ACCEPT_TOUCH_EVENTS, true);
        }
        Some(Gesture::new(
            GestureType::TapAndHold,
            GesturePayload::TapAndHold(TapAndHoldGesture::default()),
        ))
    }

    fn recognize(
        &mut self,
        gesture: &mut Gesture,
        _watched: WidgetId,
        event: &Event,
        ctx: &mut RecognizerContext<'_>,
    ) -> RecognizerResult {
        let GesturePayload::TapAndHold(hold) = &mut gesture.payload else {
            return RecognizerResult::IGNORE;
        };

        match event {
            Event::Timer(timer) if hold.timer == Some(timer.timer) => {
                hold.timer = None;
                RecognizerResult::FINISH | RecognizerResult::CONSUME
            }
            Event::Mouse(mouse) => match mouse.event_type {
                EventType::MouseButtonPress => {
                    hold.position = mouse.global_pos;
                    self.restart_timer(hold, ctx);
                    gesture.set_hot_spot(mouse.global_pos);
                    RecognizerResult::MAYBE
                }
                EventType::MouseButtonRelease => RecognizerResult::CANCEL,
                EventType::MouseMove => {
                    let moved = (mouse.global_pos - hold.position).manhattan_length();
                    if hold.timer.is_some() && moved <= TAP_AND_HOLD_RADIUS {
                        RecognizerResult::MAYBE
                    } else {
                        RecognizerResult::CANCEL
                    }
                }
                _ => RecognizerResult::IGNORE,
            },
            Event::Touch(touch) => match touch.event_type {
                EventType::TouchBegin => {
                    let Some(first) = touch.points.first() else {
                        return RecognizerResult::CANCEL;
                    };
                    let position = first.start_screen_pos;
                    hold.position = position;
                    self.restart_timer(hold, ctx);
                    gesture.set_hot_spot(position);
                    RecognizerResult::MAYBE
                }
                EventType::TouchEnd | EventType::TouchCancel => RecognizerResult::CANCEL,
                EventType::TouchUpdate => match touch.points.as_slice() {
                    [point]
                        if hold.timer.is_some()
                            && (point.pos - point.start_pos).manhattan_length() <= TAP_AND_HOLD_RADIUS =>
                    {
                        RecognizerResult::MAYBE
                    }
                    _ => RecognizerResult::CANCEL,
                },
                _ => RecognizerResult::IGNORE,
            },
            _ => RecognizerResult::IGNORE,
        }
    }

    fn reset(&mut self, gesture: &mut Gesture, ctx: &mut RecognizerContext<'_>) {
        if let GesturePayload::TapAndHold(hold) = &mut gesture.payload {
            if let Some(timer) = hold.timer.take() {
                ctx.kill_timer(timer);
            }
            hold.position = Default::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TouchPointState::{Moved, Pressed};
    use crate::events::{EventBase, TimerEvent};
    use crate::gesture::test_util::{point, recognizer_fixture, touch};
    use horizon_input_core::Point;

    #[test]
    fn test_timer_finishes_and_consumes() {
        let (tree, window, mut timers, id) = recognizer_fixture();
        let mut recognizer = TapAndHoldRecognizer::default();
        let mut gesture = recognizer.create(None, &mut WidgetTree::new()).unwrap();
        let mut ctx = RecognizerContext::new(id, &tree, &mut timers);

        let begin = touch(EventType::TouchBegin, vec![point(1, Pressed, (50.0, 60.0), (50.0, 60.0))]);
        assert_eq!(recognizer.recognize(&mut gesture, window, &begin, &mut ctx), RecognizerResult::MAYBE);
        assert_eq!(gesture.hot_spot(), Some(Point::new(50.0, 60.0)));
        let timer = gesture.tap_and_hold().unwrap().timer.unwrap();

        let stale = Event::Timer(TimerEvent {
            base: EventBase::new(),
            timer: ctx.start_timer(Duration::from_secs(1)),
        });
        assert_eq!(recognizer.recognize(&mut gesture, window, &stale, &mut ctx), RecognizerResult::IGNORE);

        let fired = Event::Timer(TimerEvent {
            base: EventBase::new(),
            timer,
        });
        let result = recognizer.recognize(&mut gesture, window, &fired, &mut ctx);
        assert_eq!(result.state(), RecognizerResult::FINISH);
        assert!(result.consumes());
    }

    #[test]
    fn test_movement_cancels() {
        let (tree, window, mut timers, id) = recognizer_fixture();
        let mut recognizer = TapAndHoldRecognizer::new(Duration::from_millis(300));
        let mut gesture = recognizer.create(None, &mut WidgetTree::new()).unwrap();
        let mut ctx = RecognizerContext::new(id, &tree, &mut timers);

        let begin = touch(EventType::TouchBegin, vec![point(1, Pressed, (0.0, 0.0), (0.0, 0.0))]);
        recognizer.recognize(&mut gesture, window, &begin, &mut ctx);
        let near = touch(EventType::TouchUpdate, vec![point(1, Moved, (0.0, 0.0), (20.0, 10.0))]);
        assert_eq!(recognizer.recognize(&mut gesture, window, &near, &mut ctx), RecognizerResult::MAYBE);
        let far = touch(EventType::TouchUpdate, vec![point(1, Moved, (0.0, 0.0), (30.0, 20.0))]);
        assert_eq!(recognizer.recognize(&mut gesture, window, &far, &mut ctx), RecognizerResult::CANCEL);
    }

    #[test]
    fn test_reset_kills_timer() {
        let (tree, window, mut timers, id) = recognizer_fixture();
        let mut recognizer = TapAndHoldRecognizer::default();
        let mut gesture = recognizer.create(None, &mut WidgetTree::new()).unwrap();
        let timer = {
            let mut ctx = RecognizerContext::new(id, &tree, &mut timers);
            let begin = touch(EventType::TouchBegin, vec![point(1, Pressed, (0.0, 0.0), (0.0, 0.0))]);
            recognizer.recognize(&mut gesture, window, &begin, &mut ctx);
            let timer = gesture.tap_and_hold().unwrap().timer.unwrap();
            recognizer.reset(&mut gesture, &mut ctx);
            timer
        };
        assert!(!timers.is_running(timer));
        assert!(gesture.tap_and_hold().unwrap().timer.is_none());
    }
}

use horizon_input_core::{WidgetAttributes, WidgetId, WidgetTree};

use super::{
    Gesture, GesturePayload, GestureRecognizer, GestureState, GestureType, RecognizerContext, RecognizerResult,
    TapGesture,
};
use crate::events::{Event, EventType};

/// How far, as a Manhattan distance in pixels, a tapping finger may wander.
pub const TAP_RADIUS: f32 = 40.0;

/// Recognizes single-finger taps.
#[derive(Debug, Clone, Default)]
pub struct TapRecognizer;

impl TapRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl GestureRecognizer for TapRecognizer {
    fn create(&mut self, target: Option<WidgetId>, tree: &mut WidgetTree) -> Option<Gesture> {
        if let Some(target) = target {
            let _ = tree.set_attribute(target, WidgetAttributes::ACCEPT_TOUCH_EVENTS, true);
        }
        Some(Gesture::new(GestureType::Tap, GesturePayload::Tap(TapGesture::default())))
    }

    fn recognize(
        &mut self,
        gesture: &mut Gesture,
        _watched: WidgetId,
        event: &Event,
        _ctx: &mut RecognizerContext<'_>,
    ) -> RecognizerResult {
        let Event::Touch(touch) = event else {
            return RecognizerResult::IGNORE;
        };

        match touch.event_type {
            EventType::TouchBegin => {
                let Some(first) = touch.points.first() else {
                    return RecognizerResult::CANCEL;
                };
                let (position, hot_spot) = (first.pos, first.screen_pos);
                if let GesturePayload::Tap(tap) = &mut gesture.payload {
                    tap.position = position;
                }
                gesture.set_hot_spot(hot_spot);
                RecognizerResult::TRIGGER
            }
            EventType::TouchUpdate | EventType::TouchEnd => {
                if gesture.state() == GestureState::NoGesture {
                    return RecognizerResult::CANCEL;
                }
                let [point] = touch.points.as_slice() else {
                    return RecognizerResult::CANCEL;
                };
                if (point.pos - point.start_pos).manhattan_length() > TAP_RADIUS {
                    RecognizerResult::CANCEL
                } else if touch.event_type == EventType::TouchEnd {
                    RecognizerResult::FINISH
                } else {
                    RecognizerResult::TRIGGER
                }
            }
            EventType::TouchCancel => RecognizerResult::CANCEL,
            _ => RecognizerResult::IGNORE,
        }
    }

    fn reset(&mut self, gesture: &mut Gesture, _ctx: &mut RecognizerContext<'_>) {
        if let GesturePayload::Tap(tap) = &mut gesture.payload {
            *tap = TapGesture::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TouchPointState::{Pressed, Released};
    use crate::gesture::test_util::{point, recognizer_fixture, touch};
    use horizon_input_core::Point;

    fn run(end_x: f32) -> RecognizerResult {
        let (tree, window, mut timers, id) = recognizer_fixture();
        let mut recognizer = TapRecognizer::new();
        let mut gesture = recognizer.create(None, &mut WidgetTree::new()).unwrap();
        let mut ctx = RecognizerContext::new(id, &tree, &mut timers);

        let begin = touch(EventType::TouchBegin, vec![point(1, Pressed, (100.0, 100.0), (100.0, 100.0))]);
        assert_eq!(recognizer.recognize(&mut gesture, window, &begin, &mut ctx), RecognizerResult::TRIGGER);
        assert_eq!(gesture.hot_spot(), Some(Point::new(100.0, 100.0)));
        gesture.set_state(GestureState::Started);

        let end = touch(EventType::TouchEnd, vec![point(1, Released, (100.0, 100.0), (end_x, 100.0))]);
        recognizer.recognize(&mut gesture, window, &end, &mut ctx)
    }

    #[test]
    fn test_end_inside_radius_finishes() {
        assert_eq!(run(135.0), RecognizerResult::FINISH);
    }

    #[test]
    fn test_end_outside_radius_cancels() {
        assert_eq!(run(145.0), RecognizerResult::CANCEL);
    }

    #[test]
    fn test_ignores_mouse() {
        let (tree, window, mut timers, id) = recognizer_fixture();
        let mut recognizer = TapRecognizer::new();
        let mut gesture = recognizer.create(None, &mut WidgetTree::new()).unwrap();
        let mut ctx = RecognizerContext::new(id, &tree, &mut timers);
        let event = Event::basic(EventType::MouseMove);
        assert_eq!(recognizer.recognize(&mut gesture, window, &event, &mut ctx), RecognizerResult::IGNORE);
    }
}

use horizon_input_core::{Point, WidgetAttributes, WidgetId, WidgetTree};

use super::{
    Gesture, GesturePayload, GestureRecognizer, GestureState, GestureType, PinchChangeFlags, PinchGesture,
    RecognizerContext, RecognizerResult,
};
use crate::events::{Event, EventType};

/// Recognizes two-finger pinch, zoom and rotate.
#[derive(Debug, Clone, Default)]
pub struct PinchRecognizer;

impl PinchRecognizer {
    pub fn new() -> Self {
        Self
    }
}

/// Angle of the line from `p1` to `p2` in degrees, counter-clockwise with
/// y pointing down, normalized to (-180, 180].
pub(crate) fn line_angle(p1: Point, p2: Point) -> f32 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let mut angle = (-dy).atan2(dx).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    if angle > 180.0 {
        angle -= 360.0;
    }
    angle
}

/// Wraps a difference of two line angles into (-180, 180].
fn normalize_angle(mut angle: f32) -> f32 {
    if angle > 180.0 {
        angle -= 360.0;
    } else if angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

fn distance(p1: Point, p2: Point) -> f32 {
    p1.distance_squared(p2).sqrt()
}

impl GestureRecognizer for PinchRecognizer {
    fn create(&mut self, target: Option<WidgetId>, tree: &mut WidgetTree) -> Option<Gesture> {
        if let Some(target) = target {
            let _ = tree.set_attribute(target, WidgetAttributes::ACCEPT_TOUCH_EVENTS, true);
        }
        Some(Gesture::new(GestureType::Pinch, GesturePayload::Pinch(PinchGesture::default())))
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
        let active = gesture.state() != GestureState::NoGesture;

        match touch.event_type {
            EventType::TouchBegin => RecognizerResult::MAYBE,
            EventType::TouchEnd => {
                if active {
                    RecognizerResult::FINISH
                } else {
                    RecognizerResult::CANCEL
                }
            }
            EventType::TouchUpdate => {
                let GesturePayload::Pinch(pinch) = &mut gesture.payload else {
                    return RecognizerResult::IGNORE;
                };
                pinch.change_flags = PinchChangeFlags::NONE;
                let [p1, p2] = touch.points.as_slice() else {
                    pinch.is_new_sequence = true;
                    return if active {
                        RecognizerResult::FINISH
                    } else {
                        RecognizerResult::IGNORE
                    };
                };

                let center = (p1.screen_pos + p2.screen_pos) / 2.0;
                if pinch.is_new_sequence {
                    pinch.start_position = [p1.screen_pos, p2.screen_pos];
                    pinch.start_center_point = center;
                    pinch.last_center_point = center;
                } else {
                    pinch.last_center_point = pinch.center_point;
                }
                pinch.center_point = center;

                if pinch.is_new_sequence {
                    pinch.scale_factor = 1.0;
                    pinch.last_scale_factor = 1.0;
                } else {
                    pinch.last_scale_factor = pinch.scale_factor;
                    let last = distance(p1.last_screen_pos, p2.last_screen_pos);
                    if last > 0.0 {
                        pinch.scale_factor = distance(p1.screen_pos, p2.screen_pos) / last;
                    }
                }
                pinch.total_scale_factor *= pinch.scale_factor;

                let angle = line_angle(p1.screen_pos, p2.screen_pos);
                let start_angle = line_angle(p1.start_screen_pos, p2.start_screen_pos);
                let rotation = normalize_angle(start_angle - angle);
                pinch.last_rotation_angle = if pinch.is_new_sequence { 0.0 } else { pinch.rotation_angle };
                pinch.rotation_angle = rotation;
                pinch.total_rotation_angle += pinch.rotation_angle - pinch.last_rotation_angle;

                pinch.change_flags =
                    PinchChangeFlags::CENTER_POINT | PinchChangeFlags::SCALE_FACTOR | PinchChangeFlags::ROTATION_ANGLE;
                pinch.total_change_flags = pinch.total_change_flags | pinch.change_flags;
                pinch.is_new_sequence = false;

                gesture.set_hot_spot(p1.screen_pos);
                RecognizerResult::TRIGGER
            }
            _ => RecognizerResult::IGNORE,
        }
    }

    fn reset(&mut self, gesture: &mut Gesture, _ctx: &mut RecognizerContext<'_>) {
        if let GesturePayload::Pinch(pinch) = &mut gesture.payload {
            *pinch = PinchGesture::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TouchPointState::{Moved, Pressed};
    use crate::gesture::test_util::{point, recognizer_fixture, touch};

    fn two_points(a: (f32, f32), b: (f32, f32), last_a: (f32, f32), last_b: (f32, f32)) -> Event {
        let mut p1 = point(1, Moved, (100.0, 100.0), a);
        let mut p2 = point(2, Moved, (200.0, 100.0), b);
        p1.last_screen_pos = Point::from(last_a);
        p2.last_screen_pos = Point::from(last_b);
        touch(EventType::TouchUpdate, vec![p1, p2])
    }

    #[test]
    fn test_line_angle() {
        assert_eq!(line_angle(Point::ZERO, Point::new(10.0, 0.0)), 0.0);
        assert!((line_angle(Point::ZERO, Point::new(0.0, -10.0)) - 90.0).abs() < 1e-4);
        assert!((line_angle(Point::ZERO, Point::new(0.0, 10.0)) + 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_scale_and_rotation() {
        let (tree, window, mut timers, id) = recognizer_fixture();
        let mut recognizer = PinchRecognizer::new();
        let mut gesture = recognizer.create(None, &mut WidgetTree::new()).unwrap();
        let mut ctx = RecognizerContext::new(id, &tree, &mut timers);

        let begin = touch(EventType::TouchBegin, vec![point(1, Pressed, (100.0, 100.0), (100.0, 100.0))]);
        assert_eq!(recognizer.recognize(&mut gesture, window, &begin, &mut ctx), RecognizerResult::MAYBE);

        let first = two_points((100.0, 100.0), (200.0, 100.0), (100.0, 100.0), (200.0, 100.0));
        assert_eq!(recognizer.recognize(&mut gesture, window, &first, &mut ctx), RecognizerResult::TRIGGER);
        let pinch = *gesture.pinch().unwrap();
        assert_eq!(pinch.scale_factor, 1.0);
        assert_eq!(pinch.center_point, Point::new(150.0, 100.0));

        let spread = two_points((50.0, 100.0), (250.0, 100.0), (100.0, 100.0), (200.0, 100.0));
        recognizer.recognize(&mut gesture, window, &spread, &mut ctx);
        let pinch = *gesture.pinch().unwrap();
        assert!((pinch.scale_factor - 2.0).abs() < 1e-4);
        assert!((pinch.total_scale_factor - 2.0).abs() < 1e-4);
        assert!(pinch.change_flags.has(PinchChangeFlags::SCALE_FACTOR));

        // Second finger moves straight up: the line turns counter-clockwise.
        let rotate = two_points((100.0, 100.0), (100.0, 0.0), (50.0, 100.0), (250.0, 100.0));
        recognizer.recognize(&mut gesture, window, &rotate, &mut ctx);
        let pinch = *gesture.pinch().unwrap();
        assert!((pinch.rotation_angle + 90.0).abs() < 1e-3);
        assert!((pinch.total_rotation_angle + 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotation_across_the_seam_is_a_small_turn() {
        let (tree, window, mut timers, id) = recognizer_fixture();
        let mut recognizer = PinchRecognizer::new();
        let mut gesture = recognizer.create(None, &mut WidgetTree::new()).unwrap();
        let mut ctx = RecognizerContext::new(id, &tree, &mut timers);

        // The line from (100,100) to (0,99) sits just below 180 degrees;
        // moving the second finger to (0,101) carries it past -180.
        let mut p1 = point(1, Moved, (100.0, 100.0), (100.0, 100.0));
        let mut p2 = point(2, Moved, (0.0, 99.0), (0.0, 99.0));
        p1.last_screen_pos = Point::new(100.0, 100.0);
        p2.last_screen_pos = Point::new(0.0, 99.0);
        let start = touch(EventType::TouchUpdate, vec![p1.clone(), p2.clone()]);
        assert_eq!(recognizer.recognize(&mut gesture, window, &start, &mut ctx), RecognizerResult::TRIGGER);

        p2.screen_pos = Point::new(0.0, 101.0);
        let twist = touch(EventType::TouchUpdate, vec![p1, p2]);
        recognizer.recognize(&mut gesture, window, &twist, &mut ctx);
        let pinch = *gesture.pinch().unwrap();
        assert!(pinch.rotation_angle.abs() < 2.0, "rotation {}", pinch.rotation_angle);
        assert!(pinch.total_rotation_angle.abs() < 2.0);
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(358.0), -2.0);
        assert_eq!(normalize_angle(-358.0), 2.0);
        assert_eq!(normalize_angle(-180.0), 180.0);
        assert_eq!(normalize_angle(45.0), 45.0);
    }

    #[test]
    fn test_point_count_change() {
        let (tree, window, mut timers, id) = recognizer_fixture();
        let mut recognizer = PinchRecognizer::new();
        let mut gesture = recognizer.create(None, &mut WidgetTree::new()).unwrap();
        let mut ctx = RecognizerContext::new(id, &tree, &mut timers);

        let one = touch(EventType::TouchUpdate, vec![point(1, Moved, (0.0, 0.0), (5.0, 5.0))]);
        assert_eq!(recognizer.recognize(&mut gesture, window, &one, &mut ctx), RecognizerResult::IGNORE);

        gesture.set_state(GestureState::Updated);
        assert_eq!(recognizer.recognize(&mut gesture, window, &one, &mut ctx), RecognizerResult::FINISH);

        let end = touch(EventType::TouchEnd, vec![]);
        assert_eq!(recognizer.recognize(&mut gesture, window, &end, &mut ctx), RecognizerResult::FINISH);
        gesture.set_state(GestureState::NoGesture);
        assert_eq!(recognizer.recognize(&mut gesture, window, &end, &mut ctx), RecognizerResult::CANCEL);
    }
}

use horizon_input_core::{WidgetAttributes, WidgetId, WidgetTree};

use super::pinch::line_angle;
use super::{
    Gesture, GesturePayload, GestureRecognizer, GestureState, GestureType, RecognizerContext, RecognizerResult,
    SwipeDirection, SwipeGesture, SwipePhase,
};
use crate::events::{Event, EventType, TouchPointState};

/// Mean three-finger travel, in pixels along either axis, before a swipe
/// commits to a direction.
pub const SWIPE_MOVE_THRESHOLD: f32 = 50.0;

/// Smaller movements along an axis never flip that axis' direction.
const DIRECTION_CHANGE_THRESHOLD: f32 = SWIPE_MOVE_THRESHOLD / 8.0;

/// Recognizes three-finger swipes.
#[derive(Debug, Clone, Default)]
pub struct SwipeRecognizer;

impl SwipeRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl GestureRecognizer for SwipeRecognizer {
    fn create(&mut self, target: Option<WidgetId>, tree: &mut WidgetTree) -> Option<Gesture> {
        if let Some(target) = target {
            let _ = tree.set_attribute(target, WidgetAttributes::ACCEPT_TOUCH_EVENTS, true);
        }
        Some(Gesture::new(GestureType::Swipe, GesturePayload::Swipe(SwipeGesture::default())))
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
        let GesturePayload::Swipe(swipe) = &mut gesture.payload else {
            return RecognizerResult::IGNORE;
        };

        match touch.event_type {
            EventType::TouchBegin => {
                swipe.velocity = 1.0;
                swipe.last_timestamp = Some(touch.timestamp);
                swipe.phase = SwipePhase::Started;
                RecognizerResult::MAYBE
            }
            EventType::TouchEnd => {
                if active {
                    RecognizerResult::FINISH
                } else {
                    RecognizerResult::CANCEL
                }
            }
            EventType::TouchUpdate => {
                if swipe.phase == SwipePhase::NoGesture {
                    return RecognizerResult::CANCEL;
                }
                match touch.points.len() {
                    3 => {}
                    n if n > 3 => return RecognizerResult::CANCEL,
                    _ => {
                        return match swipe.phase {
                            SwipePhase::ThreePointsReached
                                if touch.states.contains(TouchPointState::Pressed) =>
                            {
                                RecognizerResult::CANCEL
                            }
                            _ => RecognizerResult::IGNORE,
                        };
                    }
                }

                swipe.phase = SwipePhase::ThreePointsReached;
                let [p1, p2, p3] = [&touch.points[0], &touch.points[1], &touch.points[2]];
                let last = *swipe
                    .last_positions
                    .get_or_insert([p1.start_screen_pos, p2.start_screen_pos, p3.start_screen_pos]);

                let x_distance =
                    ((p1.screen_pos.x - last[0].x) + (p2.screen_pos.x - last[1].x) + (p3.screen_pos.x - last[2].x)) / 3.0;
                let y_distance =
                    ((p1.screen_pos.y - last[0].y) + (p2.screen_pos.y - last[1].y) + (p3.screen_pos.y - last[2].y)) / 3.0;
                let distance = x_distance.max(y_distance);

                let elapsed = swipe
                    .last_timestamp
                    .map(|t| touch.timestamp.saturating_sub(t))
                    .filter(|&ms| ms > 0)
                    .unwrap_or(1);
                swipe.last_timestamp = Some(touch.timestamp);
                swipe.velocity = 0.9 * swipe.velocity + distance / elapsed as f32;
                let mut angle = line_angle(p1.start_screen_pos, p1.screen_pos);
                if angle < 0.0 {
                    angle += 360.0;
                }
                swipe.swipe_angle = angle;
                let hot_spot = p1.screen_pos;

                let result = if x_distance.abs() > SWIPE_MOVE_THRESHOLD || y_distance.abs() > SWIPE_MOVE_THRESHOLD {
                    swipe.last_positions = Some([p1.screen_pos, p2.screen_pos, p3.screen_pos]);
                    let mut result = RecognizerResult::TRIGGER;

                    if swipe.vertical_direction == SwipeDirection::NoDirection
                        || y_distance.abs() > DIRECTION_CHANGE_THRESHOLD
                    {
                        let vertical = if y_distance > 0.0 {
                            SwipeDirection::Down
                        } else {
                            SwipeDirection::Up
                        };
                        if swipe.vertical_direction != SwipeDirection::NoDirection
                            && swipe.vertical_direction != vertical
                        {
                            result = RecognizerResult::CANCEL;
                        }
                        swipe.vertical_direction = vertical;
                    }
                    if swipe.horizontal_direction == SwipeDirection::NoDirection
                        || x_distance.abs() > DIRECTION_CHANGE_THRESHOLD
                    {
                        let horizontal = if x_distance > 0.0 {
                            SwipeDirection::Right
                        } else {
                            SwipeDirection::Left
                        };
                        if swipe.horizontal_direction != SwipeDirection::NoDirection
                            && swipe.horizontal_direction != horizontal
                        {
                            result = RecognizerResult::CANCEL;
                        }
                        swipe.horizontal_direction = horizontal;
                    }
                    result
                } else if active {
                    RecognizerResult::TRIGGER
                } else {
                    RecognizerResult::MAYBE
                };

                gesture.set_hot_spot(hot_spot);
                result
            }
            _ => RecognizerResult::IGNORE,
        }
    }

    fn reset(&mut self, gesture: &mut Gesture, _ctx: &mut RecognizerContext<'_>) {
        if let GesturePayload::Swipe(swipe) = &mut gesture.payload {
            *swipe = SwipeGesture::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TouchPointState::{Moved, Pressed};
    use crate::events::{TouchDevice, TouchEvent};
    use horizon_input_core::Point;
    use crate::gesture::test_util::{point, recognizer_fixture, touch};

    const START: [(f32, f32); 3] = [(100.0, 100.0), (150.0, 100.0), (200.0, 100.0)];

    fn shifted(points: [(f32, f32); 3], delta: (f32, f32)) -> [(f32, f32); 3] {
        points.map(|(x, y)| (x + delta.0, y + delta.1))
    }

    fn three(at: [(f32, f32); 3], timestamp: u64) -> Event {
        let points = (0..3)
            .map(|i| point(i as u64 + 1, Moved, START[i], at[i]))
            .collect();
        TouchEvent::new(EventType::TouchUpdate, TouchDevice::screen(1), points, timestamp).into()
    }

    #[test]
    fn test_swipe_right_then_flip_cancels() {
        let (tree, window, mut timers, id) = recognizer_fixture();
        let mut recognizer = SwipeRecognizer::new();
        let mut gesture = recognizer.create(None, &mut WidgetTree::new()).unwrap();
        let mut ctx = RecognizerContext::new(id, &tree, &mut timers);

        let begin = touch(EventType::TouchBegin, vec![point(1, Pressed, START[0], START[0])]);
        assert_eq!(recognizer.recognize(&mut gesture, window, &begin, &mut ctx), RecognizerResult::MAYBE);

        let small = three(shifted(START, (20.0, 0.0)), 10);
        assert_eq!(recognizer.recognize(&mut gesture, window, &small, &mut ctx), RecognizerResult::MAYBE);

        let far = three(shifted(START, (60.0, 0.0)), 20);
        assert_eq!(recognizer.recognize(&mut gesture, window, &far, &mut ctx), RecognizerResult::TRIGGER);
        let swipe = *gesture.swipe().unwrap();
        assert_eq!(swipe.horizontal_direction, SwipeDirection::Right);
        assert!(swipe.swipe_angle.abs() < 1e-3);
        assert_eq!(gesture.hot_spot(), Some(Point::new(160.0, 100.0)));

        gesture.set_state(GestureState::Started);
        let back = three(shifted(START, (0.0, 0.0)), 30);
        assert_eq!(recognizer.recognize(&mut gesture, window, &back, &mut ctx), RecognizerResult::CANCEL);
    }

    #[test]
    fn test_point_count_rules() {
        let (tree, window, mut timers, id) = recognizer_fixture();
        let mut recognizer = SwipeRecognizer::new();
        let mut gesture = recognizer.create(None, &mut WidgetTree::new()).unwrap();
        let mut ctx = RecognizerContext::new(id, &tree, &mut timers);

        let update = touch(EventType::TouchUpdate, vec![point(1, Moved, START[0], START[0])]);
        assert_eq!(recognizer.recognize(&mut gesture, window, &update, &mut ctx), RecognizerResult::CANCEL);

        let begin = touch(EventType::TouchBegin, vec![point(1, Pressed, START[0], START[0])]);
        recognizer.recognize(&mut gesture, window, &begin, &mut ctx);
        assert_eq!(recognizer.recognize(&mut gesture, window, &update, &mut ctx), RecognizerResult::IGNORE);

        let four = touch(
            EventType::TouchUpdate,
            (1..=4).map(|i| point(i, Moved, START[0], START[0])).collect(),
        );
        assert_eq!(recognizer.recognize(&mut gesture, window, &four, &mut ctx), RecognizerResult::CANCEL);
    }
}

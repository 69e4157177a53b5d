use horizon_input_core::{Point, WidgetAttributes, WidgetId, WidgetTree};

use super::{Gesture, GesturePayload, GestureRecognizer, GestureState, GestureType, PanGesture, RecognizerContext, RecognizerResult};
use crate::events::{Event, EventType, TouchPoint};

/// Displacement, in pixels along either axis, that turns a maybe-pan into a
/// pan.
pub const PAN_THRESHOLD: f32 = 10.0;

/// Recognizes panning with a fixed number of fingers.
#[derive(Debug, Clone)]
pub struct PanRecognizer {
    point_count: usize,
}

impl Default for PanRecognizer {
    fn default() -> Self {
        Self::new(2)
    }
}

impl PanRecognizer {
    /// A recognizer tracking the first `point_count` touch points.
    pub fn new(point_count: usize) -> Self {
        Self {
            point_count: point_count.max(1),
        }
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }
}

/// Mean displacement of the first `count` points from their start positions.
fn pan_offset(points: &[TouchPoint], count: usize) -> Point {
    let count = count.min(points.len());
    if count == 0 {
        return Point::ZERO;
    }
    let sum = points[..count]
        .iter()
        .fold(Point::ZERO, |acc, p| acc + (p.pos - p.start_pos));
    sum / count as f32
}

impl GestureRecognizer for PanRecognizer {
    fn create(&mut self, target: Option<WidgetId>, tree: &mut WidgetTree) -> Option<Gesture> {
        if let Some(target) = target {
            let _ = tree.set_attribute(target, WidgetAttributes::ACCEPT_TOUCH_EVENTS, true);
        }
        let pan = PanGesture {
            point_count: self.point_count,
            ..PanGesture::default()
        };
        Some(Gesture::new(GestureType::Pan, GesturePayload::Pan(pan)))
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
        let point_count = self.point_count;
        let GesturePayload::Pan(pan) = &mut gesture.payload else {
            return RecognizerResult::IGNORE;
        };

        match touch.event_type {
            EventType::TouchBegin => {
                pan.offset = Point::ZERO;
                pan.last_offset = Point::ZERO;
                pan.point_count = point_count;
                RecognizerResult::MAYBE
            }
            EventType::TouchEnd => {
                if !active {
                    return RecognizerResult::CANCEL;
                }
                if touch.points.len() == pan.point_count {
                    pan.last_offset = pan.offset;
                    pan.offset = pan_offset(&touch.points, pan.point_count);
                }
                RecognizerResult::FINISH
            }
            EventType::TouchUpdate => {
                if touch.points.len() < pan.point_count {
                    return RecognizerResult::IGNORE;
                }
                pan.last_offset = pan.offset;
                pan.offset = pan_offset(&touch.points, pan.point_count);
                if pan.offset.x.abs() > PAN_THRESHOLD || pan.offset.y.abs() > PAN_THRESHOLD {
                    let hot_spot = touch.points[0].start_screen_pos;
                    gesture.set_hot_spot(hot_spot);
                    RecognizerResult::TRIGGER
                } else {
                    RecognizerResult::MAYBE
                }
            }
            _ => RecognizerResult::IGNORE,
        }
    }

    fn reset(&mut self, gesture: &mut Gesture, _ctx: &mut RecognizerContext<'_>) {
        if let GesturePayload::Pan(pan) = &mut gesture.payload {
            *pan = PanGesture {
                point_count: self.point_count,
                ..PanGesture::default()
            };
        }
    }
}

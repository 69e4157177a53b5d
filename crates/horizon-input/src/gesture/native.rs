//! Recognizers fed by gestures the platform already recognized.
//!
//! These translate [`NativeGestureEvent`](crate::events::NativeGestureEvent)
//! sequences into gesture objects and consume the native events.

use horizon_input_core::{Point, WidgetId, WidgetTree};

use super::{
    Gesture, GesturePayload, GestureRecognizer, GestureState, GestureType, PanGesture, PinchChangeFlags,
    PinchGesture, RecognizerContext, RecognizerResult, SwipeDirection, SwipeGesture,
};
use crate::events::{Event, NativeGestureType};

/// Pinch, zoom and rotate from native gesture events.
#[derive(Debug, Clone, Default)]
pub struct NativePinchRecognizer;

impl NativePinchRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl GestureRecognizer for NativePinchRecognizer {
    fn create(&mut self, _target: Option<WidgetId>, _tree: &mut WidgetTree) -> Option<Gesture> {
        Some(Gesture::new(GestureType::Pinch, GesturePayload::Pinch(PinchGesture::default())))
    }

    fn recognize(
        &mut self,
        gesture: &mut Gesture,
        watched: WidgetId,
        event: &Event,
        ctx: &mut RecognizerContext<'_>,
    ) -> RecognizerResult {
        let Event::NativeGesture(native) = event else {
            return RecognizerResult::IGNORE;
        };
        let active = gesture.state() != GestureState::NoGesture;
        let GesturePayload::Pinch(pinch) = &mut gesture.payload else {
            return RecognizerResult::IGNORE;
        };

        match native.kind {
            NativeGestureType::Begin => {
                *pinch = PinchGesture::default();
                let center = ctx.tree().map_from_global(watched, native.global_pos);
                pinch.start_center_point = center;
                pinch.last_center_point = center;
                pinch.center_point = center;
                pinch.change_flags = PinchChangeFlags::CENTER_POINT;
                pinch.total_change_flags = PinchChangeFlags::CENTER_POINT;
                gesture.set_hot_spot(native.global_pos);
                RecognizerResult::MAYBE | RecognizerResult::CONSUME
            }
            NativeGestureType::Rotate => {
                pinch.last_scale_factor = pinch.scale_factor;
                pinch.last_rotation_angle = pinch.rotation_angle;
                pinch.rotation_angle += native.value as f32;
                pinch.total_rotation_angle += native.value as f32;
                pinch.change_flags = PinchChangeFlags::ROTATION_ANGLE;
                pinch.total_change_flags = pinch.total_change_flags | pinch.change_flags;
                gesture.set_hot_spot(native.global_pos);
                RecognizerResult::TRIGGER | RecognizerResult::CONSUME
            }
            NativeGestureType::Zoom => {
                pinch.last_scale_factor = pinch.scale_factor;
                pinch.last_rotation_angle = pinch.rotation_angle;
                pinch.scale_factor = 1.0 + native.value as f32;
                pinch.total_scale_factor *= pinch.scale_factor;
                pinch.change_flags = PinchChangeFlags::SCALE_FACTOR;
                pinch.total_change_flags = pinch.total_change_flags | pinch.change_flags;
                gesture.set_hot_spot(native.global_pos);
                RecognizerResult::TRIGGER | RecognizerResult::CONSUME
            }
            NativeGestureType::SmartZoom => {
                // A smart zoom toggles between 1 and 2.
                pinch.last_scale_factor = pinch.scale_factor;
                pinch.scale_factor = if pinch.total_scale_factor > 1.0 { 0.5 } else { 2.0 };
                pinch.total_scale_factor *= pinch.scale_factor;
                pinch.change_flags = PinchChangeFlags::SCALE_FACTOR;
                pinch.total_change_flags = pinch.total_change_flags | pinch.change_flags;
                gesture.set_hot_spot(native.global_pos);
                RecognizerResult::TRIGGER | RecognizerResult::CONSUME
            }
            NativeGestureType::End => {
                if active {
                    RecognizerResult::FINISH | RecognizerResult::CONSUME
                } else {
                    RecognizerResult::CANCEL | RecognizerResult::CONSUME
                }
            }
            NativeGestureType::Pan | NativeGestureType::Swipe => RecognizerResult::IGNORE,
        }
    }

    fn reset(&mut self, gesture: &mut Gesture, _ctx: &mut RecognizerContext<'_>) {
        if let GesturePayload::Pinch(pinch) = &mut gesture.payload {
            *pinch = PinchGesture::default();
        }
    }
}

/// Swipes from native gesture events. A native swipe arrives complete, so
/// it finishes on the event that reports it.
#[derive(Debug, Clone, Default)]
pub struct NativeSwipeRecognizer;

impl NativeSwipeRecognizer {
    pub fn new() -> Self {
        Self
    }
}

/// Direction components of a swipe at `angle` degrees, counter-clockwise
/// with y pointing down. Axis components under 45 degrees off count.
fn directions_for_angle(angle: f32) -> (SwipeDirection, SwipeDirection) {
    let radians = angle.to_radians();
    let (dx, dy) = (radians.cos(), -radians.sin());
    let horizontal = if dx.abs() < 0.38 {
        SwipeDirection::NoDirection
    } else if dx > 0.0 {
        SwipeDirection::Right
    } else {
        SwipeDirection::Left
    };
    let vertical = if dy.abs() < 0.38 {
        SwipeDirection::NoDirection
    } else if dy > 0.0 {
        SwipeDirection::Down
    } else {
        SwipeDirection::Up
    };
    (horizontal, vertical)
}

impl GestureRecognizer for NativeSwipeRecognizer {
    fn create(&mut self, _target: Option<WidgetId>, _tree: &mut WidgetTree) -> Option<Gesture> {
        Some(Gesture::new(GestureType::Swipe, GesturePayload::Swipe(SwipeGesture::default())))
    }

    fn recognize(
        &mut self,
        gesture: &mut Gesture,
        _watched: WidgetId,
        event: &Event,
        _ctx: &mut RecognizerContext<'_>,
    ) -> RecognizerResult {
        let Event::NativeGesture(native) = event else {
            return RecognizerResult::IGNORE;
        };
        if native.kind != NativeGestureType::Swipe {
            return RecognizerResult::IGNORE;
        }
        let GesturePayload::Swipe(swipe) = &mut gesture.payload else {
            return RecognizerResult::IGNORE;
        };

        let angle = native.value.rem_euclid(360.0) as f32;
        swipe.swipe_angle = angle;
        (swipe.horizontal_direction, swipe.vertical_direction) = directions_for_angle(angle);
        gesture.set_hot_spot(native.global_pos);
        RecognizerResult::FINISH | RecognizerResult::CONSUME
    }

    fn reset(&mut self, gesture: &mut Gesture, _ctx: &mut RecognizerContext<'_>) {
        if let GesturePayload::Swipe(swipe) = &mut gesture.payload {
            *swipe = SwipeGesture::default();
        }
    }
}

/// Two-finger trackpad panning from native gesture events.
#[derive(Debug, Clone, Default)]
pub struct NativePanRecognizer;

impl NativePanRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl GestureRecognizer for NativePanRecognizer {
    fn create(&mut self, _target: Option<WidgetId>, _tree: &mut WidgetTree) -> Option<Gesture> {
        Some(Gesture::new(
            GestureType::Pan,
            GesturePayload::Pan(PanGesture {
                point_count: 2,
                ..PanGesture::default()
            }),
        ))
    }

    fn recognize(
        &mut self,
        gesture: &mut Gesture,
        _watched: WidgetId,
        event: &Event,
        _ctx: &mut RecognizerContext<'_>,
    ) -> RecognizerResult {
        let Event::NativeGesture(native) = event else {
            return RecognizerResult::IGNORE;
        };
        let active = gesture.state() != GestureState::NoGesture;
        let GesturePayload::Pan(pan) = &mut gesture.payload else {
            return RecognizerResult::IGNORE;
        };

        match native.kind {
            NativeGestureType::Begin => {
                pan.offset = Point::ZERO;
                pan.last_offset = Point::ZERO;
                gesture.set_hot_spot(native.global_pos);
                RecognizerResult::MAYBE | RecognizerResult::CONSUME
            }
            NativeGestureType::Pan => {
                pan.last_offset = pan.offset;
                pan.offset += native.delta;
                gesture.set_hot_spot(native.global_pos);
                RecognizerResult::TRIGGER | RecognizerResult::CONSUME
            }
            NativeGestureType::End => {
                if active {
                    RecognizerResult::FINISH | RecognizerResult::CONSUME
                } else {
                    RecognizerResult::CANCEL
                }
            }
            _ => RecognizerResult::IGNORE,
        }
    }

    fn reset(&mut self, gesture: &mut Gesture, _ctx: &mut RecognizerContext<'_>) {
        if let GesturePayload::Pan(pan) = &mut gesture.payload {
            *pan = PanGesture {
                point_count: 2,
                ..PanGesture::default()
            };
        }
    }
}

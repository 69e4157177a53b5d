//! Gesture objects, contexts and the recognizer framework.
//!
//! A widget opts into a gesture type with
//! [`Application::grab_gesture`](crate::Application::grab_gesture). While at
//! least one recognizer is registered, every event sent through
//! [`notify`](crate::Application::notify) is first offered to the
//! [`GestureManager`], which runs the recognizers of all contexts on the
//! receiver's ancestor chain, turns their verdicts into gesture state
//! transitions and delivers [`GestureEvent`](crate::events::GestureEvent)s.
//!
//! Gesture objects live in a [`GestureStore`] owned by the dispatch state,
//! addressed by generation-checked [`GestureId`]s. There is one gesture per
//! (context widget, recognizer) pair, reused across begin/end cycles.

mod manager;
mod native;
mod pan;
mod pinch;
mod recognizer;
mod swipe;
mod tap;
mod tap_and_hold;

use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::BitOr;
use std::time::{Duration, Instant};

use horizon_input_core::{Point, WidgetId};
use slotmap::{SecondaryMap, SlotMap, new_key_type};

pub use manager::GestureManager;
pub use native::{NativePanRecognizer, NativePinchRecognizer, NativeSwipeRecognizer};
pub use pan::PanRecognizer;
pub use pinch::PinchRecognizer;
pub use recognizer::{GestureRecognizer, RecognizerContext, RecognizerId, RecognizerResult};
pub use swipe::SwipeRecognizer;
pub use tap::TapRecognizer;
pub use tap_and_hold::TapAndHoldRecognizer;

new_key_type! {
    /// Handle of a gesture object in the [`GestureStore`].
    pub struct GestureId;

    /// Handle of a running gesture timer.
    pub struct GestureTimerId;
}

/// The kind of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GestureType {
    Tap,
    TapAndHold,
    Pan,
    Pinch,
    Swipe,
    /// A gesture type assigned at registration of a custom recognizer.
    /// Assigned ids start at [`GestureType::FIRST_CUSTOM_ID`].
    Custom(u32),
}

impl GestureType {
    /// The first id handed out to custom recognizers.
    pub const FIRST_CUSTOM_ID: u32 = 0x101;

    /// Whether this is a custom gesture type.
    pub fn is_custom(self) -> bool {
        matches!(self, GestureType::Custom(_))
    }
}

/// Where a gesture is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureState {
    /// No gesture cycle is running.
    #[default]
    NoGesture,
    Started,
    Updated,
    Finished,
    Canceled,
}

/// Options of a gesture context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GestureFlags(u8);

impl GestureFlags {
    /// No options.
    pub const NONE: GestureFlags = GestureFlags(0);

    /// Gestures of this type never start on the widget's children; the
    /// context only applies to events sent to the widget itself.
    pub const DONT_START_ON_CHILDREN: GestureFlags = GestureFlags(0x1);

    /// The widget also receives gestures that started on a descendant and
    /// were ignored there.
    pub const RECEIVE_PARTIAL: GestureFlags = GestureFlags(0x2);

    /// Ignored gestures propagate to the parent.
    pub const IGNORED_PROPAGATE_TO_PARENT: GestureFlags = GestureFlags(0x4);

    /// Check if all flags of `flag` are set.
    pub fn has(&self, flag: GestureFlags) -> bool {
        (self.0 & flag.0) == flag.0
    }
}

impl BitOr for GestureFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        GestureFlags(self.0 | rhs.0)
    }
}

/// What starting a gesture does to other gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CancelPolicy {
    /// Starting the gesture cancels nothing.
    #[default]
    CancelNone,
    /// Starting the gesture cancels active gestures targeted at
    /// descendants of its target.
    CancelAllInContext,
}

/// Direction component of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwipeDirection {
    #[default]
    NoDirection,
    Left,
    Right,
    Up,
    Down,
}

/// Which pinch properties changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PinchChangeFlags(u8);

impl PinchChangeFlags {
    pub const NONE: PinchChangeFlags = PinchChangeFlags(0);
    pub const SCALE_FACTOR: PinchChangeFlags = PinchChangeFlags(0x1);
    pub const ROTATION_ANGLE: PinchChangeFlags = PinchChangeFlags(0x2);
    pub const CENTER_POINT: PinchChangeFlags = PinchChangeFlags(0x4);

    /// Check if all flags of `flag` are set.
    pub fn has(&self, flag: PinchChangeFlags) -> bool {
        (self.0 & flag.0) == flag.0
    }
}

impl BitOr for PinchChangeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        PinchChangeFlags(self.0 | rhs.0)
    }
}

/// Pan payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanGesture {
    /// Mean displacement of the tracked points since the touch began.
    pub offset: Point,
    /// The previous `offset`.
    pub last_offset: Point,
    pub acceleration: f32,
    /// Number of points the current cycle tracks.
    pub point_count: usize,
}

impl PanGesture {
    /// Offset change since the previous update.
    pub fn delta(&self) -> Point {
        self.offset - self.last_offset
    }
}

/// Pinch payload. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGesture {
    pub change_flags: PinchChangeFlags,
    pub total_change_flags: PinchChangeFlags,
    pub total_scale_factor: f32,
    pub last_scale_factor: f32,
    pub scale_factor: f32,
    pub total_rotation_angle: f32,
    pub last_rotation_angle: f32,
    pub rotation_angle: f32,
    pub start_center_point: Point,
    pub last_center_point: Point,
    pub center_point: Point,
    pub(crate) is_new_sequence: bool,
    pub(crate) start_position: [Point; 2],
}

impl Default for PinchGesture {
    fn default() -> Self {
        Self {
            change_flags: PinchChangeFlags::NONE,
            total_change_flags: PinchChangeFlags::NONE,
            total_scale_factor: 1.0,
            last_scale_factor: 1.0,
            scale_factor: 1.0,
            total_rotation_angle: 0.0,
            last_rotation_angle: 0.0,
            rotation_angle: 0.0,
            start_center_point: Point::ZERO,
            last_center_point: Point::ZERO,
            center_point: Point::ZERO,
            is_new_sequence: true,
            start_position: [Point::ZERO; 2],
        }
    }
}

/// Swipe payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SwipeGesture {
    pub horizontal_direction: SwipeDirection,
    pub vertical_direction: SwipeDirection,
    /// Angle of the swipe in degrees, counter-clockwise from the positive x
    /// axis.
    pub swipe_angle: f32,
    /// Smoothed speed in pixels per millisecond.
    pub velocity: f32,
    pub(crate) phase: SwipePhase,
    pub(crate) last_positions: Option<[Point; 3]>,
    pub(crate) last_timestamp: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SwipePhase {
    #[default]
    NoGesture,
    Started,
    ThreePointsReached,
}

/// Tap payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TapGesture {
    /// Position of the touch in the receiver's coordinates.
    pub position: Point,
}

/// Tap-and-hold payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TapAndHoldGesture {
    /// Global position of the press.
    pub position: Point,
    pub(crate) timer: Option<GestureTimerId>,
}

/// Recognizer-specific data carried by a [`Gesture`].
pub enum GesturePayload {
    Pan(PanGesture),
    Pinch(PinchGesture),
    Swipe(SwipeGesture),
    Tap(TapGesture),
    TapAndHold(TapAndHoldGesture),
    /// Data of a custom recognizer.
    Custom(Box<dyn Any>),
}

impl fmt::Debug for GesturePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GesturePayload::Pan(p) => f.debug_tuple("Pan").field(p).finish(),
            GesturePayload::Pinch(p) => f.debug_tuple("Pinch").field(p).finish(),
            GesturePayload::Swipe(p) => f.debug_tuple("Swipe").field(p).finish(),
            GesturePayload::Tap(p) => f.debug_tuple("Tap").field(p).finish(),
            GesturePayload::TapAndHold(p) => f.debug_tuple("TapAndHold").field(p).finish(),
            GesturePayload::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A gesture object.
///
/// Recognizers create gestures with [`Gesture::new`] and update the payload
/// and hot spot; the manager owns the state and the bookkeeping fields.
#[derive(Debug)]
pub struct Gesture {
    gesture_type: GestureType,
    state: GestureState,
    hot_spot: Option<Point>,
    cancel_policy: CancelPolicy,
    /// Recognizer data.
    pub payload: GesturePayload,
    owner: Option<WidgetId>,
    recognizer: Option<RecognizerId>,
}

impl Gesture {
    /// Create a gesture in the [`GestureState::NoGesture`] state.
    pub fn new(gesture_type: GestureType, payload: GesturePayload) -> Self {
        Self {
            gesture_type,
            state: GestureState::NoGesture,
            hot_spot: None,
            cancel_policy: CancelPolicy::CancelNone,
            payload,
            owner: None,
            recognizer: None,
        }
    }

    pub fn gesture_type(&self) -> GestureType {
        self.gesture_type
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// The global point used to find the gesture's target.
    pub fn hot_spot(&self) -> Option<Point> {
        self.hot_spot
    }

    pub fn set_hot_spot(&mut self, point: Point) {
        self.hot_spot = Some(point);
    }

    pub fn unset_hot_spot(&mut self) {
        self.hot_spot = None;
    }

    pub fn cancel_policy(&self) -> CancelPolicy {
        self.cancel_policy
    }

    pub fn set_cancel_policy(&mut self, policy: CancelPolicy) {
        self.cancel_policy = policy;
    }

    /// The widget whose gesture context created this gesture.
    pub fn owner(&self) -> Option<WidgetId> {
        self.owner
    }

    pub(crate) fn recognizer(&self) -> Option<RecognizerId> {
        self.recognizer
    }

    pub(crate) fn set_state(&mut self, state: GestureState) {
        self.state = state;
    }

    /// Return to the pre-cycle state. The payload is reset by the recognizer;
    /// the cancel policy is kept.
    pub(crate) fn reset_common(&mut self) {
        self.state = GestureState::NoGesture;
        self.hot_spot = None;
    }

    pub fn pan(&self) -> Option<&PanGesture> {
        match &self.payload {
            GesturePayload::Pan(p) => Some(p),
            _ => None,
        }
    }

    pub fn pinch(&self) -> Option<&PinchGesture> {
        match &self.payload {
            GesturePayload::Pinch(p) => Some(p),
            _ => None,
        }
    }

    pub fn swipe(&self) -> Option<&SwipeGesture> {
        match &self.payload {
            GesturePayload::Swipe(p) => Some(p),
            _ => None,
        }
    }

    pub fn tap(&self) -> Option<&TapGesture> {
        match &self.payload {
            GesturePayload::Tap(p) => Some(p),
            _ => None,
        }
    }

    pub fn tap_and_hold(&self) -> Option<&TapAndHoldGesture> {
        match &self.payload {
            GesturePayload::TapAndHold(p) => Some(p),
            _ => None,
        }
    }

    /// Downcast a custom payload.
    pub fn custom<T: 'static>(&self) -> Option<&T> {
        match &self.payload {
            GesturePayload::Custom(data) => data.downcast_ref(),
            _ => None,
        }
    }

    /// Mutable downcast of a custom payload.
    pub fn custom_mut<T: 'static>(&mut self) -> Option<&mut T> {
        match &mut self.payload {
            GesturePayload::Custom(data) => data.downcast_mut(),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct GestureTimer {
    gesture: GestureId,
    deadline: Instant,
}

/// Single-shot timers started by recognizers.
///
/// A due timer is delivered as an [`Event::Timer`](crate::events::Event)
/// to the recognizers of the gesture that started it.
#[derive(Debug, Default)]
pub struct GestureTimers {
    timers: SlotMap<GestureTimerId, GestureTimer>,
}

impl GestureTimers {
    /// Start a timer for `gesture` that fires after `delay`.
    pub fn start(&mut self, gesture: GestureId, delay: Duration) -> GestureTimerId {
        self.timers.insert(GestureTimer {
            gesture,
            deadline: Instant::now() + delay,
        })
    }

    /// Stop a timer. Unknown ids are ignored.
    pub fn kill(&mut self, timer: GestureTimerId) {
        self.timers.remove(timer);
    }

    /// Whether the timer is still pending.
    pub fn is_running(&self, timer: GestureTimerId) -> bool {
        self.timers.contains_key(timer)
    }

    /// The earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|t| t.deadline).min()
    }

    pub(crate) fn take_due(&mut self, now: Instant) -> Vec<(GestureTimerId, GestureId)> {
        let mut due: Vec<_> = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= now)
            .map(|(id, t)| (id, t.gesture, t.deadline))
            .collect();
        due.sort_by_key(|&(_, _, deadline)| deadline);
        for &(id, _, _) in &due {
            self.timers.remove(id);
        }
        due.into_iter().map(|(id, gesture, _)| (id, gesture)).collect()
    }

    fn kill_for(&mut self, gesture: GestureId) {
        self.timers.retain(|_, t| t.gesture != gesture);
    }
}

/// Gesture objects, widget contexts and the manager's running sets.
///
/// Lives in the dispatch state rather than in the [`GestureManager`] so
/// that handlers can inspect gestures and widgets can be destroyed while
/// the manager is delivering.
#[derive(Debug, Default)]
pub struct GestureStore {
    gestures: SlotMap<GestureId, Gesture>,
    by_owner: HashMap<(WidgetId, GestureType), Vec<GestureId>>,
    contexts: SecondaryMap<WidgetId, Vec<(GestureType, GestureFlags)>>,
    pub(crate) active: BTreeSet<GestureId>,
    pub(crate) maybe: BTreeSet<GestureId>,
    pub(crate) targets: HashMap<GestureId, WidgetId>,
    pub(crate) timers: GestureTimers,
}

impl GestureStore {
    pub fn get(&self, id: GestureId) -> Option<&Gesture> {
        self.gestures.get(id)
    }

    pub fn get_mut(&mut self, id: GestureId) -> Option<&mut Gesture> {
        self.gestures.get_mut(id)
    }

    /// Number of live gesture objects.
    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    /// The gesture contexts registered on `widget`, in registration order.
    pub fn contexts(&self, widget: WidgetId) -> &[(GestureType, GestureFlags)] {
        self.contexts.get(widget).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The flags of `widget`'s context for `gesture_type`.
    pub fn context_flags(&self, widget: WidgetId, gesture_type: GestureType) -> Option<GestureFlags> {
        self.contexts(widget)
            .iter()
            .find(|(t, _)| *t == gesture_type)
            .map(|&(_, flags)| flags)
    }

    pub(crate) fn set_context(&mut self, widget: WidgetId, gesture_type: GestureType, flags: GestureFlags) {
        let Some(entry) = self.contexts.entry(widget) else {
            return;
        };
        let list = entry.or_default();
        match list.iter_mut().find(|(t, _)| *t == gesture_type) {
            Some(existing) => existing.1 = flags,
            None => list.push((gesture_type, flags)),
        }
    }

    pub(crate) fn remove_context(&mut self, widget: WidgetId, gesture_type: GestureType) -> bool {
        let Some(list) = self.contexts.get_mut(widget) else {
            return false;
        };
        let before = list.len();
        list.retain(|(t, _)| *t != gesture_type);
        let removed = list.len() != before;
        if list.is_empty() {
            self.contexts.remove(widget);
        }
        removed
    }

    /// Whether any widget has a gesture context.
    pub fn has_contexts(&self) -> bool {
        !self.contexts.is_empty()
    }

    /// Whether `widget` owns a gesture object, i.e. a recognizer is
    /// tracking input for one of its contexts.
    pub fn owns_gesture(&self, widget: WidgetId) -> bool {
        self.gestures.values().any(|g| g.owner == Some(widget))
    }

    /// The gesture `recognizer` created for `owner`, if any.
    pub(crate) fn find(&self, owner: WidgetId, gesture_type: GestureType, recognizer: RecognizerId) -> Option<GestureId> {
        self.by_owner.get(&(owner, gesture_type)).and_then(|ids| {
            ids.iter()
                .copied()
                .find(|&id| self.gestures.get(id).is_some_and(|g| g.recognizer == Some(recognizer)))
        })
    }

    pub(crate) fn insert(
        &mut self,
        mut gesture: Gesture,
        owner: WidgetId,
        gesture_type: GestureType,
        recognizer: RecognizerId,
    ) -> GestureId {
        gesture.owner = Some(owner);
        gesture.recognizer = Some(recognizer);
        gesture.gesture_type = gesture_type;
        let id = self.gestures.insert(gesture);
        self.by_owner.entry((owner, gesture_type)).or_default().push(id);
        id
    }

    /// Forget a gesture entirely.
    pub(crate) fn remove(&mut self, id: GestureId) -> Option<Gesture> {
        let gesture = self.gestures.remove(id)?;
        if let Some(owner) = gesture.owner {
            let key = (owner, gesture.gesture_type);
            if let Some(ids) = self.by_owner.get_mut(&key) {
                ids.retain(|&g| g != id);
                if ids.is_empty() {
                    self.by_owner.remove(&key);
                }
            }
        }
        self.active.remove(&id);
        self.maybe.remove(&id);
        self.targets.remove(&id);
        self.timers.kill_for(id);
        Some(gesture)
    }

    /// Drop every cached gesture `owner` has for `gesture_type`.
    pub(crate) fn cleanup_cached(&mut self, owner: WidgetId, gesture_type: GestureType) -> usize {
        let ids = self.by_owner.get(&(owner, gesture_type)).cloned().unwrap_or_default();
        for &id in &ids {
            self.remove(id);
        }
        ids.len()
    }

    /// Drop everything that refers to a destroyed widget.
    pub(crate) fn forget_widget(&mut self, widget: WidgetId) {
        self.contexts.remove(widget);
        let owned: Vec<GestureId> = self
            .gestures
            .iter()
            .filter(|(_, g)| g.owner == Some(widget))
            .map(|(id, _)| id)
            .collect();
        for id in owned {
            self.remove(id);
        }
        self.targets.retain(|_, target| *target != widget);
    }

    pub(crate) fn ids_for_recognizer(&self, recognizer: RecognizerId) -> Vec<GestureId> {
        self.gestures
            .iter()
            .filter(|(_, g)| g.recognizer == Some(recognizer))
            .map(|(id, _)| id)
            .collect()
    }

    /// Split borrow used while a recognizer runs.
    pub(crate) fn gesture_and_timers(&mut self, id: GestureId) -> Option<(&mut Gesture, &mut GestureTimers)> {
        let gesture = self.gestures.get_mut(id)?;
        Some((gesture, &mut self.timers))
    }
}

static_assertions::assert_impl_all!(GestureId: Copy, Send, Sync);
static_assertions::assert_impl_all!(GestureTimerId: Copy, Send, Sync);

#[cfg(test)]
pub(crate) mod test_util {
    use horizon_input_core::{Point, Rect, WidgetId, WidgetTree, WindowType};
    use slotmap::SlotMap;

    use super::{GestureId, GestureTimers};
    use crate::events::{Event, EventType, TouchDevice, TouchEvent, TouchPoint, TouchPointState};

    /// A tree with one window, a timer table and a gesture id to run a
    /// recognizer against.
    pub(crate) fn recognizer_fixture() -> (WidgetTree, WidgetId, GestureTimers, GestureId) {
        let mut tree = WidgetTree::new();
        let window = tree.create_window("window", WindowType::Window, Rect::new(0.0, 0.0, 400.0, 400.0));
        let mut ids: SlotMap<GestureId, ()> = SlotMap::with_key();
        (tree, window, GestureTimers::default(), ids.insert(()))
    }

    /// A touch point that started at `start` and is now at `pos`, with
    /// local and screen coordinates equal.
    pub(crate) fn point(id: u64, state: TouchPointState, start: (f32, f32), pos: (f32, f32)) -> TouchPoint {
        let mut point = TouchPoint::new(id, state, Point::from(pos));
        point.start_pos = Point::from(start);
        point.start_screen_pos = Point::from(start);
        point
    }

    pub(crate) fn touch(event_type: EventType, points: Vec<TouchPoint>) -> Event {
        TouchEvent::new(event_type, TouchDevice::screen(1), points, 0).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_input_core::{Rect, WidgetTree, WindowType};

    fn setup() -> (WidgetTree, WidgetId, GestureStore) {
        let mut tree = WidgetTree::new();
        let window = tree.create_window("window", WindowType::Window, Rect::new(0.0, 0.0, 100.0, 100.0));
        (tree, window, GestureStore::default())
    }

    #[test]
    fn test_context_registration_replaces_flags() {
        let (_tree, window, mut store) = setup();
        store.set_context(window, GestureType::Pan, GestureFlags::NONE);
        store.set_context(window, GestureType::Tap, GestureFlags::NONE);
        store.set_context(window, GestureType::Pan, GestureFlags::RECEIVE_PARTIAL);
        assert_eq!(store.contexts(window).len(), 2);
        assert_eq!(
            store.context_flags(window, GestureType::Pan),
            Some(GestureFlags::RECEIVE_PARTIAL)
        );
        assert!(store.remove_context(window, GestureType::Pan));
        assert!(!store.remove_context(window, GestureType::Pan));
        assert!(store.has_contexts());
    }

    #[test]
    fn test_insert_find_and_cleanup() {
        let (_tree, window, mut store) = setup();
        let mut recognizers: SlotMap<RecognizerId, ()> = SlotMap::with_key();
        let r1 = recognizers.insert(());
        let r2 = recognizers.insert(());

        let g1 = store.insert(
            Gesture::new(GestureType::Pan, GesturePayload::Pan(PanGesture::default())),
            window,
            GestureType::Pan,
            r1,
        );
        assert_eq!(store.find(window, GestureType::Pan, r1), Some(g1));
        assert_eq!(store.find(window, GestureType::Pan, r2), None);
        assert!(store.owns_gesture(window));

        store.active.insert(g1);
        store.timers.start(g1, Duration::from_millis(10));
        assert_eq!(store.cleanup_cached(window, GestureType::Pan), 1);
        assert!(store.get(g1).is_none());
        assert!(store.active.is_empty());
        assert!(store.timers.next_deadline().is_none());
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let (_tree, window, mut store) = setup();
        let mut recognizers: SlotMap<RecognizerId, ()> = SlotMap::with_key();
        let r = recognizers.insert(());
        let g = store.insert(
            Gesture::new(GestureType::TapAndHold, GesturePayload::TapAndHold(TapAndHoldGesture::default())),
            window,
            GestureType::TapAndHold,
            r,
        );
        let late = store.timers.start(g, Duration::from_millis(50));
        let early = store.timers.start(g, Duration::from_millis(5));
        let killed = store.timers.start(g, Duration::from_millis(1));
        store.timers.kill(killed);

        let due = store.timers.take_due(Instant::now() + Duration::from_millis(100));
        assert_eq!(due, vec![(early, g), (late, g)]);
        assert!(!store.timers.is_running(late));
    }

    #[test]
    fn test_custom_payload_downcast() {
        let gesture = Gesture::new(GestureType::Custom(0), GesturePayload::Custom(Box::new(42_u32)));
        assert_eq!(gesture.custom::<u32>(), Some(&42));
        assert!(gesture.custom::<i64>().is_none());
        assert!(gesture.pan().is_none());
        assert_eq!(format!("{:?}", gesture.payload), "Custom(..)");
    }

    #[test]
    fn test_flags() {
        let flags = GestureFlags::DONT_START_ON_CHILDREN | GestureFlags::RECEIVE_PARTIAL;
        assert!(flags.has(GestureFlags::RECEIVE_PARTIAL));
        assert!(!flags.has(GestureFlags::IGNORED_PROPAGATE_TO_PARENT));
        assert!(GestureType::Custom(GestureType::FIRST_CUSTOM_ID).is_custom());
    }
}

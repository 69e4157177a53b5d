//! The gesture manager.
//!
//! The manager owns the registered recognizers. For every event offered by
//! [`Application::notify`](crate::Application::notify) it collects the
//! gesture contexts that apply to the receiver, runs each recognizer of each
//! context type, turns the verdicts into state transitions and delivers
//! [`GestureEvent`]s.
//!
//! # Round structure
//!
//! 1. Build the context list: every context on the receiver, then contexts
//!    of ancestors up to the window that did not opt out with
//!    [`GestureFlags::DONT_START_ON_CHILDREN`], at most one per type.
//! 2. Fetch or create the gesture object of each (owner, type, recognizer)
//!    and ask the recognizer for a verdict.
//! 3. Partition the gestures into started, updated, finished, canceled and
//!    maybe sets and assign their states.
//! 4. Resolve targets, probing conflicting ancestors with a
//!    `GestureOverride` event first, and deliver one event per target.
//! 5. Recycle every gesture whose cycle ended.
//!
//! Gesture objects and the running sets live in the [`GestureStore`] of the
//! dispatch state, so handlers may destroy widgets mid-round. Every id is
//! re-checked after a delivery.

use std::collections::{BTreeSet, HashMap};

use horizon_input_core::logging::{span_names, targets};
use horizon_input_core::{PerfSpan, WidgetId, WidgetTree};
use slotmap::SlotMap;

use super::{
    CancelPolicy, GestureFlags, GestureId, GestureRecognizer, GestureState, GestureStore, GestureTimerId,
    GestureType, RecognizerContext, RecognizerId, RecognizerResult,
};
use crate::application::Application;
use crate::error::GestureError;
use crate::events::{Event, EventBase, EventType, GestureEntry, GestureEvent, TimerEvent};

struct RecognizerEntry {
    recognizer: Box<dyn GestureRecognizer>,
    gesture_type: GestureType,
    /// Set when the type was unregistered. The entry lives until its last
    /// gesture is gone.
    obsolete: bool,
}

/// Where a round collects its gestures from.
#[derive(Debug, Clone, Copy)]
enum GestureContext {
    /// A widget's context for a gesture type.
    Owner(WidgetId, GestureType),
    /// One gesture object, for its own timer events.
    Gesture(GestureId),
}

/// Gestures grouped per target widget, in first-seen order.
type GesturesPerWidget = Vec<(WidgetId, Vec<GestureId>)>;

fn push_for_widget(groups: &mut GesturesPerWidget, widget: WidgetId, gesture: GestureId) {
    match groups.iter_mut().find(|(w, _)| *w == widget) {
        Some((_, gestures)) => gestures.push(gesture),
        None => groups.push((widget, vec![gesture])),
    }
}

fn entries(store: &GestureStore, ids: &[GestureId]) -> Vec<GestureEntry> {
    ids.iter()
        .filter_map(|&id| {
            let gesture = store.get(id)?;
            Some(GestureEntry::new(id, gesture.gesture_type(), gesture.state(), gesture.hot_spot()))
        })
        .collect()
}

/// Registry of gesture recognizers and the recognition round.
///
/// Several recognizers may serve one gesture type; all of them are
/// evaluated, in registration order, for every event.
pub struct GestureManager {
    recognizers: SlotMap<RecognizerId, RecognizerEntry>,
    by_type: HashMap<GestureType, Vec<RecognizerId>>,
    next_custom_id: u32,
}

impl Default for GestureManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GestureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureManager")
            .field(
                "recognizers",
                &self
                    .recognizers
                    .values()
                    .map(|e| (e.gesture_type, e.obsolete))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl GestureManager {
    /// Create a manager without recognizers.
    pub fn new() -> Self {
        Self {
            recognizers: SlotMap::with_key(),
            by_type: HashMap::new(),
            next_custom_id: GestureType::FIRST_CUSTOM_ID,
        }
    }

    /// Number of live recognizers registered for `gesture_type`.
    pub fn recognizer_count(&self, gesture_type: GestureType) -> usize {
        self.by_type.get(&gesture_type).map_or(0, Vec::len)
    }

    /// Whether any recognizer serves `gesture_type`.
    pub fn is_registered(&self, gesture_type: GestureType) -> bool {
        self.recognizer_count(gesture_type) > 0
    }

    /// Register a recognizer.
    ///
    /// The recognizer is asked once for a gesture without a target to learn
    /// its type. A custom type is replaced by the next free custom id.
    pub(crate) fn register_recognizer(
        &mut self,
        mut recognizer: Box<dyn GestureRecognizer>,
        tree: &mut WidgetTree,
    ) -> Result<GestureType, GestureError> {
        let Some(probe) = recognizer.create(None, tree) else {
            tracing::warn!(target: targets::GESTURE, "recognizer failed to create a gesture object, registration skipped");
            return Err(GestureError::RecognizerCreateFailed);
        };

        let mut gesture_type = probe.gesture_type();
        if gesture_type.is_custom() {
            gesture_type = GestureType::Custom(self.next_custom_id);
            self.next_custom_id += 1;
        }

        let id = self.recognizers.insert(RecognizerEntry {
            recognizer,
            gesture_type,
            obsolete: false,
        });
        self.by_type.entry(gesture_type).or_default().push(id);
        tracing::debug!(target: targets::GESTURE, ?gesture_type, "registered gesture recognizer");
        Ok(gesture_type)
    }

    /// Unregister every recognizer of `gesture_type`.
    ///
    /// Gestures that are not running are dropped now; running ones are
    /// dropped when their cycle ends.
    pub(crate) fn unregister_recognizer(
        &mut self,
        gesture_type: GestureType,
        store: &mut GestureStore,
    ) -> Result<(), GestureError> {
        let Some(ids) = self.by_type.remove(&gesture_type) else {
            return Err(GestureError::UnknownGestureType(gesture_type));
        };

        for recognizer in ids {
            if let Some(entry) = self.recognizers.get_mut(recognizer) {
                entry.obsolete = true;
            }
            for gesture in store.ids_for_recognizer(recognizer) {
                if !store.active.contains(&gesture) {
                    store.remove(gesture);
                }
            }
            self.drop_if_unused(recognizer, store);
        }
        tracing::debug!(target: targets::GESTURE, ?gesture_type, "unregistered gesture recognizers");
        Ok(())
    }

    fn drop_if_unused(&mut self, recognizer: RecognizerId, store: &GestureStore) {
        let obsolete = self.recognizers.get(recognizer).is_some_and(|e| e.obsolete);
        if obsolete && store.ids_for_recognizer(recognizer).is_empty() {
            self.recognizers.remove(recognizer);
        }
    }

    /// Offer an event sent to `receiver` to the recognizers.
    ///
    /// Returns `true` when a recognizer asked for the event to be consumed.
    pub(crate) fn filter_event(&mut self, app: &mut Application, receiver: WidgetId, event: &Event) -> bool {
        let store = &app.state.gestures;
        if !store.has_contexts() || !app.tree.contains(receiver) {
            return false;
        }

        let mut contexts = Vec::new();
        let mut seen = BTreeSet::new();
        for &(gesture_type, _) in store.contexts(receiver) {
            seen.insert(gesture_type);
            contexts.push(GestureContext::Owner(receiver, gesture_type));
        }

        let mut widget = if app.tree.is_window(receiver) {
            None
        } else {
            app.tree.parent(receiver)
        };
        while let Some(w) = widget {
            for &(gesture_type, flags) in store.contexts(w) {
                if !flags.has(GestureFlags::DONT_START_ON_CHILDREN) && seen.insert(gesture_type) {
                    contexts.push(GestureContext::Owner(w, gesture_type));
                }
            }
            if app.tree.is_window(w) {
                break;
            }
            widget = app.tree.parent(w);
        }

        if contexts.is_empty() {
            return false;
        }
        self.filter_through_contexts(app, &contexts, event)
    }

    /// Deliver a fired gesture timer to the recognizer that started it.
    pub(crate) fn filter_timer(&mut self, app: &mut Application, gesture: GestureId, timer: GestureTimerId) -> bool {
        let live = app
            .state
            .gestures
            .get(gesture)
            .and_then(|g| g.recognizer())
            .and_then(|r| self.recognizers.get(r))
            .is_some_and(|e| !e.obsolete);
        if !live {
            return false;
        }
        let event = Event::Timer(TimerEvent {
            base: EventBase::new(),
            timer,
        });
        self.filter_through_contexts(app, &[GestureContext::Gesture(gesture)], &event)
    }

    /// The gesture `recognizer` keeps for `owner`, created on first use.
    fn gesture_for(
        &mut self,
        app: &mut Application,
        owner: WidgetId,
        gesture_type: GestureType,
        recognizer: RecognizerId,
    ) -> Option<GestureId> {
        if let Some(id) = app.state.gestures.find(owner, gesture_type, recognizer) {
            return Some(id);
        }
        if !app.tree.contains(owner) {
            return None;
        }
        let entry = self.recognizers.get_mut(recognizer)?;
        let Some(gesture) = entry.recognizer.create(Some(owner), &mut app.tree) else {
            tracing::warn!(target: targets::GESTURE, ?gesture_type, "recognizer failed to create a gesture object");
            return None;
        };
        Some(app.state.gestures.insert(gesture, owner, gesture_type, recognizer))
    }

    fn filter_through_contexts(&mut self, app: &mut Application, contexts: &[GestureContext], event: &Event) -> bool {
        let _perf = PerfSpan::new(span_names::GESTURE_ROUND);

        let mut triggered = BTreeSet::new();
        let mut finished = BTreeSet::new();
        let mut new_maybe = BTreeSet::new();
        let mut not_gesture = BTreeSet::new();
        let mut consume = false;

        for &context in contexts {
            let candidates: Vec<(GestureId, RecognizerId, WidgetId)> = match context {
                GestureContext::Owner(owner, gesture_type) => {
                    let recognizers = self.by_type.get(&gesture_type).cloned().unwrap_or_default();
                    recognizers
                        .into_iter()
                        .filter_map(|r| self.gesture_for(app, owner, gesture_type, r).map(|g| (g, r, owner)))
                        .collect()
                }
                GestureContext::Gesture(id) => app
                    .state
                    .gestures
                    .get(id)
                    .and_then(|g| Some((id, g.recognizer()?, g.owner()?)))
                    .into_iter()
                    .collect(),
            };

            for (id, recognizer, watched) in candidates {
                let Some(entry) = self.recognizers.get_mut(recognizer) else {
                    continue;
                };
                let Some((gesture, timers)) = app.state.gestures.gesture_and_timers(id) else {
                    continue;
                };
                let mut ctx = RecognizerContext::new(id, &app.tree, timers);
                let result = entry.recognizer.recognize(gesture, watched, event, &mut ctx);

                match result.state() {
                    RecognizerResult::TRIGGER => {
                        tracing::trace!(target: targets::GESTURE, ?id, "gesture triggered");
                        triggered.insert(id);
                    }
                    RecognizerResult::FINISH => {
                        tracing::trace!(target: targets::GESTURE, ?id, "gesture finished");
                        finished.insert(id);
                    }
                    RecognizerResult::MAYBE => {
                        new_maybe.insert(id);
                    }
                    RecognizerResult::CANCEL => {
                        not_gesture.insert(id);
                    }
                    _ => {}
                }
                if result.consumes() {
                    consume = true;
                }
            }
        }

        if triggered.is_empty() && finished.is_empty() && new_maybe.is_empty() && not_gesture.is_empty() {
            return consume;
        }

        let active = app.state.gestures.active.clone();
        let maybe = app.state.gestures.maybe.clone();

        let started: BTreeSet<GestureId> = triggered.difference(&active).copied().collect();
        let triggered: BTreeSet<GestureId> = triggered.intersection(&active).copied().collect();
        let active_to_maybe: BTreeSet<GestureId> = active.intersection(&new_maybe).copied().collect();
        let maybe_to_canceled: BTreeSet<GestureId> = maybe.intersection(&not_gesture).copied().collect();
        let canceled: BTreeSet<GestureId> = active.intersection(&not_gesture).copied().collect();

        {
            let store = &mut app.state.gestures;
            store.maybe.extend(new_maybe.iter().copied());
            for id in started
                .iter()
                .chain(&triggered)
                .chain(&finished)
                .chain(&canceled)
                .chain(&not_gesture)
            {
                store.maybe.remove(id);
            }
        }

        // Gestures that finish without having started are single shot:
        // they are shown as started first.
        let not_started: BTreeSet<GestureId> = finished.difference(&active).copied().collect();
        let mut ended_undelivered = BTreeSet::new();
        if !not_started.is_empty() {
            self.set_states(app, &not_started, GestureState::Started);
            let mut undelivered = BTreeSet::new();
            self.deliver_events(app, &not_started, &mut undelivered);
            for id in undelivered {
                finished.remove(&id);
                ended_undelivered.insert(id);
            }
        }

        {
            let store = &mut app.state.gestures;
            store.active.extend(started.iter().copied());
            for id in finished.iter().chain(&active_to_maybe).chain(&canceled) {
                store.active.remove(id);
            }
        }

        self.set_states(app, &started, GestureState::Started);
        self.set_states(app, &triggered, GestureState::Updated);
        self.set_states(app, &finished, GestureState::Finished);
        self.set_states(app, &canceled, GestureState::Canceled);
        self.set_states(app, &active_to_maybe, GestureState::Finished);

        tracing::debug!(
            target: targets::GESTURE,
            started = started.len(),
            updated = triggered.len(),
            finished = finished.len(),
            canceled = canceled.len(),
            maybe = app.state.gestures.maybe.len(),
            "gesture round"
        );

        let deliver: BTreeSet<GestureId> = started
            .iter()
            .chain(&triggered)
            .chain(&finished)
            .chain(&canceled)
            .chain(&active_to_maybe)
            .copied()
            .collect();
        let mut undelivered = BTreeSet::new();
        self.deliver_events(app, &deliver, &mut undelivered);

        for &id in &started {
            if undelivered.contains(&id) {
                continue;
            }
            let cancels = app
                .state
                .gestures
                .get(id)
                .is_some_and(|g| g.cancel_policy() == CancelPolicy::CancelAllInContext);
            if cancels {
                self.cancel_gestures_for_children(app, id);
            }
        }

        for id in &undelivered {
            app.state.gestures.active.remove(id);
        }

        let ended: BTreeSet<GestureId> = finished
            .iter()
            .chain(&canceled)
            .chain(&undelivered)
            .chain(&maybe_to_canceled)
            .chain(&ended_undelivered)
            .copied()
            .collect();
        for id in ended {
            self.recycle(app, id);
        }

        consume
    }

    fn set_states(&self, app: &mut Application, ids: &BTreeSet<GestureId>, state: GestureState) {
        for &id in ids {
            if let Some(gesture) = app.state.gestures.get_mut(id) {
                gesture.set_state(state);
            }
        }
    }

    /// Deliver `gestures` to their targets, resolving targets for gestures
    /// that just started. Gestures without a target end up in
    /// `undelivered`.
    fn deliver_events(
        &mut self,
        app: &mut Application,
        gestures: &BTreeSet<GestureId>,
        undelivered: &mut BTreeSet<GestureId>,
    ) {
        if gestures.is_empty() {
            return;
        }

        let mut started = Vec::new();
        let mut normal = GesturesPerWidget::new();

        for &id in gestures {
            let Some(gesture) = app.state.gestures.get(id) else {
                continue;
            };
            let known = app
                .state
                .gestures
                .targets
                .get(&id)
                .copied()
                .filter(|&w| app.tree.contains(w));
            let target = known.or_else(|| match gesture.hot_spot() {
                Some(hot_spot) => app.tree.top_level_at(hot_spot).map(|top| {
                    let local = app.tree.map_from_global(top, hot_spot);
                    app.tree.child_at(top, local).unwrap_or(top)
                }),
                None => gesture.owner().filter(|&w| app.tree.contains(w)),
            });

            match target {
                Some(target) => {
                    let state = gesture.state();
                    app.state.gestures.targets.insert(id, target);
                    if state == GestureState::Started {
                        started.push(id);
                    } else {
                        push_for_widget(&mut normal, target, id);
                    }
                }
                None => {
                    tracing::debug!(target: targets::GESTURE, ?id, "no target for gesture");
                    undelivered.insert(id);
                }
            }
        }

        let conflicted = self.gesture_targets(app, &started, &mut normal);

        for (receiver, ids) in conflicted {
            if !app.tree.contains(receiver) {
                continue;
            }
            let mut probe = GestureEvent::new(EventType::GestureOverride, entries(&app.state.gestures, &ids));
            probe.base.ignore();
            probe.set_all_gestures_accepted(false);
            let mut event = Event::Gesture(probe);
            tracing::trace!(target: targets::GESTURE, gestures = ids.len(), "sending gesture override");
            app.send_event(receiver, &mut event);

            let Some(probe) = event.as_gesture() else {
                continue;
            };
            let event_accepted = probe.base.is_accepted();
            for entry in probe.gestures() {
                if app.state.gestures.get(entry.id).is_none() {
                    continue;
                }
                let claimed_by = (event_accepted || entry.is_accepted())
                    .then(|| probe.target_widget(entry.gesture_type))
                    .flatten();
                match claimed_by {
                    Some(widget) => {
                        app.state.gestures.targets.insert(entry.id, widget);
                        push_for_widget(&mut normal, widget, entry.id);
                    }
                    None => push_for_widget(&mut normal, receiver, entry.id),
                }
            }
        }

        for (widget, ids) in normal {
            if ids.is_empty() {
                continue;
            }
            if !app.tree.contains(widget) {
                undelivered.extend(ids);
                continue;
            }
            let mut event = Event::Gesture(GestureEvent::new(
                EventType::Gesture,
                entries(&app.state.gestures, &ids),
            ));
            app.send_event(widget, &mut event);

            let Some(delivered) = event.as_gesture() else {
                continue;
            };
            let event_accepted = delivered.base.is_accepted();
            for entry in delivered.gestures() {
                if entry.state != GestureState::Started || !(event_accepted || entry.is_accepted()) {
                    continue;
                }
                if let Some(w) = delivered.target_widget(entry.gesture_type)
                    && app.state.gestures.get(entry.id).is_some()
                {
                    app.state.gestures.targets.insert(entry.id, w);
                }
            }
        }
    }

    /// Split just-started gestures into those an ancestor of their target
    /// also listens for, which get a `GestureOverride` probe first, and the
    /// rest, which are added to `normal`.
    fn gesture_targets(
        &self,
        app: &Application,
        started: &[GestureId],
        normal: &mut GesturesPerWidget,
    ) -> GesturesPerWidget {
        let store = &app.state.gestures;
        let mut conflicts = GesturesPerWidget::new();

        for &id in started {
            let (Some(&target), Some(gesture)) = (store.targets.get(&id), store.get(id)) else {
                continue;
            };
            let gesture_type = gesture.gesture_type();

            let mut conflicted = false;
            let mut widget = if app.tree.is_window(target) {
                None
            } else {
                app.tree.parent(target)
            };
            while let Some(w) = widget {
                if store
                    .context_flags(w, gesture_type)
                    .is_some_and(|flags| !flags.has(GestureFlags::DONT_START_ON_CHILDREN))
                {
                    conflicted = true;
                    break;
                }
                if app.tree.is_window(w) {
                    break;
                }
                widget = app.tree.parent(w);
            }

            if conflicted {
                push_for_widget(&mut conflicts, target, id);
            } else {
                push_for_widget(normal, target, id);
            }
        }
        conflicts
    }

    /// Cancel running gestures targeted at descendants of `original`'s
    /// target.
    fn cancel_gestures_for_children(&mut self, app: &mut Application, original: GestureId) {
        let Some(&origin) = app.state.gestures.targets.get(&original) else {
            return;
        };

        let canceled: Vec<GestureId> = app
            .state
            .gestures
            .active
            .iter()
            .copied()
            .filter(|id| {
                app.state
                    .gestures
                    .targets
                    .get(id)
                    .is_some_and(|&w| w != origin && app.tree.is_ancestor_of(origin, w))
            })
            .collect();
        if canceled.is_empty() {
            return;
        }
        tracing::debug!(target: targets::GESTURE, count = canceled.len(), "canceling gestures in context");

        let mut per_target = GesturesPerWidget::new();
        for &id in &canceled {
            app.state.gestures.active.remove(&id);
            if let Some(gesture) = app.state.gestures.get_mut(id) {
                gesture.set_state(GestureState::Canceled);
            }
            if let Some(&target) = app.state.gestures.targets.get(&id) {
                push_for_widget(&mut per_target, target, id);
            }
        }

        for (_, ids) in per_target {
            let set: BTreeSet<GestureId> = ids.into_iter().collect();
            let mut undelivered = BTreeSet::new();
            self.deliver_events(app, &set, &mut undelivered);
        }

        for id in canceled {
            self.recycle(app, id);
        }
    }

    /// Return a gesture to its idle state, or drop it when its recognizer
    /// was unregistered.
    fn recycle(&mut self, app: &mut Application, id: GestureId) {
        let Some(recognizer) = app.state.gestures.get(id).and_then(|g| g.recognizer()) else {
            return;
        };
        app.state.gestures.targets.remove(&id);

        let live = self.recognizers.get(recognizer).is_some_and(|e| !e.obsolete);
        if !live {
            app.state.gestures.remove(id);
            self.drop_if_unused(recognizer, &app.state.gestures);
            return;
        }

        if let (Some(entry), Some((gesture, timers))) = (
            self.recognizers.get_mut(recognizer),
            app.state.gestures.gesture_and_timers(id),
        ) {
            let mut ctx = RecognizerContext::new(id, &app.tree, timers);
            entry.recognizer.reset(gesture, &mut ctx);
            gesture.reset_common();
        }
        app.state.gestures.active.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{Gesture, GesturePayload, TapRecognizer};
    use horizon_input_core::Rect;

    /// A custom recognizer that finishes on every key press.
    struct KeyTap;

    impl GestureRecognizer for KeyTap {
        fn create(&mut self, _target: Option<WidgetId>, _tree: &mut WidgetTree) -> Option<Gesture> {
            Some(Gesture::new(GestureType::Custom(0), GesturePayload::Custom(Box::new(0u32))))
        }

        fn recognize(
            &mut self,
            _gesture: &mut Gesture,
            _watched: WidgetId,
            event: &Event,
            _ctx: &mut RecognizerContext<'_>,
        ) -> RecognizerResult {
            if event.event_type() == EventType::KeyPress {
                RecognizerResult::FINISH
            } else {
                RecognizerResult::IGNORE
            }
        }
    }

    struct Broken;

    impl GestureRecognizer for Broken {
        fn create(&mut self, _target: Option<WidgetId>, _tree: &mut WidgetTree) -> Option<Gesture> {
            None
        }

        fn recognize(
            &mut self,
            _gesture: &mut Gesture,
            _watched: WidgetId,
            _event: &Event,
            _ctx: &mut RecognizerContext<'_>,
        ) -> RecognizerResult {
            RecognizerResult::IGNORE
        }
    }

    #[test]
    fn test_custom_types_are_assigned_in_order() {
        let mut manager = GestureManager::new();
        let mut tree = WidgetTree::new();
        let first = manager.register_recognizer(Box::new(KeyTap), &mut tree).unwrap();
        let second = manager.register_recognizer(Box::new(KeyTap), &mut tree).unwrap();
        assert_eq!(first, GestureType::Custom(0x101));
        assert_eq!(second, GestureType::Custom(0x102));
        assert_eq!(manager.recognizer_count(first), 1);
    }

    #[test]
    fn test_failed_create_skips_registration() {
        let mut manager = GestureManager::new();
        let mut tree = WidgetTree::new();
        assert_eq!(
            manager.register_recognizer(Box::new(Broken), &mut tree),
            Err(GestureError::RecognizerCreateFailed)
        );
        assert_eq!(manager.recognizers.len(), 0);
    }

    #[test]
    fn test_multiple_recognizers_per_type() {
        let mut manager = GestureManager::new();
        let mut tree = WidgetTree::new();
        manager.register_recognizer(Box::new(TapRecognizer::new()), &mut tree).unwrap();
        manager.register_recognizer(Box::new(TapRecognizer::new()), &mut tree).unwrap();
        assert_eq!(manager.recognizer_count(GestureType::Tap), 2);
    }

    #[test]
    fn test_unregister_drops_idle_gestures() {
        let mut manager = GestureManager::new();
        let mut tree = WidgetTree::new();
        let window = tree.create_window("w", horizon_input_core::WindowType::Window, Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut store = GestureStore::default();
        manager.register_recognizer(Box::new(TapRecognizer::new()), &mut tree).unwrap();
        let recognizer = manager.by_type[&GestureType::Tap][0];

        let idle = store.insert(
            Gesture::new(GestureType::Tap, GesturePayload::Tap(Default::default())),
            window,
            GestureType::Tap,
            recognizer,
        );
        let running = store.insert(
            Gesture::new(GestureType::Tap, GesturePayload::Tap(Default::default())),
            window,
            GestureType::Tap,
            recognizer,
        );
        store.active.insert(running);

        manager.unregister_recognizer(GestureType::Tap, &mut store).unwrap();
        assert!(store.get(idle).is_none());
        assert!(store.get(running).is_some());
        assert!(!manager.is_registered(GestureType::Tap));
        // The recognizer stays until its running gesture is gone.
        assert!(manager.recognizers.contains_key(recognizer));

        assert_eq!(
            manager.unregister_recognizer(GestureType::Tap, &mut store),
            Err(GestureError::UnknownGestureType(GestureType::Tap))
        );
    }
}

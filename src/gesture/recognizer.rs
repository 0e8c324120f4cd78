//! Touch and ctrl-wheel pinch recognition.

use super::{Gesture, InputEvent, PinchDirection, PinchEventDetail, WheelDirection};
use crate::model::Point;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Quiescence period after the last ctrl-wheel event before the synthetic pinch ends.
pub const DEFAULT_WHEEL_GESTURE_END: Duration = Duration::from_millis(100);

const MIN_WHEEL_SCALE: f64 = 0.75;
const MAX_WHEEL_SCALE: f64 = 1.25;

/// The two touch points that define a pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchPair {
    first: Point,
    second: Point,
}

impl TouchPair {
    fn from_touches(touches: &[Point]) -> Option<Self> {
        match touches {
            [first, second, ..] => Some(Self {
                first: *first,
                second: *second,
            }),
            _ => None,
        }
    }

    fn distance(&self) -> f64 {
        self.first.distance(self.second)
    }

    fn center(&self) -> Point {
        self.first.midpoint(self.second)
    }

    /// Ratio of this pair's spread to `reference`'s, or `None` if `reference` is
    /// degenerate.
    fn scale_ratio(&self, reference: &TouchPair) -> Option<f64> {
        let reference_distance = reference.distance();
        if reference_distance == 0.0 {
            None
        } else {
            Some(self.distance() / reference_distance)
        }
    }
}

/// A synthetic pinch driven by ctrl-wheel input.
#[derive(Debug, Clone, Copy)]
struct WheelPinch {
    accumulated_scale: f64,
    position: Point,
    deadline: Instant,
}

/// Classifies raw input into a pinch gesture stream.
///
/// Touch pinches begin when exactly two fingers are down and end as soon as the touch
/// count changes. Ctrl-wheel pinches begin on the first ctrl-wheel event and end once
/// no further ctrl-wheel input arrives for the configured quiescence period; the host
/// drives that timeout by calling [`GestureRecognizer::poll`].
///
/// At most one pinch is open at a time. A touch pinch ends a running ctrl-wheel pinch,
/// and ctrl-wheel input is ignored while a touch pinch is in progress.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    presentation_mode: bool,
    wheel_gesture_end: Duration,
    last_touch_count: usize,
    pinch_start: Option<TouchPair>,
    last_pair: Option<TouchPair>,
    wheel_pinch: Option<WheelPinch>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_WHEEL_GESTURE_END)
    }
}

impl GestureRecognizer {
    /// Create a recognizer whose ctrl-wheel pinches end after `wheel_gesture_end` of
    /// quiescence.
    pub fn new(wheel_gesture_end: Duration) -> Self {
        Self {
            presentation_mode: false,
            wheel_gesture_end,
            last_touch_count: 0,
            pinch_start: None,
            last_pair: None,
            wheel_pinch: None,
        }
    }

    /// In presentation mode every wheel event becomes a [`Gesture::Wheel`] page flip.
    pub fn set_presentation_mode(&mut self, enabled: bool) {
        self.presentation_mode = enabled;
    }

    /// Whether presentation mode is active.
    pub fn presentation_mode(&self) -> bool {
        self.presentation_mode
    }

    /// Whether the most recent touch-start put exactly two fingers down.
    pub fn was_two_finger_touch(&self) -> bool {
        self.last_touch_count == 2
    }

    /// Whether a touch pinch is in progress.
    pub fn is_pinching(&self) -> bool {
        self.pinch_start.is_some()
    }

    /// Whether a context menu should be suppressed.
    ///
    /// A menu opened by a long press is suppressed. A two-finger tap is a legitimate
    /// secondary click, and devices that do not fire touch events (a mouse) are never
    /// suppressed.
    pub fn should_suppress_context_menu(&self, source_fires_touch_events: bool) -> bool {
        source_fires_touch_events && !self.was_two_finger_touch()
    }

    /// When the pending ctrl-wheel pinch will end, if one is active.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.wheel_pinch.map(|pinch| pinch.deadline)
    }

    /// Feed one raw input event.
    ///
    /// Any ctrl-wheel pinch whose quiescence period elapsed before `now` is ended first,
    /// so the returned gestures are always in causal order.
    pub fn handle(&mut self, event: &InputEvent, now: Instant) -> Vec<Gesture> {
        let mut gestures: Vec<Gesture> = self.poll(now).into_iter().collect();

        match event {
            InputEvent::TouchStart { touches } => {
                gestures.extend(self.on_touch_start(touches));
            }
            InputEvent::TouchMove { touches }
            | InputEvent::TouchEnd { touches }
            | InputEvent::TouchCancel { touches } => {
                gestures.extend(self.on_touch(touches));
            }
            InputEvent::Wheel {
                delta_y,
                position,
                ctrl_key,
            } => {
                gestures.extend(self.on_wheel(*delta_y, *position, *ctrl_key, now));
            }
        }

        gestures
    }

    /// End the ctrl-wheel pinch if its quiescence period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Gesture> {
        if now < self.wheel_pinch?.deadline {
            return None;
        }
        self.end_wheel_pinch()
    }

    fn end_wheel_pinch(&mut self) -> Option<Gesture> {
        let pinch = self.wheel_pinch.take()?;
        debug!(
            start_scale_ratio = pinch.accumulated_scale,
            "ctrl-wheel pinch ended"
        );
        Some(Gesture::PinchEnd(PinchEventDetail {
            start_scale_ratio: Some(pinch.accumulated_scale),
            ..PinchEventDetail::at(pinch.position)
        }))
    }

    /// A touch pinch takes over from a ctrl-wheel pinch still in progress.
    fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Gesture> {
        self.last_touch_count = touches.len();
        if !self.was_two_finger_touch() {
            return Vec::new();
        }
        let Some(pair) = TouchPair::from_touches(touches) else {
            return Vec::new();
        };

        let mut gestures: Vec<Gesture> = self.end_wheel_pinch().into_iter().collect();
        self.pinch_start = Some(pair);
        self.last_pair = Some(pair);
        trace!(center = ?pair.center(), "touch pinch started");
        gestures.push(Gesture::PinchStart(PinchEventDetail::at(pair.center())));
        gestures
    }

    fn on_touch(&mut self, touches: &[Point]) -> Option<Gesture> {
        let start = self.pinch_start?;
        let last = self.last_pair.unwrap_or(start);

        // The last recorded event always had exactly two touches.
        let current = match TouchPair::from_touches(touches) {
            Some(pair) if touches.len() == 2 => pair,
            _ => {
                self.pinch_start = None;
                self.last_pair = None;
                let start_scale_ratio = last.scale_ratio(&start);
                trace!(?start_scale_ratio, "touch pinch ended");
                return Some(Gesture::PinchEnd(PinchEventDetail {
                    start_scale_ratio,
                    ..PinchEventDetail::at(last.center())
                }));
            }
        };

        let scale_ratio = current.scale_ratio(&last);
        let start_scale_ratio = current.scale_ratio(&start);
        self.last_pair = Some(current);

        Some(Gesture::PinchUpdate(PinchEventDetail {
            center: current.center(),
            scale_ratio,
            start_scale_ratio,
            direction: Some(PinchDirection::from_scale_ratio(scale_ratio)),
        }))
    }

    fn on_wheel(
        &mut self,
        delta_y: f64,
        position: Point,
        ctrl_key: bool,
        now: Instant,
    ) -> Vec<Gesture> {
        if self.presentation_mode {
            let direction = if delta_y > 0.0 {
                WheelDirection::Down
            } else {
                WheelDirection::Up
            };
            return vec![Gesture::Wheel(direction)];
        }

        if !ctrl_key {
            return Vec::new();
        }
        if self.is_pinching() {
            trace!("ctrl-wheel ignored during touch pinch");
            return Vec::new();
        }

        let scale = (-delta_y / 100.0)
            .exp()
            .clamp(MIN_WHEEL_SCALE, MAX_WHEEL_SCALE);

        let mut gestures = Vec::with_capacity(2);
        let accumulated = match self.wheel_pinch {
            Some(pinch) => pinch.accumulated_scale,
            None => {
                debug!(?position, "ctrl-wheel pinch started");
                gestures.push(Gesture::PinchStart(PinchEventDetail::at(position)));
                1.0
            }
        } * scale;

        self.wheel_pinch = Some(WheelPinch {
            accumulated_scale: accumulated,
            position,
            deadline: now + self.wheel_gesture_end,
        });

        gestures.push(Gesture::PinchUpdate(PinchEventDetail {
            center: position,
            scale_ratio: Some(scale),
            start_scale_ratio: Some(accumulated),
            direction: Some(PinchDirection::from_scale_ratio(Some(scale))),
        }));
        gestures
    }
}

#[cfg(test)]
#[path = "recognizer_tests.rs"]
mod tests;

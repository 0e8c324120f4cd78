//! The viewer session: the shell that owns one viewport, one gesture recognizer and
//! one renderer channel, and routes traffic between them.
//!
//! Raw input goes through the recognizer. Pinch gestures are deferred to the next
//! animation frame, where at most one pinch update is applied; further updates that
//! arrive in the same frame are dropped. Viewport notifications are forwarded to the
//! renderer as content-controller hooks and scroll updates. Renderer messages feed
//! the viewport, and resolved saves and replies come back as [`ShellEvent`]s.

mod command;

pub use command::Command;

use crate::channel::{
    ChannelEvent, NamedDestinationReply, PendingReply, PendingSave, RenderChannel,
    RendererTransport, SaveFile, SelectedTextReply, ThumbnailReply,
};
use crate::gesture::{Gesture, GestureRecognizer, InputEvent};
use crate::model::{ProtocolError, SaveError, Size, ViewportError};
use crate::viewport::{Viewport, ViewportEvent, ViewportOptions, ViewportSnapshot};
use crate::zoom::ZoomCoordinator;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Something the host surface should know about.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    /// Geometry changed; reposition chrome.
    ViewportChanged(ViewportSnapshot),
    /// The host should set its zoom.
    BrowserZoomRequested(f64),
    /// A renderer message this core does not interpret.
    PluginMessage(serde_json::Value),
    /// A save finished. `None` when the renderer wrote the file itself.
    SaveCompleted {
        /// Token of the save.
        token: String,
        /// Validated document, ready to write.
        file: Option<SaveFile>,
    },
    /// A save did not complete; nothing must be written.
    SaveFailed {
        /// Token of the save.
        token: String,
        /// Why.
        error: SaveError,
    },
    /// A requested thumbnail arrived.
    ThumbnailReady(ThumbnailReply),
    /// A named destination was resolved.
    NamedDestinationResolved(NamedDestinationReply),
    /// The selected text arrived.
    SelectedText(SelectedTextReply),
}

/// Fixed parameters of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Viewport parameters.
    pub viewport: ViewportOptions,
    /// Quiet period that ends a ctrl-wheel pinch.
    pub wheel_gesture_end: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            viewport: ViewportOptions::default(),
            wheel_gesture_end: crate::gesture::DEFAULT_WHEEL_GESTURE_END,
        }
    }
}

/// One document's interactive surface.
#[derive(Debug)]
pub struct ViewerSession<T> {
    viewport: Viewport,
    recognizer: GestureRecognizer,
    channel: RenderChannel<T>,
    deferred_pinches: VecDeque<Gesture>,
    pinch_update_scheduled: bool,
    form_field_focused: bool,
    pending_saves: Vec<PendingSave>,
    pending_thumbnails: Vec<PendingReply<ThumbnailReply>>,
    pending_destinations: Vec<PendingReply<NamedDestinationReply>>,
    pending_selections: Vec<PendingReply<SelectedTextReply>>,
}

impl<T: RendererTransport> ViewerSession<T> {
    /// Create a session for a window of the given size.
    pub fn new(window: Size, options: SessionOptions, zoom: ZoomCoordinator, transport: T) -> Self {
        info!(
            width = window.width,
            height = window.height,
            behavior = ?zoom.behavior(),
            "viewer session created"
        );
        Self {
            viewport: Viewport::new(window, options.viewport, zoom),
            recognizer: GestureRecognizer::new(options.wheel_gesture_end),
            channel: RenderChannel::new(transport),
            deferred_pinches: VecDeque::new(),
            pinch_update_scheduled: false,
            form_field_focused: false,
            pending_saves: Vec::new(),
            pending_thumbnails: Vec::new(),
            pending_destinations: Vec::new(),
            pending_selections: Vec::new(),
        }
    }

    /// The viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The renderer channel.
    pub fn channel(&self) -> &RenderChannel<T> {
        &self.channel
    }

    /// Mutable access to the renderer channel, e.g. to flush its transport.
    pub fn channel_mut(&mut self) -> &mut RenderChannel<T> {
        &mut self.channel
    }

    /// Whether a form field in the document has focus.
    pub fn form_field_focused(&self) -> bool {
        self.form_field_focused
    }

    /// When [`ViewerSession::animation_frame`] must run next even without new input.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.recognizer.next_deadline()
    }

    /// Whether the context menu should be suppressed for the current touch sequence.
    pub fn should_suppress_context_menu(&self, source_fires_touch_events: bool) -> bool {
        self.recognizer
            .should_suppress_context_menu(source_fires_touch_events)
    }

    // ===== Input =====

    /// Feed raw input received at `now`.
    ///
    /// Presentation-mode wheel gestures take effect immediately; pinches wait for the
    /// next animation frame.
    pub fn handle_input(&mut self, event: &InputEvent, now: Instant) -> Vec<ShellEvent> {
        for gesture in self.recognizer.handle(event, now) {
            self.schedule_gesture(gesture);
        }
        self.drain()
    }

    /// Run one animation frame at `now`: expire a quiet wheel pinch, then apply the
    /// deferred pinch gestures.
    ///
    /// A gesture the viewport rejects is dropped and the remaining ones still apply.
    /// The first rejection is returned after the frame's events have been forwarded.
    pub fn animation_frame(&mut self, now: Instant) -> Result<Vec<ShellEvent>, ViewportError> {
        if let Some(gesture) = self.recognizer.poll(now) {
            self.schedule_gesture(gesture);
        }

        self.pinch_update_scheduled = false;
        let mut result = Ok(());
        while let Some(gesture) = self.deferred_pinches.pop_front() {
            // The rest of the queue still applies so a pending end is not lost.
            if let Err(err) = self.viewport.dispatch_gesture(&gesture) {
                warn!(error = %err, ?gesture, "pinch out of order, dropped");
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }

        let events = self.drain();
        result.map(|()| events)
    }

    fn schedule_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Wheel(_) => {
                if let Err(err) = self.viewport.dispatch_gesture(&gesture) {
                    warn!(error = %err, "wheel gesture rejected");
                }
            }
            _ if self.viewport.presentation_mode() => {
                trace!(?gesture, "pinch dropped in presentation mode");
            }
            Gesture::PinchUpdate(_) => {
                if self.pinch_update_scheduled {
                    trace!("pinch update dropped, one already scheduled this frame");
                    return;
                }
                self.pinch_update_scheduled = true;
                self.deferred_pinches.push_back(gesture);
            }
            Gesture::PinchStart(_) | Gesture::PinchEnd(_) => {
                self.deferred_pinches.push_back(gesture);
            }
        }
    }

    // ===== Commands =====

    /// Apply a shell command.
    pub fn command(&mut self, command: Command) -> Vec<ShellEvent> {
        debug!(?command, "command");
        match command {
            Command::ZoomIn => self.viewport.zoom_in(),
            Command::ZoomOut => self.viewport.zoom_out(),
            Command::SetZoom { zoom } => self.viewport.set_zoom(zoom),
            Command::SetFittingType { fitting_type } => {
                self.viewport.set_fitting_type(fitting_type)
            }
            Command::GoToPage { page } => self.viewport.go_to_page(page),
            Command::NextPage => self.viewport.go_to_next_page(),
            Command::PreviousPage => self.viewport.go_to_previous_page(),
            Command::RotateClockwise => {
                self.viewport.rotate_clockwise();
                self.channel.rotate_clockwise();
            }
            Command::RotateCounterclockwise => {
                self.viewport.rotate_counterclockwise();
                self.channel.rotate_counterclockwise();
            }
            Command::SetTwoUpView { enabled } => self.channel.set_two_up_view(enabled),
            Command::SetPresentationMode { enabled } => {
                self.viewport.set_presentation_mode(enabled);
                self.recognizer.set_presentation_mode(enabled);
                if enabled {
                    self.deferred_pinches.clear();
                }
            }
            Command::DisplayAnnotations { display } => self.channel.display_annotations(display),
            Command::SelectAll => self.channel.select_all(),
            Command::Print => self.channel.print(),
            Command::Save { request_type } => {
                let save = self.channel.save(request_type);
                self.pending_saves.push(save);
            }
            Command::GetThumbnail { page } => {
                let reply = self.channel.get_thumbnail(page);
                self.pending_thumbnails.push(reply);
            }
            Command::GoToNamedDestination { name } => {
                let reply = self.channel.get_named_destination(name);
                self.pending_destinations.push(reply);
            }
            Command::GetSelectedText => {
                let reply = self.channel.get_selected_text();
                self.pending_selections.push(reply);
            }
            Command::Key(event) => {
                self.viewport
                    .handle_directional_key_event(&event, self.form_field_focused);
            }
            Command::Resize(size) => self.viewport.resize(size),
            Command::BrowserZoomChanged { zoom } => self.viewport.on_browser_zoom_change(zoom),
            Command::BrowserZoomApplied { zoom } => self.viewport.on_browser_zoom_applied(zoom),
        }
        self.drain()
    }

    // ===== Renderer =====

    /// Process one message from the renderer.
    ///
    /// Protocol violations are returned as `Err`; the host should treat them as fatal
    /// for the document. A save rejected that way is also reported as
    /// [`ShellEvent::SaveFailed`] by the next call that returns events.
    pub fn handle_renderer_message(
        &mut self,
        message: serde_json::Value,
    ) -> Result<Vec<ShellEvent>, ProtocolError> {
        let mut events = Vec::new();
        match self.channel.handle_message(message)? {
            None => {}
            Some(ChannelEvent::GoToPage(page)) => self.viewport.go_to_page(page),
            Some(ChannelEvent::SetScrollPosition(point)) => self.viewport.scroll_to(point),
            Some(ChannelEvent::ScrollBy(delta)) => self.viewport.scroll_by(delta),
            Some(ChannelEvent::DocumentDimensions(dimensions)) => {
                self.viewport.set_document_dimensions(dimensions)
            }
            Some(ChannelEvent::NavigateToDestination { page, x, y, zoom }) => {
                self.viewport.handle_navigate_to_destination(page, x, y, zoom)
            }
            Some(ChannelEvent::PluginMessage(value)) => {
                if value.get("type").and_then(|t| t.as_str()) == Some("formFocusChange") {
                    self.form_field_focused = value
                        .get("focused")
                        .and_then(|f| f.as_bool())
                        .unwrap_or(false);
                }
                events.push(ShellEvent::PluginMessage(value));
            }
        }
        events.extend(self.drain());
        Ok(events)
    }

    // ===== Dispatch =====

    /// Forward queued viewport notifications, then report resolved handles.
    fn drain(&mut self) -> Vec<ShellEvent> {
        let mut events = Vec::new();
        self.forward_viewport_events(&mut events);
        let resolved = self.collect_resolved();
        events.extend(resolved);
        // Resolving a named destination navigates.
        self.forward_viewport_events(&mut events);
        events
    }

    fn forward_viewport_events(&mut self, events: &mut Vec<ShellEvent>) {
        for event in self.viewport.take_events() {
            match event {
                ViewportEvent::BeforeZoom(snapshot) => self.channel.before_zoom(&snapshot),
                ViewportEvent::AfterZoom(snapshot) => self.channel.after_zoom(&snapshot),
                ViewportEvent::Scrolled(position) => self.channel.update_scroll(position),
                ViewportEvent::Changed(snapshot) => {
                    events.push(ShellEvent::ViewportChanged(snapshot))
                }
                ViewportEvent::BrowserZoomRequested(zoom) => {
                    events.push(ShellEvent::BrowserZoomRequested(zoom))
                }
            }
        }
    }

    fn collect_resolved(&mut self) -> Vec<ShellEvent> {
        let mut events = Vec::new();

        self.pending_saves.retain_mut(|save| match save.try_outcome() {
            None => true,
            Some(Ok(file)) => {
                events.push(ShellEvent::SaveCompleted {
                    token: save.token().to_string(),
                    file,
                });
                false
            }
            Some(Err(error)) => {
                events.push(ShellEvent::SaveFailed {
                    token: save.token().to_string(),
                    error,
                });
                false
            }
        });

        events.extend(take_resolved(
            &mut self.pending_thumbnails,
            ShellEvent::ThumbnailReady,
        ));
        events.extend(take_resolved(
            &mut self.pending_selections,
            ShellEvent::SelectedText,
        ));

        for reply in take_resolved(&mut self.pending_destinations, |reply| reply) {
            match reply.page() {
                Some(page) => self.viewport.go_to_page(page as i64),
                None => debug!(message_id = %reply.message_id, "named destination not found"),
            }
            events.push(ShellEvent::NamedDestinationResolved(reply));
        }
        events
    }
}

/// Remove every resolved handle from `pending`, mapping its reply.
fn take_resolved<R, E>(pending: &mut Vec<PendingReply<R>>, map: impl Fn(R) -> E) -> Vec<E> {
    let mut resolved = Vec::new();
    pending.retain_mut(|reply| match reply.try_reply() {
        Ok(None) => true,
        Ok(Some(value)) => {
            resolved.push(map(value));
            false
        }
        Err(_) => false,
    });
    resolved
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

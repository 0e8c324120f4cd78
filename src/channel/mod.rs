//! Message channel to the out-of-process renderer.
//!
//! Two kinds of traffic share the channel:
//!
//! - Fire-and-forget commands, posted and never answered.
//! - Correlated requests. The outgoing message carries a `messageId` of the form
//!   `"{type}_{counter}"`; the reply carrying the same id resolves the caller's
//!   [`PendingReply`]. Any inbound message with a `messageId` is treated as a reply,
//!   whatever its type.
//!
//! Saves use a separate map keyed by a random single-use token, because the answer
//! may be produced by a different execution context than the one that asked. Save
//! payloads are validated before they ever reach the caller.
//!
//! Nothing here blocks. Pending handles are resolved later, from
//! [`RenderChannel::handle_message`], on the same thread. Requests are never timed out;
//! an unanswered request stays pending until the channel is dropped.

mod messages;

pub use messages::{
    NamedDestinationReply, OutboundMessage, SelectedTextReply, ThumbnailReply, ViewportMessage,
};

use crate::model::{
    DocumentDimensions, PartialPoint, PayloadError, PinchPhase, Point, ProtocolError, SaveError,
    SaveRequestType,
};
use crate::viewport::ZoomSnapshot;
use futures::channel::oneshot;
use messages::InboundMessage;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, error, trace, warn};

pub use futures::channel::oneshot::Canceled;

/// Smallest accepted save payload: the length of a minimal `%PDF1.0` header.
pub const MIN_SAVE_PAYLOAD_LEN: usize = "%PDF1.0".len();

/// Largest accepted save payload. Must match the renderer's own cap.
pub const MAX_SAVE_PAYLOAD_LEN: usize = 100 * 1000 * 1000;

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Check that `data` plausibly is a PDF document of acceptable size.
pub fn validate_save_payload(data: &[u8]) -> Result<(), PayloadError> {
    if data.len() < MIN_SAVE_PAYLOAD_LEN {
        return Err(PayloadError::TooSmall {
            len: data.len(),
            min: MIN_SAVE_PAYLOAD_LEN,
        });
    }
    if data.len() > MAX_SAVE_PAYLOAD_LEN {
        return Err(PayloadError::TooLarge {
            len: data.len(),
            max: MAX_SAVE_PAYLOAD_LEN,
        });
    }
    if !data.starts_with(PDF_MAGIC) {
        let mut found = [0u8; 4];
        found.copy_from_slice(&data[..4]);
        return Err(PayloadError::BadMagic { found });
    }
    Ok(())
}

/// Sink for outgoing messages.
///
/// The transport is assumed ordered and lossless.
pub trait RendererTransport {
    /// Deliver one message.
    fn post(&mut self, message: OutboundMessage);
}

/// Queues messages for the owner to flush.
impl RendererTransport for Vec<OutboundMessage> {
    fn post(&mut self, message: OutboundMessage) {
        self.push(message);
    }
}

/// A validated document ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFile {
    /// Suggested file name.
    pub file_name: String,
    /// Document bytes; start with `%PDF` and respect the size bounds.
    pub data_to_save: Vec<u8>,
}

/// Outcome of a save: `Ok(None)` when the renderer handled the save itself.
pub type SaveOutcome = Result<Option<SaveFile>, SaveError>;

/// Handle to an outstanding save.
#[derive(Debug)]
pub struct PendingSave {
    token: String,
    receiver: oneshot::Receiver<SaveOutcome>,
}

impl PendingSave {
    /// The token the renderer must echo.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The outcome, if it has arrived.
    pub fn try_outcome(&mut self) -> Option<SaveOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(Canceled) => Some(Err(SaveError::Dropped)),
        }
    }
}

impl Future for PendingSave {
    type Output = SaveOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.unwrap_or(Err(SaveError::Dropped)))
    }
}

/// Handle to an outstanding correlated request.
#[derive(Debug)]
pub struct PendingReply<R> {
    message_id: String,
    receiver: oneshot::Receiver<R>,
}

impl<R> PendingReply<R> {
    /// Correlation id sent with the request.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// The reply, if it has arrived. `Err` once the channel is gone.
    pub fn try_reply(&mut self) -> Result<Option<R>, Canceled> {
        self.receiver.try_recv()
    }
}

impl<R> Future for PendingReply<R> {
    type Output = Result<R, Canceled>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx)
    }
}

/// Resolver for one outstanding request.
#[derive(Debug)]
enum ReplySender {
    Thumbnail(oneshot::Sender<ThumbnailReply>),
    NamedDestination(oneshot::Sender<NamedDestinationReply>),
    SelectedText(oneshot::Sender<SelectedTextReply>),
}

impl ReplySender {
    fn reply_type(&self) -> &'static str {
        match self {
            ReplySender::Thumbnail(_) => "getThumbnailReply",
            ReplySender::NamedDestination(_) => "getNamedDestinationReply",
            ReplySender::SelectedText(_) => "getSelectedTextReply",
        }
    }
}

/// Renderer messages the channel does not consume itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// Scroll to the top of a zero-based page.
    GoToPage(i64),
    /// Scroll to a position; absent axes stay put.
    SetScrollPosition(PartialPoint),
    /// Scroll by a delta.
    ScrollBy(Point),
    /// Document geometry changed.
    DocumentDimensions(DocumentDimensions),
    /// Navigate to a destination inside a page, optionally zooming.
    NavigateToDestination {
        /// Zero-based page.
        page: i64,
        /// In-page x, if given.
        x: Option<f64>,
        /// In-page y, if given.
        y: Option<f64>,
        /// Zoom to apply first, if given.
        zoom: Option<f64>,
    },
    /// A message type this channel does not interpret.
    PluginMessage(serde_json::Value),
}

/// One renderer session: outgoing commands, correlated requests and saves.
#[derive(Debug)]
pub struct RenderChannel<T> {
    transport: T,
    next_request_id: u64,
    pending_requests: HashMap<String, ReplySender>,
    pending_saves: HashMap<String, oneshot::Sender<SaveOutcome>>,
}

impl<T: RendererTransport> RenderChannel<T> {
    /// Create a channel posting through `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            next_request_id: 0,
            pending_requests: HashMap::new(),
            pending_saves: HashMap::new(),
        }
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport, e.g. to flush queued messages.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Number of requests awaiting a reply.
    pub fn pending_request_count(&self) -> usize {
        self.pending_requests.len()
    }

    /// Whether a request with this correlation id awaits a reply.
    pub fn is_request_pending(&self, message_id: &str) -> bool {
        self.pending_requests.contains_key(message_id)
    }

    /// Number of saves awaiting the renderer.
    pub fn pending_save_count(&self) -> usize {
        self.pending_saves.len()
    }

    /// Post a fire-and-forget message.
    pub fn post(&mut self, message: OutboundMessage) {
        trace!(message_type = message.message_type(), "post");
        self.transport.post(message);
    }

    // ===== Content controller hooks =====

    /// A zoom mutation is about to happen.
    pub fn before_zoom(&mut self, snapshot: &ZoomSnapshot) {
        self.post(OutboundMessage::StopScrolling);
        if snapshot.pinch_phase == PinchPhase::Start {
            self.post(OutboundMessage::Viewport(ViewportMessage {
                user_initiated: true,
                ..ViewportMessage::from(snapshot)
            }));
        }
    }

    /// A zoom mutation finished.
    pub fn after_zoom(&mut self, snapshot: &ZoomSnapshot) {
        self.post(OutboundMessage::Viewport(ViewportMessage::from(snapshot)));
    }

    // ===== Commands =====

    /// Report the scroll position.
    pub fn update_scroll(&mut self, position: Point) {
        self.post(OutboundMessage::UpdateScroll {
            x: position.x,
            y: position.y,
        });
    }

    /// Rotate pages clockwise.
    pub fn rotate_clockwise(&mut self) {
        self.post(OutboundMessage::RotateClockwise);
    }

    /// Rotate pages counterclockwise.
    pub fn rotate_counterclockwise(&mut self) {
        self.post(OutboundMessage::RotateCounterclockwise);
    }

    /// Switch two-up layout on or off.
    pub fn set_two_up_view(&mut self, enabled: bool) {
        self.post(OutboundMessage::SetTwoUpView {
            enable_two_up_view: enabled,
        });
    }

    /// Show or hide annotations.
    pub fn display_annotations(&mut self, display: bool) {
        self.post(OutboundMessage::DisplayAnnotations { display });
    }

    /// Select all text.
    pub fn select_all(&mut self) {
        self.post(OutboundMessage::SelectAll);
    }

    /// Trigger printing.
    pub fn print(&mut self) {
        self.post(OutboundMessage::Print);
    }

    // ===== Saves =====

    /// Ask the renderer for the document bytes.
    pub fn save(&mut self, request_type: SaveRequestType) -> PendingSave {
        let token = mint_save_token();
        let (sender, receiver) = oneshot::channel();
        self.pending_saves.insert(token.clone(), sender);
        debug!(token = %token, ?request_type, "save requested");

        self.post(OutboundMessage::Save {
            token: token.clone(),
            save_request_type: request_type,
        });
        PendingSave { token, receiver }
    }

    // ===== Correlated requests =====

    /// Request a thumbnail of zero-based `page`.
    pub fn get_thumbnail(&mut self, page: usize) -> PendingReply<ThumbnailReply> {
        let (sender, receiver) = oneshot::channel();
        let message_id = self.register("getThumbnail", ReplySender::Thumbnail(sender));
        self.post(OutboundMessage::GetThumbnail {
            page,
            message_id: message_id.clone(),
        });
        PendingReply {
            message_id,
            receiver,
        }
    }

    /// Resolve a named destination.
    pub fn get_named_destination(
        &mut self,
        name: impl Into<String>,
    ) -> PendingReply<NamedDestinationReply> {
        let (sender, receiver) = oneshot::channel();
        let message_id = self.register(
            "getNamedDestination",
            ReplySender::NamedDestination(sender),
        );
        self.post(OutboundMessage::GetNamedDestination {
            named_destination: name.into(),
            message_id: message_id.clone(),
        });
        PendingReply {
            message_id,
            receiver,
        }
    }

    /// Fetch the selected text.
    pub fn get_selected_text(&mut self) -> PendingReply<SelectedTextReply> {
        let (sender, receiver) = oneshot::channel();
        let message_id = self.register("getSelectedText", ReplySender::SelectedText(sender));
        self.post(OutboundMessage::GetSelectedText {
            message_id: message_id.clone(),
        });
        PendingReply {
            message_id,
            receiver,
        }
    }

    fn register(&mut self, message_type: &str, sender: ReplySender) -> String {
        let message_id = format!("{}_{}", message_type, self.next_request_id);
        self.next_request_id += 1;
        debug!(message_id = %message_id, "request issued");
        self.pending_requests.insert(message_id.clone(), sender);
        message_id
    }

    // ===== Inbound =====

    /// Process one message from the renderer.
    ///
    /// Replies and save answers are consumed here and resolve their pending handles.
    /// Everything else comes back as a [`ChannelEvent`] for the owner to act on.
    pub fn handle_message(
        &mut self,
        message: serde_json::Value,
    ) -> Result<Option<ChannelEvent>, ProtocolError> {
        let parsed = match InboundMessage::deserialize(&message) {
            Ok(parsed) => parsed,
            Err(err) => {
                let message_type = message
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or_default()
                    .to_string();
                error!(message_type = %message_type, error = %err, "malformed renderer message");
                return Err(ProtocolError::MalformedMessage {
                    message_type,
                    reason: err.to_string(),
                });
            }
        };

        // Anything carrying a correlation id is a reply and must answer a request.
        if !parsed.is_reply() {
            if let Some(message_id) = correlation_id(&message) {
                let sender = self.take_sender(&message_id, UNTYPED_REPLY)?;
                return Err(self.mismatch(message_id, sender, UNTYPED_REPLY));
            }
        }

        let event = match parsed {
            InboundMessage::GoToPage { page } => Some(ChannelEvent::GoToPage(page)),
            InboundMessage::SetScrollPosition { x, y } => {
                Some(ChannelEvent::SetScrollPosition(PartialPoint { x, y }))
            }
            InboundMessage::ScrollBy { x, y } => Some(ChannelEvent::ScrollBy(Point::new(x, y))),
            InboundMessage::DocumentDimensions(dimensions) => {
                Some(ChannelEvent::DocumentDimensions(dimensions))
            }
            InboundMessage::NavigateToDestination { page, x, y, zoom } => {
                Some(ChannelEvent::NavigateToDestination { page, x, y, zoom })
            }
            InboundMessage::SaveData {
                token,
                file_name,
                data_to_save,
            } => {
                self.handle_save_data(token, file_name, data_to_save)?;
                None
            }
            InboundMessage::ConsumeSaveToken { token } => {
                self.handle_consume_save_token(token)?;
                None
            }
            InboundMessage::GetThumbnailReply(reply) => {
                let message_id = reply.message_id.clone();
                match self.take_sender(&message_id, "getThumbnailReply")? {
                    ReplySender::Thumbnail(sender) => deliver(sender, reply, &message_id),
                    other => return Err(self.mismatch(message_id, other, "getThumbnailReply")),
                }
                None
            }
            InboundMessage::GetNamedDestinationReply(reply) => {
                let message_id = reply.message_id.clone();
                match self.take_sender(&message_id, "getNamedDestinationReply")? {
                    ReplySender::NamedDestination(sender) => deliver(sender, reply, &message_id),
                    other => {
                        return Err(self.mismatch(message_id, other, "getNamedDestinationReply"))
                    }
                }
                None
            }
            InboundMessage::GetSelectedTextReply(reply) => {
                let message_id = reply.message_id.clone();
                match self.take_sender(&message_id, "getSelectedTextReply")? {
                    ReplySender::SelectedText(sender) => deliver(sender, reply, &message_id),
                    other => return Err(self.mismatch(message_id, other, "getSelectedTextReply")),
                }
                None
            }
            InboundMessage::Unknown => Some(ChannelEvent::PluginMessage(message)),
        };
        Ok(event)
    }

    fn take_sender(
        &mut self,
        message_id: &str,
        received: &'static str,
    ) -> Result<ReplySender, ProtocolError> {
        self.pending_requests.remove(message_id).ok_or_else(|| {
            error!(message_id, received, "reply for unknown request");
            ProtocolError::UnknownRequest {
                message_id: message_id.to_string(),
            }
        })
    }

    /// Put a resolver back after a reply of the wrong kind.
    fn mismatch(
        &mut self,
        message_id: String,
        sender: ReplySender,
        received: &'static str,
    ) -> ProtocolError {
        let expected = sender.reply_type();
        error!(message_id = %message_id, expected, received, "mismatched reply");
        self.pending_requests.insert(message_id.clone(), sender);
        ProtocolError::MismatchedReply {
            message_id,
            expected,
            received,
        }
    }

    fn take_save_sender(
        &mut self,
        token: &str,
    ) -> Result<oneshot::Sender<SaveOutcome>, ProtocolError> {
        self.pending_saves.remove(token).ok_or_else(|| {
            error!(token, "save message for unknown token");
            ProtocolError::UnknownSaveToken {
                token: token.to_string(),
            }
        })
    }

    fn handle_save_data(
        &mut self,
        token: String,
        file_name: String,
        data: Option<Vec<u8>>,
    ) -> Result<(), ProtocolError> {
        let sender = self.take_save_sender(&token)?;

        let data = match data {
            Some(data) if !data.is_empty() => data,
            _ => {
                warn!(token = %token, "save answered without data");
                let _ = sender.send(Err(SaveError::NoData));
                return Ok(());
            }
        };

        if let Err(reason) = validate_save_payload(&data) {
            error!(token = %token, %reason, "rejected save payload");
            let _ = sender.send(Err(SaveError::InvalidPayload(reason.clone())));
            return Err(ProtocolError::InvalidSavePayload { token, reason });
        }

        debug!(token = %token, bytes = data.len(), file_name = %file_name, "save completed");
        let _ = sender.send(Ok(Some(SaveFile {
            file_name,
            data_to_save: data,
        })));
        Ok(())
    }

    fn handle_consume_save_token(&mut self, token: String) -> Result<(), ProtocolError> {
        let sender = self.take_save_sender(&token)?;
        debug!(token = %token, "save handled by renderer");
        let _ = sender.send(Ok(None));
        Ok(())
    }
}

/// Reply type reported for a correlated message this channel has no reply type for.
const UNTYPED_REPLY: &str = "untyped reply";

/// The `messageId` of a renderer message, if it has one.
fn correlation_id(message: &serde_json::Value) -> Option<String> {
    match message.get("messageId")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(id) => Some(id.clone()),
        other => Some(other.to_string()),
    }
}

fn deliver<R>(sender: oneshot::Sender<R>, reply: R, message_id: &str) {
    debug!(message_id, "request resolved");
    if sender.send(reply).is_err() {
        trace!(message_id, "reply dropped, handle no longer held");
    }
}

/// 128 random bits, hex encoded.
fn mint_save_token() -> String {
    let bytes: [u8; 16] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;

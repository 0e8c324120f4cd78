//! Script replay.
//!
//! Drives a [`ViewerSession`] from [`ScriptLine`]s on a virtual clock and writes every
//! message the session posts to the renderer as one JSON line. Script time is
//! `start + at_ms`; a ctrl-wheel pinch whose quiet period elapses between two steps is
//! ended by an animation frame at its deadline before the later step runs.

use crate::channel::OutboundMessage;
use crate::model::AppError;
use crate::session::{ShellEvent, ViewerSession};
use crate::source::{parse_script_line, ScriptLine, ScriptSource, ScriptStep};
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Session type driven by a replay: outgoing messages are buffered until flushed.
pub type ReplaySession = ViewerSession<Vec<OutboundMessage>>;

/// A running replay.
#[derive(Debug)]
pub struct Replay<W> {
    session: ReplaySession,
    out: W,
    start: Instant,
    steps: usize,
}

impl<W: Write> Replay<W> {
    /// Replay into `out`, with script time zero at `start`.
    pub fn new(session: ReplaySession, out: W, start: Instant) -> Self {
        Self {
            session,
            out,
            start,
            steps: 0,
        }
    }

    /// The session being driven.
    pub fn session(&self) -> &ReplaySession {
        &self.session
    }

    /// Steps run so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Run one step and flush what it posted.
    ///
    /// Messages posted before a failure are still written.
    ///
    /// # Errors
    ///
    /// Protocol violations, out-of-order pinches and output failures.
    pub fn run_line(&mut self, line: &ScriptLine) -> Result<Vec<ShellEvent>, AppError> {
        let now = self.start + Duration::from_millis(line.at_ms);
        let result = self.apply(&line.step, now);
        self.flush()?;
        let events = result?;

        self.steps += 1;
        for event in &events {
            log_shell_event(event);
        }
        Ok(events)
    }

    fn apply(&mut self, step: &ScriptStep, now: Instant) -> Result<Vec<ShellEvent>, AppError> {
        let mut events = self.expire_deadline(now)?;
        match step {
            ScriptStep::Input(event) => events.extend(self.session.handle_input(event, now)),
            ScriptStep::Renderer { message } => {
                events.extend(self.session.handle_renderer_message(message.clone())?)
            }
            ScriptStep::Command(command) => events.extend(self.session.command(command.clone())),
            ScriptStep::Frame => events.extend(self.session.animation_frame(now)?),
        }
        Ok(events)
    }

    /// Run the animation frame a pending wheel pinch needs, if its deadline has passed.
    fn expire_deadline(&mut self, now: Instant) -> Result<Vec<ShellEvent>, AppError> {
        match self.session.next_deadline() {
            Some(deadline) if deadline <= now => {
                debug!("frame at wheel pinch deadline");
                Ok(self.session.animation_frame(deadline)?)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// End any pending wheel pinch, flush, and hand back the output.
    ///
    /// # Errors
    ///
    /// Out-of-order pinches and output failures.
    pub fn finish(mut self) -> Result<W, AppError> {
        let result = match self.session.next_deadline() {
            Some(deadline) => self.session.animation_frame(deadline).map_err(AppError::from),
            None => Ok(Vec::new()),
        };
        self.flush()?;
        for event in &result? {
            log_shell_event(event);
        }
        info!(steps = self.steps, "replay finished");
        Ok(self.out)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let messages = std::mem::take(self.session.channel_mut().transport_mut());
        for message in &messages {
            serde_json::to_writer(&mut self.out, message)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()
    }
}

/// Replay every line of `source`.
///
/// # Errors
///
/// Stops at the first unreadable or invalid line, protocol violation, out-of-order
/// pinch, or output failure.
pub fn run<W: Write>(source: &mut ScriptSource, mut replay: Replay<W>) -> Result<W, AppError> {
    while let Some((number, text)) = source.next_line()? {
        if let Some(line) = parse_script_line(number, &text)? {
            replay.run_line(&line)?;
        }
    }
    replay.finish()
}

fn log_shell_event(event: &ShellEvent) {
    match event {
        ShellEvent::ViewportChanged(snapshot) => debug!(
            page = snapshot.most_visible_page,
            zoom = snapshot.zoom,
            x = snapshot.position.x,
            y = snapshot.position.y,
            "viewport changed"
        ),
        ShellEvent::BrowserZoomRequested(zoom) => info!(zoom, "browser zoom requested"),
        ShellEvent::PluginMessage(message) => debug!(%message, "plugin message"),
        ShellEvent::SaveCompleted { token, file } => info!(
            token = %token,
            file_name = file.as_ref().map(|f| f.file_name.as_str()),
            bytes = file.as_ref().map(|f| f.data_to_save.len()),
            "save completed"
        ),
        ShellEvent::SaveFailed { token, error } => warn!(token = %token, %error, "save failed"),
        ShellEvent::ThumbnailReady(reply) => info!(
            message_id = %reply.message_id,
            width = reply.width,
            height = reply.height,
            "thumbnail ready"
        ),
        ShellEvent::NamedDestinationResolved(reply) => info!(
            message_id = %reply.message_id,
            page = ?reply.page(),
            "named destination resolved"
        ),
        ShellEvent::SelectedText(reply) => info!(
            message_id = %reply.message_id,
            chars = reply.selected_text.chars().count(),
            "selected text"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Size;
    use crate::session::SessionOptions;
    use crate::zoom::ZoomCoordinator;

    fn replay() -> Replay<Vec<u8>> {
        let session = ViewerSession::new(
            Size::new(800.0, 600.0),
            SessionOptions::default(),
            ZoomCoordinator::default(),
            Vec::new(),
        );
        Replay::new(session, Vec::new(), Instant::now())
    }

    fn line(text: &str) -> ScriptLine {
        parse_script_line(1, text).unwrap().unwrap()
    }

    fn output_lines(out: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8_lossy(out)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    const LOAD: &str = r#"{"step":"renderer","message":{"type":"documentDimensions","width":400,"height":1500,"pageDimensions":[{"x":0,"y":0,"width":400,"height":500},{"x":0,"y":500,"width":400,"height":500},{"x":0,"y":1000,"width":400,"height":500}]}}"#;

    #[test]
    fn messages_are_written_as_json_lines() {
        let mut replay = replay();
        replay.run_line(&line(LOAD)).unwrap();
        replay
            .run_line(&line(r#"{"step":"command","command":"rotateClockwise"}"#))
            .unwrap();

        let out = replay.finish().unwrap();
        let messages = output_lines(&out);
        assert_eq!(messages[0]["type"], "stopScrolling");
        assert_eq!(messages[1]["type"], "viewport");
        assert_eq!(messages.last().unwrap()["type"], "rotateClockwise");
    }

    #[test]
    fn elapsed_wheel_pinch_ends_before_next_step() {
        let mut replay = replay();
        replay.run_line(&line(LOAD)).unwrap();
        replay
            .run_line(&line(
                r#"{"atMs":0,"step":"input","type":"wheel","deltaY":-100,"position":{"x":400,"y":300},"ctrlKey":true}"#,
            ))
            .unwrap();
        replay.run_line(&line(r#"{"atMs":16,"step":"frame"}"#)).unwrap();
        assert!(replay.session().viewport().pinch_phase().is_active());

        replay
            .run_line(&line(r#"{"atMs":500,"step":"command","command":"print"}"#))
            .unwrap();

        assert!(!replay.session().viewport().pinch_phase().is_active());
        assert_eq!(replay.session().next_deadline(), None);
    }

    #[test]
    fn finish_ends_pending_wheel_pinch() {
        let mut replay = replay();
        replay.run_line(&line(LOAD)).unwrap();
        replay
            .run_line(&line(
                r#"{"step":"input","type":"wheel","deltaY":-100,"position":{"x":400,"y":300},"ctrlKey":true}"#,
            ))
            .unwrap();

        let out = replay.finish().unwrap();

        let phases: Vec<i64> = output_lines(&out)
            .iter()
            .filter(|m| m["type"] == "viewport")
            .filter_map(|m| m["pinchPhase"].as_i64())
            .collect();
        assert_eq!(phases.last(), Some(&4));
    }

    #[test]
    fn protocol_violation_stops_replay_after_flushing() {
        let mut replay = replay();
        replay.run_line(&line(LOAD)).unwrap();

        let result = replay.run_line(&line(
            r#"{"step":"renderer","message":{"type":"saveData","token":"feed","dataToSave":[37,80,68,70,45,49,46]}}"#,
        ));

        assert!(matches!(result, Err(AppError::Protocol(_))));
        assert_eq!(replay.steps(), 1);
    }
}

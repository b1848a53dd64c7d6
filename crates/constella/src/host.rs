//! Terminal implementation of the background [`Host`].
//!
//! Frames are deadlines the main loop waits for. Pointer listeners map to
//! crossterm mouse capture and focus reporting, which are switched on only
//! while someone is listening.

use std::collections::HashMap;
use std::io::Write;
use std::time::{Duration, Instant};

use constella_background::{FrameHandle, Host, ListenerId, ListenerKind};
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
};

/// Virtual pixels spanned by one terminal column.
pub const CELL_WIDTH_PX: f32 = 8.0;

/// Virtual pixels spanned by one terminal row.
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Surface size in virtual pixels for a terminal of `cols` × `rows`.
pub fn surface_pixels(cols: u16, rows: u16) -> (f32, f32) {
    (cols as f32 * CELL_WIDTH_PX, rows as f32 * CELL_HEIGHT_PX)
}

/// Centre of a terminal cell in virtual pixels.
pub fn cell_to_pixels(col: u16, row: u16) -> (f32, f32) {
    (
        (col as f32 + 0.5) * CELL_WIDTH_PX,
        (row as f32 + 0.5) * CELL_HEIGHT_PX,
    )
}

/// Host backed by a crossterm terminal writing escape sequences to `W`.
#[derive(Debug)]
pub struct TerminalHost<W: Write> {
    out: W,
    reduced_motion: bool,
    frame_interval: Duration,
    /// Terminal size in cells.
    size: (u16, u16),
    next_id: u64,
    pending: Option<(FrameHandle, Instant)>,
    listeners: HashMap<ListenerId, ListenerKind>,
    mouse_captured: bool,
    focus_reporting: bool,
}

impl<W: Write> TerminalHost<W> {
    pub fn new(out: W, reduced_motion: bool, fps: u32) -> Self {
        Self {
            out,
            reduced_motion,
            frame_interval: Duration::from_secs(1) / fps.max(1),
            size: (0, 0),
            next_id: 0,
            pending: None,
            listeners: HashMap::new(),
            mouse_captured: false,
            focus_reporting: false,
        }
    }

    /// Record the terminal size in cells.
    pub fn set_size(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
    }

    /// Time left before the pending frame is due, or `None` when idle.
    pub fn time_until_frame(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }

    /// Hand out the pending frame once its deadline has passed.
    pub fn take_due_frame(&mut self, now: Instant) -> Option<FrameHandle> {
        match self.pending {
            Some((handle, deadline)) if deadline <= now => {
                self.pending = None;
                Some(handle)
            }
            _ => None,
        }
    }

    /// Whether some listener of `kind` is registered.
    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.values().any(|&k| k == kind)
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn mouse_captured(&self) -> bool {
        self.mouse_captured
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Switch terminal reporting modes to match the registered listeners.
    fn sync_modes(&mut self) {
        let want_mouse = self.is_listening(ListenerKind::PointerMove);
        if want_mouse != self.mouse_captured {
            let result = if want_mouse {
                execute!(self.out, EnableMouseCapture)
            } else {
                execute!(self.out, DisableMouseCapture)
            };
            match result {
                Ok(()) => self.mouse_captured = want_mouse,
                Err(err) => tracing::warn!(%err, want_mouse, "failed to switch mouse capture"),
            }
        }

        let want_focus = self.is_listening(ListenerKind::PointerLeave);
        if want_focus != self.focus_reporting {
            let result = if want_focus {
                execute!(self.out, EnableFocusChange)
            } else {
                execute!(self.out, DisableFocusChange)
            };
            match result {
                Ok(()) => self.focus_reporting = want_focus,
                Err(err) => tracing::warn!(%err, want_focus, "failed to switch focus reporting"),
            }
        }
    }
}

impl<W: Write> Host for TerminalHost<W> {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn surface_size(&self) -> (f32, f32) {
        surface_pixels(self.size.0, self.size.1)
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.pending = Some((handle, Instant::now() + self.frame_interval));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if matches!(self.pending, Some((pending, _)) if pending == handle) {
            self.pending = None;
        }
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.insert(id, kind);
        self.sync_modes();
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        if self.listeners.remove(&id).is_some() {
            self.sync_modes();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> TerminalHost<Vec<u8>> {
        TerminalHost::new(Vec::new(), false, 50)
    }

    #[test]
    fn test_frame_deadline() {
        let mut host = host();
        assert_eq!(host.time_until_frame(Instant::now()), None);

        let handle = host.request_frame();
        let now = Instant::now();
        assert!(host.time_until_frame(now).unwrap() <= Duration::from_millis(20));
        assert_eq!(host.take_due_frame(now), None);

        let later = now + Duration::from_millis(100);
        assert_eq!(host.take_due_frame(later), Some(handle));
        assert!(!host.has_pending_frame());
    }

    #[test]
    fn test_cancel_only_matching_frame() {
        let mut host = host();
        let first = host.request_frame();
        let second = host.request_frame();

        host.cancel_frame(first);
        assert!(host.has_pending_frame());
        host.cancel_frame(second);
        assert!(!host.has_pending_frame());
    }

    #[test]
    fn test_pointer_listener_toggles_mouse_capture() {
        let mut host = host();
        let resize = host.add_listener(ListenerKind::Resize);
        assert!(!host.mouse_captured());

        let pointer = host.add_listener(ListenerKind::PointerMove);
        assert!(host.mouse_captured());
        assert!(!host.out.is_empty());

        host.remove_listener(pointer);
        assert!(!host.mouse_captured());
        host.remove_listener(resize);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_pixel_mapping() {
        assert_eq!(surface_pixels(100, 40), (800.0, 640.0));
        assert_eq!(cell_to_pixels(0, 0), (4.0, 8.0));
        assert_eq!(cell_to_pixels(10, 2), (84.0, 40.0));
    }
}

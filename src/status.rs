//! Transient status notices.

/// How long a notice stays visible, in milliseconds.
pub const DEFAULT_NOTICE_MS: f64 = 2400.0;

/// User-facing notice emitted by the animator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    Animating,
    Done,
    NothingToAnimate,
    Failed,
}

impl Notice {
    /// User-facing text of the notice.
    pub fn message(self) -> &'static str {
        match self {
            Notice::Animating => "Animating...",
            Notice::Done => "Done!",
            Notice::NothingToAnimate => "Please enter some text to animate.",
            Notice::Failed => "Something went wrong while animating.",
        }
    }
}

/// The current notice and the deadline at which it hides.
///
/// Showing a notice replaces the previous one and restarts the deadline, so
/// an earlier notice can never hide a later one.
#[derive(Clone, Debug)]
pub struct StatusBoard {
    timeout_ms: f64,
    current: Option<(Notice, f64)>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_MS)
    }
}

impl StatusBoard {
    /// Board whose notices hide `timeout_ms` after they are shown.
    pub fn new(timeout_ms: f64) -> Self {
        Self {
            timeout_ms: timeout_ms.max(0.0),
            current: None,
        }
    }

    /// Replace the current notice and restart the deadline.
    pub fn show(&mut self, notice: Notice, now_ms: f64) {
        self.current = Some((notice, now_ms + self.timeout_ms));
    }

    /// The visible notice at `now_ms`, if any.
    pub fn current(&self, now_ms: f64) -> Option<Notice> {
        match self.current {
            Some((notice, hide_at)) if now_ms < hide_at => Some(notice),
            _ => None,
        }
    }

    /// Hide immediately.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires() {
        let mut board = StatusBoard::default();
        board.show(Notice::Done, 1000.0);
        assert_eq!(board.current(1000.0), Some(Notice::Done));
        assert_eq!(board.current(3399.0), Some(Notice::Done));
        assert_eq!(board.current(3400.0), None);
    }

    #[test]
    fn later_notice_restarts_deadline() {
        let mut board = StatusBoard::new(100.0);
        board.show(Notice::Animating, 0.0);
        board.show(Notice::Failed, 90.0);
        assert_eq!(board.current(150.0), Some(Notice::Failed));
        assert_eq!(board.current(190.0), None);

        board.show(Notice::Done, 200.0);
        board.clear();
        assert_eq!(board.current(200.0), None);
    }

    #[test]
    fn messages() {
        assert_eq!(Notice::NothingToAnimate.message(), "Please enter some text to animate.");
        assert_eq!(Notice::Failed.message(), "Something went wrong while animating.");
    }
}

//! L4 Atomic Layer: Display-refresh callback registry
//!
//! A registration is represented by a `FrameToken`. Whoever requested a
//! frame keeps the token and hands it back to `cancel`; the host drains all
//! live tokens once per display refresh and routes each one back to its
//! owner. A cancelled token is never delivered.

/// Handle for one pending refresh registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

/// Pending refresh registrations, in request order
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameToken>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register for the next display refresh
    pub fn request(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken(self.next_id);
        self.pending.push(token);
        token
    }

    /// Withdraw a registration. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, token: FrameToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| *t != token);
        self.pending.len() != before
    }

    /// Drop every registration
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Take every registration due at this refresh
    ///
    /// Tokens requested while the drained ones are being serviced land in
    /// the queue for the following refresh.
    pub fn drain(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_and_drain() {
        let mut frames = FrameQueue::new();
        let a = frames.request();
        let b = frames.request();
        assert_ne!(a, b);
        assert_eq!(frames.pending_count(), 2);
        assert_eq!(frames.drain(), vec![a, b]);
        assert!(!frames.is_pending());
    }

    #[test]
    fn test_cancel_removes_only_that_token() {
        let mut frames = FrameQueue::new();
        let a = frames.request();
        let b = frames.request();
        assert!(frames.cancel(a));
        assert!(!frames.cancel(a));
        assert_eq!(frames.drain(), vec![b]);
    }

    #[test]
    fn test_cancel_after_drain_is_noop() {
        let mut frames = FrameQueue::new();
        let a = frames.request();
        frames.drain();
        assert!(!frames.cancel(a));
    }
}

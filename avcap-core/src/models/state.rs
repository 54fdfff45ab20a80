/// Capture session state machine.
///
/// Device acquisition and format negotiation happen before a session
/// value exists; a failed acquisition returns an error, never a
/// session. A constructed session therefore starts in `Ready`:
/// ```text
/// ready → capturing → stopped
/// ```
///
/// There is no re-negotiation: once a session leaves `Ready` its device
/// format is fixed for the remainder of its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Capturing,
    Stopped,
}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

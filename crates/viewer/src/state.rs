//! Tagged acquisition state for the document and page slots.

use std::fmt;

/// Lifecycle of an acquired handle.
///
/// Absence, an in-flight request, a usable handle and a failed
/// acquisition are four distinct things; exactly one holds at any time.
pub enum SlotState<T> {
    /// Nothing requested against the current configuration.
    Absent,

    /// A request tagged with `epoch` is in flight. Completions carrying
    /// any other epoch are stale and get discarded.
    Pending { epoch: u64 },

    /// The handle arrived and is usable.
    Ready(T),

    /// The acquisition failed. Sticky until reconfiguration.
    Failed,
}

impl<T> SlotState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, SlotState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SlotState::Failed)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            SlotState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Epoch of the in-flight request, if one is pending.
    pub fn pending_epoch(&self) -> Option<u64> {
        match self {
            SlotState::Pending { epoch } => Some(*epoch),
            _ => None,
        }
    }
}

impl<T> fmt::Debug for SlotState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotState::Absent => f.write_str("Absent"),
            SlotState::Pending { epoch } => write!(f, "Pending {{ epoch: {epoch} }}"),
            SlotState::Ready(_) => f.write_str("Ready(..)"),
            SlotState::Failed => f.write_str("Failed"),
        }
    }
}

/// Where the viewer is in its load cycle, derived from the two slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerPhase {
    /// No source configured.
    NoSource,

    /// Document acquisition in flight.
    DocumentLoading,

    /// Document acquisition failed; sticky until the source changes.
    DocumentFailed,

    /// Document ready, page acquisition in flight.
    PageLoading,

    /// Page ready and painted.
    Ready,

    /// Page acquisition failed; sticky until page, scale or rotation
    /// changes.
    PageFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_accessors_track_variants() {
        let absent: SlotState<u8> = SlotState::Absent;
        assert!(!absent.is_ready());
        assert_eq!(absent.pending_epoch(), None);

        let pending: SlotState<u8> = SlotState::Pending { epoch: 7 };
        assert_eq!(pending.pending_epoch(), Some(7));

        let ready = SlotState::Ready(42u8);
        assert!(ready.is_ready());
        assert_eq!(ready.ready(), Some(&42));

        let failed: SlotState<u8> = SlotState::Failed;
        assert!(failed.is_failed());
        assert_eq!(failed.ready(), None);
    }
}

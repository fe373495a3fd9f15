use thiserror::Error;

/// Bounds and shape failures raised by the slot codec.
///
/// Unknown op/status tags are deliberately not represented here; those
/// degrade to `None` on read instead of failing the decode.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SlotError {
    #[error("slot too short: {len} < {need}")]
    SlotTooShort { len: usize, need: usize },

    #[error("too many segments: {count} > {max}")]
    TooManySegments { count: usize, max: usize },

    #[error("segment count mismatch: expected {expected}, got {got}")]
    SegmentCountMismatch { expected: usize, got: usize },

    #[error("direct request cannot carry the indirect op tag")]
    OpShapeMismatch,
}

pub(crate) fn check_len(slot: &[u8], need: usize) -> Result<(), SlotError> {
    if slot.len() < need {
        return Err(SlotError::SlotTooShort {
            len: slot.len(),
            need,
        });
    }
    Ok(())
}

//! Pipeline Latch Interface.
//!
//! Common behavior of the four inter-stage latches, so that the commit
//! logic can hold, advance or squash any of them the same way.

/// Represents a pipeline latch (inter-stage buffer).
pub trait PipelineLatch: Copy {
    /// Creates an empty slot tagged with `marker` for telemetry.
    ///
    /// # Arguments
    ///
    /// * `marker` - `NOP_INSTRUCTION` for a stall bubble, or
    ///   `FLUSH_INSTRUCTION` for a squashed instruction.
    fn bubble(marker: u64) -> Self;

    /// Instruction word currently held, including bubble markers.
    fn instruction(&self) -> u64;

    /// Checks if the latch holds a bubble.
    fn is_bubble(&self) -> bool;

    /// Computes the value the latch takes at commit.
    ///
    /// # Arguments
    ///
    /// * `next` - Value produced by the upstream stage this cycle
    /// * `hold` - Keep the current value
    /// * `squash` - Replace with a bubble tagged `marker`
    ///
    /// `hold` wins over `squash`.
    fn select(&self, next: Self, hold: bool, squash: Option<u64>) -> Self {
        if hold {
            *self
        } else if let Some(marker) = squash {
            Self::bubble(marker)
        } else {
            next
        }
    }
}

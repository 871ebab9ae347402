//! Decoder configuration.

/// What the Bit Writer does when a payload describes more pixels than the
/// fixed frame holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverrunPolicy {
    /// Stop with [`DecodeError::Overrun`](crate::DecodeError::Overrun).
    #[default]
    Reject,
    /// Silently discard the excess bits (firmware behaviour for trusted,
    /// flash-resident frame tables).
    Truncate,
}

/// Tunables for a single decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderConfig {
    /// Handling of payloads that run past the end of the frame.
    pub overrun: OverrunPolicy,
}

impl DecoderConfig {
    /// Configuration for untrusted input: overruns are hard errors.
    pub const fn strict() -> Self {
        Self {
            overrun: OverrunPolicy::Reject,
        }
    }

    /// Configuration reproducing the lenient firmware behaviour.
    pub const fn lenient() -> Self {
        Self {
            overrun: OverrunPolicy::Truncate,
        }
    }
}

//! Append-only, bit-addressable output over a fixed frame buffer.
//!
//! Bits fill each byte starting at the least-significant bit (XBM order).
//! The pending byte is committed once its most-significant bit has been
//! written. Both base decoders go through this writer, using the whole-byte
//! fast paths whenever the cursor sits on a byte boundary.
//!
//! The writer never grows its buffer: it writes into a caller-owned slice of
//! exactly one frame. Writes past the end are handled according to
//! [`OverrunPolicy`].
//!
//! The cursor lives in [`WriterState`], a `Copy` snapshot, so a decode can be
//! suspended between source bytes and resumed on a later scheduler tick.

use crate::config::OverrunPolicy;
use crate::error::DecodeError;

/// Cursor of a [`BitWriter`], detached from the buffer it writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterState {
    /// Index of the next byte to commit.
    pos: usize,
    /// Byte under construction.
    pending: u8,
    /// Single-bit mask of the next bit to write; `0x01` means aligned.
    mask: u8,
    /// Bits discarded under [`OverrunPolicy::Truncate`].
    dropped: usize,
}

impl WriterState {
    /// Cursor at bit 0 of byte 0.
    pub const fn new() -> Self {
        Self {
            pos: 0,
            pending: 0,
            mask: 0x01,
            dropped: 0,
        }
    }

    /// Number of bits written so far (committed bytes plus pending bits).
    pub const fn bits_written(&self) -> usize {
        self.pos * 8 + self.mask.trailing_zeros() as usize
    }

    /// Number of bits discarded because they fell past the end of the frame.
    pub const fn dropped_bits(&self) -> usize {
        self.dropped
    }
}

impl Default for WriterState {
    fn default() -> Self {
        Self::new()
    }
}

/// Bit-level writer over a fixed-size frame buffer.
pub struct BitWriter<'a> {
    out: &'a mut [u8],
    state: WriterState,
    policy: OverrunPolicy,
}

impl<'a> BitWriter<'a> {
    /// Start writing at the beginning of `out`.
    pub fn new(out: &'a mut [u8], policy: OverrunPolicy) -> Self {
        Self::resume(out, WriterState::new(), policy)
    }

    /// Continue writing into `out` from a previously saved cursor.
    pub fn resume(out: &'a mut [u8], state: WriterState, policy: OverrunPolicy) -> Self {
        Self { out, state, policy }
    }

    /// Snapshot of the cursor, for resuming later.
    pub fn state(&self) -> WriterState {
        self.state
    }

    /// `true` when the next bit starts a fresh byte.
    pub fn is_aligned(&self) -> bool {
        self.state.mask == 0x01
    }

    /// Bits written so far.
    pub fn bits_written(&self) -> usize {
        self.state.bits_written()
    }

    fn is_full(&self) -> bool {
        self.state.pos >= self.out.len()
    }

    fn overflow(&mut self, bits: usize) -> Result<(), DecodeError> {
        match self.policy {
            OverrunPolicy::Reject => Err(DecodeError::Overrun {
                limit: self.out.len(),
            }),
            OverrunPolicy::Truncate => {
                self.state.dropped = self.state.dropped.saturating_add(bits);
                Ok(())
            }
        }
    }

    #[allow(clippy::arithmetic_side_effects)] // pos < out.len() checked by every caller
    fn commit(&mut self) {
        if let Some(slot) = self.out.get_mut(self.state.pos) {
            *slot = self.state.pending;
        }
        self.state.pos += 1;
        self.state.pending = 0;
        self.state.mask = 0x01;
    }

    /// Write one bit at the cursor and advance.
    ///
    /// Sets the bit when `value` is `true`, leaves it clear otherwise. When
    /// the cursor moves past the most-significant bit the pending byte is
    /// committed.
    pub fn emit_bit(&mut self, value: bool) -> Result<(), DecodeError> {
        if self.is_full() {
            return self.overflow(1);
        }
        if value {
            self.state.pending |= self.state.mask;
        }
        self.state.mask <<= 1;
        if self.state.mask == 0 {
            self.commit();
        }
        Ok(())
    }

    /// Append a whole byte. Only meaningful on a byte boundary; off-boundary
    /// calls fall back to bit-by-bit emission.
    pub fn emit_aligned_byte(&mut self, value: u8) -> Result<(), DecodeError> {
        if !self.is_aligned() {
            return self.emit_bits(value, 8);
        }
        if self.is_full() {
            return self.overflow(8);
        }
        self.state.pending = value;
        self.commit();
        Ok(())
    }

    /// Write the low `count` bits of `bits`, least-significant first.
    ///
    /// On a byte boundary the bits are assigned to the pending byte in one
    /// operation instead of one at a time. `count` is capped at 8.
    pub fn emit_bits(&mut self, bits: u8, count: u8) -> Result<(), DecodeError> {
        let count = count.min(8);
        if self.is_aligned() && !self.is_full() {
            if count == 8 {
                return self.emit_aligned_byte(bits);
            }
            self.state.pending = bits & low_bits(count);
            self.state.mask = 0x01 << count;
            return Ok(());
        }
        for bit in 0..count {
            self.emit_bit((bits >> bit) & 1 != 0)?;
        }
        Ok(())
    }

    /// Write `count` copies of `value`.
    ///
    /// Whole bytes are filled directly while the cursor is aligned and at
    /// least 8 bits remain.
    #[allow(clippy::arithmetic_side_effects)] // n ≤ room and n * 8 ≤ remaining by construction
    pub fn emit_run(&mut self, value: bool, count: usize) -> Result<(), DecodeError> {
        let fill = if value { 0xFF } else { 0x00 };
        let mut remaining = count;
        while remaining > 0 {
            if self.is_aligned() && remaining >= 8 {
                let whole = remaining / 8;
                let start = self.state.pos.min(self.out.len());
                let room = self.out.len() - start;
                let n = whole.min(room);
                if let Some(bytes) = self.out.get_mut(start..start + n) {
                    bytes.fill(fill);
                }
                self.state.pos = start + n;
                remaining -= n * 8;
                if n < whole {
                    return self.overflow(remaining);
                }
                continue;
            }
            self.emit_bit(value)?;
            remaining -= 1;
        }
        Ok(())
    }

    /// Pad the rest of the frame with `fill` and commit everything.
    ///
    /// A partially written byte is completed with `fill` bits, then every
    /// remaining byte of the frame is set to all-`fill`. Returns the number
    /// of bits supplied by padding.
    #[allow(clippy::arithmetic_side_effects)] // bounded by the frame size
    pub fn finish(&mut self, fill: bool) -> usize {
        let mut padded = 0;
        if !self.is_aligned() && !self.is_full() {
            while self.state.mask != 0 {
                if fill {
                    self.state.pending |= self.state.mask;
                }
                self.state.mask <<= 1;
                padded += 1;
            }
            self.commit();
        }
        let start = self.state.pos.min(self.out.len());
        if let Some(rest) = self.out.get_mut(start..) {
            padded += rest.len() * 8;
            rest.fill(if fill { 0xFF } else { 0x00 });
        }
        self.state.pos = self.out.len();
        padded
    }
}

const fn low_bits(count: u8) -> u8 {
    if count >= 8 {
        0xFF
    } else {
        (1u8 << count) - 1
    }
}

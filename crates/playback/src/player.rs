//! Video player: synchroniser + sliced decode + blit.
//!
//! [`VideoPlayer::tick`] is called from the scheduler's main loop between
//! audio buffer refills. Each tick does at most `budget` decode work units
//! (see [`srlv::DecodeJob`]) and finishes at most one frame, so the time a
//! tick holds the CPU stays bounded.
//!
//! The player owns exactly two frame buffers. Decoding writes into the
//! scratch buffer while the other holds the last completed frame (the delta
//! reference); on completion the roles flip, so no frame is ever copied.

use core::convert::Infallible;

use embedded_graphics::prelude::{Point, Size};
use platform::{AudioClock, FrameSink, Monotonic};
use srlv::{DecodeError, DecodeJob, FrameBuffer, Mode, Progress};
use thiserror::Error;

use crate::config::{ConfigError, PlayerConfig};
use crate::frame_table::{FrameTable, TableError};
use crate::stats::{DecodeHistory, FrameStats};
use crate::sync::{PlaybackSynchronizer, SyncDecision};

/// Result of one [`VideoPlayer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// The frame on screen is current; nothing was done.
    Idle,
    /// A decode is in progress; call `tick` again.
    Decoding,
    /// This frame was decoded and handed to the sink.
    Drawn(usize),
}

/// Errors returned by [`VideoPlayer`].
///
/// `E` is the frame sink's error type; construction never touches the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerError<E = Infallible> {
    /// A frame failed to decode. The pending decode is discarded and the
    /// reference frame is unchanged.
    #[error("frame decode failed: {0}")]
    Decode(#[from] DecodeError),
    /// The sink rejected a decoded frame.
    #[error("frame sink error: {0:?}")]
    Sink(E),
    /// The frame table is malformed.
    #[error("frame table error: {0}")]
    Table(#[from] TableError),
    /// The synchroniser settings derived from the table are invalid.
    #[error("invalid playback configuration: {0}")]
    Config(#[from] ConfigError),
    /// The player's buffer size `N` does not match the table geometry.
    #[error("player buffers hold {actual} bytes, frames need {expected}")]
    FrameSize {
        /// `geometry.frame_len()` of the table.
        expected: usize,
        /// The player's `N`.
        actual: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    First,
    Second,
}

impl Slot {
    fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// A decode in flight: the frame to show plus, for delta catch-up, the
/// frame of the chain currently being decoded.
#[derive(Debug, Clone, Copy)]
struct PendingDecode {
    target: usize,
    index: usize,
    job: DecodeJob,
    decode_us: u64,
    decoded_frames: usize,
}

/// Plays one [`FrameTable`] in sync with audio.
///
/// `N` must equal the table's `geometry.frame_len()`. The two `N`-byte
/// buffers live inline, so on hardware put the player in a `static`.
pub struct VideoPlayer<'a, const N: usize> {
    table: FrameTable<'a>,
    config: PlayerConfig,
    sync: PlaybackSynchronizer,
    buffers: [FrameBuffer<N>; 2],
    /// Buffer holding the last completed frame.
    front: Slot,
    /// Table index of the frame in the front buffer.
    front_index: Option<usize>,
    pending: Option<PendingDecode>,
    last_stats: Option<FrameStats>,
    history: DecodeHistory,
}

impl<'a, const N: usize> VideoPlayer<'a, N> {
    /// Validate `table` and build a player with nothing on screen.
    ///
    /// # Errors
    ///
    /// [`PlayerError::Table`] for a malformed table,
    /// [`PlayerError::FrameSize`] when `N` is wrong and
    /// [`PlayerError::Config`] for an unusable frame rate or drift factor.
    pub fn new(table: FrameTable<'a>, config: PlayerConfig) -> Result<Self, PlayerError> {
        table.validate()?;
        let expected = table.geometry.frame_len();
        if expected != N {
            return Err(PlayerError::FrameSize {
                expected,
                actual: N,
            });
        }
        let sync = PlaybackSynchronizer::new(table.sync_config(&config))?;
        Ok(Self {
            table,
            config,
            sync,
            buffers: [FrameBuffer::zeroed(), FrameBuffer::zeroed()],
            front: Slot::First,
            front_index: None,
            pending: None,
            last_stats: None,
            history: DecodeHistory::new(),
        })
    }

    /// Do one slice of playback work.
    ///
    /// 1. With a decode in flight, continue it for up to `budget` units.
    /// 2. Otherwise poll the synchroniser and, on a redraw, start decoding.
    /// 3. When the wanted frame completes, blit it centred horizontally.
    ///
    /// # Errors
    ///
    /// Decode, table and sink failures. Nothing is retried; the next tick
    /// starts from a fresh poll.
    pub fn tick<A, M, S>(
        &mut self,
        audio: &A,
        clock: &M,
        sink: &mut S,
        budget: usize,
    ) -> Result<TickOutcome, PlayerError<S::Error>>
    where
        A: AudioClock + ?Sized,
        M: Monotonic + ?Sized,
        S: FrameSink + ?Sized,
    {
        let pending = match self.pending.take() {
            Some(pending) => pending,
            None => match self.sync.poll(audio, clock.now_us()) {
                SyncDecision::Hold => return Ok(TickOutcome::Idle),
                SyncDecision::Redraw(target) => self.start::<S::Error>(target)?,
            },
        };
        self.drive(pending, clock, sink, budget)
    }

    fn start<E>(&self, target: usize) -> Result<PendingDecode, PlayerError<E>> {
        let index = self.chain_start(target);
        if index != target {
            tracing::debug!(frame = target, from = index, "replaying delta chain");
        }
        Ok(PendingDecode {
            target,
            index,
            job: self.begin::<E>(index)?,
            decode_us: 0,
            decoded_frames: 0,
        })
    }

    /// First frame to decode so that `target` gets the right reference.
    ///
    /// With nothing decoded yet there is no reference at all, so the chain
    /// always reaches back to a keyframe (frame 0 is one, see
    /// [`FrameTable::validate`]). Otherwise it reaches back at most
    /// `max_catch_up` frames before settling for the stale reference.
    #[allow(clippy::arithmetic_side_effects)] // index < target
    fn chain_start(&self, target: usize) -> usize {
        let is_delta = |index: usize| self.table.mode(index).is_some_and(Mode::needs_reference);
        if !is_delta(target) {
            return target;
        }
        let lowest = match self.front_index {
            Some(_) => target.saturating_sub(self.config.max_catch_up),
            None => 0,
        };
        for index in (lowest..target).rev() {
            if self.front_index == Some(index) {
                return index + 1;
            }
            if !is_delta(index) {
                return index;
            }
        }
        tracing::warn!(
            frame = target,
            max_catch_up = self.config.max_catch_up,
            "no usable delta reference in reach; decoding against a stale frame"
        );
        target
    }

    /// Last decoded frame, if there is one to use as a delta reference.
    fn reference(&self) -> Option<&[u8]> {
        self.front_index.map(|_| self.front_buffer().as_bytes())
    }

    fn begin<E>(&self, index: usize) -> Result<DecodeJob, PlayerError<E>> {
        let compressed = self.table.frame(index)?;
        let job = DecodeJob::new(
            compressed,
            self.table.geometry,
            self.reference(),
            self.config.decoder,
        )?;
        Ok(job)
    }

    #[allow(clippy::arithmetic_side_effects)] // chain index ≤ target < frame count
    fn drive<M, S>(
        &mut self,
        mut pending: PendingDecode,
        clock: &M,
        sink: &mut S,
        budget: usize,
    ) -> Result<TickOutcome, PlayerError<S::Error>>
    where
        M: Monotonic + ?Sized,
        S: FrameSink + ?Sized,
    {
        let compressed = self.table.frame(pending.index)?;
        let has_reference = self.front_index.is_some();
        let started = clock.now_us();
        let (scratch, reference) = self.split_buffers();
        let step = pending.job.step(
            compressed,
            has_reference.then_some(reference.as_bytes()),
            scratch.as_mut_bytes(),
            budget,
        );
        let spent = clock.now_us().saturating_sub(started);
        pending.decode_us = pending.decode_us.saturating_add(spent);
        tracing::trace!(
            frame = pending.index,
            consumed = pending.job.consumed(),
            spent_us = spent,
            "decode step"
        );

        let report = match step {
            Ok(Progress::Pending) => {
                self.pending = Some(pending);
                return Ok(TickOutcome::Decoding);
            }
            Ok(Progress::Complete(report)) => report,
            Err(error) => {
                tracing::warn!(frame = pending.index, %error, "frame decode failed");
                return Err(error.into());
            }
        };
        if report.dropped_bits > 0 {
            tracing::warn!(
                frame = pending.index,
                dropped_bits = report.dropped_bits,
                "frame payload overran the bitmap"
            );
        }
        self.front = self.front.other();
        self.front_index = Some(pending.index);
        pending.decoded_frames += 1;

        if pending.index != pending.target {
            pending.index += 1;
            pending.job = self.begin::<S::Error>(pending.index)?;
            self.pending = Some(pending);
            return Ok(TickOutcome::Decoding);
        }
        self.present(pending, clock, sink)
    }

    fn present<M, S>(
        &mut self,
        pending: PendingDecode,
        clock: &M,
        sink: &mut S,
    ) -> Result<TickOutcome, PlayerError<S::Error>>
    where
        M: Monotonic + ?Sized,
        S: FrameSink + ?Sized,
    {
        let geometry = self.table.geometry;
        let size = Size::new(u32::from(geometry.width()), u32::from(geometry.height()));
        let origin = centred(sink.size(), size);

        let started = clock.now_us();
        let blit = sink.blit(self.front_buffer().as_bytes(), size, origin);
        let draw_us = clock.now_us().saturating_sub(started);
        blit.map_err(PlayerError::Sink)?;

        let stats = FrameStats {
            index: pending.target,
            decode_us: pending.decode_us,
            draw_us,
            decoded_frames: pending.decoded_frames,
        };
        self.history.record(stats.decode_us);
        self.last_stats = Some(stats);
        tracing::debug!(
            frame = stats.index,
            decode_us = stats.decode_us,
            draw_us = stats.draw_us,
            "frame drawn"
        );
        Ok(TickOutcome::Drawn(pending.target))
    }

    fn front_buffer(&self) -> &FrameBuffer<N> {
        let [first, second] = &self.buffers;
        match self.front {
            Slot::First => first,
            Slot::Second => second,
        }
    }

    /// `(scratch, reference)`
    fn split_buffers(&mut self) -> (&mut FrameBuffer<N>, &FrameBuffer<N>) {
        let [first, second] = &mut self.buffers;
        match self.front {
            Slot::First => (second, &*first),
            Slot::Second => (first, &*second),
        }
    }

    /// Drop any decode in flight and start over at frame 0.
    pub fn reset(&mut self) {
        self.pending = None;
        self.front_index = None;
        self.sync.reset();
    }

    /// Last completed frame and its table index.
    pub fn current_frame(&self) -> Option<(usize, &[u8])> {
        self.front_index
            .map(|index| (index, self.front_buffer().as_bytes()))
    }

    /// `true` while a decode is in flight.
    pub fn is_decoding(&self) -> bool {
        self.pending.is_some()
    }

    /// Timing of the last drawn frame.
    pub fn last_stats(&self) -> Option<FrameStats> {
        self.last_stats
    }

    /// Recent decode times.
    pub fn history(&self) -> &DecodeHistory {
        &self.history
    }

    /// The frame scheduler.
    pub fn synchronizer(&self) -> &PlaybackSynchronizer {
        &self.sync
    }

    /// The table being played.
    pub fn table(&self) -> &FrameTable<'a> {
        &self.table
    }
}

/// Top-left corner that centres `frame` horizontally on `screen`, top-aligned.
pub fn centred(screen: Size, frame: Size) -> Point {
    let x = screen.width.saturating_sub(frame.width) / 2;
    Point::new(i32::try_from(x).unwrap_or(0), 0)
}

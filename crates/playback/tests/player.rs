//! End-to-end player behaviour against the platform mocks.
//!
//! All frames are 8×2 (two bytes):
//!
//! | frame | mode            | decoded        |
//! |-------|-----------------|----------------|
//! | 0     | run-length      | `[0x00, 0xFF]` |
//! | 1     | run-length Δ    | `[0x0F, 0xFF]` |
//! | 2     | run-length Δ    | `[0xF0, 0x00]` |
//! | 3     | run-length      | `[0x00, 0x00]` |

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]

use embedded_graphics::prelude::{Point, Size};
use platform::mocks::{MockAudioClock, MockFrameSink, MockMonotonic, MockSinkError};
use playback::{
    FrameTable, PlayerConfig, PlayerError, TableError, TickOutcome, VideoPlayer,
};
use srlv::{DecodeError, FrameGeometry};

const F0: &[u8] = &[0x00, 0x88, 0x88];
const F1: &[u8] = &[0x01, 0x80, 0x84, 0x8C];
const F2: &[u8] = &[0x01, 0x00];
const F3: &[u8] = &[0x00, 0x90];

static FRAMES: [&[u8]; 4] = [F0, F1, F2, F3];

const ALL: usize = usize::MAX;

fn table(frames: &'static [&'static [u8]]) -> FrameTable<'static> {
    FrameTable::new(FrameGeometry::new(8, 2).unwrap(), 2.0, frames)
}

fn config() -> PlayerConfig {
    PlayerConfig {
        drift_correction: 1.0,
        ..PlayerConfig::default()
    }
}

fn player() -> VideoPlayer<'static, 2> {
    VideoPlayer::new(table(&FRAMES), config()).unwrap()
}

#[test]
fn first_tick_draws_frame_zero_centred() {
    let mut player = player();
    let audio = MockAudioClock::new();
    let clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    let outcome = player.tick(&audio, &clock, &mut sink, ALL).unwrap();

    assert_eq!(outcome, TickOutcome::Drawn(0));
    assert_eq!(sink.blit_count(), 1);
    let blit = sink.blits()[0];
    assert_eq!(blit.origin, Point::new(60, 0));
    assert_eq!(blit.size, Size::new(8, 2));
    assert_eq!(sink.last_bitmap(), &[0x00, 0xFF]);
    assert_eq!(player.current_frame(), Some((0, &[0x00, 0xFF][..])));
}

#[test]
fn held_frame_is_not_redrawn() {
    let mut player = player();
    let audio = MockAudioClock::new();
    let mut clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    player.tick(&audio, &clock, &mut sink, ALL).unwrap();
    clock.advance_ms(100);
    assert_eq!(
        player.tick(&audio, &clock, &mut sink, ALL).unwrap(),
        TickOutcome::Idle
    );
    assert_eq!(sink.blit_count(), 1);
}

#[test]
fn small_budget_spreads_decode_over_ticks() {
    let mut player = player();
    let audio = MockAudioClock::new();
    let clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    // Two payload bytes after the mode tag, then the transform pass.
    for _ in 0..2 {
        assert_eq!(
            player.tick(&audio, &clock, &mut sink, 1).unwrap(),
            TickOutcome::Decoding
        );
        assert!(player.is_decoding());
        assert_eq!(sink.blit_count(), 0);
    }
    assert_eq!(
        player.tick(&audio, &clock, &mut sink, 1).unwrap(),
        TickOutcome::Drawn(0)
    );
    assert!(!player.is_decoding());
}

#[test]
fn free_running_advances_one_frame_per_period() {
    let mut player = player();
    let audio = MockAudioClock::new();
    let mut clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    player.tick(&audio, &clock, &mut sink, ALL).unwrap();
    clock.advance_ms(500);
    assert_eq!(
        player.tick(&audio, &clock, &mut sink, ALL).unwrap(),
        TickOutcome::Drawn(1)
    );
    assert_eq!(sink.last_bitmap(), &[0x0F, 0xFF]);
    assert_eq!(player.last_stats().unwrap().decoded_frames, 1);
}

#[test]
fn audio_jump_replays_delta_chain() {
    let mut player = player();
    // 1.0 s at 2 fps
    let audio = MockAudioClock::playing_at(1.0);
    let clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    assert_eq!(
        player.tick(&audio, &clock, &mut sink, ALL).unwrap(),
        TickOutcome::Decoding
    );
    assert_eq!(
        player.tick(&audio, &clock, &mut sink, ALL).unwrap(),
        TickOutcome::Decoding
    );
    assert_eq!(
        player.tick(&audio, &clock, &mut sink, ALL).unwrap(),
        TickOutcome::Drawn(2)
    );
    assert_eq!(sink.blit_count(), 1);
    assert_eq!(sink.last_bitmap(), &[0xF0, 0x00]);
    assert_eq!(player.last_stats().unwrap().decoded_frames, 3);
}

#[test]
fn consecutive_delta_reuses_front_buffer() {
    let mut player = player();
    let mut audio = MockAudioClock::playing_at(0.0);
    let clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    player.tick(&audio, &clock, &mut sink, ALL).unwrap();
    audio.seek(0.5);
    assert_eq!(
        player.tick(&audio, &clock, &mut sink, ALL).unwrap(),
        TickOutcome::Drawn(1)
    );
    assert_eq!(player.last_stats().unwrap().decoded_frames, 1);
    audio.seek(1.0);
    assert_eq!(
        player.tick(&audio, &clock, &mut sink, ALL).unwrap(),
        TickOutcome::Drawn(2)
    );
    assert_eq!(player.last_stats().unwrap().decoded_frames, 1);
    assert_eq!(sink.last_bitmap(), &[0xF0, 0x00]);
}

#[test]
fn catch_up_limit_decodes_against_stale_reference() {
    let mut player = VideoPlayer::<2>::new(
        table(&FRAMES),
        PlayerConfig {
            max_catch_up: 0,
            ..config()
        },
    )
    .unwrap();
    let mut audio = MockAudioClock::playing_at(0.0);
    let clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    player.tick(&audio, &clock, &mut sink, ALL).unwrap();
    audio.seek(1.0);
    assert_eq!(
        player.tick(&audio, &clock, &mut sink, ALL).unwrap(),
        TickOutcome::Drawn(2)
    );
    // Frame 2's delta applied to frame 0 instead of frame 1.
    assert_eq!(sink.last_bitmap(), &[0xFF, 0x00]);
    assert_eq!(player.last_stats().unwrap().decoded_frames, 1);
}

#[test]
fn cold_start_replays_from_keyframe_despite_catch_up_limit() {
    let mut player = VideoPlayer::<2>::new(
        table(&FRAMES),
        PlayerConfig {
            max_catch_up: 0,
            ..config()
        },
    )
    .unwrap();
    let audio = MockAudioClock::playing_at(1.0);
    let clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    let mut outcome = player.tick(&audio, &clock, &mut sink, ALL).unwrap();
    while outcome == TickOutcome::Decoding {
        outcome = player.tick(&audio, &clock, &mut sink, ALL).unwrap();
    }
    assert_eq!(outcome, TickOutcome::Drawn(2));
    assert_eq!(sink.last_bitmap(), &[0xF0, 0x00]);
    assert_eq!(player.last_stats().unwrap().decoded_frames, 3);
}

#[test]
fn cold_start_reaches_keyframe_past_default_catch_up() {
    // Keyframe then eleven deltas that each invert the whole frame.
    static LONG_CHAIN: [&[u8]; 12] = [F0, F2, F2, F2, F2, F2, F2, F2, F2, F2, F2, F2];
    let mut player = VideoPlayer::<2>::new(table(&LONG_CHAIN), config()).unwrap();
    // 5.0 s at 2 fps: frame 10, ten frames past the keyframe.
    let audio = MockAudioClock::playing_at(5.0);
    let clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    for _ in 0..10 {
        assert_eq!(
            player.tick(&audio, &clock, &mut sink, ALL).unwrap(),
            TickOutcome::Decoding
        );
    }
    assert_eq!(
        player.tick(&audio, &clock, &mut sink, ALL).unwrap(),
        TickOutcome::Drawn(10)
    );
    // An even number of inversions of frame 0.
    assert_eq!(sink.last_bitmap(), &[0x00, 0xFF]);
    assert_eq!(player.last_stats().unwrap().decoded_frames, 11);
}

#[test]
fn reset_replays_from_keyframe() {
    let mut player = player();
    let mut audio = MockAudioClock::playing_at(0.0);
    let clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    player.tick(&audio, &clock, &mut sink, ALL).unwrap();
    audio.seek(0.5);
    player.tick(&audio, &clock, &mut sink, ALL).unwrap();
    player.reset();

    // Frame 1 is on screen but forgotten, so frame 2 is rebuilt from frame 0.
    audio.seek(1.0);
    let mut outcome = player.tick(&audio, &clock, &mut sink, ALL).unwrap();
    while outcome == TickOutcome::Decoding {
        outcome = player.tick(&audio, &clock, &mut sink, ALL).unwrap();
    }
    assert_eq!(outcome, TickOutcome::Drawn(2));
    assert_eq!(player.last_stats().unwrap().decoded_frames, 3);
    assert_eq!(sink.last_bitmap(), &[0xF0, 0x00]);
}

#[test]
fn wrong_buffer_size_rejected() {
    let result = VideoPlayer::<3>::new(table(&FRAMES), config());
    assert!(matches!(
        result,
        Err(PlayerError::FrameSize {
            expected: 2,
            actual: 3
        })
    ));
}

#[test]
fn delta_first_frame_rejected() {
    static BAD: [&[u8]; 2] = [F1, F0];
    let result = VideoPlayer::<2>::new(table(&BAD), config());
    assert!(matches!(
        result,
        Err(PlayerError::Table(TableError::DeltaFirstFrame))
    ));
}

#[test]
fn decode_error_keeps_reference_and_moves_on() {
    // 9 black + 9 white + 9 black bits do not fit in 16.
    static OVERRUN: [&[u8]; 2] = [&[0x00, 0x89, 0x89, 0x89], F3];
    let mut player = VideoPlayer::<2>::new(table(&OVERRUN), config()).unwrap();
    let audio = MockAudioClock::new();
    let mut clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    let result = player.tick(&audio, &clock, &mut sink, ALL);
    assert_eq!(
        result,
        Err(PlayerError::Decode(DecodeError::Overrun { limit: 2 }))
    );
    assert_eq!(player.current_frame(), None);
    assert!(!player.is_decoding());

    clock.advance_ms(100);
    assert_eq!(
        player.tick(&audio, &clock, &mut sink, ALL).unwrap(),
        TickOutcome::Idle
    );
    clock.advance_ms(400);
    assert_eq!(
        player.tick(&audio, &clock, &mut sink, ALL).unwrap(),
        TickOutcome::Drawn(1)
    );
    assert_eq!(sink.blit_count(), 1);
}

#[test]
fn sink_failure_is_reported() {
    let mut player = player();
    let audio = MockAudioClock::new();
    let clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();
    sink.fail_next_blit();

    let result = player.tick(&audio, &clock, &mut sink, ALL);
    assert_eq!(result, Err(PlayerError::Sink(MockSinkError)));
    assert_eq!(sink.blit_count(), 0);
}

#[test]
fn stats_track_each_drawn_frame() {
    let mut player = player();
    let audio = MockAudioClock::new();
    let mut clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    for _ in 0..4 {
        player.tick(&audio, &clock, &mut sink, ALL).unwrap();
        clock.advance_ms(500);
    }
    assert_eq!(player.history().len(), 4);
    let stats = player.last_stats().unwrap();
    assert_eq!(stats.index, 3);
    assert_eq!(stats.decoded_frames, 1);
    assert_eq!(sink.last_bitmap(), &[0x00, 0x00]);
}

#[test]
fn reset_restarts_at_frame_zero() {
    let mut player = player();
    let audio = MockAudioClock::playing_at(1.5);
    let clock = MockMonotonic::new();
    let mut sink = MockFrameSink::default();

    while player.tick(&audio, &clock, &mut sink, ALL).unwrap() != TickOutcome::Drawn(3) {}
    player.reset();
    assert_eq!(player.current_frame(), None);

    let stopped = MockAudioClock::new();
    assert_eq!(
        player.tick(&stopped, &clock, &mut sink, ALL).unwrap(),
        TickOutcome::Drawn(0)
    );
}

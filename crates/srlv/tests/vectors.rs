//! Hand-built frame vectors.
//!
//! Every expected byte is derived from the bit emission order: bit 0 of a
//! byte is the leftmost pixel, 1 = white.

use srlv::{
    decode, decode_with, DecodeError, DecoderConfig, FrameGeometry, Mode, OverrunPolicy,
};

fn geometry(width: u16, height: u16) -> FrameGeometry {
    FrameGeometry::new(width, height).expect("valid geometry")
}

// ── Run-length ───────────────────────────────────────────────────────────────

/// `[0x05, 0x83]`: empty black run, 5 white, 3 black as a full-byte run.
#[test]
fn run_length_nibble_then_full_run() {
    let mut out = [0u8; 1];
    let report = decode(&[0x00, 0x05, 0x83], geometry(8, 1), None, &mut out).expect("decodes");
    assert_eq!(out, [0b0001_1111]);
    assert_eq!(report.consumed, 2);
}

#[test]
fn run_length_last_colour_pads_frame() {
    // 4 black then 2 white; the white run extends to the end of the frame
    let mut out = [0u8; 2];
    let report = decode(&[0x00, 0x42], geometry(16, 1), None, &mut out).expect("decodes");
    assert_eq!(out, [0xF0, 0xFF]);
    assert_eq!(report.padded_bits, 10);
}

#[test]
fn run_length_long_runs_cross_bytes() {
    // 12 black, 20 white
    let mut out = [0u8; 4];
    decode(&[0x00, 0x8C, 0x94], geometry(32, 1), None, &mut out).expect("decodes");
    assert_eq!(out, [0x00, 0xF0, 0xFF, 0xFF]);
}

#[test]
fn run_length_empty_payload_is_white_frame() {
    // no runs at all: the colour toggles once to white and fills the frame
    let mut out = [0u8; 2];
    let report = decode(&[0x00], geometry(8, 2), None, &mut out).expect("decodes");
    assert_eq!(out, [0xFF, 0xFF]);
    assert_eq!(report.consumed, 0);
    assert_eq!(report.padded_bits, 16);
}

// ── Differential ─────────────────────────────────────────────────────────────

/// Literal toggles at pixels 0 and 2: white, white, then black from pixel 2.
#[test]
fn differential_literal_toggles_integrate_to_levels() {
    let mut out = [0u8; 1];
    let report = decode(&[0x03, 0b000_0101], geometry(8, 1), None, &mut out).expect("decodes");
    assert_eq!(out, [0b0000_0011]);
    assert_eq!(report.padded_bits, 1);
}

#[test]
fn differential_zero_run_carries_level_across_bytes() {
    // literal bits [1,0,0,0,0,0,0], then a run of 9 zero bits
    let mut out = [0u8; 2];
    decode(&[0x03, 0x01, 0x88], geometry(16, 1), None, &mut out).expect("decodes");
    assert_eq!(out, [0xFF, 0xFF]);
}

#[test]
fn differential_level_carries_into_next_row() {
    // single toggle at the very last pixel of row 0
    let mut out = [0u8; 2];
    // zero run of 7, then literal bit 1
    decode(&[0x03, 0x86, 0x01], geometry(8, 2), None, &mut out).expect("decodes");
    assert_eq!(out, [0x80, 0xFF]);
}

// ── Transforms through the dispatcher ────────────────────────────────────────

#[test]
fn delta_mode_xors_reference() {
    let previous = [0b1010_1010u8, 0x0F];
    let mut out = [0u8; 2];
    // 8 black, 8 white
    decode(&[0x01, 0x88, 0x88], geometry(8, 2), Some(&previous[..]), &mut out).expect("decodes");
    assert_eq!(out, [0b1010_1010, 0xF0]);
}

#[test]
fn differential_delta_mode_xors_reference() {
    let previous = [0xFFu8];
    let mut out = [0u8; 1];
    // single toggle at pixel 4
    decode(&[0x04, 0b001_0000], geometry(8, 1), Some(&previous[..]), &mut out).expect("decodes");
    assert_eq!(out, [0x0F]);
}

#[test]
fn snake_mode_handles_padded_rows() {
    // 12 pixels wide: 2 bytes per row, 4 padding bits per row
    // row 0: 16 white; row 1 in scan order: 3 black, 13 white
    let mut out = [0u8; 4];
    decode(&[0x02, 0x80, 0x90, 0x83, 0x8D], geometry(12, 2), None, &mut out).expect("decodes");
    // raw row 1 = [0xF8, 0xFF]; reversed and bit-mirrored
    assert_eq!(out, [0xFF, 0xFF, 0xFF, 0x1F]);
}

#[test]
fn differential_snake_mode() {
    let mut out = [0u8; 2];
    // toggle at pixel 9 (row 1, pixel 1): row 1 raw = 0xFE, mirrored 0x7F
    decode(&[0x05, 0x88, 0x01], geometry(8, 2), None, &mut out).expect("decodes");
    assert_eq!(out, [0x00, 0x7F]);
}

// ── Fixed output size ────────────────────────────────────────────────────────

#[test]
fn every_mode_fills_exactly_one_frame() {
    let g = geometry(20, 3);
    assert_eq!(g.frame_len(), 9);
    let reference = [0x5Au8; 9];
    for mode in Mode::ALL {
        for payload_len in 0..12 {
            let mut compressed = vec![mode.tag()];
            compressed.extend(core::iter::repeat(0x81).take(payload_len));
            let mut out = [0xA5u8; 9];
            let result = decode_with(
                &compressed,
                g,
                Some(&reference[..]),
                &mut out,
                DecoderConfig::lenient(),
            );
            assert!(result.is_ok(), "{mode:?} with {payload_len} bytes: {result:?}");
        }
    }
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[test]
fn empty_input_has_no_mode() {
    let mut out = [0u8; 1];
    assert_eq!(
        decode(&[], geometry(8, 1), None, &mut out),
        Err(DecodeError::Empty)
    );
}

#[test]
fn unknown_mode_fails_fast() {
    let mut out = [0u8; 1];
    assert_eq!(
        decode(&[0x06, 0x05], geometry(8, 1), None, &mut out),
        Err(DecodeError::UnknownMode(6))
    );
}

#[test]
fn delta_without_reference_is_rejected() {
    let mut out = [0u8; 1];
    assert_eq!(
        decode(&[0x04, 0x05], geometry(8, 1), None, &mut out),
        Err(DecodeError::MissingReference)
    );
}

#[test]
fn delta_with_short_reference_is_rejected() {
    let mut out = [0u8; 2];
    assert_eq!(
        decode(&[0x01, 0x05], geometry(8, 2), Some(&[0u8; 1][..]), &mut out),
        Err(DecodeError::ReferenceLength {
            expected: 2,
            actual: 1
        })
    );
}

#[test]
fn non_delta_mode_ignores_reference() {
    let mut out = [0u8; 1];
    decode(&[0x00, 0x05, 0x83], geometry(8, 1), Some(&[0xFF; 3][..]), &mut out).expect("decodes");
    assert_eq!(out, [0x1F]);
}

#[test]
fn overrun_rejected_by_default() {
    // a 9-pixel run in an 8-pixel frame
    let mut out = [0u8; 1];
    assert_eq!(
        decode(&[0x00, 0x89], geometry(8, 1), None, &mut out),
        Err(DecodeError::Overrun { limit: 1 })
    );
}

#[test]
fn overrun_truncated_when_lenient() {
    let mut out = [0u8; 1];
    let config = DecoderConfig {
        overrun: OverrunPolicy::Truncate,
    };
    let report =
        decode_with(&[0x00, 0x89], geometry(8, 1), None, &mut out, config).expect("decodes");
    assert_eq!(out, [0x00]);
    assert_eq!(report.dropped_bits, 1);
    assert_eq!(report.padded_bits, 0);
}

#[test]
fn differential_literal_overrun() {
    // 14 literal bits into an 8-pixel frame
    let mut out = [0u8; 1];
    assert_eq!(
        decode(&[0x03, 0x7F, 0x7F], geometry(8, 1), None, &mut out),
        Err(DecodeError::Overrun { limit: 1 })
    );
}

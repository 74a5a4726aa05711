//! Decoder for the rotated 1-bpp frame buffer.
//!
//! The monitor is mounted on its side: video RAM is stored as 224 columns of
//! 32 bytes, each byte holding 8 vertical pixels with the bottom of the
//! screen at the start of the column.

use std::io::{self, Write};

/// Logical screen width in pixels (after rotation).
pub const SCREEN_WIDTH: usize = 224;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 256;

/// Start of video RAM. The frame buffer is mapped at 0x2400–0x3fff.
pub const VRAM_START: usize = 0x2400;
/// Size of video RAM in bytes (0x1c00 = 7168 bytes = 224x256 bits).
pub const VRAM_SIZE: usize = 0x1c00;

const BYTES_PER_COLUMN: usize = SCREEN_HEIGHT / 8;

/// Whether the pixel at (`col`, `row`) is lit. Row 0 is the top of the screen.
///
/// Coordinates outside the screen, or a short `vram`, read as unlit.
pub fn pixel(vram: &[u8], col: usize, row: usize) -> bool {
    if col >= SCREEN_WIDTH || row >= SCREEN_HEIGHT {
        return false;
    }
    let index = BYTES_PER_COLUMN * col + (BYTES_PER_COLUMN - 1 - row / 8);
    let bit = 7 - row % 8;
    vram.get(index).is_some_and(|byte| byte & (1 << bit) != 0)
}

/// Render into an 8-bit grayscale buffer, row-major, 0xFF for lit pixels.
pub fn render_mono(vram: &[u8], frame: &mut [u8]) {
    debug_assert_eq!(frame.len(), SCREEN_WIDTH * SCREEN_HEIGHT);

    for (row, line) in frame.chunks_exact_mut(SCREEN_WIDTH).enumerate() {
        for (col, out) in line.iter_mut().enumerate() {
            *out = if pixel(vram, col, row) { 0xFF } else { 0x00 };
        }
    }
}

/// Write the screen as a binary PBM (P4) image: lit pixels white on black.
pub fn write_pbm<W: Write>(vram: &[u8], out: &mut W) -> io::Result<()> {
    write!(out, "P4\n{SCREEN_WIDTH} {SCREEN_HEIGHT}\n")?;

    let mut line = [0u8; SCREEN_WIDTH / 8];
    for row in 0..SCREEN_HEIGHT {
        for (i, byte) in line.iter_mut().enumerate() {
            let mut packed = 0u8;
            for bit in 0..8 {
                // PBM uses 1 for black.
                if !pixel(vram, i * 8 + bit, row) {
                    packed |= 0x80 >> bit;
                }
            }
            *byte = packed;
        }
        out.write_all(&line)?;
    }
    Ok(())
}

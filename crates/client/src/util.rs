//! Small helpers for working with tensor data buffers.

use byteorder::{ByteOrder, LittleEndian};

/// Index of the first occurrence of the maximum value, or `None` for an
/// empty slice. Handy for picking the winning class out of a logits
/// tensor.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, max)) if value <= max => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

/// Convert an interleaved RGBA buffer with channels in `[0, 255]` into an
/// RGB buffer normalized to `[-1, 1)`, dropping the alpha channel.
pub fn normalize_rgb(rgba: &[f32]) -> Vec<f32> {
    let pixels = rgba.len() / 4;
    let mut out = Vec::with_capacity(pixels * 3);
    for pixel in rgba.chunks_exact(4) {
        out.push(pixel[0] / 128.0 - 1.0);
        out.push(pixel[1] / 128.0 - 1.0);
        out.push(pixel[2] / 128.0 - 1.0);
    }
    out
}

/// Decode a little-endian f32 buffer, e.g. the blob of a FLOAT tensor.
/// Trailing bytes that do not fill a full element are dropped.
pub fn f32s_from_le_bytes(bytes: &[u8]) -> Vec<f32> {
    bytes.chunks_exact(4).map(LittleEndian::read_f32).collect()
}

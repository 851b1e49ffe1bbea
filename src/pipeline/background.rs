use heapless::Vec;

use crate::config::{Geometry, MAX_FRAME_PIXELS};

type AvgBuf = Vec<f32, MAX_FRAME_PIXELS>;

/// Band-pass via two exponential moving averages: a short (foreground)
/// average minus a long (background) average. With a foreground alpha
/// of 1.0 the short average is just the current frame.
pub struct BackgroundModel {
    foreground: AvgBuf,
    background: AvgBuf,
}

impl BackgroundModel {
    pub fn new(geometry: &Geometry) -> Self {
        let len = geometry.pixel_count();
        Self {
            foreground: zeroed(len),
            background: zeroed(len),
        }
    }

    /// Seed both averages from `frame`. The next `apply` call then
    /// produces an exactly-zero band-pass instead of a cold-start spike.
    pub fn seed(&mut self, frame: &[i16]) {
        for (i, &px) in frame.iter().enumerate() {
            self.foreground[i] = px as f32;
            self.background[i] = px as f32;
        }
    }

    /// Update both averages from `frame` and replace it with the
    /// band-passed difference. Returns the maximum of the result,
    /// recomputed fresh for this frame.
    pub fn apply(&mut self, frame: &mut [i16], alpha_short: f32, alpha_long: f32) -> i16 {
        let mut max = i16::MIN;
        for (i, px) in frame.iter_mut().enumerate() {
            let raw = *px as f32;
            self.background[i] = (1.0 - alpha_long) * self.background[i] + alpha_long * raw;
            self.foreground[i] = (1.0 - alpha_short) * self.foreground[i] + alpha_short * raw;

            *px = (self.foreground[i] - self.background[i]) as i16;
            if *px > max {
                max = *px;
            }
        }
        max
    }
}

fn zeroed(len: usize) -> AvgBuf {
    let mut buf = AvgBuf::new();
    // Geometry validation bounds len by the buffer capacity.
    let _ = buf.resize(len, 0.0);
    buf
}

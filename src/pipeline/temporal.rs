use heapless::Vec;

use crate::config::{Geometry, MAX_FRAME_PIXELS};

type FrameBuf = Vec<i16, MAX_FRAME_PIXELS>;

/// Three-tap smoothing window over consecutive raw frames. The output
/// weights the middle (t-1) tap by `alpha` and splits `1-alpha` evenly
/// over the t-2 and t taps.
pub struct WindowFilter {
    taps: [FrameBuf; 3],
}

impl WindowFilter {
    pub fn new(geometry: &Geometry) -> Self {
        let len = geometry.pixel_count();
        Self {
            taps: [zeroed(len), zeroed(len), zeroed(len)],
        }
    }

    /// Seed all three taps from `frame`. Used on reset so the first
    /// smoothed frame passes through unchanged instead of ramping up
    /// from stale history.
    pub fn seed(&mut self, frame: &[i16]) {
        for tap in &mut self.taps {
            tap.copy_from_slice(frame);
        }
    }

    /// Shift the window and smooth `frame` in place. Returns the
    /// running maximum of the smoothed frame.
    pub fn apply(&mut self, frame: &mut [i16], alpha: f32) -> i16 {
        let mut max = i16::MIN;
        for (i, px) in frame.iter_mut().enumerate() {
            self.taps[0][i] = self.taps[1][i];
            self.taps[1][i] = self.taps[2][i];
            self.taps[2][i] = *px;

            let old = self.taps[0][i] as f32;
            let mid = self.taps[1][i] as f32;
            let new = self.taps[2][i] as f32;
            *px = (alpha * mid + (1.0 - alpha) * (old + new) / 2.0) as i16;

            if *px > max {
                max = *px;
            }
        }
        max
    }
}

fn zeroed(len: usize) -> FrameBuf {
    let mut buf = FrameBuf::new();
    // Geometry validation bounds len by the buffer capacity.
    let _ = buf.resize(len, 0);
    buf
}

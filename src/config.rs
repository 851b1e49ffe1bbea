use crate::sensor::{SENSOR_COLS, SENSOR_ROWS};

/// Capacity of the physical frame buffers, in pixels.
pub const MAX_FRAME_PIXELS: usize = 64;
/// Capacity of the interpolated grid, in pixels.
pub const MAX_INTERP_PIXELS: usize = 2048;

const DEFAULT_INTERP_FACTOR: usize = 4;
const DEFAULT_WINDOW_FILTER_ALPHA: f32 = 0.5;
const DEFAULT_FOREGROUND_ALPHA: f32 = 1.0;
const DEFAULT_BACKGROUND_ALPHA: f32 = 0.10;
const DEFAULT_ZERO_CLAMP_DIVISOR: i32 = 6;
const DEFAULT_ZERO_CLAMP_FLOOR: i16 = 10;
const DEFAULT_ACTIVATION_THRESHOLD: i16 = 250;
// Row pitch over column pitch for the 10x6 die (10/6).
const DEFAULT_ROW_PITCH_SCALE: f32 = 1.66667;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    EmptyGrid { cols: usize, rows: usize },
    ZeroInterpFactor,
    FrameTooLarge { pixels: usize },
    InterpGridTooLarge { pixels: usize },
    AlphaOutOfRange(&'static str),
    ZeroClampDivisor,
}

/// Physical pixel grid plus the virtual upsample factor. Immutable for
/// the lifetime of the engine; every internal buffer is sized from it
/// once, at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    cols: usize,
    rows: usize,
    interp_factor: usize,
}

impl Geometry {
    pub fn new(cols: usize, rows: usize, interp_factor: usize) -> Result<Self, ConfigError> {
        if cols == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid { cols, rows });
        }
        if interp_factor == 0 {
            return Err(ConfigError::ZeroInterpFactor);
        }

        let geometry = Self {
            cols,
            rows,
            interp_factor,
        };
        if geometry.pixel_count() > MAX_FRAME_PIXELS {
            return Err(ConfigError::FrameTooLarge {
                pixels: geometry.pixel_count(),
            });
        }
        if geometry.interp_pixel_count() > MAX_INTERP_PIXELS {
            return Err(ConfigError::InterpGridTooLarge {
                pixels: geometry.interp_pixel_count(),
            });
        }

        Ok(geometry)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn interp_factor(&self) -> usize {
        self.interp_factor
    }

    pub fn pixel_count(&self) -> usize {
        self.cols * self.rows
    }

    pub fn interp_cols(&self) -> usize {
        (self.cols - 1) * self.interp_factor + 1
    }

    pub fn interp_rows(&self) -> usize {
        (self.rows - 1) * self.interp_factor + 1
    }

    pub fn interp_pixel_count(&self) -> usize {
        self.interp_cols() * self.interp_rows()
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            cols: SENSOR_COLS,
            rows: SENSOR_ROWS,
            interp_factor: DEFAULT_INTERP_FACTOR,
        }
    }
}

/// Pipeline tuning. Defaults carry the reference values for the
/// MAX25405 evaluation optics.
#[derive(Clone, Copy, Debug)]
pub struct Tuning {
    /// 3-tap window pre-filter weight for the middle tap; zero
    /// disables the pre-filter entirely.
    pub window_filter_alpha: f32,
    /// Short (foreground) smoothing coefficient; 1.0 is a passthrough.
    pub foreground_alpha: f32,
    /// Long (background) smoothing coefficient. Larger values make the
    /// background track faster, i.e. a more aggressive high-pass.
    pub background_alpha: f32,
    /// Adaptive clamp: interpolated pixels below peak/divisor are zeroed.
    pub zero_clamp_divisor: i32,
    /// Absolute clamp applied after the adaptive pass.
    pub zero_clamp_floor: i16,
    /// Band-passed peak required for the gesture to be active.
    pub activation_threshold: i16,
    /// Physical row pitch over column pitch, applied to the y centroid.
    pub row_pitch_scale: f32,
}

impl Tuning {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        check_alpha(self.window_filter_alpha, "window_filter_alpha")?;
        check_alpha(self.foreground_alpha, "foreground_alpha")?;
        check_alpha(self.background_alpha, "background_alpha")?;
        if self.zero_clamp_divisor < 1 {
            return Err(ConfigError::ZeroClampDivisor);
        }
        Ok(())
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            window_filter_alpha: DEFAULT_WINDOW_FILTER_ALPHA,
            foreground_alpha: DEFAULT_FOREGROUND_ALPHA,
            background_alpha: DEFAULT_BACKGROUND_ALPHA,
            zero_clamp_divisor: DEFAULT_ZERO_CLAMP_DIVISOR,
            zero_clamp_floor: DEFAULT_ZERO_CLAMP_FLOOR,
            activation_threshold: DEFAULT_ACTIVATION_THRESHOLD,
            row_pitch_scale: DEFAULT_ROW_PITCH_SCALE,
        }
    }
}

fn check_alpha(alpha: f32, name: &'static str) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(ConfigError::AlphaOutOfRange(name))
    }
}

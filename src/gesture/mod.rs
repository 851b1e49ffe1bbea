mod activity;

use heapless::Vec;

use crate::config::{ConfigError, Geometry, Tuning, MAX_FRAME_PIXELS};
use crate::pipeline::{center_of_mass, zero_below, BackgroundModel, Interpolator, WindowFilter};
use activity::ActivityTracker;

/// Centroid value reported while no object is detected.
const CENTROID_SENTINEL: f32 = -1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureMode {
    /// Moving-object detection with centroid output.
    Dynamic,
    /// Reserved; not implemented. Requesting it is an explicit error,
    /// not a silent no-op.
    Tracking,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Inactive,
    InProgress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureError {
    UnsupportedMode(GestureMode),
    FrameSize { expected: usize, got: usize },
}

/// Per-frame output of the gesture pipeline. `x`/`y` are in physical
/// column units, `-1.0` while inactive.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureResult {
    pub state: GestureState,
    pub x: f32,
    pub y: f32,
    pub intensity: u32,
    pub max_pixel: i16,
    pub frame: u32,
}

/// Owns the whole frame-processing chain and all cross-frame state:
/// window-filter taps, background averages, the reset latch and the
/// activity machine. One instance per physical sensor; every buffer is
/// sized once from the geometry at construction.
pub struct GestureEngine {
    geometry: Geometry,
    tuning: Tuning,
    window: WindowFilter,
    background: BackgroundModel,
    interpolator: Interpolator,
    activity: ActivityTracker,
    work: Vec<i16, MAX_FRAME_PIXELS>,
    reset_pending: bool,
    frame_count: u32,
}

impl GestureEngine {
    pub fn new(geometry: Geometry, tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;

        let mut work = Vec::new();
        // Geometry validation bounds pixel_count by the buffer capacity.
        let _ = work.resize(geometry.pixel_count(), 0);

        Ok(Self {
            geometry,
            tuning,
            window: WindowFilter::new(&geometry),
            background: BackgroundModel::new(&geometry),
            interpolator: Interpolator::new(&geometry),
            activity: ActivityTracker::new(tuning.activation_threshold),
            work,
            reset_pending: true,
            frame_count: 0,
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Make the next frame re-baseline the window filter and the
    /// background averages, e.g. after a gap in frame delivery. The
    /// frame still runs through the full pipeline but band-passes to
    /// zero and reports `Inactive`.
    pub fn reset(&mut self) {
        self.reset_pending = true;
    }

    /// Run one frame through the pipeline. The frame is copied into
    /// internal buffers and never retained.
    pub fn process(
        &mut self,
        frame: &[i16],
        mode: GestureMode,
    ) -> Result<GestureResult, GestureError> {
        match mode {
            GestureMode::Dynamic => self.process_dynamic(frame),
            GestureMode::Tracking => Err(GestureError::UnsupportedMode(mode)),
        }
    }

    fn process_dynamic(&mut self, frame: &[i16]) -> Result<GestureResult, GestureError> {
        if frame.len() != self.geometry.pixel_count() {
            return Err(GestureError::FrameSize {
                expected: self.geometry.pixel_count(),
                got: frame.len(),
            });
        }
        self.work.copy_from_slice(frame);

        if self.tuning.window_filter_alpha > 0.0 {
            if self.reset_pending {
                self.window.seed(&self.work);
            } else {
                self.window
                    .apply(&mut self.work, self.tuning.window_filter_alpha);
            }
        }

        if self.reset_pending {
            self.activity.force_inactive();
            self.background.seed(&self.work);
        }
        let max_pixel = self.background.apply(
            &mut self.work,
            self.tuning.foreground_alpha,
            self.tuning.background_alpha,
        );
        if self.reset_pending {
            self.reset_pending = false;
            log::debug!(target: "max25x05", "pipeline re-baselined");
        }

        self.interpolator.upsample(&self.work);

        let adaptive = (max_pixel as i32 / self.tuning.zero_clamp_divisor) as i16;
        zero_below(self.interpolator.grid_mut(), adaptive);
        zero_below(self.interpolator.grid_mut(), self.tuning.zero_clamp_floor);

        self.frame_count = self.frame_count.wrapping_add(1);

        let mut result = GestureResult {
            state: self.activity.on_peak(max_pixel),
            x: CENTROID_SENTINEL,
            y: CENTROID_SENTINEL,
            intensity: 0,
            max_pixel,
            frame: self.frame_count,
        };

        if result.state == GestureState::InProgress {
            let moments = center_of_mass(self.interpolator.grid(), self.geometry.interp_cols());
            let factor = self.geometry.interp_factor() as f32;
            result.x = moments.cmx / factor;
            result.y = moments.cmy / factor * self.tuning.row_pitch_scale;
            result.intensity = moments.mass.max(0) as u32;
        }

        Ok(result)
    }
}

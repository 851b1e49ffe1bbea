mod background;
mod interpolate;
mod moments;
mod temporal;
mod threshold;

pub use background::BackgroundModel;
pub use interpolate::Interpolator;
pub use moments::{center_of_mass, Moments};
pub use temporal::WindowFilter;
pub use threshold::zero_below;

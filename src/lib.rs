#![no_std]

#[cfg(test)]
extern crate std;

pub mod bus;
pub mod config;
pub mod gesture;
pub mod pipeline;
pub mod regmap;
pub mod sensor;

pub use bus::{I2cBus, SensorBus, SpiBus};
pub use config::{ConfigError, Geometry, Tuning};
pub use gesture::{GestureEngine, GestureError, GestureMode, GestureResult, GestureState};
pub use regmap::DeviceVariant;
pub use sensor::{FrameReady, Max25x05, SensorError};

use core::sync::atomic::{AtomicBool, Ordering};

use crate::bus::SensorBus;
use crate::regmap::{self, DeviceVariant};

pub const SENSOR_COLS: usize = 10;
pub const SENSOR_ROWS: usize = 6;
pub const SENSOR_PIXELS: usize = SENSOR_COLS * SENSOR_ROWS;
const FRAME_BYTES: usize = SENSOR_PIXELS * 2;

#[derive(Debug, PartialEq, Eq)]
pub enum SensorError<E> {
    Bus(E),
    FrameSize { expected: usize, got: usize },
}

impl<E> From<E> for SensorError<E> {
    fn from(value: E) -> Self {
        Self::Bus(value)
    }
}

/// End-of-conversion signal shared between the interrupt context and
/// the processing loop. The ISR calls `notify`; the loop calls `take`,
/// which returns and clears the flag in a single atomic step so each
/// conversion is observed exactly once. Interrupt wiring itself is the
/// integrator's job.
pub struct FrameReady {
    ready: AtomicBool,
}

impl FrameReady {
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
        }
    }

    pub fn notify(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn take(&self) -> bool {
        self.ready.swap(false, Ordering::AcqRel)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

impl Default for FrameReady {
    fn default() -> Self {
        Self::new()
    }
}

/// Register-level driver for one MAX25405/MAX25205 behind a
/// [`SensorBus`] transport.
pub struct Max25x05<B> {
    bus: B,
    variant: DeviceVariant,
    frames_enabled: bool,
}

impl<B> Max25x05<B>
where
    B: SensorBus,
{
    pub fn new(bus: B, variant: DeviceVariant) -> Self {
        Self {
            bus,
            variant,
            frames_enabled: false,
        }
    }

    pub fn variant(&self) -> DeviceVariant {
        self.variant
    }

    pub fn release(self) -> B {
        self.bus
    }

    /// Program the power-on defaults for the attached variant: enable
    /// the end-of-conversion interrupt, sequencing and integration
    /// timing, ambient light compensation, LED drive and unity column
    /// gain trims.
    pub fn apply_default_settings(&mut self) -> Result<(), SensorError<B::Error>> {
        self.bus
            .reg_write(regmap::MAIN_CONFIG1, regmap::EOC_INT_ENABLE)?;
        self.bus.reg_write(regmap::MAIN_CONFIG2, 0x02)?;

        let (seq1, seq2) = self.variant.seq_defaults();
        self.bus.reg_write(regmap::SEQ_CONFIG1, seq1)?;
        self.bus.reg_write(regmap::SEQ_CONFIG2, seq2)?;

        self.bus.reg_write(regmap::AFE_CONFIG, regmap::AFE_ALC_COARSE)?;
        self.bus
            .reg_write(regmap::LED_CONFIG, self.variant.led_drive())?;

        for reg in regmap::COL_GAIN_REGS {
            self.bus.reg_write(reg, regmap::COL_GAIN_UNITY)?;
        }

        self.bus.reg_write(regmap::LED_CTRL, regmap::LED_CTRL_DEFAULT)?;

        log::debug!(target: "max25x05", "defaults applied variant={:?}", self.variant);
        Ok(())
    }

    /// Read the interrupt status register. The read itself clears a
    /// pending end-of-conversion interrupt on the INTB pin.
    pub fn interrupt_status(&mut self) -> Result<u8, SensorError<B::Error>> {
        let mut status = [0u8; 1];
        self.bus.reg_read(regmap::INT_STATUS, &mut status)?;
        Ok(status[0])
    }

    /// Clear any stale interrupt and start treating conversions as
    /// frame deliveries. Returns the status value consumed by the clear.
    pub fn enable_frame_reads(&mut self) -> Result<u8, SensorError<B::Error>> {
        let status = self.interrupt_status()?;
        self.frames_enabled = true;
        log::debug!(target: "max25x05", "frame reads enabled status={:#04x}", status);
        Ok(status)
    }

    pub fn disable_frame_reads(&mut self) {
        self.frames_enabled = false;
    }

    pub fn frame_reads_enabled(&self) -> bool {
        self.frames_enabled
    }

    /// Fetch one frame of signed pixel intensities, row-major. `flip`
    /// reverses the readout order for sensors mounted rotated 180
    /// degrees.
    pub fn read_frame(
        &mut self,
        pixels: &mut [i16],
        flip: bool,
    ) -> Result<(), SensorError<B::Error>> {
        if pixels.len() != SENSOR_PIXELS {
            return Err(SensorError::FrameSize {
                expected: SENSOR_PIXELS,
                got: pixels.len(),
            });
        }

        let mut raw = [0u8; FRAME_BYTES];
        self.bus.reg_read(regmap::ADC_DATA_START, &mut raw)?;

        for (i, px) in pixels.iter_mut().enumerate() {
            *px = i16::from_be_bytes([raw[2 * i], raw[2 * i + 1]]);
        }

        if flip {
            pixels.reverse();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::vec::Vec;

    struct ScriptBus {
        writes: Vec<(u8, u8)>,
        frame: [u8; FRAME_BYTES],
        status: u8,
    }

    impl Default for ScriptBus {
        fn default() -> Self {
            ScriptBus {
                writes: Vec::new(),
                frame: [0u8; FRAME_BYTES],
                status: 0,
            }
        }
    }

    impl SensorBus for ScriptBus {
        type Error = Infallible;

        fn reg_write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
            self.writes.push((reg, value));
            Ok(())
        }

        fn reg_read(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
            match reg {
                regmap::INT_STATUS => buffer[0] = self.status,
                regmap::ADC_DATA_START => {
                    buffer.copy_from_slice(&self.frame[..buffer.len()]);
                }
                _ => buffer.fill(0),
            }
            Ok(())
        }
    }

    fn encode_pixel(frame: &mut [u8; FRAME_BYTES], index: usize, value: i16) {
        let bytes = value.to_be_bytes();
        frame[2 * index] = bytes[0];
        frame[2 * index + 1] = bytes[1];
    }

    #[test]
    fn default_settings_follow_variant_tables() {
        let mut sensor = Max25x05::new(ScriptBus::default(), DeviceVariant::Max25405);
        sensor.apply_default_settings().unwrap();

        let writes = &sensor.bus.writes;
        assert_eq!(writes[0], (regmap::MAIN_CONFIG1, regmap::EOC_INT_ENABLE));
        assert_eq!(writes[1], (regmap::MAIN_CONFIG2, 0x02));
        assert_eq!(writes[2], (regmap::SEQ_CONFIG1, 0x84));
        assert_eq!(writes[3], (regmap::SEQ_CONFIG2, 0x8C));
        assert_eq!(writes[4], (regmap::AFE_CONFIG, regmap::AFE_ALC_COARSE));
        assert_eq!(writes[5], (regmap::LED_CONFIG, 0x0F));
        for (i, reg) in regmap::COL_GAIN_REGS.iter().enumerate() {
            assert_eq!(writes[6 + i], (*reg, regmap::COL_GAIN_UNITY));
        }
        assert_eq!(writes[11], (regmap::LED_CTRL, regmap::LED_CTRL_DEFAULT));
    }

    #[test]
    fn max25205_uses_reduced_led_drive() {
        let mut sensor = Max25x05::new(ScriptBus::default(), DeviceVariant::Max25205);
        sensor.apply_default_settings().unwrap();

        let writes = &sensor.bus.writes;
        assert_eq!(writes[2], (regmap::SEQ_CONFIG1, 0x04));
        assert_eq!(writes[3], (regmap::SEQ_CONFIG2, 0xAC));
        assert_eq!(writes[5], (regmap::LED_CONFIG, 0x0A));
    }

    #[test]
    fn frame_decode_is_big_endian_twos_complement() {
        let mut bus = ScriptBus::default();
        encode_pixel(&mut bus.frame, 0, 1000);
        encode_pixel(&mut bus.frame, 1, -42);
        encode_pixel(&mut bus.frame, SENSOR_PIXELS - 1, -32768);

        let mut sensor = Max25x05::new(bus, DeviceVariant::Max25405);
        let mut pixels = [0i16; SENSOR_PIXELS];
        sensor.read_frame(&mut pixels, false).unwrap();

        assert_eq!(pixels[0], 1000);
        assert_eq!(pixels[1], -42);
        assert_eq!(pixels[SENSOR_PIXELS - 1], -32768);
    }

    #[test]
    fn flip_reverses_readout_order() {
        let mut bus = ScriptBus::default();
        encode_pixel(&mut bus.frame, 0, 7);
        encode_pixel(&mut bus.frame, SENSOR_PIXELS - 1, 9);

        let mut sensor = Max25x05::new(bus, DeviceVariant::Max25405);
        let mut pixels = [0i16; SENSOR_PIXELS];
        sensor.read_frame(&mut pixels, true).unwrap();

        assert_eq!(pixels[0], 9);
        assert_eq!(pixels[SENSOR_PIXELS - 1], 7);
    }

    #[test]
    fn read_frame_rejects_wrong_buffer_size() {
        let mut sensor = Max25x05::new(ScriptBus::default(), DeviceVariant::Max25405);
        let mut short = [0i16; 10];
        assert_eq!(
            sensor.read_frame(&mut short, false),
            Err(SensorError::FrameSize {
                expected: SENSOR_PIXELS,
                got: 10
            })
        );
    }

    #[test]
    fn enable_frame_reads_clears_pending_interrupt() {
        let mut bus = ScriptBus::default();
        bus.status = 0x01;
        let mut sensor = Max25x05::new(bus, DeviceVariant::Max25405);

        assert!(!sensor.frame_reads_enabled());
        assert_eq!(sensor.enable_frame_reads().unwrap(), 0x01);
        assert!(sensor.frame_reads_enabled());

        sensor.disable_frame_reads();
        assert!(!sensor.frame_reads_enabled());
    }

    #[test]
    fn frame_ready_is_consumed_exactly_once() {
        let ready = FrameReady::new();
        assert!(!ready.is_ready());
        assert!(!ready.take());

        ready.notify();
        assert!(ready.is_ready());
        assert!(ready.take());
        assert!(!ready.take());
    }
}

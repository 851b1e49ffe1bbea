use embedded_hal::i2c::I2c;
use embedded_hal::spi::{Operation, SpiDevice};

/// 7-bit device address with the CSB strap pulled high.
pub const I2C_ADDR_CSB_HIGH: u8 = 0x50;
/// 7-bit device address with the CSB strap pulled low.
pub const I2C_ADDR_CSB_LOW: u8 = 0x4F;

// Second framing byte selecting the transfer direction in SPI mode.
const SPI_CMD_WRITE: u8 = 0x00;
const SPI_CMD_READ: u8 = 0x80;

/// Register-level access to a MAX25x05, independent of which serial bus
/// mode the SEL strap selected. The gesture stack depends only on this
/// trait, never on a concrete transport.
pub trait SensorBus {
    type Error;

    fn reg_write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error>;
    fn reg_read(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;
}

/// SPI transport (SEL strapped low). Frames are
/// `[reg, 0x00, value]` for writes and `[reg, 0x80]` followed by the
/// clocked-out data for reads.
pub struct SpiBus<SPI> {
    spi: SPI,
}

impl<SPI> SpiBus<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> SensorBus for SpiBus<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn reg_write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.spi.write(&[reg, SPI_CMD_WRITE, value])
    }

    fn reg_read(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.spi.transaction(&mut [
            Operation::Write(&[reg, SPI_CMD_READ]),
            Operation::Read(buffer),
        ])
    }
}

/// I2C transport (SEL strapped high). The CSB strap picks between the
/// two device addresses.
pub struct I2cBus<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C> I2cBus<I2C> {
    pub fn new(i2c: I2C, addr: u8) -> Self {
        Self { i2c, addr }
    }

    pub fn csb_high(i2c: I2C) -> Self {
        Self::new(i2c, I2C_ADDR_CSB_HIGH)
    }

    pub fn csb_low(i2c: I2C) -> Self {
        Self::new(i2c, I2C_ADDR_CSB_LOW)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> SensorBus for I2cBus<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn reg_write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.addr, &[reg, value])
    }

    fn reg_read(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.addr, &[reg], buffer)
    }
}

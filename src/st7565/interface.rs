//! Display interface using SPI
use display_interface::DisplayError;
use embedded_hal::{digital::OutputPin, spi::SpiBus};

/// Command/data link to the controller
///
/// Outside a `select()`/`deselect()` pair every write frames itself with
/// chip select. Inside the pair writes run back to back in one selection.
pub trait HardwareLink {
    /// Send one command byte (data/command line low)
    fn send_command(&mut self, command: u8) -> Result<(), DisplayError>;

    /// Send command bytes back to back (data/command line low)
    fn send_commands(&mut self, commands: &[u8]) -> Result<(), DisplayError> {
        for &command in commands {
            self.send_command(command)?;
        }
        Ok(())
    }

    /// Send display data (data/command line high)
    fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError>;

    /// Drive the reset line, `false` holds the controller in reset
    fn set_reset_line(&mut self, high: bool) -> Result<(), DisplayError>;

    /// Assert chip select until [`HardwareLink::deselect`]
    fn select(&mut self) -> Result<(), DisplayError>;

    /// Release chip select
    fn deselect(&mut self) -> Result<(), DisplayError>;
}

impl<T: HardwareLink + ?Sized> HardwareLink for &mut T {
    fn send_command(&mut self, command: u8) -> Result<(), DisplayError> {
        (**self).send_command(command)
    }

    fn send_commands(&mut self, commands: &[u8]) -> Result<(), DisplayError> {
        (**self).send_commands(commands)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        (**self).send_data(data)
    }

    fn set_reset_line(&mut self, high: bool) -> Result<(), DisplayError> {
        (**self).set_reset_line(high)
    }

    fn select(&mut self) -> Result<(), DisplayError> {
        (**self).select()
    }

    fn deselect(&mut self) -> Result<(), DisplayError> {
        (**self).deselect()
    }
}

/// SPI connection with explicit chip select, data/command and reset pins
///
/// The bus is used as a raw [`SpiBus`] because a page write toggles the
/// data/command line several times inside one chip select frame, which an
/// `SpiDevice` transaction cannot express.
pub struct SpiInterface<SPI, CS, DC, RST> {
    /// SPI bus
    spi: SPI,
    /// Chip select, active low
    cs: CS,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting, active low
    rst: RST,
    /// Inside a `select()` frame
    selected: bool,
}

impl<SPI, CS, DC, RST> SpiInterface<SPI, CS, DC, RST> {
    /// Create the interface, no pins are touched yet
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST) -> Self {
        SpiInterface {
            spi,
            cs,
            dc,
            rst,
            selected: false,
        }
    }

    /// Give back the bus and pins
    pub fn release(self) -> (SPI, CS, DC, RST) {
        (self.spi, self.cs, self.dc, self.rst)
    }
}

impl<SPI, CS, DC, RST> SpiInterface<SPI, CS, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn write(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        let framed = !self.selected;
        if framed {
            self.cs.set_low().map_err(|_| DisplayError::CSError)?;
        }

        let written = self
            .spi
            .write(bytes)
            .and_then(|()| self.spi.flush())
            .map_err(|e| {
                log::error!("SPI write error for {} bytes: {:?}", bytes.len(), e);
                DisplayError::BusWriteError
            });

        if framed {
            self.cs.set_high().map_err(|_| DisplayError::CSError)?;
        }
        written
    }
}

impl<SPI, CS, DC, RST> HardwareLink for SpiInterface<SPI, CS, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn send_command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.send_commands(&[command])
    }

    fn send_commands(&mut self, commands: &[u8]) -> Result<(), DisplayError> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.write(commands)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.write(data)
    }

    fn set_reset_line(&mut self, high: bool) -> Result<(), DisplayError> {
        let result = if high {
            self.rst.set_high()
        } else {
            self.rst.set_low()
        };
        result.map_err(|_| DisplayError::RSError)
    }

    fn select(&mut self) -> Result<(), DisplayError> {
        self.cs.set_low().map_err(|_| DisplayError::CSError)?;
        self.selected = true;
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), DisplayError> {
        self.selected = false;
        self.cs.set_high().map_err(|_| DisplayError::CSError)
    }
}

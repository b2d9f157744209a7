use super::{Nrf24Error, RF24};
use crate::{
    frame::Frame,
    netdev::{NetOpt, NetdevEvent, OptValue},
    radio::prelude::{IrqLine, NetDevice},
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, IRQ, DELAY> NetDevice for RF24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    IRQ: IrqLine,
    DELAY: DelayNs,
{
    type NetDeviceErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Power-cycles the radio into POWER_DOWN, programs every register from
    /// [`RF24::config()`] and then enters the configured idle state
    /// ([`State::RxMode`](crate::State::RxMode) unless changed).
    ///
    /// Pipes configured with an auto address get one derived from
    /// [`RadioConfig::luid()`](crate::radio::RadioConfig::luid) here.
    fn init(&mut self) -> Result<(), Self::NetDeviceErrorType> {
        self.initialize()
    }

    /// Fails with [`Nrf24Error::TryAgain`] while the TX FIFO is full or an
    /// interrupt has not been serviced yet. In the latter case the IRQ flags
    /// are cleared here, [`RF24::isr_pending()`] is `true` afterwards and the
    /// next [`NetDevice::isr()`] hands out their events.
    fn send(&mut self, frame: &Frame) -> Result<usize, Self::NetDeviceErrorType> {
        self.transmit(frame)
    }

    fn frame_size_estimate(&self) -> usize {
        self.max_frame_size()
    }

    fn drop_frame(&mut self) -> Result<usize, Self::NetDeviceErrorType> {
        self.pop_frame(None)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Self::NetDeviceErrorType> {
        self.pop_frame(Some(buf))
    }

    fn isr<F>(&mut self, on_event: F) -> Result<(), Self::NetDeviceErrorType>
    where
        F: FnMut(&mut Self, NetdevEvent),
    {
        self.service_interrupt(on_event)
    }

    fn get(&self, opt: NetOpt) -> Result<OptValue, Self::NetDeviceErrorType> {
        self.get_option(opt)
    }

    fn set(&mut self, opt: NetOpt, value: OptValue) -> Result<(), Self::NetDeviceErrorType> {
        self.set_option(opt, value)
    }
}

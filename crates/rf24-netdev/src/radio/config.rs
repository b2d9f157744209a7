use crate::{
    frame::{Framing, AUTO_ADDRESS, BROADCAST_ADDRESS, MAX_ADDRESS_WIDTH, MAX_PAYLOAD_WIDTH},
    netdev::UpperLayerProtocol,
    AddressWidth, CrcLength, DataRate, Protocol, RetransmitDelay, State, TxPower,
};

/// The suffix that marks pipes 2 - 5 for auto-generation.
pub(crate) const AUTO_SUFFIX: u8 = 0;

/// A struct to contain configuration about pipe addresses.
///
/// Addresses are stored most significant byte first. Only the first
/// [`AddressWidth::len()`] bytes are meaningful and the last of those is the
/// byte that tells pipes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeConfig {
    pipe0: [u8; MAX_ADDRESS_WIDTH],
    pipe1: [u8; MAX_ADDRESS_WIDTH],
    /// Trailing bytes of pipes 2 - 5; `None` means the pipe is closed.
    suffixes: [Option<u8>; 4],
    /// Static payload widths (ShockBurst only).
    payload_widths: [u8; 6],
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            pipe0: BROADCAST_ADDRESS,
            pipe1: AUTO_ADDRESS,
            suffixes: [None; 4],
            payload_widths: [MAX_PAYLOAD_WIDTH as u8; 6],
        }
    }
}

impl PipeConfig {
    /// Set a pipe's address.
    ///
    /// Pipes 0 and 1 take up to 5 bytes. Pipes 2 - 5 only keep the last byte
    /// of `address`, so both a full address and a single byte are accepted.
    pub fn set_rx_address(&mut self, pipe: u8, address: &[u8]) {
        let len = address.len().min(MAX_ADDRESS_WIDTH);
        if len == 0 {
            return;
        }
        match pipe {
            0 => self.pipe0[..len].copy_from_slice(&address[..len]),
            1 => self.pipe1[..len].copy_from_slice(&address[..len]),
            2..=5 => self.suffixes[pipe as usize - 2] = Some(address[address.len() - 1]),
            _ => (),
        }
    }

    /// Pipes 0 and 1 are always open.
    pub fn close_rx_pipe(&mut self, pipe: u8) {
        if (2..=5).contains(&pipe) {
            self.suffixes[pipe as usize - 2] = None;
        }
    }

    pub fn is_rx_pipe_enabled(&self, pipe: u8) -> bool {
        match pipe {
            0 | 1 => true,
            2..=5 => self.suffixes[pipe as usize - 2].is_some(),
            _ => false,
        }
    }

    /// The EN_RXADDR bit mask of all open pipes.
    pub fn enabled_mask(&self) -> u8 {
        (0..6).fold(0, |mask, pipe| {
            mask | ((self.is_rx_pipe_enabled(pipe) as u8) << pipe)
        })
    }

    /// The full address of a pipe (pipes 2 - 5 are composed from pipe 1).
    ///
    /// Returns `None` for a closed or non-existent pipe.
    pub fn rx_address(&self, pipe: u8, width: AddressWidth) -> Option<[u8; MAX_ADDRESS_WIDTH]> {
        match pipe {
            0 => Some(self.pipe0),
            1 => Some(self.pipe1),
            2..=5 => self.suffixes[pipe as usize - 2].map(|suffix| {
                let mut address = self.pipe1;
                address[width.len() as usize - 1] = suffix;
                address
            }),
            _ => None,
        }
    }

    /// The stored trailing byte of pipes 2 - 5.
    pub fn suffix(&self, pipe: u8) -> Option<u8> {
        match pipe {
            2..=5 => self.suffixes[pipe as usize - 2],
            _ => None,
        }
    }

    pub fn payload_width(&self, pipe: u8) -> u8 {
        self.payload_widths
            .get(pipe as usize)
            .copied()
            .unwrap_or(MAX_PAYLOAD_WIDTH as u8)
    }

    pub fn set_payload_width(&mut self, pipe: u8, width: u8) {
        if let Some(w) = self.payload_widths.get_mut(pipe as usize) {
            *w = width.clamp(1, MAX_PAYLOAD_WIDTH as u8);
        }
    }

    /// Replace every auto sentinel with an address derived from `luid`.
    ///
    /// Derived trailing bytes count up from the identifier's last byte and
    /// skip values already in use, so the distinguishing byte of every open
    /// pipe stays unique. The broadcast trailing byte is never handed out.
    pub(crate) fn resolve_auto_addresses(&mut self, luid: &[u8; MAX_ADDRESS_WIDTH], width: AddressWidth) {
        let aw = width.len() as usize;
        let last = aw - 1;
        let mut used = [false; 256];
        used[BROADCAST_ADDRESS[0] as usize] = true;
        let is_auto_full = |address: &[u8; MAX_ADDRESS_WIDTH]| address[..aw] == AUTO_ADDRESS[..aw];
        if !is_auto_full(&self.pipe0) {
            used[self.pipe0[last] as usize] = true;
        }
        if !is_auto_full(&self.pipe1) {
            used[self.pipe1[last] as usize] = true;
        }
        for suffix in self.suffixes.iter().flatten() {
            if *suffix != AUTO_SUFFIX {
                used[*suffix as usize] = true;
            }
        }
        let mut candidate = luid[last];
        let mut next_free = move |used: &mut [bool; 256]| {
            while used[candidate as usize] || candidate == AUTO_SUFFIX {
                candidate = candidate.wrapping_add(1);
            }
            used[candidate as usize] = true;
            candidate
        };
        for address in [&mut self.pipe0, &mut self.pipe1] {
            if is_auto_full(&*address) {
                address[..aw].copy_from_slice(&luid[..aw]);
                address[last] = next_free(&mut used);
            }
        }
        for suffix in self.suffixes.iter_mut().flatten() {
            if *suffix == AUTO_SUFFIX {
                *suffix = next_free(&mut used);
            }
        }
    }
}

/// An object to configure the radio.
///
/// This struct follows a builder pattern. Since all fields are private, users should
/// start with the [`RadioConfig::default`] constructor, then mutate the object accordingly.
/// ```
/// use rf24_netdev::radio::RadioConfig;
///
/// let config = RadioConfig::default().with_channel(4);
/// assert_eq!(config.channel(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioConfig {
    protocol: Protocol,
    crc_length: CrcLength,
    address_width: AddressWidth,
    channel: u8,
    tx_power: TxPower,
    data_rate: DataRate,
    max_retransmits: u8,
    retransmit_delay: RetransmitDelay,
    framing: Framing,
    idle_state: State,
    luid: [u8; MAX_ADDRESS_WIDTH],
    upper_layer: UpperLayerProtocol,
    pub(crate) pipes: PipeConfig,
}

impl Default for RadioConfig {
    /// Instantiate a [`RadioConfig`] object with library defaults.
    ///
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`RadioConfig::protocol()`] | [`Protocol::Esb`] |
    /// | [`RadioConfig::crc_length()`] | [`CrcLength::Bit16`] |
    /// | [`RadioConfig::address_width()`] | [`AddressWidth::Bytes5`] |
    /// | [`RadioConfig::channel()`] | `0` (2402 MHz) |
    /// | [`RadioConfig::tx_power()`] | [`TxPower::Max`] |
    /// | [`RadioConfig::data_rate()`] | [`DataRate::Mbps1`] |
    /// | [`RadioConfig::max_retransmits()`] | `3` |
    /// | [`RadioConfig::retransmit_delay()`] | 500 us |
    /// | [`RadioConfig::framing()`] | [`Framing::CompactHeader`] |
    /// | [`RadioConfig::idle_state()`] | [`State::RxMode`] |
    /// | [`RadioConfig::payload_width()`] | `32` for all pipes |
    /// | [`RadioConfig::upper_layer()`] | [`UpperLayerProtocol::Undefined`] |
    ///
    /// ## Default RX pipes' configuration
    ///
    /// | pipe number | state  | address     |
    /// |-------------|--------|-------------|
    /// |      0      | open   | broadcast (`[0xFF; 5]`) |
    /// |      1      | open   | auto (derived from [`RadioConfig::luid()`]) |
    /// |    2 - 5    | closed | - |
    fn default() -> Self {
        Self {
            protocol: Protocol::Esb,
            crc_length: CrcLength::Bit16,
            address_width: AddressWidth::Bytes5,
            channel: 0,
            tx_power: TxPower::Max,
            data_rate: DataRate::Mbps1,
            max_retransmits: 3,
            retransmit_delay: RetransmitDelay::from_us(500),
            framing: Framing::CompactHeader,
            idle_state: State::RxMode,
            luid: [0xC2, 0xC2, 0xC2, 0xC2, 0x01],
            upper_layer: UpperLayerProtocol::Undefined,
            pipes: PipeConfig::default(),
        }
    }
}

impl RadioConfig {
    /// Returns the value set by [`RadioConfig::with_protocol()`].
    pub const fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Choose between Enhanced ShockBurst and ShockBurst.
    pub fn with_protocol(self, protocol: Protocol) -> Self {
        Self { protocol, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_crc_length()`].
    pub const fn crc_length(&self) -> CrcLength {
        self.crc_length
    }

    /// The Cyclical Redundancy Checksum (CRC) length.
    ///
    /// Initialization fails if CRC is disabled while using [`Protocol::Esb`].
    pub fn with_crc_length(self, crc_length: CrcLength) -> Self {
        Self { crc_length, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_address_width()`].
    pub const fn address_width(&self) -> AddressWidth {
        self.address_width
    }

    /// The width of all pipe addresses.
    ///
    /// This can only be changed before initialization.
    pub fn with_address_width(self, address_width: AddressWidth) -> Self {
        Self {
            address_width,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_channel()`].
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Set the virtual channel index.
    ///
    /// This value is clamped to range [0, 15].
    /// See [`CHANNEL_MAP`](crate::conversion::CHANNEL_MAP) for the frequencies.
    pub fn with_channel(self, value: u8) -> Self {
        Self {
            channel: value.min(crate::conversion::NUM_CHANNELS - 1),
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_tx_power()`].
    pub const fn tx_power(&self) -> TxPower {
        self.tx_power
    }

    pub fn with_tx_power(self, tx_power: TxPower) -> Self {
        Self { tx_power, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_data_rate()`].
    pub const fn data_rate(&self) -> DataRate {
        self.data_rate
    }

    /// The Data Rate (over the air).
    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        Self { data_rate, ..self }
    }

    /// The auto-retry feature's `count` (set via [`RadioConfig::with_auto_retries()`])
    pub const fn max_retransmits(&self) -> u8 {
        self.max_retransmits
    }

    /// The auto-retry feature's `delay` (set via [`RadioConfig::with_auto_retries()`])
    pub const fn retransmit_delay(&self) -> RetransmitDelay {
        self.retransmit_delay
    }

    /// Set the auto-retry feature's `delay` and `count` parameters.
    ///
    /// `count` is clamped to range [0, 15].
    /// Only meaningful for [`Protocol::Esb`].
    pub fn with_auto_retries(self, delay: RetransmitDelay, count: u8) -> Self {
        Self {
            retransmit_delay: delay,
            max_retransmits: count.min(15),
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_framing()`].
    pub const fn framing(&self) -> Framing {
        self.framing
    }

    pub fn with_framing(self, framing: Framing) -> Self {
        Self { framing, ..self }
    }

    /// The state the radio returns to after a transmission completed.
    pub const fn idle_state(&self) -> State {
        self.idle_state
    }

    /// Only [`State::RxMode`], [`State::Standby1`] and [`State::PowerDown`]
    /// are accepted; other states are ignored.
    pub fn with_idle_state(self, state: State) -> Self {
        match state {
            State::RxMode | State::Standby1 | State::PowerDown => Self {
                idle_state: state,
                ..self
            },
            _ => self,
        }
    }

    /// The locally unique identifier that auto addresses are derived from.
    pub const fn luid(&self) -> [u8; MAX_ADDRESS_WIDTH] {
        self.luid
    }

    /// Typically taken from the MCU's unique device ID.
    pub fn with_luid(self, luid: [u8; MAX_ADDRESS_WIDTH]) -> Self {
        Self { luid, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_upper_layer()`].
    pub const fn upper_layer(&self) -> UpperLayerProtocol {
        self.upper_layer
    }

    /// The protocol the network layer runs on top of this device.
    pub fn with_upper_layer(self, upper_layer: UpperLayerProtocol) -> Self {
        Self {
            upper_layer,
            ..self
        }
    }

    /// The static payload width of a pipe (ShockBurst only).
    pub fn payload_width(&self, pipe: u8) -> u8 {
        self.pipes.payload_width(pipe)
    }

    /// Set the static payload width of all pipes.
    ///
    /// This value is clamped to range [1, 32].
    pub fn with_payload_width(self, value: u8) -> Self {
        let mut pipes = self.pipes;
        for pipe in 0..6 {
            pipes.set_payload_width(pipe, value);
        }
        Self { pipes, ..self }
    }

    /// Set the static payload width of one pipe.
    pub fn with_pipe_payload_width(self, pipe: u8, value: u8) -> Self {
        let mut pipes = self.pipes;
        pipes.set_payload_width(pipe, value);
        Self { pipes, ..self }
    }

    /// Close one of pipes 2 - 5.
    pub fn close_rx_pipe(self, pipe: u8) -> Self {
        let mut pipes = self.pipes;
        pipes.close_rx_pipe(pipe);
        Self { pipes, ..self }
    }

    pub fn is_rx_pipe_enabled(&self, pipe: u8) -> bool {
        self.pipes.is_rx_pipe_enabled(pipe)
    }

    /// The full address of an open pipe.
    pub fn rx_address(&self, pipe: u8) -> Option<[u8; MAX_ADDRESS_WIDTH]> {
        self.pipes.rx_address(pipe, self.address_width)
    }

    /// Set (and open) a pipe's address.
    ///
    /// Use [`AUTO_ADDRESS`] (or `0x00` for pipes 2 - 5) to derive the
    /// address from [`RadioConfig::luid()`] at initialization.
    pub fn with_rx_address(self, pipe: u8, address: &[u8]) -> Self {
        let mut pipes = self.pipes;
        pipes.set_rx_address(pipe, address);
        Self { pipes, ..self }
    }
}

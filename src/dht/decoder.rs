use core::fmt::{self, Debug};

use thiserror::Error;

use crate::dht::{ChecksumMismatch, Direction, FRAME_LEN, Frame, Level, SensorPin};

const START_LOW_US: u32 = 20 * 1000;
const START_HIGH_US: u32 = 40;

const ACK_TIMEOUT_TICKS: u32 = 80;
const BIT_SYNC_TIMEOUT_TICKS: u32 = 50;
const BIT_HIGH_TIMEOUT_TICKS: u32 = 70;

/// High phases longer than this many ticks are a `1`.
const ONE_THRESHOLD_TICKS: u32 = 28;

const FRAME_BITS: u8 = (FRAME_LEN * 8) as u8;

/// The bounded wait that overran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AckLow,
    AckHigh,
    BitSync { bit: u8 },
    BitHigh { bit: u8 },
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::AckLow => f.write_str("acknowledge low phase"),
            Phase::AckHigh => f.write_str("acknowledge high phase"),
            Phase::BitSync { bit } => write!(f, "sync phase of bit {bit}"),
            Phase::BitHigh { bit } => write!(f, "data phase of bit {bit}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError<E: Debug> {
    #[error("timed out in {phase}")]
    Timeout { phase: Phase },

    #[error(transparent)]
    ChecksumMismatch(#[from] ChecksumMismatch),

    #[error("pin error: {0:?}")]
    Pin(E),
}

/// Bit-banged reader for the DHT one-wire protocol.
///
/// Every [`decode`](ProtocolDecoder::decode) is a single attempt; retrying is
/// left to the caller's schedule.
#[derive(Debug)]
pub struct ProtocolDecoder<P> {
    pin: P,
}

impl<P: SensorPin> ProtocolDecoder<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Runs the handshake and reads all 40 bits.
    ///
    /// The line is switched back to input before returning, on every path.
    pub fn decode(&mut self) -> Result<Frame, DecodeError<P::Error>> {
        let result = self
            .send_start_signal()
            .and_then(|()| self.read_response());

        let released = self
            .pin
            .set_direction(Direction::Input)
            .map_err(DecodeError::Pin);

        let bytes = result?;
        released?;

        Ok(Frame::from_bytes(bytes)?)
    }

    fn send_start_signal(&mut self) -> Result<(), DecodeError<P::Error>> {
        self.pin
            .set_direction(Direction::Output)
            .map_err(DecodeError::Pin)?;
        self.pin.set_level(Level::Low).map_err(DecodeError::Pin)?;
        self.pin.delay_us(START_LOW_US);
        self.pin.set_level(Level::High).map_err(DecodeError::Pin)?;
        self.pin.delay_us(START_HIGH_US);
        self.pin
            .set_direction(Direction::Input)
            .map_err(DecodeError::Pin)
    }

    fn read_response(&mut self) -> Result<[u8; FRAME_LEN], DecodeError<P::Error>> {
        self.wait_while(Level::Low, ACK_TIMEOUT_TICKS, Phase::AckLow)?;
        self.wait_while(Level::High, ACK_TIMEOUT_TICKS, Phase::AckHigh)?;

        let mut bytes = [0u8; FRAME_LEN];
        for bit in 0..FRAME_BITS {
            self.wait_while(Level::Low, BIT_SYNC_TIMEOUT_TICKS, Phase::BitSync { bit })?;
            let ticks =
                self.wait_while(Level::High, BIT_HIGH_TIMEOUT_TICKS, Phase::BitHigh { bit })?;

            let byte = &mut bytes[usize::from(bit / 8)];
            *byte <<= 1;
            if ticks > ONE_THRESHOLD_TICKS {
                *byte |= 1;
            }
        }

        Ok(bytes)
    }

    /// Polls once per tick while the line holds `level`; returns the number of
    /// ticks spent.
    fn wait_while(
        &mut self,
        level: Level,
        max_ticks: u32,
        phase: Phase,
    ) -> Result<u32, DecodeError<P::Error>> {
        let mut ticks = 0;
        while self.pin.level().map_err(DecodeError::Pin)? == level {
            self.pin.delay_us(1);
            ticks += 1;
            if ticks > max_ticks {
                return Err(DecodeError::Timeout { phase });
            }
        }

        Ok(ticks)
    }
}

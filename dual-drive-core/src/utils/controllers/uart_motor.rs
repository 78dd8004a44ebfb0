//! Serial motor board link.
//!
//! The board listens on the UART wired to `P15`/`P13` at 9600 baud and takes fixed
//! 6-byte frames `[0x7F, a, b, c, d, 0x7E]`. Each payload byte is a signed percent
//! in two's complement. The board expects -100..=100 but nothing is clamped here.

use embedded_io::Write;

pub const FRAME_START: u8 = 0x7F;
pub const FRAME_END: u8 = 0x7E;
pub const FRAME_LEN: usize = 6;

/// Speed commands understood by the motor board, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartMotorCommand {
    /// Two-wheel drive; each side is sent to both of its outputs.
    Dual { left: i8, right: i8 },
    /// Four independent outputs.
    Quad { m1: i8, m2: i8, m3: i8, m4: i8 },
}

impl UartMotorCommand {
    /// Frame the command for the wire.
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let [a, b, c, d] = match *self {
            UartMotorCommand::Dual { left, right } => [left, right, left, right],
            UartMotorCommand::Quad { m1, m2, m3, m4 } => [m1, m2, m3, m4],
        };
        [FRAME_START, a as u8, b as u8, c as u8, d as u8, FRAME_END]
    }
}

/// Transmit half of the motor board UART.
pub struct UartMotorLink<W> {
    tx: W,
}

impl<W: Write> UartMotorLink<W> {
    pub fn new(tx: W) -> Self {
        Self { tx }
    }

    pub fn free(self) -> W {
        self.tx
    }

    /// Write one frame and flush it.
    ///
    /// A failed write can leave a partial frame on the wire. The board discards it
    /// and resynchronizes on the next `FRAME_START`, so the caller just resends.
    pub fn send(
        &mut self,
        command: UartMotorCommand,
    ) -> Result<(), W::Error> {
        let frame = command.encode();
        tracing::trace!(?command, ?frame, "uart motor frame");
        self.tx.write_all(&frame)?;
        self.tx.flush()
    }

    pub fn dual(
        &mut self,
        left: i8,
        right: i8,
    ) -> Result<(), W::Error> {
        self.send(UartMotorCommand::Dual { left, right })
    }

    pub fn quad(
        &mut self,
        m1: i8,
        m2: i8,
        m3: i8,
        m4: i8,
    ) -> Result<(), W::Error> {
        self.send(UartMotorCommand::Quad { m1, m2, m3, m4 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_repeats_each_side() {
        let frame = UartMotorCommand::Dual { left: 50, right: 20 }.encode();
        assert_eq!(frame, [0x7F, 50, 20, 50, 20, 0x7E]);
    }

    #[test]
    fn negative_percent_is_twos_complement() {
        let frame = UartMotorCommand::Quad {
            m1: -100,
            m2: -1,
            m3: 0,
            m4: 100,
        }
        .encode();
        assert_eq!(frame, [0x7F, 0x9C, 0xFF, 0x00, 0x64, 0x7E]);
    }
}

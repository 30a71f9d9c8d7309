//! Recording I2C bus for driver tests

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use heapless::Vec;

/// One recorded write transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub address: u8,
    pub bytes: Vec<u8, 32>,
}

impl Write {
    /// RAM position of a data write
    pub fn position(&self) -> usize {
        usize::from(self.bytes[0] / 2)
    }

    /// Words of a data write
    pub fn words(&self) -> Vec<u16, 8> {
        self.bytes[1..]
            .chunks(2)
            .map(|c| u16::from_le_bytes([c[0], *c.get(1).unwrap_or(&0)]))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct MockI2c {
    writes: Vec<Write, 128>,
    /// Fail every transaction while set
    pub fail: bool,
}

impl MockI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded writes
    pub fn take(&mut self) -> Vec<Write, 128> {
        core::mem::take(&mut self.writes)
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Single-byte (command) writes, in order
    pub fn commands(&self) -> Vec<u8, 128> {
        self.writes
            .iter()
            .filter(|w| w.bytes.len() == 1)
            .map(|w| w.bytes[0])
            .collect()
    }

    /// The last full RAM image written, if any
    pub fn last_frame(&self) -> Option<Vec<u16, 8>> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.bytes.len() == 17 && w.bytes[0] == 0)
            .map(Write::words)
    }
}

impl ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let mut rec = Vec::new();
                    rec.extend_from_slice(bytes).map_err(|_| ErrorKind::Overrun)?;
                    self.writes
                        .push(Write {
                            address,
                            bytes: rec,
                        })
                        .map_err(|_| ErrorKind::Overrun)?;
                }
                Operation::Read(buf) => buf.fill(0),
            }
        }
        Ok(())
    }
}

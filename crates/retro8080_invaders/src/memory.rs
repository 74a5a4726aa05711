use std::ops::Range;

use crate::error::EmulatorError;

/// Total addressable memory size (64 KiB).
pub const MEMORY_SIZE: usize = 0x10000;

/// Flat 64 KiB address space with a write-protected program region.
///
/// Reads are total. Writes below `protected_boundary` never modify memory;
/// they come back as [`EmulatorError::ProtectedWrite`] and the caller decides
/// whether that is fatal.
pub struct Memory {
    bytes: Box<[u8]>,
    protected_boundary: u16,
}

impl Memory {
    pub fn new(protected_boundary: u16) -> Self {
        Self {
            bytes: vec![0; MEMORY_SIZE].into_boxed_slice(),
            protected_boundary,
        }
    }

    /// Copy a program image to address 0, bypassing write protection.
    ///
    /// At most `limit` bytes are loaded. A shorter image leaves the rest of the
    /// window zeroed; a longer one is truncated.
    pub fn load_image(&mut self, image: &[u8], limit: usize) {
        let limit = limit.min(MEMORY_SIZE);
        let len = image.len().min(limit);

        if image.len() < limit {
            log::warn!(
                "program image is {} bytes, zero-filling up to 0x{limit:04X}",
                image.len()
            );
        } else if image.len() > limit {
            log::warn!(
                "program image is {} bytes, truncating to 0x{limit:04X}",
                image.len()
            );
        }

        self.bytes[..len].copy_from_slice(&image[..len]);
        self.bytes[len..limit].fill(0);
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), EmulatorError> {
        if addr < self.protected_boundary {
            return Err(EmulatorError::ProtectedWrite { addr, value });
        }
        self.bytes[addr as usize] = value;
        Ok(())
    }

    /// Borrow a window of memory. The range is clamped to the address space.
    pub fn slice(&self, range: Range<usize>) -> &[u8] {
        let end = range.end.min(MEMORY_SIZE);
        let start = range.start.min(end);
        &self.bytes[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_write_is_rejected_and_ignored() {
        let mut mem = Memory::new(0x2000);
        mem.load_image(&[0xAA; 4], 0x2400);

        let err = mem.write(0x0001, 0x55).unwrap_err();
        assert!(matches!(
            err,
            EmulatorError::ProtectedWrite {
                addr: 0x0001,
                value: 0x55
            }
        ));
        assert_eq!(mem.read(0x0001), 0xAA);

        mem.write(0x2000, 0x55).unwrap();
        assert_eq!(mem.read(0x2000), 0x55);
    }

    #[test]
    fn short_image_is_zero_filled() {
        let mut mem = Memory::new(0x2000);
        mem.load_image(&[0x11; 0x2400], 0x2400);
        mem.load_image(&[0x22, 0x33], 0x2400);

        assert_eq!(mem.read(0x0000), 0x22);
        assert_eq!(mem.read(0x0001), 0x33);
        assert_eq!(mem.read(0x0002), 0x00);
        assert_eq!(mem.read(0x23FF), 0x00);
    }

    #[test]
    fn long_image_is_truncated_at_limit() {
        let mut mem = Memory::new(0x2000);
        mem.load_image(&[0x77; 0x3000], 0x2400);

        assert_eq!(mem.read(0x23FF), 0x77);
        assert_eq!(mem.read(0x2400), 0x00);
    }

    #[test]
    fn slice_clamps_to_address_space() {
        let mem = Memory::new(0);
        assert_eq!(mem.slice(0xFFF0..0x20000).len(), 0x10);
        assert!(mem.slice(0x20000..0x30000).is_empty());
    }
}

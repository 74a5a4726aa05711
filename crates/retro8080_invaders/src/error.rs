use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the emulator core.
#[derive(Debug, Error)]
pub enum EmulatorError {
    /// A write targeted the read-only program region.
    #[error("write of 0x{value:02X} to protected address 0x{addr:04X}")]
    ProtectedWrite { addr: u16, value: u8 },

    #[error("failed to read program image {}", path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

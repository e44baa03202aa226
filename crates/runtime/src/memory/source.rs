//! Process-memory access boundary.
//!
//! The reader never talks to a process directly. It asks a [`MemorySource`]
//! for byte ranges and decodes them itself, so a live process, a captured
//! dump and a synthetic test image are interchangeable.
use std::sync::Arc;

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

/// Errors raised by memory sources.
///
/// Every variant means "not readable right now". The reader turns them into
/// a detached session or a skipped record, never a panic.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("target process is not attached")]
    Detached,

    #[error("address {address:#x} (+{len} bytes) is not mapped")]
    Unmapped { address: u64, len: usize },

    #[error("address {base:#x} + {offset:#x} overflows")]
    AddressOverflow { base: u64, offset: u64 },

    #[error("memory image is malformed: {0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MemoryError>;

/// Raw byte access to the game process.
///
/// Implementations are synchronous and are only called from one session task
/// at a time.
pub trait MemorySource: Send + Sync {
    /// Base address of the game module. Offsets in the offset table are
    /// relative to it.
    fn module_base(&self) -> Result<u64>;

    /// Reads `len` bytes at `base + offset`.
    fn read_bytes(&self, base: u64, offset: u64, len: usize) -> Result<Vec<u8>>;
}

impl<T: MemorySource + ?Sized> MemorySource for Arc<T> {
    fn module_base(&self) -> Result<u64> {
        (**self).module_base()
    }

    fn read_bytes(&self, base: u64, offset: u64, len: usize) -> Result<Vec<u8>> {
        (**self).read_bytes(base, offset, len)
    }
}

impl<T: MemorySource + ?Sized> MemorySource for Box<T> {
    fn module_base(&self) -> Result<u64> {
        (**self).module_base()
    }

    fn read_bytes(&self, base: u64, offset: u64, len: usize) -> Result<Vec<u8>> {
        (**self).read_bytes(base, offset, len)
    }
}

/// Typed little-endian reads on top of [`MemorySource::read_bytes`].
pub trait MemoryReadExt: MemorySource {
    /// Reads exactly `N` bytes.
    fn read_array<const N: usize>(&self, base: u64, offset: u64) -> Result<[u8; N]> {
        let bytes = self.read_bytes(base, offset, N)?;
        bytes.try_into().map_err(|_| MemoryError::Unmapped {
            address: base.wrapping_add(offset),
            len: N,
        })
    }

    fn read_u8(&self, base: u64, offset: u64) -> Result<u8> {
        let [byte] = self.read_array::<1>(base, offset)?;
        Ok(byte)
    }

    fn read_u16(&self, base: u64, offset: u64) -> Result<u16> {
        Ok(LittleEndian::read_u16(&self.read_array::<2>(base, offset)?))
    }

    fn read_u32(&self, base: u64, offset: u64) -> Result<u32> {
        Ok(LittleEndian::read_u32(&self.read_array::<4>(base, offset)?))
    }

    fn read_u64(&self, base: u64, offset: u64) -> Result<u64> {
        Ok(LittleEndian::read_u64(&self.read_array::<8>(base, offset)?))
    }

    /// Reads a pointer and treats null as unreadable.
    fn read_ptr(&self, base: u64, offset: u64) -> Result<u64> {
        match self.read_u64(base, offset)? {
            0 => Err(MemoryError::Unmapped {
                address: 0,
                len: 8,
            }),
            ptr => Ok(ptr),
        }
    }

    /// Reads a NUL-terminated string of at most `max_len` bytes.
    fn read_c_string(&self, base: u64, offset: u64, max_len: usize) -> Result<String> {
        let bytes = self.read_bytes(base, offset, max_len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }
}

impl<T: MemorySource + ?Sized> MemoryReadExt for T {}

/// Computes `base + offset`, rejecting wrap-around.
pub(crate) fn address(base: u64, offset: u64) -> Result<u64> {
    base.checked_add(offset)
        .ok_or(MemoryError::AddressOverflow { base, offset })
}

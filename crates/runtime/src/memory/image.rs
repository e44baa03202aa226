//! Sparse in-memory process image.
//!
//! Used to assemble synthetic game memory (unit tables, stat lists, UI
//! buffers) and to write dump files that [`super::DumpMemorySource`] maps back.
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use byteorder::{LittleEndian, WriteBytesExt};

use super::dump::{DUMP_MAGIC, DUMP_VERSION};
use super::source::{MemoryError, MemorySource, Result, address};

/// Writable, sparse memory image made of independent regions.
#[derive(Debug)]
pub struct MemoryImage {
    module_base: u64,
    regions: RwLock<BTreeMap<u64, Vec<u8>>>,
    next_alloc: AtomicU64,
    attached: AtomicBool,
}

impl MemoryImage {
    /// Allocations start well above the module so they never collide with it.
    const HEAP_START: u64 = 0x7F00_0000_0000;
    const ALLOC_ALIGN: u64 = 0x10;

    pub fn new(module_base: u64) -> Self {
        Self {
            module_base,
            regions: RwLock::new(BTreeMap::new()),
            next_alloc: AtomicU64::new(Self::HEAP_START),
            attached: AtomicBool::new(true),
        }
    }

    /// Reserves a zeroed region of `len` bytes and returns its address.
    pub fn alloc(&self, len: usize) -> u64 {
        let size = (len as u64).div_ceil(Self::ALLOC_ALIGN).max(1) * Self::ALLOC_ALIGN;
        let start = self.next_alloc.fetch_add(size, Ordering::Relaxed);
        self.regions_mut().insert(start, vec![0; len]);
        start
    }

    /// Maps a zeroed region at a fixed address.
    pub fn map(&self, start: u64, len: usize) {
        self.regions_mut().insert(start, vec![0; len]);
    }

    /// Writes `bytes` at `at`. The range must lie inside one region, otherwise
    /// a new region is created for it.
    pub fn write_bytes(&self, at: u64, bytes: &[u8]) {
        let mut regions = self.regions_mut();
        if let Some((start, data)) = regions.range_mut(..=at).next_back() {
            let from = (at - *start) as usize;
            if from + bytes.len() <= data.len() {
                data[from..from + bytes.len()].copy_from_slice(bytes);
                return;
            }
        }
        regions.insert(at, bytes.to_vec());
    }

    pub fn write_u8(&self, at: u64, value: u8) {
        self.write_bytes(at, &[value]);
    }

    pub fn write_u16(&self, at: u64, value: u16) {
        self.write_bytes(at, &value.to_le_bytes());
    }

    pub fn write_u32(&self, at: u64, value: u32) {
        self.write_bytes(at, &value.to_le_bytes());
    }

    pub fn write_u64(&self, at: u64, value: u64) {
        self.write_bytes(at, &value.to_le_bytes());
    }

    /// Simulates the process going away; every read fails until reattached.
    pub fn set_attached(&self, attached: bool) {
        self.attached.store(attached, Ordering::SeqCst);
    }

    /// Serializes the image in the dump format.
    pub fn write_dump<W: Write>(&self, mut out: W) -> Result<()> {
        let regions = self.regions();
        out.write_all(DUMP_MAGIC)?;
        out.write_u32::<LittleEndian>(DUMP_VERSION)?;
        out.write_u32::<LittleEndian>(regions.len() as u32)?;
        out.write_u64::<LittleEndian>(self.module_base)?;
        for (start, data) in regions.iter() {
            out.write_u64::<LittleEndian>(*start)?;
            out.write_u64::<LittleEndian>(data.len() as u64)?;
        }
        for data in regions.values() {
            out.write_all(data)?;
        }
        out.flush()?;
        Ok(())
    }

    fn regions(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<u64, Vec<u8>>> {
        self.regions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn regions_mut(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<u64, Vec<u8>>> {
        self.regions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl MemorySource for MemoryImage {
    fn module_base(&self) -> Result<u64> {
        if !self.attached.load(Ordering::SeqCst) {
            return Err(MemoryError::Detached);
        }
        Ok(self.module_base)
    }

    fn read_bytes(&self, base: u64, offset: u64, len: usize) -> Result<Vec<u8>> {
        if !self.attached.load(Ordering::SeqCst) {
            return Err(MemoryError::Detached);
        }
        let at = address(base, offset)?;
        let regions = self.regions();
        let (start, data) = regions
            .range(..=at)
            .next_back()
            .ok_or(MemoryError::Unmapped { address: at, len })?;
        let from = (at - start) as usize;
        data.get(from..from.saturating_add(len))
            .map(<[u8]>::to_vec)
            .ok_or(MemoryError::Unmapped { address: at, len })
    }
}

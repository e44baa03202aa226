//! Memory source backed by a captured dump file.
//!
//! Dump layout (little endian):
//!
//! ```text
//! Offset  Field          Size
//! 0x00    magic          8     "GMEMDUMP"
//! 0x08    version        4
//! 0x0C    region count   4
//! 0x10    module base    8
//! 0x18    region table   16 × count   (start u64, length u64)
//! ...     region bytes   concatenated in table order
//! ```
use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use tracing::debug;

use super::source::{MemoryError, MemorySource, Result, address};

pub(crate) const DUMP_MAGIC: &[u8; 8] = b"GMEMDUMP";
pub(crate) const DUMP_VERSION: u32 = 1;
const HEADER_LEN: usize = 0x18;
const TABLE_ENTRY_LEN: usize = 16;

#[derive(Debug, Clone, Copy)]
struct Region {
    start: u64,
    len: u64,
    /// Position of the region bytes inside the mapped file.
    file_offset: usize,
}

/// Read-only memory source replaying a dump file through a memory map.
///
/// Lets the reader and the runs be exercised offline against a frozen frame
/// of a real session.
pub struct DumpMemorySource {
    mmap: Mmap,
    module_base: u64,
    regions: Vec<Region>,
    path: PathBuf,
}

impl DumpMemorySource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;

        // SAFETY: the dump is opened read-only and never written while mapped.
        let mmap = unsafe { Mmap::map(&file)? };
        let (module_base, regions) = parse_layout(&mmap)?;

        debug!(
            "Memory-mapped dump: {} ({} bytes, {} regions, module base {:#x})",
            path.display(),
            mmap.len(),
            regions.len(),
            module_base
        );

        Ok(Self {
            mmap,
            module_base,
            regions,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

impl MemorySource for DumpMemorySource {
    fn module_base(&self) -> Result<u64> {
        Ok(self.module_base)
    }

    fn read_bytes(&self, base: u64, offset: u64, len: usize) -> Result<Vec<u8>> {
        let at = address(base, offset)?;
        let unmapped = MemoryError::Unmapped { address: at, len };

        let index = self.regions.partition_point(|r| r.start <= at);
        let region = index
            .checked_sub(1)
            .and_then(|i| self.regions.get(i))
            .ok_or(unmapped)?;

        let within = at - region.start;
        if within.saturating_add(len as u64) > region.len {
            return Err(MemoryError::Unmapped { address: at, len });
        }
        let from = region.file_offset + within as usize;
        Ok(self.mmap[from..from + len].to_vec())
    }
}

fn parse_layout(bytes: &[u8]) -> Result<(u64, Vec<Region>)> {
    let malformed = |reason: &str| MemoryError::Malformed(reason.to_owned());

    if bytes.len() < HEADER_LEN || &bytes[..8] != DUMP_MAGIC {
        return Err(malformed("missing dump header"));
    }
    let version = LittleEndian::read_u32(&bytes[0x08..0x0C]);
    if version != DUMP_VERSION {
        return Err(MemoryError::Malformed(format!(
            "unsupported dump version {version}"
        )));
    }
    let count = LittleEndian::read_u32(&bytes[0x0C..0x10]) as usize;
    let module_base = LittleEndian::read_u64(&bytes[0x10..0x18]);

    let table_end = count
        .checked_mul(TABLE_ENTRY_LEN)
        .and_then(|len| len.checked_add(HEADER_LEN))
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| malformed("region table exceeds file"))?;

    let mut regions = Vec::with_capacity(count);
    let mut file_offset = table_end;
    for entry in bytes[HEADER_LEN..table_end].chunks_exact(TABLE_ENTRY_LEN) {
        let start = LittleEndian::read_u64(&entry[..8]);
        let len = LittleEndian::read_u64(&entry[8..]);
        let end = usize::try_from(len)
            .ok()
            .and_then(|len| file_offset.checked_add(len))
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| malformed("region data exceeds file"))?;
        regions.push(Region {
            start,
            len,
            file_offset,
        });
        file_offset = end;
    }
    regions.sort_by_key(|r| r.start);

    Ok((module_base, regions))
}

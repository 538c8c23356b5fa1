//! Anvil region file (`.mca`) parsing: the 4 KiB header and the per-chunk
//! prelude + compressed payload. Grounded on the shape of
//! `other_examples/…fastanvil-src-anvil-mod.rs.rs`'s `Region`/`ChunkMeta`,
//! hand-rolled rather than pulled in as a dependency (see SPEC_FULL.md §B.4).

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::{MultiGzDecoder, ZlibDecoder};

use crate::error::Error;

pub const SECTOR_SIZE: u64 = 4096;
pub const HEADER_SIZE: u64 = SECTOR_SIZE;
const REGION_SIDE: i32 = 32;
/// Cap from spec §4.1: a larger inflated payload is a fatal decode error
/// (but only for that chunk — the caller treats it as corrupt-region).
const MAX_DECOMPRESSED: usize = 1024 * 1024;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum CompressionScheme {
    Gzip,
    Zlib,
    Uncompressed,
}

impl CompressionScheme {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(CompressionScheme::Gzip),
            2 => Some(CompressionScheme::Zlib),
            3 => Some(CompressionScheme::Uncompressed),
            _ => None,
        }
    }
}

/// Parses `r.<rx>.<rz>.mca` into the region's coordinates, in region units
/// (32-chunk squares).
pub fn parse_region_filename(path: &Path) -> Option<(i32, i32)> {
    let stem = path.file_name()?.to_str()?;
    let mut parts = stem.split('.');
    if parts.next()? != "r" {
        return None;
    }
    let rx: i32 = parts.next()?.parse().ok()?;
    let rz: i32 = parts.next()?.parse().ok()?;
    if parts.next()? != "mca" {
        return None;
    }
    Some((rx, rz))
}

pub struct RegionFile {
    file: File,
    path: PathBuf,
    header: [u8; HEADER_SIZE as usize],
}

impl RegionFile {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let mut file = File::open(path)?;
        let mut header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header)?;
        Ok(RegionFile {
            file,
            path: path.to_path_buf(),
            header,
        })
    }

    /// Chunk offset in 4 KiB sectors from the header for the chunk at
    /// `(local_x, local_z)` within this region (each in `0..32`). `None`
    /// means the chunk was never generated.
    fn offset_sectors(&self, local_x: i32, local_z: i32) -> Option<u32> {
        let slot = 4 * (local_x.rem_euclid(REGION_SIDE) + local_z.rem_euclid(REGION_SIDE) * REGION_SIDE) as usize;
        let entry = &self.header[slot..slot + 4];
        let offset = ((entry[0] as u32) << 16) | ((entry[1] as u32) << 8) | entry[2] as u32;
        if offset == 0 {
            None
        } else {
            Some(offset)
        }
    }

    /// All `(local_x, local_z)` slots present in this region's header, used
    /// by region scan to discover the world's bounding chunk rectangle.
    pub fn present_chunks(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..REGION_SIDE)
            .flat_map(move |z| (0..REGION_SIDE).map(move |x| (x, z)))
            .filter(move |&(x, z)| self.offset_sectors(x, z).is_some())
    }

    /// Reads and decompresses chunk `(local_x, local_z)`'s raw NBT bytes.
    /// Returns `Ok(None)` if the chunk slot is empty. Any I/O, prelude, or
    /// inflate failure is a corrupt-region error for this chunk only.
    pub fn read_chunk(&mut self, local_x: i32, local_z: i32) -> Result<Option<Vec<u8>>, Error> {
        let Some(offset) = self.offset_sectors(local_x, local_z) else {
            return Ok(None);
        };
        let byte_offset = offset as u64 * SECTOR_SIZE;
        self.file.seek(SeekFrom::Start(byte_offset))?;

        let length = self.file.read_u32::<BigEndian>()?;
        let scheme_byte = self.file.read_u8()?;
        let Some(scheme) = CompressionScheme::from_byte(scheme_byte) else {
            tracing::warn!(region = %self.path.display(), "unknown compression scheme {scheme_byte}, skipping chunk");
            return Ok(None);
        };
        if length == 0 {
            return Ok(None);
        }
        let mut compressed = vec![0u8; length as usize - 1];
        self.file.read_exact(&mut compressed)?;

        let mut out = Vec::new();
        let bytes_read = match scheme {
            CompressionScheme::Gzip => {
                MultiGzDecoder::new(&compressed[..]).take(MAX_DECOMPRESSED as u64 + 1).read_to_end(&mut out)?
            }
            CompressionScheme::Zlib => {
                ZlibDecoder::new(&compressed[..]).take(MAX_DECOMPRESSED as u64 + 1).read_to_end(&mut out)?
            }
            CompressionScheme::Uncompressed => {
                out.extend_from_slice(&compressed);
                out.len()
            }
        };
        if bytes_read > MAX_DECOMPRESSED {
            tracing::warn!(region = %self.path.display(), x = local_x, z = local_z, "decompressed chunk exceeds 1 MiB cap, skipping");
            return Ok(None);
        }
        Ok(Some(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_region_filename() {
        assert_eq!(
            parse_region_filename(&PathBuf::from("r.-1.2.mca")),
            Some((-1, 2))
        );
        assert_eq!(parse_region_filename(&PathBuf::from("level.dat")), None);
    }
}

//! `BTDX` / `DX10` texture packed archive reader.
//!
//! Unlike the general variant, each file entry has a fixed 24-byte header
//! plus a variable number of 24-byte chunk descriptors (one per mip range),
//! so the per-file header is `binrw`-derived but the chunk vector length
//! depends on a field read from that same header (`num_chunks`) — read with
//! an explicit loop rather than a `#[br(count = ...)]` attribute, since the
//! count lives in a sibling struct already consumed by the time chunks are
//! parsed for the *next* entry in sequence.

use binrw::BinRead;

use super::{inflate, read_name_table, ContainerHeader, Error, Result};

#[derive(BinRead, Debug, Clone)]
#[br(little)]
struct FileHeader {
    _name_hash: u32,
    _extension: [u8; 4],
    _dir_hash: u32,
    _unknown: u8,
    num_chunks: u8,
    _chunk_header_size: u16,
    height: u16,
    width: u16,
    num_mips: u8,
    dxgi_format: u8,
    tile_mode: u16,
}

#[derive(BinRead, Debug, Clone)]
#[br(little)]
pub struct Chunk {
    pub offset: u64,
    pub packed_size: u32,
    pub unpacked_size: u32,
    pub start_mip: u16,
    pub end_mip: u16,
    _padding: [u8; 4],
}

/// One texture entry in a DX10 packed archive, with its mip-range chunks.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub height: u16,
    pub width: u16,
    pub num_mips: u8,
    pub dxgi_format: u8,
    pub tile_mode: u16,
    pub chunks: Vec<Chunk>,
}

/// Reader for the `DX10` variant of a `BTDX` packed archive.
pub struct Reader {
    data: Vec<u8>,
    entries: Vec<Entry>,
}

impl Reader {
    pub fn open(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut cursor = std::io::Cursor::new(&data);
        let header = ContainerHeader::read(&mut cursor).map_err(|e| match e {
            binrw::Error::BadMagic { .. } => Error::BadMagic,
            other => Error::Binrw(other),
        })?;
        if &header.archive_type != b"DX10" {
            return Err(Error::WrongVariant {
                expected: "DX10",
                found: String::from_utf8_lossy(&header.archive_type).into_owned(),
            });
        }

        let mut raw_entries = Vec::with_capacity(header.file_count as usize);
        for _ in 0..header.file_count {
            let file_header = FileHeader::read(&mut cursor)?;
            let mut chunks = Vec::with_capacity(file_header.num_chunks as usize);
            for _ in 0..file_header.num_chunks {
                chunks.push(Chunk::read(&mut cursor)?);
            }
            raw_entries.push((file_header, chunks));
        }

        let names = read_name_table(&data, header.name_table_offset, header.file_count)?;
        let entries = raw_entries
            .into_iter()
            .zip(names)
            .map(|((fh, chunks), name)| Entry {
                name: name.to_lowercase(),
                height: fh.height,
                width: fh.width,
                num_mips: fh.num_mips,
                dxgi_format: fh.dxgi_format,
                tile_mode: fh.tile_mode,
                chunks,
            })
            .collect();

        Ok(Self { data, entries })
    }

    pub fn list_entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn find_by_path(&self, path: &str) -> Option<&Entry> {
        let needle = super::normalize(path).to_lowercase();
        self.entries.iter().find(|e| e.name == needle)
    }

    pub fn find_fragment(&self, fragment: &str) -> Option<&Entry> {
        let needle = fragment.to_lowercase();
        self.entries.iter().find(|e| e.name.contains(&needle))
    }

    pub fn extract_chunk(&self, chunk: &Chunk) -> Result<Vec<u8>> {
        let start = chunk.offset as usize;
        if chunk.packed_size > 0 {
            let end = start + chunk.packed_size as usize;
            let compressed = self
                .data
                .get(start..end)
                .ok_or(Error::ShortRead { wanted: end as u64, have: self.data.len() as u64 })?;
            inflate(compressed, chunk.unpacked_size)
        } else {
            let end = start + chunk.unpacked_size as usize;
            self.data
                .get(start..end)
                .map(|s| s.to_vec())
                .ok_or(Error::ShortRead { wanted: end as u64, have: self.data.len() as u64 })
        }
    }

    pub fn extract_all_chunks(&self, entry: &Entry) -> Result<Vec<Vec<u8>>> {
        entry.chunks.iter().map(|c| self.extract_chunk(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_archive(name: &str, payload: &[u8]) -> Vec<u8> {
        let header_len = 24u64;
        let file_header_len = 24u64;
        let chunk_len = 24u64;
        let name_table_offset = header_len + file_header_len + chunk_len + payload.len() as u64;

        let mut out = Vec::new();
        out.extend_from_slice(b"BTDX");
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(b"DX10");
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&name_table_offset.to_le_bytes());

        // FileHeader
        out.extend_from_slice(&0u32.to_le_bytes()); // name_hash
        out.extend_from_slice(b"\0\0\0\0"); // extension
        out.extend_from_slice(&0u32.to_le_bytes()); // dir_hash
        out.push(0); // unknown
        out.push(1); // num_chunks
        out.extend_from_slice(&24u16.to_le_bytes()); // chunk_header_size
        out.extend_from_slice(&512u16.to_le_bytes()); // height
        out.extend_from_slice(&512u16.to_le_bytes()); // width
        out.push(9); // num_mips
        out.push(71); // dxgi_format (BC7_UNORM)
        out.extend_from_slice(&0u16.to_le_bytes()); // tile_mode

        // Chunk
        out.extend_from_slice(&(header_len + file_header_len).to_le_bytes()); // offset
        out.extend_from_slice(&0u32.to_le_bytes()); // packed_size = 0 (stored)
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes()); // unpacked_size
        out.extend_from_slice(&0u16.to_le_bytes()); // start_mip
        out.extend_from_slice(&8u16.to_le_bytes()); // end_mip
        out.extend_from_slice(&[0u8; 4]); // padding

        out.extend_from_slice(payload);

        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(name.as_bytes());

        out
    }

    #[test]
    fn parses_texture_entry_and_extracts_chunk() {
        let raw = build_archive("textures/armor/diffuse.dds", b"dds-bytes");
        let reader = Reader::from_bytes(raw).unwrap();
        assert_eq!(reader.list_entries().len(), 1);
        let entry = reader.find_by_path("Textures/Armor/Diffuse.DDS").unwrap();
        assert_eq!(entry.height, 512);
        assert_eq!(entry.chunks.len(), 1);
        assert_eq!(reader.extract_chunk(&entry.chunks[0]).unwrap(), b"dds-bytes");
    }

    #[test]
    fn wrong_variant_is_rejected() {
        let mut raw = build_archive("a.dds", b"x");
        raw[8..12].copy_from_slice(b"GNRL");
        assert!(matches!(Reader::from_bytes(raw), Err(Error::WrongVariant { .. })));
    }
}

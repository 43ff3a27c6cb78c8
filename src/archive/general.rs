//! `BTDX` / `GNRL` general-purpose packed archive reader.

use binrw::BinRead;

use super::{inflate, read_name_table, ContainerHeader, Error, Result};

#[derive(BinRead, Debug, Clone)]
#[br(little)]
struct DirEntry {
    name_hash: u32,
    _extension: [u8; 4],
    dir_hash: u32,
    _unknown: u32,
    data_offset: u64,
    packed_size: u32,
    unpacked_size: u32,
    _sentinel: [u8; 4],
}

/// One file entry in a general-purpose packed archive.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub name_hash: u32,
    pub dir_hash: u32,
    pub data_offset: u64,
    pub packed_size: u32,
    pub unpacked_size: u32,
}

/// Reader for the `GNRL` variant of a `BTDX` packed archive.
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
        if &header.archive_type != b"GNRL" {
            return Err(Error::WrongVariant {
                expected: "GNRL",
                found: String::from_utf8_lossy(&header.archive_type).into_owned(),
            });
        }

        let mut dir_entries = Vec::with_capacity(header.file_count as usize);
        for _ in 0..header.file_count {
            let entry = DirEntry::read(&mut cursor)?;
            dir_entries.push(entry);
        }

        let names = read_name_table(&data, header.name_table_offset, header.file_count)?;
        let entries = dir_entries
            .into_iter()
            .zip(names)
            .map(|(d, name)| Entry {
                name,
                name_hash: d.name_hash,
                dir_hash: d.dir_hash,
                data_offset: d.data_offset,
                packed_size: d.packed_size,
                unpacked_size: d.unpacked_size,
            })
            .collect();

        Ok(Self { data, entries })
    }

    pub fn list_entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn find_by_path(&self, path: &str) -> Option<&Entry> {
        let needle = super::normalize(path).to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name.to_lowercase() == needle)
    }

    pub fn find_fragment(&self, fragment: &str) -> Option<&Entry> {
        let needle = fragment.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name.to_lowercase().contains(&needle))
    }

    pub fn extract(&self, entry: &Entry) -> Result<Vec<u8>> {
        let start = entry.data_offset as usize;
        if entry.packed_size > 0 {
            let end = start + entry.packed_size as usize;
            let compressed = self
                .data
                .get(start..end)
                .ok_or(Error::ShortRead { wanted: end as u64, have: self.data.len() as u64 })?;
            inflate(compressed, entry.unpacked_size)
        } else {
            let end = start + entry.unpacked_size as usize;
            self.data
                .get(start..end)
                .map(|s| s.to_vec())
                .ok_or(Error::ShortRead { wanted: end as u64, have: self.data.len() as u64 })
        }
    }
}

//! Packed-archive (`.ba2`) readers.
//!
//! Two container variants share a 24-byte header and a trailing name table;
//! `general` handles the `GNRL` blob variant, `texture` handles the `DX10`
//! per-chunk-mip texture variant. Both inflate their payloads with the same
//! zlib framing rule: `packed_size > 0` means zlib-compressed, otherwise the
//! file is stored raw.

pub mod general;
pub mod texture;

use binrw::BinRead;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("bad magic: expected BTDX")]
    BadMagic,
    #[error("wrong archive variant: expected {expected}, found {found}")]
    WrongVariant { expected: &'static str, found: String },
    #[error("short read: wanted {wanted} bytes, archive has {have}")]
    ShortRead { wanted: u64, have: u64 },
    #[error("zlib inflate failed: {0}")]
    InflateFailed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Binrw(#[from] binrw::Error),
}

type Result<T> = std::result::Result<T, Error>;

#[derive(BinRead, Debug, Clone)]
#[br(little, magic = b"BTDX")]
pub(crate) struct ContainerHeader {
    pub version: u32,
    pub archive_type: [u8; 4],
    pub file_count: u32,
    pub name_table_offset: u64,
}

pub(crate) fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

pub(crate) fn read_name_table(data: &[u8], offset: u64, file_count: u32) -> Result<Vec<String>> {
    let mut names = Vec::with_capacity(file_count as usize);
    let mut pos = offset as usize;
    for _ in 0..file_count {
        let (name, consumed) = crate::primitives::read_pstr16(data, pos)
            .map_err(|_| Error::ShortRead { wanted: pos as u64, have: data.len() as u64 })?;
        names.push(normalize(&name));
        pos += consumed;
    }
    Ok(names)
}

pub(crate) fn inflate(compressed: &[u8], unpacked_size: u32) -> Result<Vec<u8>> {
    use flate2::read::ZlibDecoder;
    use std::io::Read;
    let mut decoder = ZlibDecoder::new(compressed);
    let mut out = Vec::with_capacity(unpacked_size as usize);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| Error::InflateFailed(e.to_string()))?;
    Ok(out)
}

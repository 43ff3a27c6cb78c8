//! Bounds-checked little-endian reads over a borrowed byte slice.
//!
//! Every subrecord and header in the master archive and the packed archives
//! is little-endian. Offsets into a subrecord's payload are type-dependent
//! (see `esm::decode`), so reads here are plain bounds-checked functions
//! rather than a fixed-layout derive: there is no single struct shape to
//! hang a derive macro off of.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("buffer truncated: need {need} bytes at offset {offset}, have {len}")]
    TruncatedBuffer {
        offset: usize,
        need: usize,
        len: usize,
    },
}

type Result<T> = std::result::Result<T, Error>;

fn check(buf: &[u8], offset: usize, need: usize) -> Result<()> {
    if offset.checked_add(need).map_or(true, |end| end > buf.len()) {
        return Err(Error::TruncatedBuffer {
            offset,
            need,
            len: buf.len(),
        });
    }
    Ok(())
}

pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8> {
    check(buf, offset, 1)?;
    Ok(buf[offset])
}

pub fn read_u16le(buf: &[u8], offset: usize) -> Result<u16> {
    check(buf, offset, 2)?;
    Ok(u16::from_le_bytes(buf[offset..offset + 2].try_into().unwrap()))
}

pub fn read_u32le(buf: &[u8], offset: usize) -> Result<u32> {
    check(buf, offset, 4)?;
    Ok(u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap()))
}

pub fn read_i32le(buf: &[u8], offset: usize) -> Result<i32> {
    check(buf, offset, 4)?;
    Ok(i32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap()))
}

pub fn read_u64le(buf: &[u8], offset: usize) -> Result<u64> {
    check(buf, offset, 8)?;
    Ok(u64::from_le_bytes(buf[offset..offset + 8].try_into().unwrap()))
}

pub fn read_f32le(buf: &[u8], offset: usize) -> Result<f32> {
    check(buf, offset, 4)?;
    Ok(f32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap()))
}

/// Read a null-terminated string starting at `offset`. Stops at the first
/// NUL or at the end of the buffer; never fails (`DecodeUtf8` is replaced
/// with U+FFFD rather than raised as an error).
pub fn read_cstr(buf: &[u8], offset: usize) -> String {
    if offset >= buf.len() {
        return String::new();
    }
    let end = buf[offset..]
        .iter()
        .position(|&b| b == 0)
        .map(|p| offset + p)
        .unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[offset..end]).into_owned()
}

/// Read a u16-length-prefixed string (used by BA2 name tables).
pub fn read_pstr16(buf: &[u8], offset: usize) -> Result<(String, usize)> {
    let len = read_u16le(buf, offset)? as usize;
    check(buf, offset + 2, len)?;
    let bytes = &buf[offset + 2..offset + 2 + len];
    Ok((String::from_utf8_lossy(bytes).into_owned(), 2 + len))
}

/// Read a u32-length-prefixed string (used by `.dlstrings`/`.ilstrings`),
/// with trailing NULs stripped.
pub fn read_pstr32(buf: &[u8], offset: usize) -> Result<(String, usize)> {
    let len = read_u32le(buf, offset)? as usize;
    check(buf, offset + 4, len)?;
    let mut bytes = &buf[offset + 4..offset + 4 + len];
    while let Some((&0, rest)) = bytes.split_last() {
        bytes = rest;
    }
    Ok((String::from_utf8_lossy(bytes).into_owned(), 4 + len))
}

/// Decode a subrecord-style byte payload as an array of little-endian u32
/// form-id references. Any trailing bytes that don't make a full u32 are
/// ignored.
pub fn read_u32_array(buf: &[u8]) -> Vec<u32> {
    buf.chunks_exact(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_bounds() {
        let buf = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x3f];
        assert_eq!(read_u8(&buf, 0).unwrap(), 1);
        assert_eq!(read_u16le(&buf, 0).unwrap(), 1);
        assert_eq!(read_u32le(&buf, 2).unwrap(), 2);
        assert_eq!(read_f32le(&buf, 6).unwrap(), 1.0);
    }

    #[test]
    fn truncated_read_is_an_error_not_a_panic() {
        let buf = [0u8; 3];
        assert!(read_u32le(&buf, 0).is_err());
        assert!(read_u32le(&buf, 1).is_err());
        assert_eq!(read_u8(&buf, 2).unwrap(), 0);
        assert!(read_u8(&buf, 3).is_err());
    }

    #[test]
    fn cstr_stops_at_nul() {
        let buf = b"hello\0world";
        assert_eq!(read_cstr(buf, 0), "hello");
        assert_eq!(read_cstr(buf, 6), "world");
    }

    #[test]
    fn cstr_without_nul_reads_to_end() {
        let buf = b"nonul";
        assert_eq!(read_cstr(buf, 0), "nonul");
    }

    #[test]
    fn pstr16_round_trips() {
        let mut buf = vec![3, 0];
        buf.extend_from_slice(b"abc");
        let (s, consumed) = read_pstr16(&buf, 0).unwrap();
        assert_eq!(s, "abc");
        assert_eq!(consumed, 5);
    }

    #[test]
    fn pstr32_strips_trailing_nuls() {
        let mut buf = 6u32.to_le_bytes().to_vec();
        buf.extend_from_slice(b"abc\0\0\0");
        let (s, consumed) = read_pstr32(&buf, 0).unwrap();
        assert_eq!(s, "abc");
        assert_eq!(consumed, 10);
    }

    #[test]
    fn u32_array_ignores_trailing_partial_word() {
        let mut buf = 1u32.to_le_bytes().to_vec();
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.push(0xff);
        assert_eq!(read_u32_array(&buf), vec![1, 2]);
    }
}

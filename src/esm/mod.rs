//! Master archive (`.esm`) parsing: group/record/subrecord tree walk,
//! typed field decoding, and the enum tables the decoders rely on.

pub mod decode;
pub mod enums;
pub mod reader;
pub mod record;

pub use record::{Record, Subrecord};
pub use reader::EsmReader;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("not a valid ESM file: expected TES4 at offset 0")]
    NotAnEsm,
    #[error("zlib inflate failed: {0}")]
    InflateFailed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Binrw(#[from] binrw::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

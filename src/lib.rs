//! # `fo76mine`
//!
//! Offline datamining pipeline for the SeventySix master archive: parse the
//! `.esm` record file and its `.ba2` string archive, decode typed fields out
//! of the records that matter for datamining, persist the result as a
//! versioned snapshot in SQLite, and diff snapshots against each other to
//! surface what a game update changed.
//!
//! ## Architecture
//!
//! The pipeline is a straight line through five modules:
//! * [`primitives`] does bounds-checked little-endian reads over a byte slice.
//! * [`archive`] reads the `.ba2` packed-archive container (`GNRL` and `DX10`
//!   variants).
//! * [`strings`] loads the localized string tables out of a `.ba2`.
//! * [`esm`] walks the `.esm` group/record/subrecord tree and decodes the
//!   record types this crate cares about into named fields.
//! * [`store`] persists parsed records, decoded fields, and strings as a
//!   snapshot in SQLite; [`diff`] compares two snapshots.
//!
//! [`driver`] wires all of the above into the one operation the CLI exposes:
//! parse an ESM + BA2 pair into a new snapshot.

pub mod archive;
pub mod diff;
pub mod driver;
pub mod esm;
pub mod primitives;
pub mod store;
pub mod strings;

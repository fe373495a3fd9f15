#![forbid(unsafe_code)]

//! blkif shared-ring slot codec.
//!
//! A blkif ring is a fixed-size shared-memory array of equal-sized slots; the
//! frontend marshals requests into free slots and the backend overwrites them
//! with responses. This crate is the slot codec only: producer/consumer
//! indices, event notification, and grant mapping live with the ring owner.
//! Grant references are carried as opaque `u32`s throughout.
//!
//! The hypervisor ABI defines two header layouts that differ solely through
//! compiler-inserted padding, so every field offset is spelled out here
//! rather than derived from a native `repr(C)` struct. All integers are
//! little-endian.
//!
//! ```text
//! direct request, x86_64 layout (20-byte header on x86_32: no pad word):
//!
//! 0       1       2        4        8            16           24
//! +-------+-------+--------+--------+------------+------------+---------------+
//! | op u8 | nr u8 | handle | pad u32| id u64     | sector u64 | 11 x segment  |
//! +-------+-------+--------+--------+------------+------------+---------------+
//!
//! indirect request, x86_64 layout (24-byte header on x86_32: no pad1):
//!
//! 0       1        2       4        8            16           24       26
//! +-------+--------+-------+--------+------------+------------+--------+------+
//! | op=6  | ind_op | nr u16| pad1   | id u64     | sector u64 | handle | pad2 |
//! +-------+--------+-------+--------+------------+------------+--------+------+
//! | up to 8 grant refs (u32 each)                                             |
//! +---------------------------------------------------------------------------+
//!
//! segment (8 bytes, identical under both layouts):
//!
//! 0                4         5        6
//! +----------------+---------+--------+---------+
//! | gref u32       | first   | last   | pad u16 |
//! +----------------+---------+--------+---------+
//! ```
//!
//! Unknown op/status tags never fail a decode: they surface as `None` so a
//! malformed peer cannot crash the local decoder. Bounds and shape
//! violations do fail, with [`SlotError`].

mod error;
mod protocol;
mod request;
mod response;
mod segment;

pub use error::SlotError;
pub use protocol::{Abi, Protocol};
pub use request::{Op, Request, Segments, OP_NONE};
pub use response::{Response, Status, RESPONSE_SIZE, STATUS_NONE};
pub use segment::{Segment, SEGMENT_SIZE};

/// Segments a direct request carries in-line. The fixed slot footprint
/// reserves exactly this many 8-byte records after the header.
pub const SEGMENTS_PER_REQUEST: usize = 11;

/// Segments held by one page named from an indirect request's payload.
pub const SEGMENTS_PER_INDIRECT_PAGE: usize = 512;

/// Grant references an indirect request's payload may carry.
pub const MAX_INDIRECT_PAGES: usize = 8;

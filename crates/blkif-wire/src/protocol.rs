use core::fmt;

use crate::segment::SEGMENT_SIZE;
use crate::SEGMENTS_PER_REQUEST;

/// Wire protocol a frontend announces through the control namespace.
///
/// Both endpoints must agree on this before any slot is written; the remote
/// end may impose either width regardless of the local word size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// 64-bit header layout, announced as `x86_64-abi`.
    X86_64,
    /// 32-bit header layout, announced as `x86_32-abi`.
    X86_32,
    /// The layout this code was compiled for, announced as `native`.
    Native,
}

impl Protocol {
    pub const fn as_str(self) -> &'static str {
        match self {
            Protocol::X86_64 => "x86_64-abi",
            Protocol::X86_32 => "x86_32-abi",
            Protocol::Native => "native",
        }
    }

    /// Parse the announced protocol string. Unknown strings are `None`.
    pub fn parse(s: &str) -> Option<Protocol> {
        match s {
            "x86_64-abi" => Some(Protocol::X86_64),
            "x86_32-abi" => Some(Protocol::X86_32),
            "native" => Some(Protocol::Native),
            _ => None,
        }
    }

    /// The concrete slot layout this protocol selects.
    pub const fn abi(self) -> Abi {
        match self {
            Protocol::X86_64 => Abi::X86_64,
            Protocol::X86_32 => Abi::X86_32,
            Protocol::Native => Abi::NATIVE,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete header layout. The 64-bit variant inserts one 4-byte pad word
/// into each request header; segments and responses are width-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abi {
    X86_32,
    X86_64,
}

impl Abi {
    /// Layout used when a peer negotiates `native`.
    #[cfg(target_pointer_width = "32")]
    pub const NATIVE: Abi = Abi::X86_32;
    /// Layout used when a peer negotiates `native`.
    #[cfg(not(target_pointer_width = "32"))]
    pub const NATIVE: Abi = Abi::X86_64;

    /// Direct request header length: `{op u8, nr_segs u8, handle u16,
    /// (pad u32,) id u64, sector u64}`.
    pub const fn direct_header_len(self) -> usize {
        match self {
            Abi::X86_32 => 20,
            Abi::X86_64 => 24,
        }
    }

    /// Indirect request header length: `{op u8, indirect_op u8, nr_segs u16,
    /// (pad1 u32,) id u64, sector u64, handle u16, pad2 u16}`.
    pub const fn indirect_header_len(self) -> usize {
        match self {
            Abi::X86_32 => 24,
            Abi::X86_64 => 28,
        }
    }

    /// Fixed per-slot footprint: the direct header plus its 11 in-line
    /// segments. Indirect payloads (at most 32 bytes of grant refs behind a
    /// larger header) fit inside the same footprint.
    pub const fn slot_len(self) -> usize {
        self.direct_header_len() + SEGMENTS_PER_REQUEST * SEGMENT_SIZE
    }

    /// Offset of the `id` field in either request header; everything after
    /// the per-width pad word lands here.
    pub(crate) const fn id_offset(self) -> usize {
        match self {
            Abi::X86_32 => 4,
            Abi::X86_64 => 8,
        }
    }
}

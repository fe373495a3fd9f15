//! Device-level enumerations carried through the control namespace.

use core::fmt;

use crate::error::KvError;
use crate::kv;

/// Bit set in the packed `info` word when the device is read-only.
const INFO_RDONLY: u32 = 0x4;
/// Bit set in the packed `info` word when the media is a CD-ROM.
const INFO_CDROM: u32 = 0x1;

/// Access mode of the exported device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ReadOnly,
    ReadWrite,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::ReadOnly => "r",
            Mode::ReadWrite => "w",
        }
    }

    pub fn parse(s: &str) -> Option<Mode> {
        match s {
            "r" => Some(Mode::ReadOnly),
            "w" => Some(Mode::ReadWrite),
            _ => None,
        }
    }

    /// Contribution to the packed `info` word (bit 2).
    pub const fn to_bits(self) -> u32 {
        match self {
            Mode::ReadOnly => INFO_RDONLY,
            Mode::ReadWrite => 0,
        }
    }

    /// Bit test; total over all integers.
    pub const fn from_bits(bits: u32) -> Mode {
        if bits & INFO_RDONLY != 0 {
            Mode::ReadOnly
        } else {
            Mode::ReadWrite
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media class of the exported device, published as `device-type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Media {
    Cdrom,
    Disk,
}

impl Media {
    pub const fn as_str(self) -> &'static str {
        match self {
            Media::Cdrom => "cdrom",
            Media::Disk => "disk",
        }
    }

    pub fn parse(s: &str) -> Option<Media> {
        match s {
            "cdrom" => Some(Media::Cdrom),
            "disk" => Some(Media::Disk),
            _ => None,
        }
    }

    /// Contribution to the packed `info` word (bit 0).
    pub const fn to_bits(self) -> u32 {
        match self {
            Media::Cdrom => INFO_CDROM,
            Media::Disk => 0,
        }
    }

    /// Bit test; total over all integers.
    pub const fn from_bits(bits: u32) -> Media {
        if bits & INFO_CDROM != 0 {
            Media::Cdrom
        } else {
            Media::Disk
        }
    }
}

impl fmt::Display for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state each endpoint publishes under its `state` key,
/// transported as the decimal string of the code.
///
/// The lifecycle runs Initialising → InitWait → Initialised → Connected →
/// Closing → Closed; this codec moves states, and driving the transitions
/// is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum State {
    Initialising = 1,
    InitWait = 2,
    Initialised = 3,
    Connected = 4,
    Closing = 5,
    Closed = 6,
}

impl State {
    pub const fn to_code(self) -> u32 {
        self as u32
    }

    pub const fn from_code(code: u32) -> Option<State> {
        match code {
            1 => Some(State::Initialising),
            2 => Some(State::InitWait),
            3 => Some(State::Initialised),
            4 => Some(State::Connected),
            5 => Some(State::Closing),
            6 => Some(State::Closed),
            _ => None,
        }
    }

    /// Decode a `state` attribute value. Unlike the other enumerations an
    /// unknown state is an error, not an absent value.
    pub fn parse(s: &str) -> Result<State, KvError> {
        let code = kv::parse_int(s)?;
        State::from_code(code).ok_or(KvError::UnknownState { code })
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_code())
    }
}

//! Per-endpoint negotiation records and their attribute codecs.

use blkif_wire::Protocol;

use crate::device::{Media, Mode};
use crate::error::KvError;
use crate::kv;

// Attribute key names. The exact ASCII strings are normative.
pub const KEY_SECTOR_SIZE: &str = "sector-size";
pub const KEY_SECTORS: &str = "sectors";
pub const KEY_INFO: &str = "info";
pub const KEY_RING_REF: &str = "ring-ref";
pub const KEY_EVENT_CHANNEL: &str = "event-channel";
pub const KEY_PROTOCOL: &str = "protocol";
pub const KEY_FEATURE_MAX_INDIRECT_SEGMENTS: &str = "feature-max-indirect-segments";
pub const KEY_HOTPLUG_STATUS: &str = "hotplug-status";

/// Advertisement of indirect-segment support.
///
/// Zero means "not advertised": the record encodes to no attributes at all,
/// and a missing key decodes back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureIndirect {
    pub max_indirect_segments: u32,
}

impl FeatureIndirect {
    pub fn to_attrs(&self) -> Vec<(String, String)> {
        if self.max_indirect_segments == 0 {
            return Vec::new();
        }
        vec![(
            KEY_FEATURE_MAX_INDIRECT_SEGMENTS.to_owned(),
            self.max_indirect_segments.to_string(),
        )]
    }

    pub fn from_attrs(attrs: &[(String, String)]) -> Result<FeatureIndirect, KvError> {
        let max_indirect_segments = match kv::find(attrs, KEY_FEATURE_MAX_INDIRECT_SEGMENTS) {
            Some(raw) => kv::parse_int(raw)?,
            None => 0,
        };
        Ok(FeatureIndirect {
            max_indirect_segments,
        })
    }
}

/// Geometry and access class the backend advertises once its disk is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskInfo {
    pub sector_size: u32,
    pub sectors: u64,
    pub media: Media,
    pub mode: Mode,
}

impl DiskInfo {
    /// The packed `info` word: media in bit 0, mode in bit 2.
    pub const fn info(&self) -> u32 {
        self.media.to_bits() | self.mode.to_bits()
    }

    pub fn to_attrs(&self) -> Vec<(String, String)> {
        vec![
            (KEY_SECTOR_SIZE.to_owned(), self.sector_size.to_string()),
            (KEY_SECTORS.to_owned(), self.sectors.to_string()),
            (KEY_INFO.to_owned(), self.info().to_string()),
        ]
    }

    pub fn from_attrs(attrs: &[(String, String)]) -> Result<DiskInfo, KvError> {
        let sector_size = kv::parse_int(kv::require(attrs, KEY_SECTOR_SIZE)?)?;
        let sectors = kv::parse_int64(kv::require(attrs, KEY_SECTORS)?)?;
        let info = kv::parse_int(kv::require(attrs, KEY_INFO)?)?;
        Ok(DiskInfo {
            sector_size,
            sectors,
            media: Media::from_bits(info),
            mode: Mode::from_bits(info),
        })
    }
}

/// Ring location and event wiring the frontend publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingInfo {
    pub ring_ref: u32,
    pub event_channel: u32,
    pub protocol: Protocol,
}

impl RingInfo {
    pub fn to_attrs(&self) -> Vec<(String, String)> {
        vec![
            (KEY_RING_REF.to_owned(), self.ring_ref.to_string()),
            (KEY_EVENT_CHANNEL.to_owned(), self.event_channel.to_string()),
            (KEY_PROTOCOL.to_owned(), self.protocol.as_str().to_owned()),
        ]
    }

    pub fn from_attrs(attrs: &[(String, String)]) -> Result<RingInfo, KvError> {
        let ring_ref = kv::parse_int32(kv::require(attrs, KEY_RING_REF)?)?;
        let event_channel = kv::parse_int(kv::require(attrs, KEY_EVENT_CHANNEL)?)?;
        let raw = kv::require(attrs, KEY_PROTOCOL)?;
        let protocol = Protocol::parse(raw).ok_or_else(|| KvError::UnknownProtocol {
            raw: raw.to_owned(),
        })?;
        Ok(RingInfo {
            ring_ref,
            event_channel,
            protocol,
        })
    }
}

/// Readiness report from the toolstack's hotplug scripts; the backend
/// waits for it before exposing the device. The value is free-form
/// ("connected" on success, an error message otherwise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotplug {
    pub hotplug_status: String,
}

impl Hotplug {
    pub fn to_attrs(&self) -> Vec<(String, String)> {
        vec![(KEY_HOTPLUG_STATUS.to_owned(), self.hotplug_status.clone())]
    }

    pub fn from_attrs(attrs: &[(String, String)]) -> Result<Hotplug, KvError> {
        Ok(Hotplug {
            hotplug_status: kv::require(attrs, KEY_HOTPLUG_STATUS)?.to_owned(),
        })
    }
}

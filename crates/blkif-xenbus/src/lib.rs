#![forbid(unsafe_code)]

//! Xenstore-side negotiation records for the blkif protocol.
//!
//! A frontend/backend pair is wired together out of band: each endpoint owns
//! a directory in a hierarchical key-value store and publishes flat string
//! attributes under it, then watches the other side's directory. This crate
//! converts the typed records of that handshake to and from attribute maps:
//!
//! - [`Connection`]: the initial tree of node writes that creates a pair
//! - [`RingInfo`], [`FeatureIndirect`]: what the frontend publishes
//! - [`DiskInfo`], [`FeatureIndirect`], [`Hotplug`]: what the backend publishes
//! - [`State`]: the lifecycle attribute both sides rewrite as they move
//! - [`FrontendInfo`], [`BackendInfo`]: one-shot decode of a peer's
//!   completed attribute set
//!
//! The store transport itself (transactions, watches) and the ring slot
//! codec (`blkif-wire`) live elsewhere; attribute maps here are plain
//! unordered `(String, String)` pairs. Decoding short-circuits on the first
//! missing key or unparsable value and never yields a partial record.

mod connection;
mod device;
mod error;
mod handshake;
mod info;
pub mod kv;

pub use blkif_wire::Protocol;
pub use connection::{Connection, NodeWrite};
pub use device::{Media, Mode, State};
pub use error::KvError;
pub use handshake::{BackendInfo, FrontendInfo, KEY_STATE};
pub use info::{
    DiskInfo, FeatureIndirect, Hotplug, RingInfo, KEY_EVENT_CHANNEL,
    KEY_FEATURE_MAX_INDIRECT_SEGMENTS, KEY_HOTPLUG_STATUS, KEY_INFO, KEY_PROTOCOL, KEY_RING_REF,
    KEY_SECTORS, KEY_SECTOR_SIZE,
};

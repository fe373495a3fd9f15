//! One-shot reconstruction of a peer's published attribute set.
//!
//! After setup each endpoint watches the other's directory until the
//! attribute set is complete, then decodes it in one pass. These aggregates
//! bundle that pass; the `online`, `params`, and `hotplug-status` keys stay
//! with the toolstack and are not folded in here.

use tracing::debug;

use crate::device::State;
use crate::error::KvError;
use crate::info::{DiskInfo, FeatureIndirect, RingInfo};
use crate::kv;

/// The lifecycle attribute, rewritten by its owner on every transition.
pub const KEY_STATE: &str = "state";

fn state_attr(state: State) -> (String, String) {
    (KEY_STATE.to_owned(), state.to_string())
}

fn state_from_attrs(attrs: &[(String, String)]) -> Result<State, KvError> {
    State::parse(kv::require(attrs, KEY_STATE)?)
}

/// Everything the frontend publishes under its own path once its ring
/// exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontendInfo {
    pub ring: RingInfo,
    pub feature_indirect: FeatureIndirect,
    pub state: State,
}

impl FrontendInfo {
    pub fn to_attrs(&self) -> Vec<(String, String)> {
        let mut attrs = self.ring.to_attrs();
        attrs.extend(self.feature_indirect.to_attrs());
        attrs.push(state_attr(self.state));
        attrs
    }

    pub fn from_attrs(attrs: &[(String, String)]) -> Result<FrontendInfo, KvError> {
        let ring = RingInfo::from_attrs(attrs)?;
        let feature_indirect = FeatureIndirect::from_attrs(attrs)?;
        let state = state_from_attrs(attrs)?;
        debug!(
            ring_ref = ring.ring_ref,
            event_channel = ring.event_channel,
            protocol = %ring.protocol,
            max_indirect_segments = feature_indirect.max_indirect_segments,
            state = %state,
            "decoded frontend attributes"
        );
        Ok(FrontendInfo {
            ring,
            feature_indirect,
            state,
        })
    }
}

/// The backend's published set: geometry plus lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendInfo {
    pub disk: DiskInfo,
    pub feature_indirect: FeatureIndirect,
    pub state: State,
}

impl BackendInfo {
    pub fn to_attrs(&self) -> Vec<(String, String)> {
        let mut attrs = self.disk.to_attrs();
        attrs.extend(self.feature_indirect.to_attrs());
        attrs.push(state_attr(self.state));
        attrs
    }

    pub fn from_attrs(attrs: &[(String, String)]) -> Result<BackendInfo, KvError> {
        let disk = DiskInfo::from_attrs(attrs)?;
        let feature_indirect = FeatureIndirect::from_attrs(attrs)?;
        let state = state_from_attrs(attrs)?;
        debug!(
            sectors = disk.sectors,
            sector_size = disk.sector_size,
            info = disk.info(),
            max_indirect_segments = feature_indirect.max_indirect_segments,
            state = %state,
            "decoded backend attributes"
        );
        Ok(BackendInfo {
            disk,
            feature_indirect,
            state,
        })
    }
}

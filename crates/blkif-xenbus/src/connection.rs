//! Initial wiring of a frontend/backend pair through the control namespace.

use crate::device::{Media, Mode, State};

/// One node the caller must create in the store, in the named domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeWrite {
    pub domid: u32,
    pub path: String,
    pub value: String,
}

/// Everything needed to wire a frontend to a backend at session setup.
///
/// The two paths are opaque to this layer; they are used verbatim as node
/// prefixes and cross-referenced from each endpoint's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub virtual_device: String,
    pub backend_path: String,
    pub backend_domid: u32,
    pub frontend_path: String,
    pub frontend_domid: u32,
    pub mode: Mode,
    pub media: Media,
    pub removable: bool,
}

impl Connection {
    /// The node writes that create this connection: two empty parents, then
    /// each endpoint's child attributes, both sides starting out
    /// Initialising. Attribute order within a node carries no meaning; the
    /// peer observes the completed set.
    pub fn initial_writes(&self) -> Vec<NodeWrite> {
        let backend = |key: &str, value: String| NodeWrite {
            domid: self.backend_domid,
            path: format!("{}/{key}", self.backend_path),
            value,
        };
        let frontend = |key: &str, value: String| NodeWrite {
            domid: self.frontend_domid,
            path: format!("{}/{key}", self.frontend_path),
            value,
        };
        let initialising = State::Initialising.to_string();

        vec![
            NodeWrite {
                domid: self.backend_domid,
                path: self.backend_path.clone(),
                value: String::new(),
            },
            NodeWrite {
                domid: self.frontend_domid,
                path: self.frontend_path.clone(),
                value: String::new(),
            },
            backend("frontend", self.frontend_path.clone()),
            backend("frontend-id", self.frontend_domid.to_string()),
            backend("online", "1".to_owned()),
            backend("removable", if self.removable { "1" } else { "0" }.to_owned()),
            backend("state", initialising.clone()),
            backend("mode", self.mode.as_str().to_owned()),
            frontend("backend", self.backend_path.clone()),
            frontend("backend-id", self.backend_domid.to_string()),
            frontend("state", initialising),
            frontend("virtual-device", self.virtual_device.clone()),
            frontend("device-type", self.media.as_str().to_owned()),
        ]
    }
}

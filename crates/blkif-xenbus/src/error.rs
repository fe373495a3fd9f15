use thiserror::Error;

/// First-failure decode error for attribute maps.
///
/// Decoders short-circuit: one error naming the first missing key or
/// unparsable value, and no partial record. The rendered messages are part
/// of the protocol surface; tooling on both sides of the store matches on
/// them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KvError {
    #[error("missing {key} key")]
    MissingKey { key: String },

    #[error("not an int: {raw}")]
    NotAnInt { raw: String },

    #[error("not an int32: {raw}")]
    NotAnInt32 { raw: String },

    #[error("not an int64: {raw}")]
    NotAnInt64 { raw: String },

    #[error("unknown protocol: {raw}")]
    UnknownProtocol { raw: String },

    #[error("unknown state: {code}")]
    UnknownState { code: u32 },
}

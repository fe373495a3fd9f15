use crate::error::{check_len, SlotError};
use crate::request::{op_to_wire, Op};

/// Response status tag, as carried in the 16-bit `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Status {
    Ok = 0,
    Error = 0xffff,
    NotSupported = 0xfffe,
}

/// Wire value written when a response carries no status. Numerically the
/// same as [`Status::Error`]; see [`Response`] for how the collision reads
/// back.
pub const STATUS_NONE: u16 = 0xffff;

/// Bytes of a response record actually read and written. The 64-bit slot
/// rounds up to 16 with a trailing pad the codec never touches, so the
/// layout below holds under both ABIs.
pub const RESPONSE_SIZE: usize = 12;

impl Status {
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Unknown tags decode to `None`, never an error.
    pub const fn from_u16(tag: u16) -> Option<Status> {
        match tag {
            0 => Some(Status::Ok),
            0xffff => Some(Status::Error),
            0xfffe => Some(Status::NotSupported),
            _ => None,
        }
    }
}

/// A completion record as held in memory. The request id travels beside it
/// in the slot but identifies the request rather than describing the result,
/// so the codec passes it separately.
///
/// Writing `status: None` emits the same bytes as `Some(Error)`; reading
/// those bytes always yields `Some(Error)`. That asymmetry is inherited
/// from the wire format's choice of sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub op: Option<Op>,
    pub status: Option<Status>,
}

impl Response {
    /// Layout: `{u64 id, u8 op, u8 pad, u16 status}`.
    pub fn write(&self, id: u64, slot: &mut [u8]) -> Result<(), SlotError> {
        check_len(slot, RESPONSE_SIZE)?;
        slot[0..8].copy_from_slice(&id.to_le_bytes());
        slot[8] = op_to_wire(self.op);
        slot[9] = 0;
        let status = self.status.map_or(STATUS_NONE, Status::to_u16);
        slot[10..12].copy_from_slice(&status.to_le_bytes());
        Ok(())
    }

    pub fn read(slot: &[u8]) -> Result<(u64, Response), SlotError> {
        check_len(slot, RESPONSE_SIZE)?;
        let id = u64::from_le_bytes(slot[0..8].try_into().unwrap());
        let op = Op::from_u8(slot[8]);
        let status = Status::from_u16(u16::from_le_bytes(slot[10..12].try_into().unwrap()));
        Ok((id, Response { op, status }))
    }
}

use crate::error::{check_len, SlotError};
use crate::protocol::Abi;
use crate::segment::{Segment, SEGMENT_SIZE};
use crate::{MAX_INDIRECT_PAGES, SEGMENTS_PER_INDIRECT_PAGE, SEGMENTS_PER_REQUEST};

/// Request operation tag, as carried in the low byte of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Op {
    Read = 0,
    Write = 1,
    WriteBarrier = 2,
    Flush = 3,
    Reserved1 = 4,
    Trim = 5,
    /// Selects the indirect header layout; the semantic op moves into the
    /// header's `indirect_op` field.
    Indirect = 6,
}

/// Wire value written when a request carries no op. 0xFF is unassigned in
/// the op space, so it reads back as `None`.
pub const OP_NONE: u8 = 0xFF;

impl Op {
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Unknown tags decode to `None`, never an error.
    pub const fn from_u8(tag: u8) -> Option<Op> {
        match tag {
            0 => Some(Op::Read),
            1 => Some(Op::Write),
            2 => Some(Op::WriteBarrier),
            3 => Some(Op::Flush),
            4 => Some(Op::Reserved1),
            5 => Some(Op::Trim),
            6 => Some(Op::Indirect),
            _ => None,
        }
    }
}

pub(crate) fn op_to_wire(op: Option<Op>) -> u8 {
    op.map_or(OP_NONE, Op::to_u8)
}

/// Segment payload of a request: either in-line segment records, or grant
/// references naming pages that each hold up to 512 further segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segments {
    Direct(Vec<Segment>),
    Indirect(Vec<u32>),
}

/// A block request as held in memory.
///
/// The all-ones "no op" sentinel exists only on the wire; in memory the op
/// is an `Option` and the translation happens at the codec edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub op: Option<Op>,
    pub handle: u16,
    pub id: u64,
    pub sector: u64,
    /// Data segments the request addresses. Equals `segments.len()` for the
    /// direct form; the indirect form carries `ceil(nr_segs / 512)` grant
    /// refs instead.
    pub nr_segs: u32,
    pub segments: Segments,
}

/// Grant refs needed to carry `nr_segs` indirect segments.
fn indirect_pages(nr_segs: u32) -> usize {
    (nr_segs as usize).div_ceil(SEGMENTS_PER_INDIRECT_PAGE)
}

impl Request {
    /// Marshal into `slot` using the negotiated layout, returning the
    /// request id so callers can match the eventual completion.
    pub fn write(&self, abi: Abi, slot: &mut [u8]) -> Result<u64, SlotError> {
        match &self.segments {
            Segments::Direct(segs) => self.write_direct(abi, segs, slot)?,
            Segments::Indirect(grefs) => self.write_indirect(abi, grefs, slot)?,
        }
        Ok(self.id)
    }

    /// Unmarshal a slot committed by the peer.
    ///
    /// Dispatches on the low byte: the `Op::Indirect` tag selects the
    /// indirect header layout, anything else the direct one.
    pub fn read(abi: Abi, slot: &[u8]) -> Result<Request, SlotError> {
        let tag = *slot.first().ok_or(SlotError::SlotTooShort { len: 0, need: 1 })?;
        if tag == Op::Indirect.to_u8() {
            Self::read_indirect(abi, slot)
        } else {
            Self::read_direct(abi, slot)
        }
    }

    fn write_direct(&self, abi: Abi, segs: &[Segment], slot: &mut [u8]) -> Result<(), SlotError> {
        // An indirect tag in a direct header would make the slot decode
        // through the indirect layout.
        if self.op == Some(Op::Indirect) {
            return Err(SlotError::OpShapeMismatch);
        }
        let nr_segs = self.nr_segs as usize;
        if nr_segs > SEGMENTS_PER_REQUEST {
            return Err(SlotError::TooManySegments {
                count: nr_segs,
                max: SEGMENTS_PER_REQUEST,
            });
        }
        if segs.len() != nr_segs {
            return Err(SlotError::SegmentCountMismatch {
                expected: nr_segs,
                got: segs.len(),
            });
        }
        let hdr = abi.direct_header_len();
        check_len(slot, hdr + nr_segs * SEGMENT_SIZE)?;

        slot[0] = op_to_wire(self.op);
        slot[1] = self.nr_segs as u8;
        slot[2..4].copy_from_slice(&self.handle.to_le_bytes());
        let base = abi.id_offset();
        if let Abi::X86_64 = abi {
            slot[4..8].fill(0);
        }
        slot[base..base + 8].copy_from_slice(&self.id.to_le_bytes());
        slot[base + 8..base + 16].copy_from_slice(&self.sector.to_le_bytes());
        for (i, seg) in segs.iter().enumerate() {
            let off = hdr + i * SEGMENT_SIZE;
            seg.write(&mut slot[off..off + SEGMENT_SIZE]);
        }
        Ok(())
    }

    fn write_indirect(&self, abi: Abi, grefs: &[u32], slot: &mut [u8]) -> Result<(), SlotError> {
        if grefs.len() > MAX_INDIRECT_PAGES {
            return Err(SlotError::TooManySegments {
                count: grefs.len(),
                max: MAX_INDIRECT_PAGES,
            });
        }
        let expected = indirect_pages(self.nr_segs);
        if grefs.len() != expected {
            return Err(SlotError::SegmentCountMismatch {
                expected,
                got: grefs.len(),
            });
        }
        let hdr = abi.indirect_header_len();
        check_len(slot, hdr + grefs.len() * 4)?;

        slot[0] = Op::Indirect.to_u8();
        slot[1] = op_to_wire(self.op);
        slot[2..4].copy_from_slice(&(self.nr_segs as u16).to_le_bytes());
        let base = abi.id_offset();
        if let Abi::X86_64 = abi {
            slot[4..8].fill(0);
        }
        slot[base..base + 8].copy_from_slice(&self.id.to_le_bytes());
        slot[base + 8..base + 16].copy_from_slice(&self.sector.to_le_bytes());
        slot[base + 16..base + 18].copy_from_slice(&self.handle.to_le_bytes());
        slot[base + 18..base + 20].fill(0);
        for (i, gref) in grefs.iter().enumerate() {
            let off = hdr + i * 4;
            slot[off..off + 4].copy_from_slice(&gref.to_le_bytes());
        }
        Ok(())
    }

    fn read_direct(abi: Abi, slot: &[u8]) -> Result<Request, SlotError> {
        let hdr = abi.direct_header_len();
        check_len(slot, hdr)?;
        let nr_segs = slot[1] as usize;
        if nr_segs > SEGMENTS_PER_REQUEST {
            return Err(SlotError::TooManySegments {
                count: nr_segs,
                max: SEGMENTS_PER_REQUEST,
            });
        }
        check_len(slot, hdr + nr_segs * SEGMENT_SIZE)?;

        let base = abi.id_offset();
        let mut segs = Vec::with_capacity(nr_segs);
        for i in 0..nr_segs {
            let off = hdr + i * SEGMENT_SIZE;
            segs.push(Segment::read(&slot[off..off + SEGMENT_SIZE]));
        }
        Ok(Request {
            op: Op::from_u8(slot[0]),
            handle: u16::from_le_bytes(slot[2..4].try_into().unwrap()),
            id: u64::from_le_bytes(slot[base..base + 8].try_into().unwrap()),
            sector: u64::from_le_bytes(slot[base + 8..base + 16].try_into().unwrap()),
            nr_segs: nr_segs as u32,
            segments: Segments::Direct(segs),
        })
    }

    fn read_indirect(abi: Abi, slot: &[u8]) -> Result<Request, SlotError> {
        let hdr = abi.indirect_header_len();
        check_len(slot, hdr)?;
        let nr_segs = u32::from(u16::from_le_bytes(slot[2..4].try_into().unwrap()));
        let pages = indirect_pages(nr_segs);
        if pages > MAX_INDIRECT_PAGES {
            return Err(SlotError::TooManySegments {
                count: pages,
                max: MAX_INDIRECT_PAGES,
            });
        }
        check_len(slot, hdr + pages * 4)?;

        let base = abi.id_offset();
        let mut grefs = Vec::with_capacity(pages);
        for i in 0..pages {
            let off = hdr + i * 4;
            grefs.push(u32::from_le_bytes(slot[off..off + 4].try_into().unwrap()));
        }
        Ok(Request {
            op: Op::from_u8(slot[1]),
            handle: u16::from_le_bytes(slot[base + 16..base + 18].try_into().unwrap()),
            id: u64::from_le_bytes(slot[base..base + 8].try_into().unwrap()),
            sector: u64::from_le_bytes(slot[base + 8..base + 16].try_into().unwrap()),
            nr_segs,
            segments: Segments::Indirect(grefs),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn op_tag_roundtrip() {
        for op in [
            Op::Read,
            Op::Write,
            Op::WriteBarrier,
            Op::Flush,
            Op::Reserved1,
            Op::Trim,
            Op::Indirect,
        ] {
            assert_eq!(Op::from_u8(op.to_u8()), Some(op));
        }
        assert_eq!(Op::from_u8(OP_NONE), None);
        assert_eq!(Op::from_u8(7), None);
    }

    fn two_segment_read() -> Request {
        Request {
            op: Some(Op::Read),
            handle: 0,
            id: 42,
            sector: 1000,
            nr_segs: 2,
            segments: Segments::Direct(vec![
                Segment {
                    gref: 7,
                    first_sector: 0,
                    last_sector: 7,
                },
                Segment {
                    gref: 9,
                    first_sector: 0,
                    last_sector: 3,
                },
            ]),
        }
    }

    #[test]
    fn direct_layout_x86_64() {
        let req = two_segment_read();
        let mut slot = vec![0xaau8; Abi::X86_64.slot_len()];
        let id = req.write(Abi::X86_64, &mut slot).unwrap();
        assert_eq!(id, 42);

        assert_eq!(slot[0], 0); // Op::Read
        assert_eq!(slot[1], 2); // nr_segs
        assert_eq!(u16::from_le_bytes(slot[2..4].try_into().unwrap()), 0);
        assert_eq!(u64::from_le_bytes(slot[8..16].try_into().unwrap()), 42);
        assert_eq!(u64::from_le_bytes(slot[16..24].try_into().unwrap()), 1000);
        // Segment 0 occupies 24..32.
        assert_eq!(u32::from_le_bytes(slot[24..28].try_into().unwrap()), 7);
        assert_eq!(slot[28], 0);
        assert_eq!(slot[29], 7);
        assert_eq!(&slot[30..32], &[0, 0]);
        // Segment 1 occupies 32..40.
        assert_eq!(u32::from_le_bytes(slot[32..36].try_into().unwrap()), 9);
        assert_eq!(slot[37], 3);

        assert_eq!(Request::read(Abi::X86_64, &slot).unwrap(), req);
    }

    #[test]
    fn direct_layout_x86_32_drops_the_pad_word() {
        let req = two_segment_read();
        let mut slot = vec![0u8; Abi::X86_32.slot_len()];
        req.write(Abi::X86_32, &mut slot).unwrap();

        assert_eq!(u64::from_le_bytes(slot[4..12].try_into().unwrap()), 42);
        assert_eq!(u64::from_le_bytes(slot[12..20].try_into().unwrap()), 1000);
        assert_eq!(u32::from_le_bytes(slot[20..24].try_into().unwrap()), 7);

        assert_eq!(Request::read(Abi::X86_32, &slot).unwrap(), req);
    }

    #[test]
    fn indirect_write_frames_the_semantic_op() {
        let req = Request {
            op: Some(Op::Write),
            handle: 3,
            id: 77,
            sector: 64,
            nr_segs: 600,
            segments: Segments::Indirect(vec![11, 12]),
        };
        for abi in [Abi::X86_32, Abi::X86_64] {
            let mut slot = vec![0u8; abi.slot_len()];
            req.write(abi, &mut slot).unwrap();

            assert_eq!(slot[0], 6, "primary op byte is always Op::Indirect");
            assert_eq!(slot[1], 1, "semantic op lives in indirect_op");
            assert_eq!(u16::from_le_bytes(slot[2..4].try_into().unwrap()), 600);
            let hdr = abi.indirect_header_len();
            assert_eq!(u32::from_le_bytes(slot[hdr..hdr + 4].try_into().unwrap()), 11);
            assert_eq!(
                u32::from_le_bytes(slot[hdr + 4..hdr + 8].try_into().unwrap()),
                12
            );

            assert_eq!(Request::read(abi, &slot).unwrap(), req);
        }
    }

    #[test]
    fn indirect_handle_sits_after_sector() {
        let req = Request {
            op: Some(Op::Trim),
            handle: 0xbeef,
            id: 1,
            sector: 2,
            nr_segs: 1,
            segments: Segments::Indirect(vec![5]),
        };
        let mut slot = vec![0u8; Abi::X86_64.slot_len()];
        req.write(Abi::X86_64, &mut slot).unwrap();
        assert_eq!(u16::from_le_bytes(slot[24..26].try_into().unwrap()), 0xbeef);

        let mut slot = vec![0u8; Abi::X86_32.slot_len()];
        req.write(Abi::X86_32, &mut slot).unwrap();
        assert_eq!(u16::from_le_bytes(slot[20..22].try_into().unwrap()), 0xbeef);
    }

    #[test]
    fn absent_op_uses_the_all_ones_sentinel() {
        let req = Request {
            op: None,
            handle: 0,
            id: 5,
            sector: 0,
            nr_segs: 0,
            segments: Segments::Direct(Vec::new()),
        };
        let mut slot = vec![0u8; Abi::X86_64.slot_len()];
        req.write(Abi::X86_64, &mut slot).unwrap();
        assert_eq!(slot[0], OP_NONE);
        assert_eq!(Request::read(Abi::X86_64, &slot).unwrap().op, None);
    }

    #[test]
    fn unknown_op_tag_reads_as_absent() {
        let mut slot = vec![0u8; Abi::X86_64.slot_len()];
        slot[0] = 0x17;
        slot[1] = 0;
        let req = Request::read(Abi::X86_64, &slot).unwrap();
        assert_eq!(req.op, None);
        assert_eq!(req.segments, Segments::Direct(Vec::new()));
    }

    #[test]
    fn direct_write_rejects_bad_shapes() {
        let mut slot = vec![0u8; Abi::X86_64.slot_len()];

        let too_many = Request {
            op: Some(Op::Read),
            handle: 0,
            id: 0,
            sector: 0,
            nr_segs: 12,
            segments: Segments::Direct(vec![
                Segment {
                    gref: 0,
                    first_sector: 0,
                    last_sector: 0
                };
                12
            ]),
        };
        assert_eq!(
            too_many.write(Abi::X86_64, &mut slot),
            Err(SlotError::TooManySegments { count: 12, max: 11 })
        );

        let mismatched = Request {
            nr_segs: 2,
            segments: Segments::Direct(Vec::new()),
            ..two_segment_read()
        };
        assert_eq!(
            mismatched.write(Abi::X86_64, &mut slot),
            Err(SlotError::SegmentCountMismatch {
                expected: 2,
                got: 0
            })
        );

        let indirect_tagged = Request {
            op: Some(Op::Indirect),
            ..two_segment_read()
        };
        assert_eq!(
            indirect_tagged.write(Abi::X86_64, &mut slot),
            Err(SlotError::OpShapeMismatch)
        );
    }

    #[test]
    fn indirect_write_rejects_bad_shapes() {
        let mut slot = vec![0u8; Abi::X86_64.slot_len()];

        let too_many = Request {
            op: Some(Op::Write),
            handle: 0,
            id: 0,
            sector: 0,
            nr_segs: 4608,
            segments: Segments::Indirect(vec![0; 9]),
        };
        assert_eq!(
            too_many.write(Abi::X86_64, &mut slot),
            Err(SlotError::TooManySegments { count: 9, max: 8 })
        );

        let mismatched = Request {
            op: Some(Op::Write),
            handle: 0,
            id: 0,
            sector: 0,
            nr_segs: 600,
            segments: Segments::Indirect(vec![11]),
        };
        assert_eq!(
            mismatched.write(Abi::X86_64, &mut slot),
            Err(SlotError::SegmentCountMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn short_slots_fail_loudly() {
        let req = two_segment_read();
        let mut short = vec![0u8; 16];
        assert!(matches!(
            req.write(Abi::X86_64, &mut short),
            Err(SlotError::SlotTooShort { .. })
        ));
        assert!(matches!(
            Request::read(Abi::X86_64, &short),
            Err(SlotError::SlotTooShort { .. })
        ));
        assert_eq!(
            Request::read(Abi::X86_64, &[]),
            Err(SlotError::SlotTooShort { len: 0, need: 1 })
        );
    }

    #[test]
    fn malformed_indirect_segment_count_is_rejected_on_read() {
        let mut slot = vec![0u8; Abi::X86_64.slot_len()];
        slot[0] = 6;
        // 0xffff segments would need 128 pages; the payload holds 8.
        slot[2..4].copy_from_slice(&0xffffu16.to_le_bytes());
        assert_eq!(
            Request::read(Abi::X86_64, &slot),
            Err(SlotError::TooManySegments {
                count: 128,
                max: 8
            })
        );
    }
}

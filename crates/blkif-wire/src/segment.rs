/// Wire size of one segment record.
pub const SEGMENT_SIZE: usize = 8;

/// One granted page's worth of sectors addressed by a request.
///
/// `first_sector`/`last_sector` index 512-byte sectors within the page
/// (0..=7 on a standard page); the codec passes the values through without
/// enforcing that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub gref: u32,
    pub first_sector: u8,
    pub last_sector: u8,
}

impl Segment {
    /// Write the 8-byte wire form. The layout is identical under both ABIs.
    /// `buf` must be at least [`SEGMENT_SIZE`] bytes.
    pub fn write(&self, buf: &mut [u8]) {
        buf[0..4].copy_from_slice(&self.gref.to_le_bytes());
        buf[4] = self.first_sector;
        buf[5] = self.last_sector;
        buf[6..8].fill(0);
    }

    /// Read the 8-byte wire form. `buf` must be at least [`SEGMENT_SIZE`]
    /// bytes.
    pub fn read(buf: &[u8]) -> Segment {
        Segment {
            gref: u32::from_le_bytes(buf[0..4].try_into().unwrap()),
            first_sector: buf[4],
            last_sector: buf[5],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_layout() {
        let seg = Segment {
            gref: 0x0403_0201,
            first_sector: 2,
            last_sector: 7,
        };
        let mut buf = [0xaau8; SEGMENT_SIZE];
        seg.write(&mut buf);
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04, 2, 7, 0, 0]);
        assert_eq!(Segment::read(&buf), seg);
    }

    #[test]
    fn padding_is_ignored_on_read() {
        let buf = [9, 0, 0, 0, 0, 3, 0xff, 0xff];
        let seg = Segment::read(&buf);
        assert_eq!(seg.gref, 9);
        assert_eq!(seg.first_sector, 0);
        assert_eq!(seg.last_sector, 3);
    }
}

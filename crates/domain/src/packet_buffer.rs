//! Fixed-capacity DNS message buffer (RFC 1035 §4.1)
//!
//! A single cursor is shared by reads and writes. Reads are bounded by the
//! number of bytes actually filled, writes by the 512-byte UDP message limit.
//! Domain names are decoded with pointer-jump decompression (§4.1.4) and
//! written back uncompressed.

use crate::errors::BufferError;

/// Largest DNS message carried over UDP without EDNS(0).
pub const MAX_PACKET_SIZE: usize = 512;

/// Upper bound on compression pointers followed while decoding one name.
pub const MAX_JUMPS: usize = 5;

const MAX_LABEL_LEN: usize = 63;
const POINTER_MASK: u8 = 0b1100_0000;

pub struct PacketBuffer {
    buf: [u8; MAX_PACKET_SIZE],
    pos: usize,
    len: usize,
}

impl PacketBuffer {
    pub fn new() -> Self {
        Self {
            buf: [0u8; MAX_PACKET_SIZE],
            pos: 0,
            len: 0,
        }
    }

    /// Wraps received bytes. Anything past the UDP limit is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let len = bytes.len().min(MAX_PACKET_SIZE);
        let mut buf = [0u8; MAX_PACKET_SIZE];
        buf[..len].copy_from_slice(&bytes[..len]);
        Self { buf, pos: 0, len }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of meaningful bytes: the received length, or the furthest write.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes written so far, ready to go on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf[..self.len].to_vec()
    }

    pub fn seek(&mut self, pos: usize) -> Result<(), BufferError> {
        if pos >= MAX_PACKET_SIZE {
            return Err(BufferError::PositionOutOfBounds(pos));
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, count: usize) -> Result<(), BufferError> {
        if self.pos + count > self.len {
            return Err(BufferError::EndOfBuffer);
        }
        self.pos += count;
        Ok(())
    }

    /// Reads one byte at an absolute position without moving the cursor.
    pub fn peek_u8(&self, pos: usize) -> Result<u8, BufferError> {
        if pos >= MAX_PACKET_SIZE || pos >= self.len {
            return Err(BufferError::PositionOutOfBounds(pos));
        }
        Ok(self.buf[pos])
    }

    pub fn read_u8(&mut self) -> Result<u8, BufferError> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    pub fn read_u16(&mut self) -> Result<u16, BufferError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, BufferError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&[u8], BufferError> {
        let start = self.pos;
        self.skip(count)?;
        Ok(&self.buf[start..start + count])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), BufferError> {
        self.write_bytes(&[value])
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), BufferError> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), BufferError> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        let end = self.pos + bytes.len();
        if end > MAX_PACKET_SIZE {
            return Err(BufferError::EndOfBuffer);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        self.len = self.len.max(end);
        Ok(())
    }

    /// Overwrites a 16-bit field written earlier, e.g. a reserved RDLENGTH.
    pub fn set_u16_at(&mut self, pos: usize, value: u16) -> Result<(), BufferError> {
        if pos + 2 > self.len {
            return Err(BufferError::PositionOutOfBounds(pos));
        }
        self.buf[pos..pos + 2].copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Decodes a possibly compressed domain name into lowercase dotted form.
    ///
    /// The cursor ends up just past the name as it appears at the current
    /// position: past the terminating zero octet, or past the first
    /// compression pointer. Later pointers never move the cursor.
    ///
    /// Labels that are not UTF-8, or that contain a `.`, cannot survive a
    /// re-encode of the dotted form and are rejected with `InvalidLabel`.
    pub fn read_name(&mut self) -> Result<String, BufferError> {
        let mut cursor = self.pos;
        let mut jumped = false;
        let mut jumps = 0;
        let mut name = String::new();

        loop {
            if jumps > MAX_JUMPS {
                return Err(BufferError::JumpLimitExceeded(MAX_JUMPS));
            }

            let len = self.peek_u8(cursor)?;

            if len & POINTER_MASK == POINTER_MASK {
                let low = self.peek_u8(cursor + 1)?;
                if !jumped {
                    self.pos = cursor + 2;
                }
                cursor = (u16::from_be_bytes([len & !POINTER_MASK, low])) as usize;
                jumped = true;
                jumps += 1;
                continue;
            }

            if len & POINTER_MASK != 0 {
                return Err(BufferError::UnknownLabelFormat(len));
            }

            cursor += 1;
            if len == 0 {
                break;
            }

            let end = cursor + len as usize;
            if end > self.len {
                return Err(BufferError::EndOfBuffer);
            }
            if !name.is_empty() {
                name.push('.');
            }
            let label = std::str::from_utf8(&self.buf[cursor..end])
                .map_err(|_| BufferError::InvalidLabel(cursor - 1))?;
            if label.contains('.') {
                return Err(BufferError::InvalidLabel(cursor - 1));
            }
            name.push_str(&label.to_ascii_lowercase());
            cursor = end;
        }

        if !jumped {
            self.pos = cursor;
        }
        Ok(name)
    }

    /// Writes `name` as length-prefixed labels followed by the root label.
    /// Empty labels (a trailing dot, or the root name itself) are skipped.
    pub fn write_name(&mut self, name: &str) -> Result<(), BufferError> {
        for label in name.split('.').filter(|label| !label.is_empty()) {
            if label.len() > MAX_LABEL_LEN {
                return Err(BufferError::LabelTooLong(label.len()));
            }
            self.write_u8(label.len() as u8)?;
            self.write_bytes(label.as_bytes())?;
        }
        self.write_u8(0)
    }
}

impl Default for PacketBuffer {
    fn default() -> Self {
        Self::new()
    }
}

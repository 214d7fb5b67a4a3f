use std::fmt;

use crate::errors::{BufferError, CodecError};
use crate::packet_buffer::PacketBuffer;

pub const HEADER_SIZE: usize = 12;

/// 4-bit RCODE. Values without a name are carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultCode {
    #[default]
    NoError,
    FormError,
    ServerFailure,
    NameError,
    NotImplemented,
    Refused,
    Other(u8),
}

impl ResultCode {
    pub fn from_u8(value: u8) -> Self {
        match value & 0x0F {
            0 => ResultCode::NoError,
            1 => ResultCode::FormError,
            2 => ResultCode::ServerFailure,
            3 => ResultCode::NameError,
            4 => ResultCode::NotImplemented,
            5 => ResultCode::Refused,
            other => ResultCode::Other(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            ResultCode::NoError => 0,
            ResultCode::FormError => 1,
            ResultCode::ServerFailure => 2,
            ResultCode::NameError => 3,
            ResultCode::NotImplemented => 4,
            ResultCode::Refused => 5,
            ResultCode::Other(value) => value & 0x0F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultCode::NoError => "NOERROR",
            ResultCode::FormError => "FORMERR",
            ResultCode::ServerFailure => "SERVFAIL",
            ResultCode::NameError => "NXDOMAIN",
            ResultCode::NotImplemented => "NOTIMP",
            ResultCode::Refused => "REFUSED",
            ResultCode::Other(_) => "RCODE",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultCode::Other(value) => write!(f, "RCODE{}", value),
            _ => write!(f, "{}", self.as_str()),
        }
    }
}

/// RFC 1035 §4.1.1 header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DnsHeader {
    pub id: u16,
    /// Inverse of the QR bit.
    pub is_query: bool,
    pub opcode: u8,
    pub authoritative_answer: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    /// Z bits, kept as received.
    pub reserved: u8,
    pub result_code: ResultCode,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl DnsHeader {
    pub fn query(id: u16, recursion_desired: bool) -> Self {
        Self {
            id,
            is_query: true,
            recursion_desired,
            question_count: 1,
            ..Default::default()
        }
    }

    /// Header-only reply used when a query cannot be answered normally.
    pub fn error_reply(id: u16, result_code: ResultCode) -> Self {
        Self {
            id,
            is_query: false,
            recursion_available: true,
            result_code,
            ..Default::default()
        }
    }

    pub fn flags(&self) -> u16 {
        ((!self.is_query as u16) << 15)
            | (((self.opcode & 0x0F) as u16) << 11)
            | ((self.authoritative_answer as u16) << 10)
            | ((self.truncated as u16) << 9)
            | ((self.recursion_desired as u16) << 8)
            | ((self.recursion_available as u16) << 7)
            | (((self.reserved & 0x07) as u16) << 4)
            | self.result_code.to_u8() as u16
    }

    fn apply_flags(&mut self, flags: u16) {
        self.is_query = flags & 0x8000 == 0;
        self.opcode = ((flags >> 11) & 0x0F) as u8;
        self.authoritative_answer = flags & 0x0400 != 0;
        self.truncated = flags & 0x0200 != 0;
        self.recursion_desired = flags & 0x0100 != 0;
        self.recursion_available = flags & 0x0080 != 0;
        self.reserved = ((flags >> 4) & 0x07) as u8;
        self.result_code = ResultCode::from_u8((flags & 0x0F) as u8);
    }

    pub fn decode(buffer: &mut PacketBuffer) -> Result<Self, CodecError> {
        let available = buffer.len().saturating_sub(buffer.position());
        if available < HEADER_SIZE {
            return Err(CodecError::InvalidHeaderSize(available));
        }
        Self::read(buffer).map_err(|_| CodecError::InvalidHeaderSize(available))
    }

    fn read(buffer: &mut PacketBuffer) -> Result<Self, BufferError> {
        let mut header = DnsHeader {
            id: buffer.read_u16()?,
            ..Default::default()
        };
        header.apply_flags(buffer.read_u16()?);
        header.question_count = buffer.read_u16()?;
        header.answer_count = buffer.read_u16()?;
        header.authority_count = buffer.read_u16()?;
        header.additional_count = buffer.read_u16()?;
        Ok(header)
    }

    pub fn encode(&self, buffer: &mut PacketBuffer) -> Result<(), BufferError> {
        buffer.write_u16(self.id)?;
        buffer.write_u16(self.flags())?;
        buffer.write_u16(self.question_count)?;
        buffer.write_u16(self.answer_count)?;
        buffer.write_u16(self.authority_count)?;
        buffer.write_u16(self.additional_count)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut buffer = PacketBuffer::new();
        self.encode(&mut buffer).map_err(CodecError::Encode)?;
        Ok(buffer.into_vec())
    }
}

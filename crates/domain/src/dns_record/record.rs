use std::net::{Ipv4Addr, Ipv6Addr};

use super::QueryType;
use crate::errors::{BufferError, CodecError};
use crate::packet_buffer::PacketBuffer;

pub const CLASS_IN: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaData {
    pub mname: String,
    pub rname: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Ns(String),
    Cname(String),
    Mx { priority: u16, exchange: String },
    Soa(SoaData),
    Ptr(String),
}

impl RecordData {
    pub fn query_type(&self) -> QueryType {
        match self {
            RecordData::A(_) => QueryType::A,
            RecordData::Aaaa(_) => QueryType::AAAA,
            RecordData::Ns(_) => QueryType::NS,
            RecordData::Cname(_) => QueryType::CNAME,
            RecordData::Mx { .. } => QueryType::MX,
            RecordData::Soa(_) => QueryType::SOA,
            RecordData::Ptr(_) => QueryType::PTR,
        }
    }
}

/// A resource record. RDLENGTH is not stored; it is derived when encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub class: u16,
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(name: impl Into<String>, ttl: u32, data: RecordData) -> Self {
        Self {
            name: name.into(),
            class: CLASS_IN,
            ttl,
            data,
        }
    }

    pub fn query_type(&self) -> QueryType {
        self.data.query_type()
    }

    pub fn as_ipv4(&self) -> Option<Ipv4Addr> {
        match self.data {
            RecordData::A(addr) => Some(addr),
            _ => None,
        }
    }

    /// Target of an NS record.
    pub fn ns_host(&self) -> Option<&str> {
        match &self.data {
            RecordData::Ns(host) => Some(host),
            _ => None,
        }
    }

    pub fn decode(buffer: &mut PacketBuffer) -> Result<Self, CodecError> {
        let malformed = |e: BufferError| CodecError::ResourceRecordMalformed(e.to_string());

        let name = buffer.read_name().map_err(malformed)?;
        let qtype = QueryType::from_u16(buffer.read_u16().map_err(malformed)?);
        let class = buffer.read_u16().map_err(malformed)?;
        let ttl = buffer.read_u32().map_err(malformed)?;
        let rdlength = buffer.read_u16().map_err(malformed)? as usize;
        let rdata_start = buffer.position();

        let data = match qtype {
            QueryType::A => {
                let octets: [u8; 4] = read_exact(buffer, rdlength)?;
                RecordData::A(Ipv4Addr::from(octets))
            }
            QueryType::AAAA => {
                let octets: [u8; 16] = read_exact(buffer, rdlength)?;
                RecordData::Aaaa(Ipv6Addr::from(octets))
            }
            QueryType::NS => RecordData::Ns(buffer.read_name().map_err(malformed)?),
            QueryType::CNAME => RecordData::Cname(buffer.read_name().map_err(malformed)?),
            QueryType::PTR => RecordData::Ptr(buffer.read_name().map_err(malformed)?),
            QueryType::MX => RecordData::Mx {
                priority: buffer.read_u16().map_err(malformed)?,
                exchange: buffer.read_name().map_err(malformed)?,
            },
            QueryType::SOA => RecordData::Soa(SoaData {
                mname: buffer.read_name().map_err(malformed)?,
                rname: buffer.read_name().map_err(malformed)?,
                serial: buffer.read_u32().map_err(malformed)?,
                refresh: buffer.read_u32().map_err(malformed)?,
                retry: buffer.read_u32().map_err(malformed)?,
                expire: buffer.read_u32().map_err(malformed)?,
                minimum: buffer.read_u32().map_err(malformed)?,
            }),
            QueryType::Unknown(code) => return Err(CodecError::QueryTypeUnsupported(code)),
        };

        // RDLENGTH is authoritative for where the next record starts.
        let rdata_end = rdata_start + rdlength;
        if rdata_end > buffer.len() {
            return Err(malformed(BufferError::EndOfBuffer));
        }
        let position = buffer.position();
        if rdata_end > position {
            buffer.skip(rdata_end - position).map_err(malformed)?;
        } else if rdata_end < position {
            buffer.seek(rdata_end).map_err(malformed)?;
        }

        Ok(Self {
            name,
            class,
            ttl,
            data,
        })
    }

    pub fn encode(&self, buffer: &mut PacketBuffer) -> Result<(), BufferError> {
        buffer.write_name(&self.name)?;
        buffer.write_u16(self.query_type().to_u16())?;
        buffer.write_u16(self.class)?;
        buffer.write_u32(self.ttl)?;

        let length_pos = buffer.position();
        buffer.write_u16(0)?;

        match &self.data {
            RecordData::A(addr) => buffer.write_bytes(&addr.octets())?,
            RecordData::Aaaa(addr) => buffer.write_bytes(&addr.octets())?,
            RecordData::Ns(host) | RecordData::Cname(host) | RecordData::Ptr(host) => {
                buffer.write_name(host)?
            }
            RecordData::Mx { priority, exchange } => {
                buffer.write_u16(*priority)?;
                buffer.write_name(exchange)?;
            }
            RecordData::Soa(soa) => {
                buffer.write_name(&soa.mname)?;
                buffer.write_name(&soa.rname)?;
                buffer.write_u32(soa.serial)?;
                buffer.write_u32(soa.refresh)?;
                buffer.write_u32(soa.retry)?;
                buffer.write_u32(soa.expire)?;
                buffer.write_u32(soa.minimum)?;
            }
        }

        let rdlength = buffer.position() - length_pos - 2;
        buffer.set_u16_at(length_pos, rdlength as u16)
    }
}

fn read_exact<const N: usize>(
    buffer: &mut PacketBuffer,
    rdlength: usize,
) -> Result<[u8; N], CodecError> {
    if rdlength != N {
        return Err(CodecError::ResourceRecordMalformed(format!(
            "expected {} bytes of address data, found {}",
            N, rdlength
        )));
    }
    let mut out = [0u8; N];
    out.copy_from_slice(
        buffer
            .read_bytes(N)
            .map_err(|e| CodecError::ResourceRecordMalformed(e.to_string()))?,
    );
    Ok(out)
}

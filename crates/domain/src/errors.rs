use thiserror::Error;

use crate::dns_header::ResultCode;

/// Failures of the fixed-capacity wire buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("End of buffer")]
    EndOfBuffer,

    #[error("Position {0} is outside the buffer")]
    PositionOutOfBounds(usize),

    #[error("Name compression exceeded {0} pointer jumps")]
    JumpLimitExceeded(usize),

    #[error("Label of {0} bytes exceeds 63")]
    LabelTooLong(usize),

    #[error("Unknown label format: {0:#04x}")]
    UnknownLabelFormat(u8),

    /// Label bytes that cannot be carried in a dotted text name.
    #[error("Label at offset {0} is not UTF-8 or contains a '.'")]
    InvalidLabel(usize),
}

/// Failures while turning wire bytes into messages or back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid header size: {0} bytes")]
    InvalidHeaderSize(usize),

    #[error("Suspicious name in question: {0}")]
    SuspiciousName(BufferError),

    #[error("Malformed question: {0}")]
    QuestionMalformed(BufferError),

    #[error("Unsupported query type: {0}")]
    QueryTypeUnsupported(u16),

    #[error("Malformed resource record: {0}")]
    ResourceRecordMalformed(String),

    #[error("Message carries no question")]
    MissingQuestion,

    #[error("Failed to encode message: {0}")]
    Encode(BufferError),
}

impl CodecError {
    pub fn result_code(&self) -> ResultCode {
        match self {
            CodecError::QueryTypeUnsupported(_) => ResultCode::NotImplemented,
            CodecError::Encode(_) => ResultCode::ServerFailure,
            _ => ResultCode::FormError,
        }
    }

    /// Payloads that must not be answered at all.
    pub fn is_drop(&self) -> bool {
        matches!(
            self,
            CodecError::InvalidHeaderSize(_) | CodecError::SuspiciousName(_)
        )
    }
}

/// Structural problems with an incoming query, found before resolution.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryViolation {
    #[error("Message is a response, not a query")]
    NotAQuery,

    #[error("Unsupported opcode {0}")]
    UnsupportedOpcode(u8),

    #[error("Query marked authoritative")]
    Authoritative,

    #[error("Query marked truncated")]
    Truncated,

    #[error("Expected exactly one question, found {0}")]
    QuestionCount(u16),

    #[error("Query carries {0} answer records")]
    AnswerRecords(u16),

    #[error("Query carries {0} authority records")]
    AuthorityRecords(u16),

    #[error("Query carries {0} additional records")]
    AdditionalRecords(u16),
}

impl QueryViolation {
    pub fn result_code(&self) -> ResultCode {
        match self {
            QueryViolation::UnsupportedOpcode(_) | QueryViolation::Truncated => {
                ResultCode::NotImplemented
            }
            _ => ResultCode::FormError,
        }
    }
}

/// Resolver-stage failures.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Query to {server} timed out")]
    TransportTimeout { server: String },

    #[error("I/O error talking to {server}: {message}")]
    TransportIo { server: String, message: String },

    #[error("Server {server} failed after {attempts} attempts")]
    ServerFailure { server: String, attempts: u32 },

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Delegation limit of {0} lookups exceeded")]
    DelegationLimitExceeded(u32),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Invalid DoH response: {0}")]
    InvalidDohResponse(String),
}

impl DomainError {
    pub fn result_code(&self) -> ResultCode {
        match self {
            DomainError::Codec(e) => e.result_code(),
            _ => ResultCode::ServerFailure,
        }
    }

    /// Timeouts and socket errors are worth another attempt; anything else is not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. } | DomainError::TransportIo { .. }
        )
    }
}

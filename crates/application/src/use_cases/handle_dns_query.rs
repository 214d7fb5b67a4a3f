use crate::ports::DnsResolver;
use ferrous_resolver_domain::{
    CodecError, DnsHeader, DnsQuery, DnsQuestion, DnsResponse, PacketBuffer, ResultCode,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Terminal result of a stage that cannot forward its value.
#[derive(Debug)]
enum PipelineOutcome {
    Reply(Vec<u8>),
    /// Nothing is sent back.
    Drop,
}

type Stage<T> = Result<T, PipelineOutcome>;

/// Turns one client datagram into at most one reply datagram:
/// decode header, validate, decode question, resolve, encode.
pub struct HandleDnsQueryUseCase {
    resolver: Arc<dyn DnsResolver>,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self { resolver }
    }

    pub async fn execute(&self, datagram: &[u8]) -> Option<Vec<u8>> {
        match self.run(datagram).await {
            Ok(reply) | Err(PipelineOutcome::Reply(reply)) => Some(reply),
            Err(PipelineOutcome::Drop) => None,
        }
    }

    async fn run(&self, datagram: &[u8]) -> Stage<Vec<u8>> {
        let mut buffer = PacketBuffer::from_bytes(datagram);

        let header = decode_header(&mut buffer)?;
        validate(&header)?;
        let question = decode_question(&mut buffer, &header)?;
        let query = DnsQuery { header, question };

        let response = self.resolve(&query).await?;
        encode(&query, finalize(&query, response))
    }

    async fn resolve(&self, query: &DnsQuery) -> Stage<DnsResponse> {
        debug!(id = query.id(), question = %query.question, "Resolving query");

        self.resolver.resolve(query).await.map_err(|e| {
            let code = e.result_code();
            warn!(
                error = %e,
                question = %query.question,
                rcode = %code,
                "Resolution failed"
            );
            reply_with(&DnsResponse::error(query, code))
        })
    }
}

fn decode_header(buffer: &mut PacketBuffer) -> Stage<DnsHeader> {
    DnsHeader::decode(buffer).map_err(|e| {
        debug!(error = %e, "Dropping datagram without a usable header");
        PipelineOutcome::Drop
    })
}

fn validate(header: &DnsHeader) -> Stage<()> {
    DnsQuery::validate(header).map_err(|violation| {
        debug!(id = header.id, reason = %violation, "Rejecting query");
        header_only_reply(header, violation.result_code())
    })
}

fn decode_question(buffer: &mut PacketBuffer, header: &DnsHeader) -> Stage<DnsQuestion> {
    DnsQuestion::decode(buffer).map_err(|e| match e {
        CodecError::SuspiciousName(_) => {
            warn!(id = header.id, error = %e, "Dropping suspicious query");
            PipelineOutcome::Drop
        }
        other => {
            debug!(id = header.id, error = %other, "Malformed question");
            header_only_reply(header, other.result_code())
        }
    })
}

/// Rewrites the upstream reply so it answers the client's query.
fn finalize(query: &DnsQuery, mut response: DnsResponse) -> DnsResponse {
    response.header.id = query.id();
    response.header.is_query = false;
    response.header.opcode = 0;
    response.header.recursion_desired = query.header.recursion_desired;
    response.header.recursion_available = true;
    response.question = query.question.clone();
    response
}

fn encode(query: &DnsQuery, response: DnsResponse) -> Stage<Vec<u8>> {
    response.to_bytes().map_err(|e| {
        warn!(error = %e, question = %query.question, "Failed to encode reply");
        reply_with(&DnsResponse::error(query, ResultCode::ServerFailure))
    })
}

fn header_only_reply(request: &DnsHeader, code: ResultCode) -> PipelineOutcome {
    let mut header = DnsHeader::error_reply(request.id, code);
    header.recursion_desired = request.recursion_desired;
    match header.to_bytes() {
        Ok(bytes) => PipelineOutcome::Reply(bytes),
        Err(_) => PipelineOutcome::Drop,
    }
}

fn reply_with(response: &DnsResponse) -> PipelineOutcome {
    match response.to_bytes() {
        Ok(bytes) => PipelineOutcome::Reply(bytes),
        Err(_) => PipelineOutcome::Drop,
    }
}

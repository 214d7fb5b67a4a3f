//! DNS-over-HTTPS JSON resolver
//!
//! Queries a resolver's JSON API and maps the body onto a [`DnsResponse`]:
//!
//! ```text
//! GET /dns-query?name=example.com&type=1 HTTP/2
//! Accept: application/dns-json
//! ```
//!
//! ```json
//! {"Status":0,"TC":false,"RD":true,"RA":true,
//!  "Answer":[{"name":"example.com.","type":1,"TTL":300,"data":"93.184.216.34"}]}
//! ```

use async_trait::async_trait;
use ferrous_resolver_application::ports::DnsResolver;
use ferrous_resolver_domain::{
    DnsHeader, DnsQuery, DnsResponse, DomainError, QueryType, RecordData, ResourceRecord,
    ResultCode, SoaData,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const CLOUDFLARE_DOH_URL: &str = "https://1.1.1.1/dns-query";

const DNS_JSON_CONTENT_TYPE: &str = "application/dns-json";

#[derive(Debug, Deserialize)]
pub struct DohJsonResponse {
    #[serde(rename = "Status")]
    pub status: u8,

    #[serde(rename = "TC", default)]
    pub truncated: bool,

    #[serde(rename = "RA", default = "default_true")]
    pub recursion_available: bool,

    #[serde(rename = "Answer", default)]
    pub answer: Vec<DohJsonRecord>,

    #[serde(rename = "Authority", default)]
    pub authority: Vec<DohJsonRecord>,
}

#[derive(Debug, Deserialize)]
pub struct DohJsonRecord {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: u16,

    #[serde(rename = "TTL", default)]
    pub ttl: u32,

    pub data: String,
}

fn default_true() -> bool {
    true
}

pub struct DohJsonResolver {
    client: reqwest::Client,
    url: String,
}

impl DohJsonResolver {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn cloudflare(timeout: Duration) -> Self {
        Self::new(CLOUDFLARE_DOH_URL, timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request(&self, query: &DnsQuery) -> reqwest::RequestBuilder {
        let qtype = query.question.qtype.to_u16().to_string();
        self.client
            .get(&self.url)
            .query(&[("name", query.name()), ("type", qtype.as_str())])
            .header(reqwest::header::ACCEPT, DNS_JSON_CONTENT_TYPE)
    }
}

#[async_trait]
impl DnsResolver for DohJsonResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError> {
        debug!(url = %self.url, question = %query.question, "Sending DoH JSON query");

        let response = self
            .request(query)
            .send()
            .await
            .map_err(|e| DomainError::Upstream(format!("DoH request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(DomainError::Upstream(format!(
                "DoH server {} returned HTTP {}",
                self.url, status
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            DomainError::Upstream(format!("Failed to read DoH response body: {}", e))
        })?;

        let parsed: DohJsonResponse = serde_json::from_slice(&body)
            .map_err(|e| DomainError::InvalidDohResponse(e.to_string()))?;

        map_response(query, parsed)
    }
}

/// Builds a response to `query` from a DoH JSON body.
pub fn map_response(query: &DnsQuery, body: DohJsonResponse) -> Result<DnsResponse, DomainError> {
    let header = DnsHeader {
        id: query.id(),
        is_query: false,
        truncated: body.truncated,
        recursion_desired: query.header.recursion_desired,
        recursion_available: body.recursion_available,
        result_code: ResultCode::from_u8(body.status),
        ..Default::default()
    };

    Ok(DnsResponse {
        header,
        question: query.question.clone(),
        answers: map_records(query, body.answer)?,
        authorities: map_records(query, body.authority)?,
        additionals: Vec::new(),
    })
}

fn map_records(
    query: &DnsQuery,
    records: Vec<DohJsonRecord>,
) -> Result<Vec<ResourceRecord>, DomainError> {
    let mut mapped = Vec::with_capacity(records.len());
    for record in records {
        let qtype = QueryType::from_u16(record.record_type);
        if !qtype.is_supported() {
            debug!(record_type = record.record_type, "Skipping unsupported DoH record");
            continue;
        }

        let name = match normalize_name(&record.name) {
            name if name.is_empty() => query.name().to_string(),
            name => name,
        };
        let data = parse_data(qtype, &record.data).ok_or_else(|| {
            DomainError::InvalidDohResponse(format!(
                "Unparseable {} data: {:?}",
                qtype, record.data
            ))
        })?;

        mapped.push(ResourceRecord::new(name, record.ttl, data));
    }
    Ok(mapped)
}

fn parse_data(qtype: QueryType, data: &str) -> Option<RecordData> {
    let mut fields = data.split_whitespace();
    let parsed = match qtype {
        QueryType::A => RecordData::A(data.trim().parse().ok()?),
        QueryType::AAAA => RecordData::Aaaa(data.trim().parse().ok()?),
        QueryType::NS => RecordData::Ns(normalize_name(data)),
        QueryType::CNAME => RecordData::Cname(normalize_name(data)),
        QueryType::PTR => RecordData::Ptr(normalize_name(data)),
        QueryType::MX => RecordData::Mx {
            priority: fields.next()?.parse().ok()?,
            exchange: normalize_name(fields.next()?),
        },
        QueryType::SOA => RecordData::Soa(SoaData {
            mname: normalize_name(fields.next()?),
            rname: normalize_name(fields.next()?),
            serial: fields.next()?.parse().ok()?,
            refresh: fields.next()?.parse().ok()?,
            retry: fields.next()?.parse().ok()?,
            expire: fields.next()?.parse().ok()?,
            minimum: fields.next()?.parse().ok()?,
        }),
        QueryType::Unknown(_) => return None,
    };
    Some(parsed)
}

fn normalize_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

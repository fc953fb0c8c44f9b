//! DNS message construction and parsing
//!
//! Uses `hickory-proto` for the wire format; query and answer handling is
//! ours.

use crate::error::ResolveError;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{Name, RData, RecordType};
use std::net::IpAddr;

/// Record types asked for every lookup, in result order
pub const LOOKUP_TYPES: [RecordType; 2] = [RecordType::A, RecordType::AAAA];

/// Parse a hostname into a fully-qualified DNS name
pub fn parse_name(host: &str) -> Result<Name, ResolveError> {
    let fqdn = if host.ends_with('.') {
        host.to_string()
    } else {
        format!("{}.", host)
    };
    Name::from_ascii(&fqdn).map_err(|e| ResolveError::InvalidName(host.to_string(), e.to_string()))
}

/// Encode a recursive query for `name`, returning its id and wire bytes
pub fn build_query(name: &Name, rtype: RecordType) -> Result<(u16, Vec<u8>), ResolveError> {
    let id: u16 = rand::random();

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(name.clone(), rtype));

    let bytes = message
        .to_vec()
        .map_err(|e| ResolveError::Encode(e.to_string()))?;
    Ok((id, bytes))
}

/// Decode a response to query `id` and collect its A/AAAA answers
///
/// NXDOMAIN yields an empty list; other error codes are failures. A reply
/// with the TC bit set is rejected as [`ResolveError::Truncated`].
pub fn parse_response(id: u16, bytes: &[u8]) -> Result<Vec<IpAddr>, ResolveError> {
    let message = Message::from_vec(bytes).map_err(|e| ResolveError::Encode(e.to_string()))?;

    if message.id() != id {
        return Err(ResolveError::Encode(format!(
            "response id {} does not match query id {}",
            message.id(),
            id
        )));
    }
    if message.message_type() != MessageType::Response {
        return Err(ResolveError::Encode("expected a response message".to_string()));
    }
    if message.truncated() {
        return Err(ResolveError::Truncated);
    }

    match message.response_code() {
        ResponseCode::NoError => {}
        ResponseCode::NXDomain => return Ok(Vec::new()),
        code => return Err(ResolveError::ServerFailure(code)),
    }

    let addrs = message
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            Some(RData::A(a)) => Some(IpAddr::V4(a.0)),
            Some(RData::AAAA(aaaa)) => Some(IpAddr::V6(aaaa.0)),
            _ => None,
        })
        .collect();

    Ok(addrs)
}

/// Deduplicate the collected answers, failing when nothing usable came back
pub fn collect_addresses(host: &str, answers: Vec<IpAddr>) -> Result<Vec<IpAddr>, ResolveError> {
    let mut addrs: Vec<IpAddr> = Vec::with_capacity(answers.len());
    for addr in answers {
        if !addrs.contains(&addr) {
            addrs.push(addr);
        }
    }

    if addrs.is_empty() {
        return Err(ResolveError::NoAddresses(host.to_string()));
    }
    Ok(addrs)
}

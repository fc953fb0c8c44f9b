//! Test utilities and mocks for mproxy
//!
//! This module provides common test utilities used across integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{RData, Record, RecordType};
use mproxy::dns::Resolve;
use mproxy::error::ResolveError;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivatePkcs8KeyDer};
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;

/// Create a test TCP listener on an available port
pub async fn create_test_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// An address on localhost with nothing listening
pub async fn closed_port() -> SocketAddr {
    let (listener, addr) = create_test_listener().await;
    drop(listener);
    addr
}

/// Remote server that hands every accepted stream to `handler`
///
/// Returns the listen address and a counter of accepted connections.
pub async fn spawn_remote<F, Fut>(handler: F) -> (SocketAddr, Arc<AtomicUsize>)
where
    F: Fn(TcpStream) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let (listener, addr) = create_test_listener().await;
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let handler = handler.clone();
            tokio::spawn(async move { handler(stream).await });
        }
    });

    (addr, accepted)
}

/// Resolver returning a fixed answer
pub struct StaticResolver(pub Vec<IpAddr>);

#[async_trait]
impl Resolve for StaticResolver {
    async fn resolve(&self, _host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        Ok(self.0.clone())
    }
}

/// Resolver that always fails
pub struct FailingResolver;

#[async_trait]
impl Resolve for FailingResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        Err(ResolveError::NoAddresses(host.to_string()))
    }
}

/// Plaintext DNS server answering every name with `answers`, except
/// names listed in `nxdomain`
pub async fn spawn_dns_server(
    answers: Vec<IpAddr>,
    nxdomain: Vec<&'static str>,
) -> (SocketAddr, Arc<AtomicUsize>) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    let queries = Arc::new(AtomicUsize::new(0));
    let counter = queries.clone();

    tokio::spawn(async move {
        let mut buf = vec![0u8; 4096];
        while let Ok((n, peer)) = socket.recv_from(&mut buf).await {
            counter.fetch_add(1, Ordering::SeqCst);
            let request = match Message::from_vec(&buf[..n]) {
                Ok(request) => request,
                Err(_) => continue,
            };
            let reply = dns_response(&request, &answers, &nxdomain);
            let _ = socket.send_to(&reply, peer).await;
        }
    });

    (addr, queries)
}

/// Name server that truncates every UDP reply and answers in full over TCP
/// on the same port
///
/// Returns the server address and a counter of queries received over TCP.
pub async fn spawn_truncating_dns_server(
    answers: Vec<IpAddr>,
) -> (SocketAddr, Arc<AtomicUsize>) {
    let (listener, addr) = create_test_listener().await;
    let socket = UdpSocket::bind(addr).await.unwrap();
    let tcp_queries = Arc::new(AtomicUsize::new(0));
    let counter = tcp_queries.clone();

    tokio::spawn(async move {
        let mut buf = vec![0u8; 512];
        while let Ok((n, peer)) = socket.recv_from(&mut buf).await {
            let request = match Message::from_vec(&buf[..n]) {
                Ok(request) => request,
                Err(_) => continue,
            };
            let mut reply = Message::from_vec(&dns_response(&request, &[], &[])).unwrap();
            reply.set_truncated(true);
            let _ = socket.send_to(&reply.to_vec().unwrap(), peer).await;
        }
    });

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let answers = answers.clone();
            let counter = counter.clone();
            tokio::spawn(serve_framed(stream, answers, counter));
        }
    });

    (addr, tcp_queries)
}

/// Self-signed certificate for `localhost` with its PKCS#8 key
pub fn self_signed_cert() -> (CertificateDer<'static>, PrivatePkcs8KeyDer<'static>) {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    (
        CertificateDer::from(certified.cert.der().to_vec()),
        PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der()),
    )
}

/// DNS-over-TLS server for `localhost` answering every name with `answers`
///
/// Returns the server address, the certificate to trust and a counter of
/// queries received.
pub async fn spawn_dot_server(
    answers: Vec<IpAddr>,
) -> (SocketAddr, CertificateDer<'static>, Arc<AtomicUsize>) {
    let (cert, key) = self_signed_cert();
    let provider = Arc::new(tokio_rustls::rustls::crypto::ring::default_provider());
    let server_config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(vec![cert.clone()], key.into())
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(server_config));

    let (listener, addr) = create_test_listener().await;
    let queries = Arc::new(AtomicUsize::new(0));
    let counter = queries.clone();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            let answers = answers.clone();
            let counter = counter.clone();
            tokio::spawn(async move {
                if let Ok(tls_stream) = acceptor.accept(stream).await {
                    serve_framed(tls_stream, answers, counter).await;
                }
            });
        }
    });

    (addr, cert, queries)
}

/// Answer length-prefixed queries on one stream until the client hangs up
async fn serve_framed<S>(mut stream: S, answers: Vec<IpAddr>, counter: Arc<AtomicUsize>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Ok(len) = stream.read_u16().await {
        let mut buf = vec![0u8; len as usize];
        if stream.read_exact(&mut buf).await.is_err() {
            return;
        }
        counter.fetch_add(1, Ordering::SeqCst);
        let request = match Message::from_vec(&buf) {
            Ok(request) => request,
            Err(_) => return,
        };
        let reply = dns_response(&request, &answers, &[]);
        if stream.write_u16(reply.len() as u16).await.is_err()
            || stream.write_all(&reply).await.is_err()
            || stream.flush().await.is_err()
        {
            return;
        }
    }
}

fn dns_response(request: &Message, answers: &[IpAddr], nxdomain: &[&str]) -> Vec<u8> {
    let query = &request.queries()[0];
    let name = query.name().clone();
    let host = name.to_ascii();
    let host = host.trim_end_matches('.');

    let mut response = Message::new();
    response
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .set_recursion_available(true);
    response.add_queries(request.queries().to_vec());

    if nxdomain.contains(&host) {
        response.set_response_code(ResponseCode::NXDomain);
        return response.to_vec().unwrap();
    }

    response.set_response_code(ResponseCode::NoError);
    for ip in answers {
        let rdata = match (ip, query.query_type()) {
            (IpAddr::V4(v4), RecordType::A) => RData::A(A(*v4)),
            (IpAddr::V6(v6), RecordType::AAAA) => RData::AAAA(AAAA(*v6)),
            _ => continue,
        };
        response.add_answer(Record::from_rdata(name.clone(), 60, rdata));
    }
    response.to_vec().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_test_listener() {
        let (listener, addr) = create_test_listener().await;
        assert!(addr.port() > 0);
        drop(listener);
    }

    #[tokio::test]
    async fn test_closed_port_refuses() {
        let addr = closed_port().await;
        assert!(TcpStream::connect(addr).await.is_err());
    }
}

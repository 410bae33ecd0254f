use sieve_dns_application::ports::BlocklistPort;
use sieve_dns_application::use_cases::HandleDnsQueryUseCase;
use sieve_dns_domain::{ListScope, Message, Question, RData, RecordType, ResponseCode};
use sieve_dns_infrastructure::dns::{
    AllowlistService, BlocklistService, DnsCache, DnsMetrics, ResolverBuilder, UdpDnsServer,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

mod helpers;
use helpers::MockDnsClient;

struct RunningServer {
    addr: SocketAddr,
    metrics: Arc<DnsMetrics>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

async fn start_server(blocklist: Arc<BlocklistService>) -> RunningServer {
    let metrics = Arc::new(DnsMetrics::new());
    let upstream = MockDnsClient::new(Ipv4Addr::new(192, 0, 2, 20), 60);
    let resolver = ResolverBuilder::new(Arc::new(upstream))
        .with_cache(Arc::new(DnsCache::default()))
        .with_lists(blocklist, Arc::new(AllowlistService::new()))
        .with_metrics(metrics.clone())
        .build();
    let handler = Arc::new(HandleDnsQueryUseCase::new(resolver));

    let server = UdpDnsServer::bind("127.0.0.1:0".parse().unwrap(), handler)
        .await
        .unwrap()
        .with_metrics(metrics.clone());
    let addr = server.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(server.run(shutdown.clone()));

    RunningServer {
        addr,
        metrics,
        shutdown,
        task,
    }
}

async fn exchange(server: SocketAddr, datagram: &[u8]) -> Option<Vec<u8>> {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket.send_to(datagram, server).await.unwrap();
    let mut buf = [0u8; 512];
    match tokio::time::timeout(Duration::from_millis(500), socket.recv_from(&mut buf)).await {
        Ok(Ok((len, _))) => Some(buf[..len].to_vec()),
        _ => None,
    }
}

fn query(id: u16, name: &str) -> Vec<u8> {
    Message::query(id, Question::internet(name, RecordType::A).unwrap())
        .encode()
        .unwrap()
}

#[tokio::test]
async fn test_server_answers_forwarded_query() {
    let server = start_server(Arc::new(BlocklistService::new())).await;

    let reply = exchange(server.addr, &query(0x4242, "example.com"))
        .await
        .unwrap();
    let response = Message::decode(&reply).unwrap();

    assert_eq!(response.id(), 0x4242);
    assert!(response.header.flags.is_response());
    assert!(response.header.flags.recursion_available());
    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(
        response.answers[0].data,
        RData::A(Ipv4Addr::new(192, 0, 2, 20))
    );
    assert_eq!(server.metrics.snapshot().requests_total, 1);
}

#[tokio::test]
async fn test_server_answers_blocked_query_with_nxdomain() {
    let blocklist = Arc::new(BlocklistService::new());
    blocklist.add(ListScope::Global, "ads.example", None);
    let server = start_server(blocklist).await;

    let reply = exchange(server.addr, &query(7, "ads.example")).await.unwrap();
    let response = Message::decode(&reply).unwrap();

    assert_eq!(response.id(), 7);
    assert_eq!(response.response_code(), ResponseCode::NxDomain);
    assert!(response.answers.is_empty());
    assert_eq!(reply[2..4], [0x81, 0x83]);
}

#[tokio::test]
async fn test_server_survives_malformed_datagrams() {
    let server = start_server(Arc::new(BlocklistService::new())).await;

    assert!(exchange(server.addr, &[0x01, 0x02, 0x03]).await.is_none());

    let mut truncated = query(0x0A0B, "example.com");
    truncated.truncate(15);
    let reply = exchange(server.addr, &truncated).await.unwrap();
    assert_eq!(reply.len(), 12);
    assert_eq!(reply[0..2], [0x0A, 0x0B]);
    assert_eq!(reply[3] & 0x0F, 2);

    let reply = exchange(server.addr, &query(9, "example.com")).await.unwrap();
    assert_eq!(Message::decode(&reply).unwrap().id(), 9);
}

#[tokio::test]
async fn test_server_stops_on_shutdown() {
    let server = start_server(Arc::new(BlocklistService::new())).await;

    server.shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(2), server.task)
        .await
        .expect("server loop should exit")
        .unwrap();
}

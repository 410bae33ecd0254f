use crate::di::DnsServices;
use sieve_dns_infrastructure::dns::UdpDnsServer;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tracing::info;

pub fn create_dns_server(
    bind_addr: SocketAddr,
    services: &DnsServices,
) -> anyhow::Result<UdpDnsServer> {
    info!(bind_address = %bind_addr, "Binding DNS server socket");

    let socket = create_udp_socket(bind_addr)?;
    let server = UdpDnsServer::from_std(socket, services.handler_use_case.clone())?
        .with_metrics(services.metrics.clone());
    Ok(server)
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<std::net::UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    Ok(socket.into())
}

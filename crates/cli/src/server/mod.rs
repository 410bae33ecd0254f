pub mod dns;

pub use dns::create_dns_server;

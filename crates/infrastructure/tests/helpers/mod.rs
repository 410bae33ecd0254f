#![allow(dead_code, unused_imports)]
mod dns_server_mock;
mod http_server_mock;
mod mock_ports;
mod tls_server_mock;

pub use dns_server_mock::{answer_for, MockDnsServer, MockMode};
pub use http_server_mock::{MockDohServer, RecordedRequest};
pub use mock_ports::{CollectingQueryLogger, FailingQueryLogger, MockDnsClient};
pub use tls_server_mock::{MockDotServer, MOCK_DOT_HOSTNAME};

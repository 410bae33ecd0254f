mod allowlist;
mod blocklist;
pub mod hosts_file;
mod loader;
mod table;

pub use allowlist::AllowlistService;
pub use blocklist::BlocklistService;
pub use hosts_file::{parse_hosts, HostsEntry};
pub use loader::ListLoader;

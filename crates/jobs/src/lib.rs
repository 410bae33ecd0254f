pub mod cache_maintenance;
pub mod list_reload;
pub mod metrics_report;
pub mod runner;

pub use cache_maintenance::CacheMaintenanceJob;
pub use list_reload::ListReloadJob;
pub use metrics_report::MetricsReportJob;
pub use runner::JobRunner;

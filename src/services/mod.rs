pub mod audit_log_service;
pub mod catalog_service;
pub mod handoff_service;
pub mod inquiry_service;
pub mod pricing_service;
pub mod scheduler;
pub mod session_service;

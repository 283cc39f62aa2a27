//! Application services and ports.

#![forbid(unsafe_code)]

mod log_triage_ports;
mod log_triage_service;

pub use log_triage_ports::{
    CabinetSessionRepository, LogStateRepository, Notification, NotificationLevel, Notifier,
};
pub use log_triage_service::{LogTriageService, LogTriageSession};

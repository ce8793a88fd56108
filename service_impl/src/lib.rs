pub mod availability;
pub mod booking;
pub mod branch;
pub mod break_time;
pub mod client;
pub mod clock;
pub mod config;
pub mod local_time;
pub mod macros;
pub mod notification;
pub mod offering;
pub mod outbox;
pub mod payment;
pub mod professional;
pub mod scheduler;
pub mod uuid_service;
pub mod working_hours;

#[cfg(test)]
mod test;

#[cfg(test)]
pub mod break_time;
#[cfg(test)]
pub mod client;
#[cfg(test)]
pub mod error_test;
#[cfg(test)]
pub mod working_hours;

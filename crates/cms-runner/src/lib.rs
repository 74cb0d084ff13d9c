mod admin;
mod error;
mod launch;
mod poll;
mod run_level;
mod runner;
mod watchdog;

#[cfg(test)]
mod tests;

pub use admin::{AdminConnection, AdminError, AdminResult, HttpAdminClient};
pub use error::{Result, RunnerError};
pub use poll::{PollSchedule, wait_for};
pub use run_level::RunLevel;
pub use runner::ServerRunner;

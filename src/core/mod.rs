pub mod add;
pub mod aggregate;
pub mod calculator;
pub mod context;
pub mod del;
pub mod fare;
pub mod handoff;
pub mod log;
pub mod period;
pub mod timesheet;
pub mod verify;

pub mod bus_fare;
pub mod location;
pub mod unified_fare;
pub mod user;
pub mod work_session;

pub mod hours;
pub mod suggest;

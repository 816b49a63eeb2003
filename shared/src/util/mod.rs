//! Small helpers shared by the domain modules

pub mod time;
pub mod validation;

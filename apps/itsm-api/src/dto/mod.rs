//! Request and response bodies

pub mod incidents;

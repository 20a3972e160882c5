//! # ITSM In-Memory Storage
//!
//! Reference implementation of the `IncidentRepository` port. Data lives for the
//! lifetime of the process; it serves as the test double and as the store for
//! single-node development deployments.

pub mod infrastructure;

//! Storage adapters

mod memory_repository;
mod record;

pub use memory_repository::InMemoryIncidentRepository;

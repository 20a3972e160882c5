//! # ITSM Domain Layer
//!
//! This crate contains the pure business logic and domain models for incident
//! ticket management on a multi-tenant ITSM platform. It follows hexagonal
//! architecture principles:
//!
//! - **Entities**: Core domain models (Incident, CreatedUpdated audit trail)
//! - **Ports**: Trait definitions for external dependencies (IncidentRepository, Clock)
//! - **Services**: Business logic orchestration (IncidentService)
//! - **Hypermedia**: State-dependent action links for client discovery
//!
//! ## Architecture
//!
//! This layer has NO dependencies on infrastructure concerns (storage, HTTP, etc.).
//! Every operation is scoped to a channel (tenant) and takes the acting user
//! explicitly.
//!
//! ## Example
//!
//! ```rust
//! use itsm_domain::incident::{CreateIncidentParams, IncidentServicePort};
//! use itsm_domain::{ChannelId, ExternalUserId};
//!
//! // Any IncidentServicePort implementation will do
//! async fn example<S: IncidentServicePort>(service: S, channel: ChannelId) {
//!     let actor = ExternalUserId::new("f49d5fd5-8da4-4779-b5ba-32e78aa2c444");
//!     let params = CreateIncidentParams {
//!         number: "ABC123".to_string(),
//!         short_description: "disk full".to_string(),
//!         ..Default::default()
//!     };
//!     let id = service.create_incident(&channel, &actor, params).await.unwrap();
//!     println!("Created incident: {}", id);
//! }
//! ```

pub mod audit;
pub mod error;
pub mod hypermedia;
pub mod incident;
pub mod pagination;
pub mod ports;
pub mod refs;

// Re-export commonly used types
pub use audit::CreatedUpdated;
pub use error::{DomainError, Result};
pub use incident::{Incident, IncidentId, IncidentService, IncidentServicePort};
pub use pagination::{Page, PageRequest};
pub use ports::IncidentRepository;
pub use refs::{ChannelId, ExternalUserId, TimelogId, Timestamp};

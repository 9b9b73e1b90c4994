//! Selection persistence adapters.
//!
//! `DieselBoundarySelectionRepository` stores selections in PostgreSQL via
//! `diesel-async` and a `bb8` pool. `InMemoryBoundarySelectionRepository`
//! keeps them in process when no database is configured.
//!
//! Row structs and the Diesel schema stay private to this module; the domain
//! only sees `BoundarySelection`.
//!
//! ```ignore
//! use city_boundaries::outbound::persistence::{
//!     DbPool, DieselBoundarySelectionRepository, PoolConfig,
//! };
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/boundaries")).await?;
//! let repository = DieselBoundarySelectionRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_boundary_selection_repository;
mod in_memory_boundary_selection_repository;
mod pool;
mod schema;

pub use diesel_boundary_selection_repository::DieselBoundarySelectionRepository;
pub use in_memory_boundary_selection_repository::InMemoryBoundarySelectionRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

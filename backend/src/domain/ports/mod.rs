//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod boundary_search_query;
mod boundary_selection_command;
mod boundary_selection_repository;
mod boundary_source;
mod identity_verifier;

#[cfg(test)]
pub use boundary_search_query::MockBoundarySearchQuery;
pub use boundary_search_query::{BoundarySearchQuery, FixtureBoundarySearchQuery};
#[cfg(test)]
pub use boundary_selection_command::{MockBoundarySelectionCommand, MockBoundarySelectionQuery};
pub use boundary_selection_command::{
    BoundarySelectionCommand, BoundarySelectionQuery, FixtureBoundarySelectionCommand,
    FixtureBoundarySelectionQuery, SelectBoundaryRequest,
};
#[cfg(test)]
pub use boundary_selection_repository::MockBoundarySelectionRepository;
pub use boundary_selection_repository::{
    BoundarySelectionRepository, BoundarySelectionRepositoryError,
};
#[cfg(test)]
pub use boundary_source::MockBoundarySource;
pub use boundary_source::{
    BoundarySource, BoundarySourceError, CandidateSearch, ElementGraph, FixtureBoundarySource,
    MemberKind, RawRelation, RawWay, RelationMember,
};
#[cfg(test)]
pub use identity_verifier::MockIdentityVerifier;
pub use identity_verifier::{
    FIXTURE_USER_ID, FixtureIdentityVerifier, IdentityVerifier, IdentityVerifierError,
};

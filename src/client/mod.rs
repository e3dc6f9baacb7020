//! Client-side session, team selection and authenticated fetch layer
//!
//! Everything here is dependency-injected: construct an [`AuthContext`],
//! a [`TeamSelectionStore`] and an [`AuthenticatedFetch`] once at startup
//! and pass them down.

pub mod backoff;
pub mod bootstrap;
pub mod error;
pub mod fetch;
pub mod selection;
pub mod session;

pub use bootstrap::{
    spawn_auth_driver, BootstrapConfig, BootstrapState, SessionBootstrap, TeamDirectory,
    TeamSummary,
};
pub use error::FetchError;
pub use fetch::{AuthenticatedFetch, FetchConfig, HttpTeamDirectory, RequestScope};
pub use selection::{
    FileSelectionStorage, InMemorySelectionStorage, SelectionStorage, TeamSelectionStore,
};
pub use session::{AuthContext, AuthEvent, Session, SessionProvider};

//! Team-scoped authorization core
//!
//! Server side: bearer-token authentication, team membership validation and
//! role-based permission gating in front of team-owned resources. Client
//! side: a session bootstrap state machine, a persisted current-team
//! selection and an authenticated fetch wrapper.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::storage::Storage;
use domain::{Review, Team, Widget};
use infrastructure::auth::{JwtConfig, JwtVerifier};
use infrastructure::membership::{InMemoryMembershipRepository, MembershipService};
use infrastructure::review::ReviewService;
use infrastructure::storage::InMemoryStorage;
use infrastructure::team::{StorageTeamRepository, TeamService};
use infrastructure::widget::WidgetService;

/// Wire up application state from configuration.
///
/// All repositories are in-memory; swapping in a persistent store means
/// replacing the `Storage` implementations handed out here.
pub fn create_app_state(config: &AppConfig) -> AppState {
    let team_storage: Arc<dyn Storage<Team>> = Arc::new(InMemoryStorage::new());
    let review_storage: Arc<dyn Storage<Review>> = Arc::new(InMemoryStorage::new());
    let widget_storage: Arc<dyn Storage<Widget>> = Arc::new(InMemoryStorage::new());

    let team_repository = Arc::new(StorageTeamRepository::new(team_storage));
    let membership_repository = Arc::new(InMemoryMembershipRepository::new());

    let team_service = Arc::new(TeamService::new(
        team_repository,
        membership_repository.clone(),
    ));
    let membership_service = Arc::new(MembershipService::new(membership_repository));

    let jwt = Arc::new(JwtVerifier::new(JwtConfig {
        secret: config.auth.jwt_secret.clone(),
        ttl_hours: config.auth.token_ttl_hours,
    }));

    AppState {
        verifier: jwt.clone(),
        issuer: jwt,
        team_service,
        membership_service,
        review_service: Arc::new(ReviewService::new(review_storage)),
        widget_service: Arc::new(WidgetService::new(widget_storage)),
    }
}

//! Application state for shared services

use std::sync::Arc;

use crate::domain::membership::{Membership, MembershipRepository, TeamRole};
use crate::domain::team::TeamRepository;
use crate::domain::{AuthenticatedUser, DomainError, Team, TeamId, UserId};
use crate::infrastructure::auth::{TokenIssuer, TokenVerifier};
use crate::infrastructure::membership::MembershipService;
use crate::infrastructure::review::ReviewService;
use crate::infrastructure::team::{CreateTeamRequest, TeamService, TeamWithRole};
use crate::infrastructure::widget::WidgetService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub issuer: Arc<dyn TokenIssuer>,
    pub team_service: Arc<dyn TeamServiceTrait>,
    pub membership_service: Arc<dyn MembershipServiceTrait>,
    pub review_service: Arc<ReviewService>,
    pub widget_service: Arc<WidgetService>,
}

/// Trait for team service operations
#[async_trait::async_trait]
pub trait TeamServiceTrait: Send + Sync {
    async fn create(
        &self,
        request: CreateTeamRequest,
        creator: UserId,
    ) -> Result<Team, DomainError>;
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<TeamWithRole>, DomainError>;
}

/// Trait for membership validation and mutation
#[async_trait::async_trait]
pub trait MembershipServiceTrait: Send + Sync {
    async fn validate(
        &self,
        user: &AuthenticatedUser,
        team_id: &TeamId,
    ) -> Result<Membership, DomainError>;
    async fn validate_admin(
        &self,
        user: &AuthenticatedUser,
        team_id: &TeamId,
    ) -> Result<Membership, DomainError>;
    async fn add_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role: TeamRole,
    ) -> Result<Membership, DomainError>;
    async fn remove_member(&self, team_id: &TeamId, user_id: &UserId) -> Result<(), DomainError>;
    async fn list_members(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError>;
}

#[async_trait::async_trait]
impl<T, M> TeamServiceTrait for TeamService<T, M>
where
    T: TeamRepository + 'static,
    M: MembershipRepository + 'static,
{
    async fn create(
        &self,
        request: CreateTeamRequest,
        creator: UserId,
    ) -> Result<Team, DomainError> {
        TeamService::create(self, request, creator).await
    }

    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        TeamService::get(self, id).await
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<TeamWithRole>, DomainError> {
        TeamService::list_for_user(self, user_id).await
    }
}

#[async_trait::async_trait]
impl<M> MembershipServiceTrait for MembershipService<M>
where
    M: MembershipRepository + 'static,
{
    async fn validate(
        &self,
        user: &AuthenticatedUser,
        team_id: &TeamId,
    ) -> Result<Membership, DomainError> {
        MembershipService::validate(self, user, team_id).await
    }

    async fn validate_admin(
        &self,
        user: &AuthenticatedUser,
        team_id: &TeamId,
    ) -> Result<Membership, DomainError> {
        MembershipService::validate_admin(self, user, team_id).await
    }

    async fn add_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role: TeamRole,
    ) -> Result<Membership, DomainError> {
        MembershipService::add_member(self, team_id, user_id, role).await
    }

    async fn remove_member(&self, team_id: &TeamId, user_id: &UserId) -> Result<(), DomainError> {
        MembershipService::remove_member(self, team_id, user_id).await
    }

    async fn list_members(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError> {
        MembershipService::list_members(self, team_id).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        issuer: Arc<dyn TokenIssuer>,
        team_service: Arc<dyn TeamServiceTrait>,
        membership_service: Arc<dyn MembershipServiceTrait>,
        review_service: Arc<ReviewService>,
        widget_service: Arc<WidgetService>,
    ) -> Self {
        Self {
            verifier,
            issuer,
            team_service,
            membership_service,
            review_service,
            widget_service,
        }
    }
}

//! Protected v1 API

pub mod members;
pub mod reviews;
pub mod teams;
pub mod widgets;

use axum::{
    routing::{delete, get},
    Router,
};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/teams", get(teams::list_teams).post(teams::create_team))
        .route(
            "/teams/{team_id}/members",
            get(members::list_members).post(members::add_member),
        )
        .route(
            "/teams/{team_id}/members/{user_id}",
            delete(members::remove_member),
        )
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/reviews/{id}",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route(
            "/widgets",
            get(widgets::list_widgets).post(widgets::create_widget),
        )
        .route(
            "/widgets/{id}",
            get(widgets::get_widget)
                .put(widgets::update_widget)
                .delete(widgets::delete_widget),
        )
}

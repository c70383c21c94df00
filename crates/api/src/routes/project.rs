//! Route definitions for `/companies/{company_id}/projects`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{allocations, projects};
use crate::state::AppState;

/// Routes mounted at `/companies/{company_id}/projects`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete
///
/// GET    /{id}/allocations              -> get_grid
/// PUT    /{id}/allocations              -> save
/// POST   /{id}/team                     -> add_member
/// GET    /{id}/team/available           -> available_members
/// DELETE /{id}/team/{member_id}         -> remove_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route(
            "/{id}/allocations",
            get(allocations::get_grid).put(allocations::save),
        )
        .route("/{id}/team", post(allocations::add_member))
        .route("/{id}/team/available", get(allocations::available_members))
        .route("/{id}/team/{member_id}", delete(allocations::remove_member))
}

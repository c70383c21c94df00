//! Route definitions for `/companies` and the company-scoped people
//! resources (team members and clients).

use axum::routing::get;
use axum::Router;

use crate::handlers::{clients, companies, dashboard, team_members};
use crate::routes::{finance, project};
use crate::state::AppState;

/// Routes mounted at `/companies`.
pub fn router() -> Router<AppState> {
    let team_member_routes = Router::new()
        .route("/", get(team_members::list).post(team_members::create))
        .route(
            "/{id}",
            get(team_members::get_by_id)
                .put(team_members::update)
                .delete(team_members::delete),
        )
        .route("/{id}/dashboard", get(dashboard::member_dashboard))
        .route("/{id}/pm-dashboard", get(dashboard::pm_dashboard));

    let client_routes = Router::new()
        .route("/", get(clients::list).post(clients::create))
        .route(
            "/{id}",
            get(clients::get_by_id)
                .put(clients::update)
                .delete(clients::delete),
        );

    Router::new()
        .route("/", get(companies::list).post(companies::create))
        .route(
            "/{company_id}",
            get(companies::get_by_id)
                .put(companies::update)
                .delete(companies::delete),
        )
        .nest("/{company_id}/team-members", team_member_routes)
        .nest("/{company_id}/clients", client_routes)
        .nest("/{company_id}/projects", project::router())
        .merge(finance::router())
}

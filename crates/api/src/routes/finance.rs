//! Route definitions for the company's financial records and dashboards.

use axum::routing::get;
use axum::Router;

use crate::handlers::{capacity_snapshots, costs, dashboard, revenues};
use crate::state::AppState;

/// Routes merged into `/companies`, each under `/{company_id}/...`.
pub fn router() -> Router<AppState> {
    let cost_routes = Router::new()
        .route("/", get(costs::list).post(costs::create))
        .route(
            "/{id}",
            get(costs::get_by_id)
                .put(costs::update)
                .delete(costs::delete),
        );

    let revenue_routes = Router::new()
        .route("/", get(revenues::list).post(revenues::create))
        .route(
            "/{id}",
            get(revenues::get_by_id)
                .put(revenues::update)
                .delete(revenues::delete),
        );

    let snapshot_routes = Router::new().route(
        "/",
        get(capacity_snapshots::list).post(capacity_snapshots::refresh),
    );

    let dashboard_routes = Router::new()
        .route("/metrics", get(dashboard::metrics))
        .route("/revenue-chart", get(dashboard::revenue_chart));

    Router::new()
        .nest("/{company_id}/costs", cost_routes)
        .nest("/{company_id}/revenues", revenue_routes)
        .nest("/{company_id}/capacity-snapshots", snapshot_routes)
        .nest("/{company_id}/dashboard", dashboard_routes)
}

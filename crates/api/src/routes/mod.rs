pub mod company;
pub mod finance;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every resource except companies themselves is scoped to a company:
///
/// ```text
/// /companies                                          list, create
/// /companies/{company_id}                             get, update, delete
///
/// /companies/{cid}/team-members                       list, create
/// /companies/{cid}/team-members/{id}                  get, update, delete
/// /companies/{cid}/team-members/{id}/dashboard        member dashboard
/// /companies/{cid}/team-members/{id}/pm-dashboard     PM dashboard
///
/// /companies/{cid}/clients                            list, create
/// /companies/{cid}/clients/{id}                       get, update, delete
///
/// /companies/{cid}/projects                           list, create
/// /companies/{cid}/projects/{id}                      get, update, delete
/// /companies/{cid}/projects/{id}/allocations          grid (GET), save (PUT)
/// /companies/{cid}/projects/{id}/team                 add member (POST)
/// /companies/{cid}/projects/{id}/team/available       members not on the team
/// /companies/{cid}/projects/{id}/team/{member_id}     remove member (DELETE)
///
/// /companies/{cid}/costs                              list, create
/// /companies/{cid}/costs/{id}                         get, update, delete
/// /companies/{cid}/revenues                           list, create
/// /companies/{cid}/revenues/{id}                      get, update, delete
/// /companies/{cid}/capacity-snapshots                 list, refresh (POST)
///
/// /companies/{cid}/dashboard/metrics                  range metrics
/// /companies/{cid}/dashboard/revenue-chart            yearly chart
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/companies", company::router())
}

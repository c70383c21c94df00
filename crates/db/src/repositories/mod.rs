//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Everything below a company is
//! scoped by `company_id` so one tenant can never read another's rows.

pub mod allocation_repo;
pub mod capacity_snapshot_repo;
pub mod client_repo;
pub mod company_repo;
pub mod cost_repo;
pub mod monthly_revenue_repo;
pub mod project_repo;
pub mod team_member_repo;

pub use allocation_repo::AllocationRepo;
pub use capacity_snapshot_repo::CapacitySnapshotRepo;
pub use client_repo::ClientRepo;
pub use company_repo::CompanyRepo;
pub use cost_repo::CostRepo;
pub use monthly_revenue_repo::MonthlyRevenueRepo;
pub use project_repo::ProjectRepo;
pub use team_member_repo::TeamMemberRepo;

pub mod allocation;
pub mod capacity_snapshot;
pub mod client;
pub mod company;
pub mod cost;
pub mod monthly_revenue;
pub mod project;
pub mod team_member;

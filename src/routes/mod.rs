pub mod dashboard_route;
pub mod download_route;

pub use dashboard_route::JobState;

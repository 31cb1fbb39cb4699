//! Leave, overtime and remote-work applications: filing, approval, listing
//! and yearly statistics.

pub mod domain;
pub mod listing;
pub mod repository;
pub mod router;
pub mod service;
pub mod statistics;
pub mod transition;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationType, EmployeeId, NewApplication,
};
pub use listing::{ApplicationListView, ApplicationView, ListingQuery, Page};
pub use repository::{ApplicationFilter, ApplicationRepository, DateWindow, RepositoryError};
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
pub use statistics::YearlyStatistics;
pub use transition::transition_permitted;

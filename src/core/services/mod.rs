pub mod contribution_service;
pub mod plan_service;
pub mod summary_service;

pub use contribution_service::ContributionService;
pub use plan_service::PlanService;
pub use summary_service::{MonthlyContributions, PlanOverview, SummaryService};

use crate::errors::SavingsError;

pub type ServiceResult<T> = Result<T, SavingsError>;

//! Plan operations: services over the domain types, the clock, code
//! assignment and the manager that ties them to a store.

pub mod completion;
pub mod plan_code;
pub mod plan_manager;
pub mod services;
pub mod time;

pub use completion::CompletionEvaluator;
pub use plan_code::{is_valid_plan_code, PlanCodeGenerator, RandomPlanCodes};
pub use plan_manager::PlanManager;
pub use services::{MonthlyContributions, PlanOverview, ServiceResult};
pub use time::{Clock, FixedClock, MonthClock, SystemClock};

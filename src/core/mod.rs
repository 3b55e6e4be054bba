pub mod engine;
pub mod planner;
pub mod recommend;

pub use crate::domain::model::{Recommendations, TravelRequest, TripPlan};
pub use crate::domain::ports::{PlanGenerator, Storage};
pub use crate::utils::error::Result;

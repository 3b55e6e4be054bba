pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::AppConfig};

pub use core::{
    engine::TravelEngine,
    planner::GeminiPlanGenerator,
    recommend::{Catalog, RecommendationProvider},
};
pub use domain::model::{Activity, Flight, Hotel, Offer, Preferences, Recommendations, TravelRequest, TripPlan};
pub use render::{DocumentRenderer, RenderOptions};
pub use utils::error::{Result, TravelError};

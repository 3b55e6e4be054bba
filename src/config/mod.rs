pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_args::{argument_error, CliConfig};

#[cfg(feature = "cli")]
mod cli_args {
    use crate::domain::model::{Preferences, TravelRequest};
    use crate::utils::error::{Result, TravelError};
    use crate::utils::validation::{self, Validate};
    use clap::error::ErrorKind;
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    pub const MIN_BUDGET: f64 = 100.0;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "travel-planner")]
    #[command(about = "Plan your next trip with AI-powered recommendations")]
    pub struct CliConfig {
        /// Where you want to go
        #[arg(long, default_value = "Paris")]
        pub destination: String,

        /// Travel dates, free text (e.g. "May 5-9, 2025")
        #[arg(long, default_value = "May 5-9, 2025")]
        pub dates: String,

        /// Total budget in dollars (minimum 100)
        #[arg(long, default_value = "1000")]
        pub budget: f64,

        /// Travel style (relaxed, adventurous, cultural, ...)
        #[arg(long)]
        pub style: Option<String>,

        /// Preferred accommodation type (hotel, hostel, apartment, ...)
        #[arg(long)]
        pub accommodation: Option<String>,

        #[arg(long, default_value = "1")]
        pub travelers: u32,

        /// Interest tags, comma separated
        #[arg(long, value_delimiter = ',')]
        pub interests: Vec<String>,

        /// Optional TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Directory with flights.csv, hotels.csv and activities.csv
        #[arg(long)]
        pub catalog_dir: Option<String>,

        /// Output directory for the exported PDF (overrides the config file)
        #[arg(long)]
        pub output_path: Option<String>,

        /// Export the travel plan as PDF without asking
        #[arg(long)]
        pub export: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,
    }

    impl CliConfig {
        pub fn travel_request(&self) -> TravelRequest {
            TravelRequest::new(self.destination.trim(), self.dates.trim(), self.budget)
        }

        pub fn preferences(&self) -> Preferences {
            Preferences {
                style: self.style.clone(),
                accommodation: self.accommodation.clone(),
                travelers: self.travelers,
                interests: self
                    .interests
                    .iter()
                    .map(|tag| tag.trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect(),
            }
        }
    }

    /// clap 拒絕的參數 (例如非數字的預算) 視為輸入錯誤；說明與版本輸出則不是錯誤
    pub fn argument_error(err: &clap::Error) -> Option<TravelError> {
        if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            return None;
        }

        let rendered = err.to_string();
        let message = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string();
        Some(TravelError::InputError {
            field: "arguments".to_string(),
            message,
        })
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_non_empty_input("destination", &self.destination)?;
            validation::validate_non_empty_input("dates", &self.dates)?;
            validation::validate_minimum_amount("budget", self.budget, MIN_BUDGET)?;
            validation::validate_positive_count("travelers", self.travelers)?;
            Ok(())
        }
    }

}

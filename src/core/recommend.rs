use crate::domain::model::{Activity, Flight, Hotel, Recommendations, TravelRequest};
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use std::path::Path;

/// 推薦用的靜態型錄，由呼叫端注入，測試時可替換
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub flights: Vec<Flight>,
    pub hotels: Vec<Hotel>,
    pub activities: Vec<Activity>,
}

impl Catalog {
    pub fn new(flights: Vec<Flight>, hotels: Vec<Hotel>, activities: Vec<Activity>) -> Self {
        Self {
            flights,
            hotels,
            activities,
        }
    }

    /// 內建的示範資料 (每個類別兩筆)
    pub fn demo() -> Self {
        Self {
            flights: vec![
                Flight {
                    airline: "Air France".to_string(),
                    departure: "08:00".to_string(),
                    arrival: "10:00".to_string(),
                    price: 300.0,
                },
                Flight {
                    airline: "Tarom".to_string(),
                    departure: "12:00".to_string(),
                    arrival: "14:00".to_string(),
                    price: 500.0,
                },
            ],
            hotels: vec![
                Hotel {
                    name: "Zoku Paris".to_string(),
                    rating: 8.9,
                    price: 250.0,
                },
                Hotel {
                    name: "Villa M".to_string(),
                    rating: 8.8,
                    price: 450.0,
                },
            ],
            activities: vec![
                Activity {
                    name: "Admission to Disneyland Paris".to_string(),
                    duration: "2 hours".to_string(),
                    price: 100.0,
                },
                Activity {
                    name: "Sightseeing Cruise from the Eiffel Tower".to_string(),
                    duration: "3 hours".to_string(),
                    price: 75.0,
                },
            ],
        }
    }

    /// 從目錄載入 flights.csv、hotels.csv、activities.csv
    pub fn from_csv_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        tracing::debug!("Loading catalog from {}", dir.display());

        let catalog = Self {
            flights: read_csv(&dir.join("flights.csv"))?,
            hotels: read_csv(&dir.join("hotels.csv"))?,
            activities: read_csv(&dir.join("activities.csv"))?,
        };

        tracing::info!(
            "Loaded catalog: {} flights, {} hotels, {} activities",
            catalog.flights.len(),
            catalog.hotels.len(),
            catalog.activities.len()
        );
        Ok(catalog)
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

fn within_budget<T: Clone>(items: &[T], budget: f64, price: impl Fn(&T) -> f64) -> Vec<T> {
    items
        .iter()
        .filter(|item| price(item) <= budget)
        .cloned()
        .collect()
}

pub struct RecommendationProvider {
    catalog: Catalog,
}

impl RecommendationProvider {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // 目的地與日期目前不參與篩選，只依預算過濾

    pub fn flights(&self, request: &TravelRequest) -> Vec<Flight> {
        within_budget(&self.catalog.flights, request.budget(), |f| f.price)
    }

    pub fn hotels(&self, request: &TravelRequest) -> Vec<Hotel> {
        within_budget(&self.catalog.hotels, request.budget(), |h| h.price)
    }

    pub fn activities(&self, request: &TravelRequest) -> Vec<Activity> {
        within_budget(&self.catalog.activities, request.budget(), |a| a.price)
    }

    pub fn recommend(&self, request: &TravelRequest) -> Recommendations {
        let recommendations = Recommendations {
            flights: self.flights(request),
            hotels: self.hotels(request),
            activities: self.activities(request),
        };

        tracing::debug!(
            "Recommended {} offers for {} (budget {})",
            recommendations.total_offers(),
            request.destination(),
            request.budget()
        );
        recommendations
    }
}

impl Default for RecommendationProvider {
    fn default() -> Self {
        Self::new(Catalog::demo())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn request(budget: f64) -> TravelRequest {
        TravelRequest::new("Paris", "May 5-9, 2025", budget)
    }

    #[test]
    fn test_demo_catalog_all_within_default_budget() {
        let provider = RecommendationProvider::default();
        let result = provider.recommend(&request(1000.0));

        assert_eq!(result.flights.len(), 2);
        assert_eq!(result.hotels.len(), 2);
        assert_eq!(result.activities.len(), 2);
        assert_eq!(result.flights[0].airline, "Air France");
        assert_eq!(result.flights[1].airline, "Tarom");
    }

    #[test]
    fn test_budget_filter_is_inclusive() {
        let provider = RecommendationProvider::default();
        let flights = provider.flights(&request(300.0));

        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].price, 300.0);
    }

    #[test]
    fn test_every_offer_respects_budget() {
        let provider = RecommendationProvider::default();
        for budget in [0.0, 74.99, 75.0, 100.0, 250.0, 299.0, 450.0, 500.0, 10_000.0] {
            let result = provider.recommend(&request(budget));
            assert!(result.offers().iter().all(|offer| offer.price() <= budget));
        }
    }

    #[test]
    fn test_low_budget_yields_empty_lists() {
        let provider = RecommendationProvider::default();
        let result = provider.recommend(&request(50.0));

        assert!(result.flights.is_empty());
        assert!(result.hotels.is_empty());
        assert!(result.activities.is_empty());
    }

    #[test]
    fn test_catalog_order_is_preserved() {
        let catalog = Catalog::new(
            vec![],
            vec![],
            vec![
                Activity {
                    name: "Zoo".to_string(),
                    duration: "1 hour".to_string(),
                    price: 30.0,
                },
                Activity {
                    name: "Aquarium".to_string(),
                    duration: "2 hours".to_string(),
                    price: 10.0,
                },
                Activity {
                    name: "Opera".to_string(),
                    duration: "3 hours".to_string(),
                    price: 500.0,
                },
            ],
        );
        let provider = RecommendationProvider::new(catalog);
        let activities = provider.activities(&request(100.0));

        let names: Vec<&str> = activities.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Zoo", "Aquarium"]);
    }

    #[test]
    fn test_catalog_from_csv_dir() {
        let dir = TempDir::new().unwrap();
        let write = |name: &str, content: &str| {
            let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
            file.write_all(content.as_bytes()).unwrap();
        };
        write(
            "flights.csv",
            "airline,departure,arrival,price\nKLM,07:15,09:05,220\nLufthansa, 18:00 ,20:10,640.5\n",
        );
        write("hotels.csv", "name,rating,price\nHotel Adlon,9.1,380\n");
        write("activities.csv", "name,duration,price\n");

        let catalog = Catalog::from_csv_dir(dir.path()).unwrap();

        assert_eq!(catalog.flights.len(), 2);
        assert_eq!(catalog.flights[1].departure, "18:00");
        assert_eq!(catalog.flights[1].price, 640.5);
        assert_eq!(catalog.hotels[0].rating, 9.1);
        assert!(catalog.activities.is_empty());
    }

    #[test]
    fn test_catalog_from_missing_dir_is_error() {
        let dir = TempDir::new().unwrap();
        let result = Catalog::from_csv_dir(dir.path().join("nope"));
        assert!(result.is_err());
    }
}

use serde::{Deserialize, Serialize};

/// 使用者在表單中填寫的旅遊需求；建立後不再變動
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRequest {
    destination: String,
    dates: String,
    budget: f64,
}

impl TravelRequest {
    pub fn new(destination: impl Into<String>, dates: impl Into<String>, budget: f64) -> Self {
        Self {
            destination: destination.into(),
            dates: dates.into(),
            budget,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn dates(&self) -> &str {
        &self.dates
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }
}

/// 表單上的偏好欄位，目前只作為介面狀態保存，不參與篩選
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub style: Option<String>,
    pub accommodation: Option<String>,
    pub travelers: u32,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub airline: String,
    pub departure: String,
    pub arrival: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub name: String,
    pub rating: f64,
    /// Price per night.
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub duration: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Offer {
    Flight(Flight),
    Hotel(Hotel),
    Activity(Activity),
}

impl Offer {
    pub fn price(&self) -> f64 {
        match self {
            Offer::Flight(flight) => flight.price,
            Offer::Hotel(hotel) => hotel.price,
            Offer::Activity(activity) => activity.price,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Offer::Flight(flight) => &flight.airline,
            Offer::Hotel(hotel) => &hotel.name,
            Offer::Activity(activity) => &activity.name,
        }
    }
}

impl From<Flight> for Offer {
    fn from(flight: Flight) -> Self {
        Offer::Flight(flight)
    }
}

impl From<Hotel> for Offer {
    fn from(hotel: Hotel) -> Self {
        Offer::Hotel(hotel)
    }
}

impl From<Activity> for Offer {
    fn from(activity: Activity) -> Self {
        Offer::Activity(activity)
    }
}

/// 推薦結果，各類別維持型錄順序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub flights: Vec<Flight>,
    pub hotels: Vec<Hotel>,
    pub activities: Vec<Activity>,
}

impl Recommendations {
    pub fn total_offers(&self) -> usize {
        self.flights.len() + self.hotels.len() + self.activities.len()
    }

    /// All offers in category order: flights, then hotels, then activities.
    pub fn offers(&self) -> Vec<Offer> {
        self.flights
            .iter()
            .cloned()
            .map(Offer::from)
            .chain(self.hotels.iter().cloned().map(Offer::from))
            .chain(self.activities.iter().cloned().map(Offer::from))
            .collect()
    }
}

/// 一次「產生建議」動作的完整結果，也是匯出 PDF 的輸入
#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    pub request: TravelRequest,
    pub preferences: Preferences,
    pub recommendations: Recommendations,
    pub plan_text: String,
}

/// 預算顯示格式：整數不帶小數 (1000)，否則保留兩位 (999.50)
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

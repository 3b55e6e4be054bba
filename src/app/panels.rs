//! Cosmetic side panels. Nothing here is authoritative: the forecast is
//! derived from the destination name and a rough reading of the dates.

use chrono::{Datelike, Local, Month, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static DATE_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2})(?:\s*[-–]\s*(\d{1,2}))?(?:,?\s*(\d{4}))?")
        .expect("valid date hint pattern")
});
static MONTH_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([a-z]{3,9})\b").expect("valid month pattern"));

const FORECAST_DAYS: usize = 5;
const CONDITIONS: [&str; 5] = ["Sunny", "Partly cloudy", "Cloudy", "Light rain", "Clear"];

// 北半球溫帶城市的月均高溫 (°C)，僅供展示
const MONTHLY_HIGH_C: [i32; 12] = [6, 8, 12, 16, 20, 24, 26, 26, 22, 16, 10, 7];

#[derive(Debug, Clone, PartialEq)]
pub struct DateHint {
    pub month: Month,
    pub start: Option<NaiveDate>,
}

/// Best-effort reading of free-text dates such as "May 5-9, 2025".
pub fn parse_date_hint(dates: &str) -> Option<DateHint> {
    for caps in DATE_HINT.captures_iter(dates) {
        let Ok(month) = caps[1].parse::<Month>() else {
            continue;
        };
        let day: u32 = caps[2].parse().ok()?;
        let year = caps
            .get(4)
            .and_then(|y| y.as_str().parse::<i32>().ok())
            .unwrap_or_else(|| Local::now().year());
        let start = NaiveDate::from_ymd_opt(year, month.number_from_month(), day);
        return Some(DateHint { month, start });
    }

    MONTH_ONLY
        .captures_iter(dates)
        .find_map(|caps| caps[1].parse::<Month>().ok())
        .map(|month| DateHint { month, start: None })
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherDay {
    pub label: String,
    pub condition: &'static str,
    pub high_c: i32,
    pub low_c: i32,
}

fn seed(destination: &str) -> u32 {
    destination
        .trim()
        .to_lowercase()
        .bytes()
        .fold(17u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32))
}

pub fn mock_forecast(destination: &str, dates: &str) -> Vec<WeatherDay> {
    let hint = parse_date_hint(dates);
    let month_index = hint
        .as_ref()
        .map(|h| h.month.number_from_month() as usize - 1)
        .unwrap_or_else(|| Local::now().month0() as usize);
    let base_high = MONTHLY_HIGH_C[month_index];
    let seed = seed(destination);

    (0..FORECAST_DAYS)
        .map(|day| {
            let roll = seed.wrapping_add(day as u32 * 7919) % 97;
            let high = base_high + (roll % 7) as i32 - 3;
            let label = match hint.as_ref().and_then(|h| h.start) {
                Some(start) => (start + chrono::Duration::days(day as i64))
                    .format("%a %d %b")
                    .to_string(),
                None => format!("Day {}", day + 1),
            };
            WeatherDay {
                label,
                condition: CONDITIONS[(roll as usize) % CONDITIONS.len()],
                high_c: high,
                low_c: high - 6 - (roll % 3) as i32,
            }
        })
        .collect()
}

pub fn destination_tips(destination: &str) -> Vec<String> {
    vec![
        format!("Learn a few local phrases before arriving in {}.", destination),
        format!("Buy a transit pass to get around {} cheaply.", destination),
        "Book popular attractions online to skip the queues.".to_string(),
        "Keep digital and paper copies of your travel documents.".to_string(),
        format!("Try the neighbourhood restaurants away from {}'s main sights.", destination),
    ]
}

pub fn format_weather_panel(destination: &str, forecast: &[WeatherDay]) -> String {
    let mut lines = vec![format!("🌤️  Weather outlook for {} (simulated)", destination)];
    for day in forecast {
        lines.push(format!(
            "   {:<12} {:<14} {:>3}°C / {:>3}°C",
            day.label, day.condition, day.high_c, day.low_c
        ));
    }
    lines.join("\n")
}

pub fn format_tips_panel(destination: &str) -> String {
    let mut lines = vec![format!("💡 Tips for {}", destination)];
    lines.extend(destination_tips(destination).into_iter().map(|tip| format!("   - {}", tip)));
    lines.join("\n")
}

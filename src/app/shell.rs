use crate::domain::model::{format_amount, Recommendations, TravelRequest};
use std::future::Future;
use std::io::{IsTerminal, Write};
use std::time::Duration;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

pub fn format_request_summary(request: &TravelRequest) -> String {
    format!(
        "🌍 {} | {} | budget ${}",
        request.destination(),
        request.dates(),
        format_amount(request.budget())
    )
}

pub fn format_offer_cards(recommendations: &Recommendations) -> String {
    let mut out = Vec::new();

    out.push("✈️  Flight Options".to_string());
    if recommendations.flights.is_empty() {
        out.push("   (no flights within budget)".to_string());
    }
    for flight in &recommendations.flights {
        out.push(format!(
            "   {}: ${} (Departure: {}, Arrival: {})",
            flight.airline,
            format_amount(flight.price),
            flight.departure,
            flight.arrival
        ));
    }

    out.push("🏨 Hotel Options".to_string());
    if recommendations.hotels.is_empty() {
        out.push("   (no hotels within budget)".to_string());
    }
    for hotel in &recommendations.hotels {
        out.push(format!(
            "   {}: ${} per night (Rating: {}⭐)",
            hotel.name,
            format_amount(hotel.price),
            hotel.rating
        ));
    }

    out.push("🎭 Activity Options".to_string());
    if recommendations.activities.is_empty() {
        out.push("   (no activities within budget)".to_string());
    }
    for activity in &recommendations.activities {
        out.push(format!(
            "   {}: ${} ({})",
            activity.name,
            format_amount(activity.price),
            activity.duration
        ));
    }

    out.join("\n")
}

pub fn format_plan(plan_text: &str) -> String {
    format!("🗺️  AI-Generated Travel Plan\n\n{}", plan_text.trim())
}

/// 等待 future 完成，期間在 stderr 顯示忙碌指示
pub async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let interactive = std::io::stderr().is_terminal();
    if !interactive {
        eprintln!("{}", message);
        return future.await;
    }

    tokio::pin!(future);
    let mut ticker = tokio::time::interval(Duration::from_millis(120));
    let mut frame = 0usize;

    let output = loop {
        tokio::select! {
            output = &mut future => break output,
            _ = ticker.tick() => {
                eprint!("\r{} {}", SPINNER_FRAMES[frame % SPINNER_FRAMES.len()], message);
                let _ = std::io::stderr().flush();
                frame += 1;
            }
        }
    };

    eprint!("\r{}\r", " ".repeat(message.chars().count() + 2));
    let _ = std::io::stderr().flush();
    output
}

/// Asks a yes/no question on stdin; non-interactive sessions answer no.
pub fn confirm(question: &str) -> bool {
    if !std::io::stdin().is_terminal() {
        return false;
    }

    print!("{} [y/N] ", question);
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match std::io::stdin().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            tracing::debug!("Could not read confirmation: {}", e);
            false
        }
    }
}

// Delivery schedule computations
//
// Products declare the weekdays they can be delivered on; the basket view
// groups lines by the nearest date matching that schedule.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Parse a lowercase English weekday name
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Weekday name as stored in a delivery schedule
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Nearest date, today included, whose weekday appears in the schedule
///
/// Returns None when the schedule contains no recognizable weekday.
pub fn nearest_delivery_date(today: NaiveDate, schedule: &[String]) -> Option<NaiveDate> {
    let weekdays: Vec<Weekday> = schedule.iter().filter_map(|day| parse_weekday(day)).collect();
    if weekdays.is_empty() {
        return None;
    }

    (0..7)
        .map(|offset| today + Duration::days(offset))
        .find(|date| weekdays.contains(&date.weekday()))
}

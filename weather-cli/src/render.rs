use chrono::{DateTime, Local, Utc};
use weather_core::WeatherSnapshot;

/// Human-readable weather card.
pub fn card(snap: &WeatherSnapshot) -> String {
    let lines = [
        snap.location_label(),
        format!("{:.1}°C  {}", snap.temperature_c, capitalize(&snap.description)),
        format!("Feels like: {:.1}°C", snap.feels_like_c),
        format!("Min / Max:  {:.1}°C / {:.1}°C", snap.temp_min_c, snap.temp_max_c),
        format!("Humidity:   {}%", snap.humidity_pct),
        format!("Wind:       {} m/s, {}°", snap.wind_speed_mps, snap.wind_deg),
        format!("Pressure:   {} hPa", snap.pressure_hpa),
        format!(
            "Sunrise:    {}   Sunset: {}",
            local_time(snap.sunrise_utc()),
            local_time(snap.sunset_utc())
        ),
        format!("Icon:       {}", snap.icon_url()),
    ];

    lines.join("\n")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn local_time(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAIROBI: &str = r#"{"name":"Nairobi","main":{"temp":22.5,"feels_like":21.0,"temp_min":20,"temp_max":24,"pressure":1012,"humidity":60},"weather":[{"id":800,"main":"Clear","description":"clear sky","icon":"01d"}],"wind":{"speed":3.1,"deg":90},"sys":{"country":"KE","sunrise":1700000000,"sunset":1700040000}}"#;

    #[test]
    fn card_shows_all_readings() {
        let snap = WeatherSnapshot::from_json(NAIROBI).expect("valid payload");
        let card = card(&snap);

        assert!(card.starts_with("Nairobi, KE\n"));
        assert!(card.contains("22.5°C  Clear sky"));
        assert!(card.contains("Feels like: 21.0°C"));
        assert!(card.contains("Min / Max:  20.0°C / 24.0°C"));
        assert!(card.contains("Humidity:   60%"));
        assert!(card.contains("Wind:       3.1 m/s, 90°"));
        assert!(card.contains("Pressure:   1012 hPa"));
        assert!(card.contains("https://openweathermap.org/img/wn/01d@4x.png"));
    }

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("light rain"), "Light rain");
        assert_eq!(capitalize("éclaircies"), "Éclaircies");
    }

    #[test]
    fn missing_timestamp_renders_placeholder() {
        assert_eq!(local_time(None), "--:--");
    }
}

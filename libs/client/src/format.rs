//! Display helpers for favorites

use chrono::{DateTime, Utc};
use common::models::Favorite;

/// Image shown when an artist has no usable picture
pub const FALLBACK_IMAGE: &str = "/static/artsy_logo.svg";

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const MONTH: f64 = 30.0 * DAY;
const YEAR: f64 = 365.0 * DAY;

fn ago(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Human phrasing of how long ago `then` was.
///
/// Under a minute counts exact seconds; beyond that the single largest unit
/// is used, rounded to the nearest whole ("2 minutes ago", "1 year ago").
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    if secs < 60 {
        return ago(secs, "second");
    }

    let secs = secs as f64;
    let (value, unit) = if secs < HOUR {
        (secs / MINUTE, "minute")
    } else if secs < DAY {
        (secs / HOUR, "hour")
    } else if secs < MONTH {
        (secs / DAY, "day")
    } else if secs < YEAR {
        (secs / MONTH, "month")
    } else {
        (secs / YEAR, "year")
    };

    ago(value.round() as i64, unit)
}

/// Picture to show for a favorite
pub fn display_image_url(favorite: &Favorite) -> &str {
    let url = favorite.image_url.as_str();
    if url.is_empty() || url.contains("missing_image.png") {
        FALLBACK_IMAGE
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago_secs(secs: i64) -> String {
        let now = Utc::now();
        relative_time(now - Duration::seconds(secs), now)
    }

    #[test]
    fn test_seconds() {
        assert_eq!(ago_secs(0), "0 seconds ago");
        assert_eq!(ago_secs(1), "1 second ago");
        assert_eq!(ago_secs(59), "59 seconds ago");
        assert_eq!(ago_secs(-5), "0 seconds ago");
    }

    #[test]
    fn test_larger_units() {
        assert_eq!(ago_secs(60), "1 minute ago");
        assert_eq!(ago_secs(150), "3 minutes ago");
        assert_eq!(ago_secs(3 * 3600), "3 hours ago");
        assert_eq!(ago_secs(2 * 86_400), "2 days ago");
        assert_eq!(ago_secs(5 * 30 * 86_400), "5 months ago");
        assert_eq!(ago_secs(365 * 86_400), "1 year ago");
    }

    fn favorite(image_url: &str) -> Favorite {
        Favorite {
            id: "a".to_string(),
            name: "A".to_string(),
            image_url: image_url.to_string(),
            added_at: Utc::now(),
            birthday: String::new(),
            deathday: String::new(),
            nationality: String::new(),
        }
    }

    #[test]
    fn test_display_image_url() {
        assert_eq!(display_image_url(&favorite("")), FALLBACK_IMAGE);
        assert_eq!(
            display_image_url(&favorite("https://d32dm0rphc51dk.cloudfront.net/missing_image.png")),
            FALLBACK_IMAGE
        );
        assert_eq!(
            display_image_url(&favorite("https://img.example.com/thumb.jpg")),
            "https://img.example.com/thumb.jpg"
        );
    }
}

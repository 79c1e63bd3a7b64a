use chrono::{DateTime, Utc};
use ratatui::prelude::Color;

/// Truncate a string to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Display color for a movie rating
pub fn rating_color(rating: f64) -> Color {
  if rating >= 8.0 {
    Color::Green
  } else if rating >= 6.5 {
    Color::Yellow
  } else {
    Color::White
  }
}

/// Short age of a cached result, e.g. "42s", "5m", "3h"
pub fn cache_age(cached_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let secs = (now - cached_at).num_seconds().max(0);
  match secs {
    0..=59 => format!("{}s", secs),
    60..=3599 => format!("{}m", secs / 60),
    _ => format!("{}h", secs / 3600),
  }
}

/// Marker shown next to liked movies
pub fn liked_marker(liked: bool) -> &'static str {
  if liked {
    "♥"
  } else {
    " "
  }
}

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(value) => {
            if (value - value.round()).abs() < 1e-9 {
                format!("{}", value.round() as i64)
            } else {
                format!("{value:.2}")
            }
        }
        None => "—".to_string(),
    }
}

pub fn ellipsize(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let kept = text.chars().take(max_chars.saturating_sub(1)).collect::<String>();
    format!("{kept}…")
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_score_whole_and_fractional() {
        assert_eq!(format_score(Some(5.0)), "5");
        assert_eq!(format_score(Some(3.25)), "3.25");
        assert_eq!(format_score(None), "—");
    }

    #[test]
    fn ellipsize_keeps_short_text() {
        assert_eq!(ellipsize("billing", 12), "billing");
        assert_eq!(ellipsize("a very long factsheet name", 10), "a very lo…");
    }

    #[test]
    fn stable_pair_is_deterministic() {
        assert_eq!(stable_pair("entity-1"), stable_pair("entity-1"));
    }
}

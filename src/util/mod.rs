pub mod assets;
pub mod persistence;
pub mod version;

/// Two-decimal euro amount, the only rounding the engine's callers apply.
pub fn format_money(value: f64) -> String {
    format!("{value:.2}€")
}

pub fn format_kg(value: f64) -> String {
    format!("{value:.2} kg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_for_display_only() {
        assert_eq!(format_money(14.166_666), "14.17€");
        assert_eq!(format_money(20.0), "20.00€");
        assert_eq!(format_kg(1.8), "1.80 kg");
    }
}

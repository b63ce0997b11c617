//! Value formatting shared by the display and the web page

/// Shown on the display for a missing value
pub const DISPLAY_PLACEHOLDER: &str = "N/A";

/// Shown on the web page for a missing value
pub const WEB_PLACEHOLDER: &str = "...";

/// Format a value with one decimal, or the placeholder when absent.
///
/// A missing value is never rendered as a number.
pub fn format_value(value: Option<f64>, placeholder: &str) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => placeholder.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(25.04), DISPLAY_PLACEHOLDER), "25.0");
        assert_eq!(format_value(Some(-3.25), DISPLAY_PLACEHOLDER), "-3.2");
        assert_eq!(format_value(None, DISPLAY_PLACEHOLDER), "N/A");
        assert_eq!(format_value(None, WEB_PLACEHOLDER), "...");
    }
}

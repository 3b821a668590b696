//! Human-readable value formatting shared by the markdown and SVG output.

use benchplot_core::ValueSelector;

/// Format a duration given in microseconds with a fitting unit.
pub fn format_micros(micros: f64) -> String {
    if micros >= 1_000_000.0 {
        format!("{:.2} s", micros / 1_000_000.0)
    } else if micros >= 1_000.0 {
        format!("{:.2} ms", micros / 1_000.0)
    } else if micros >= 1.0 {
        format!("{:.2} µs", micros)
    } else {
        format!("{:.2} ns", micros * 1_000.0)
    }
}

/// Format a size given in kibibytes; switches to MB from 1000 KB upward.
pub fn format_kb(kb: f64) -> String {
    if kb < 1000.0 {
        format!("{:.2} KB", kb)
    } else {
        format!("{:.2} MB", kb / 1024.0)
    }
}

/// Format `value` according to the figure it was selected as.
pub fn format_value(value: f64, selector: ValueSelector) -> String {
    match selector {
        ValueSelector::MedianTime => format_micros(value),
        ValueSelector::Size => format_kb(value),
    }
}

/// Axis caption for a selector.
pub fn axis_description(selector: ValueSelector) -> &'static str {
    match selector {
        ValueSelector::MedianTime => "Median time",
        ValueSelector::Size => "File size",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_micros() {
        assert_eq!(format_micros(906_480.0), "906.48 ms");
        assert_eq!(format_micros(1_474_300.0), "1.47 s");
        assert_eq!(format_micros(12.5), "12.50 µs");
        assert_eq!(format_micros(0.5), "500.00 ns");
    }

    #[test]
    fn test_format_kb() {
        assert_eq!(format_kb(492.22), "492.22 KB");
        assert_eq!(format_kb(30_463.23), "29.75 MB");
    }

    #[test]
    fn test_format_value_follows_selector() {
        assert_eq!(format_value(2_000.0, ValueSelector::MedianTime), "2.00 ms");
        assert_eq!(format_value(2_000.0, ValueSelector::Size), "1.95 MB");
    }
}

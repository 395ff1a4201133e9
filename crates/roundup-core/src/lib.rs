// Library root for the weekly roundup engine.
//
// Every module here is a pure function of provider data: nothing in this
// crate performs I/O, so callers can interpose caches or fixtures freely.

pub mod awards;
pub mod boom_bust;
pub mod draft;
pub mod incentives;
pub mod leaders;
pub mod league;
pub mod narrative;
pub mod performance;
pub mod position;
pub mod report;
pub mod scoreboard;
pub mod standings;

/// Round to one decimal place, the precision used for every displayed total.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Render a points value for display text.
///
/// Whole numbers keep one decimal (`12.0`); fractional values are shown with
/// up to two decimals and no trailing zeros (`132.42`, `0.3`).
pub fn format_points(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round1_keeps_one_decimal() {
        assert_eq!(round1(12.34), 12.3);
        assert_eq!(round1(12.36), 12.4);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn format_points_keeps_one_decimal_for_whole_numbers() {
        assert_eq!(format_points(12.0), "12.0");
        assert_eq!(format_points(132.42), "132.42");
        assert_eq!(format_points(0.1 + 0.2), "0.3");
        assert_eq!(format_points(98.5), "98.5");
    }
}

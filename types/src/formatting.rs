//! Centralized number formatting utilities.
//!
//! Coordinates and distances shown in waypoint icons and indicator text go
//! through this module so every surface agrees on precision, and so the
//! European style (swapping `.` and `,`) can be toggled in one place.

/// Apply European number format by swapping `.` and `,` in a formatted string.
fn europeanize(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '.' => result.push(','),
            ',' => result.push('.'),
            _ => result.push(c),
        }
    }
    result
}

/// Apply European formatting conditionally.
#[inline]
fn maybe_eu(s: String, european: bool) -> String {
    if european {
        europeanize(&s)
    } else {
        s
    }
}

/// Format a distance in blocks for compact display.
///
/// - Values >= 1,000 are formatted as `X.XXkm`
/// - Values below 1,000 are whole blocks with an `m` suffix
/// - Negative input is treated as zero
///
/// # Examples
/// ```
/// use waypoints_types::formatting::format_distance;
/// assert_eq!(format_distance(0.0, false), "0m");
/// assert_eq!(format_distance(349.6, false), "350m");
/// assert_eq!(format_distance(1_500.0, false), "1.50km");
/// assert_eq!(format_distance(1_500.0, true), "1,50km");
/// ```
pub fn format_distance(blocks: f64, european: bool) -> String {
    let blocks = blocks.max(0.0);
    let s = if blocks >= 1_000.0 {
        format!("{:.2}km", blocks / 1_000.0)
    } else {
        format!("{:.0}m", blocks)
    };
    maybe_eu(s, european)
}

/// Format a single world coordinate with one decimal place.
///
/// # Examples
/// ```
/// use waypoints_types::formatting::format_coordinate;
/// assert_eq!(format_coordinate(12.5, false), "12.5");
/// assert_eq!(format_coordinate(-3.0, false), "-3.0");
/// assert_eq!(format_coordinate(12.5, true), "12,5");
/// ```
pub fn format_coordinate(n: f64, european: bool) -> String {
    maybe_eu(format!("{:.1}", n), european)
}

/// Format a block position as `x, y, z`.
///
/// Block positions are integral so no European swap applies; the separator
/// switches to `;` in European mode to stay unambiguous.
///
/// # Examples
/// ```
/// use waypoints_types::formatting::format_block_position;
/// assert_eq!(format_block_position(12, 64, -30, false), "12, 64, -30");
/// assert_eq!(format_block_position(12, 64, -30, true), "12; 64; -30");
/// ```
pub fn format_block_position(x: i64, y: i64, z: i64, european: bool) -> String {
    let sep = if european { "; " } else { ", " };
    format!("{x}{sep}{y}{sep}{z}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0, false), "0m");
        assert_eq!(format_distance(-5.0, false), "0m");
        assert_eq!(format_distance(42.0, false), "42m");
        assert_eq!(format_distance(999.0, false), "999m");
        assert_eq!(format_distance(1_000.0, false), "1.00km");
        assert_eq!(format_distance(12_250.0, false), "12.25km");
    }

    #[test]
    fn test_format_distance_european() {
        assert_eq!(format_distance(42.0, true), "42m");
        assert_eq!(format_distance(1_500.0, true), "1,50km");
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(0.0, false), "0.0");
        assert_eq!(format_coordinate(100.27, false), "100.3");
        assert_eq!(format_coordinate(-64.5, true), "-64,5");
    }

    #[test]
    fn test_format_block_position() {
        assert_eq!(format_block_position(0, 0, 0, false), "0, 0, 0");
        assert_eq!(format_block_position(-1, 320, 7, true), "-1; 320; 7");
    }

    #[test]
    fn test_europeanize() {
        assert_eq!(europeanize("1.50km"), "1,50km");
        assert_eq!(europeanize("1,500"), "1.500");
        assert_eq!(europeanize("500"), "500");
    }
}

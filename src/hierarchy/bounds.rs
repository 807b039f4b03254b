use std::sync::OnceLock;

use regex::Regex;

use crate::geometry::Rect;

fn bounds_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[(-?\d+),(-?\d+)\]\[(-?\d+),(-?\d+)\]").expect("valid bounds regex")
    })
}

/// Parses the uiautomator `[x1,y1][x2,y2]` corner encoding.
///
/// Anything that does not match (including inverted corners) is "no
/// geometry", not an error.
pub fn parse_bounds(s: &str) -> Option<Rect> {
    let caps = bounds_pattern().captures(s)?;
    let coord = |i: usize| caps.get(i)?.as_str().parse::<i32>().ok();
    Rect::from_corners(coord(1)?, coord(2)?, coord(3)?, coord(4)?)
}

/// Inverse of [`parse_bounds`].
pub fn format_bounds(rect: &Rect) -> String {
    format!("[{},{}][{},{}]", rect.x, rect.y, rect.right(), rect.bottom())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_corner_pairs() {
        assert_eq!(parse_bounds("[0,0][1080,2400]"), Some(Rect::new(0, 0, 1080, 2400)));
        assert_eq!(parse_bounds("[42,168][1038,310]"), Some(Rect::new(42, 168, 996, 142)));
    }

    #[test]
    fn malformed_is_none() {
        assert_eq!(parse_bounds(""), None);
        assert_eq!(parse_bounds("[0,0]"), None);
        assert_eq!(parse_bounds("[a,b][c,d]"), None);
        assert_eq!(parse_bounds("[0, 0][10, 10]"), None);
        assert_eq!(parse_bounds("[99999999999,0][1,1]"), None);
    }

    #[test]
    fn inverted_corners_are_none() {
        assert_eq!(parse_bounds("[100,100][50,200]"), None);
    }

    #[test]
    fn zero_sized_is_a_rect() {
        assert_eq!(parse_bounds("[5,5][5,5]"), Some(Rect::new(5, 5, 0, 0)));
    }

    #[test]
    fn format_matches_parse() {
        let r = Rect::new(3, 4, 10, 20);
        assert_eq!(format_bounds(&r), "[3,4][13,24]");
    }
}

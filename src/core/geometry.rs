use std::f64::consts::{FRAC_PI_2, PI};

use crate::core::Point;

#[must_use]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

#[must_use]
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Point at `angle` radians on a circle, with y growing downward.
#[must_use]
pub fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        (f64::from(center.x) + radius * angle.cos()).round() as i32,
        (f64::from(center.y) + radius * angle.sin()).round() as i32,
    )
}

/// Vertices of a regular polygon with the first vertex at 12 o'clock.
///
/// Vertices are listed clockwise (screen space). Fewer than three sides yields
/// no vertices.
#[must_use]
pub fn polygon_vertices(center: Point, radius: f64, sides: usize) -> Vec<Point> {
    if sides < 3 {
        return Vec::new();
    }
    let step = 2.0 * PI / sides as f64;
    (0..sides)
        .map(|i| point_on_circle(center, radius, -FRAC_PI_2 + step * i as f64))
        .collect()
}

/// Normalizes an angle to `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(2.0 * PI)
}

/// Midpoint of the segment `a..b`, rounded to whole pixels.
#[must_use]
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new(
        ((f64::from(a.x) + f64::from(b.x)) / 2.0).round() as i32,
        ((f64::from(a.y) + f64::from(b.y)) / 2.0).round() as i32,
    )
}

/// Splits a polyline at null markers into contiguous sub-paths.
#[must_use]
pub fn split_at_nulls(points: &[Point]) -> Vec<&[Point]> {
    points
        .split(|p| p.is_null())
        .filter(|segment| !segment.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_vertices_start_at_top_and_go_clockwise() {
        let vertices = polygon_vertices(Point::new(100, 100), 50.0, 4);
        assert_eq!(
            vertices,
            vec![
                Point::new(100, 50),
                Point::new(150, 100),
                Point::new(100, 150),
                Point::new(50, 100),
            ]
        );
    }

    #[test]
    fn split_drops_empty_segments() {
        let points = [
            Point::null(0),
            Point::new(1, 1),
            Point::null(2),
            Point::null(3),
            Point::new(4, 4),
            Point::new(5, 5),
        ];
        let segments = split_at_nulls(&points);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].len(), 2);
    }
}

//! Common test fixtures.

use blaze_common::{ColorGradient, Point};

/// Transparent black to opaque white.
pub fn black_to_white() -> ColorGradient {
    ColorGradient::new([(0.0, 0x00000000), (1.0, 0xffffffff)])
}

/// Opaque red to opaque blue, stops given out of order.
pub fn blue_to_red_unsorted() -> ColorGradient {
    ColorGradient::new([(1.0, 0xff0000ff), (0.0, 0x0000ffff)])
}

/// Four points on a 200x200 canvas, two of them coincident.
pub fn sample_points() -> Vec<Point> {
    vec![
        Point::unit(100.0, 100.0),
        Point::unit(145.0, 130.0),
        Point::unit(145.0, 130.0),
        Point::unit(110.0, 150.0),
    ]
}

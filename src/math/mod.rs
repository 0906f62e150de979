pub mod distance_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

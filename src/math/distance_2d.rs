use super::Point2;

/// Returns the summed endpoint distances for pairing `(a_start, a_end)` with
/// `(b_start, b_end)` both ways.
///
/// The first value pairs start with start and end with end, the second value
/// pairs start with end and end with start.
#[must_use]
pub fn endpoint_pairing_distances(
    a_start: &Point2,
    a_end: &Point2,
    b_start: &Point2,
    b_end: &Point2,
) -> (f64, f64) {
    let straight = nalgebra::distance(a_start, b_start) + nalgebra::distance(a_end, b_end);
    let crossed = nalgebra::distance(a_start, b_end) + nalgebra::distance(a_end, b_start);
    (straight, crossed)
}

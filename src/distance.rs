use crate::observation::Observation;
use ndarray::{Array1, ArrayView1};

/// Squared L2 distance between two coordinate vectors of equal length
#[inline]
pub fn squared_euclidean(a: &ArrayView1<'_, f64>, b: &ArrayView1<'_, f64>) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Mean distance from `point` to every member of `members`.
///
/// `point` may itself be a member; its zero self-distance is counted.
/// Returns 0.0 for an empty member set.
pub fn average_distance<P: Observation + ?Sized>(point: &P, members: &[&P]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }

    let total: f64 = members
        .iter()
        .map(|member| point.distance(&member.coordinates()))
        .sum();

    total / members.len() as f64
}

/// Component-wise arithmetic mean of the members' coordinates.
///
/// Returns `None` when `members` is empty.
pub fn mean_coordinates<P: Observation + ?Sized>(members: &[&P]) -> Option<Array1<f64>> {
    let first = members.first()?;
    let mut sum = first.coordinates().to_owned();
    for member in &members[1..] {
        sum += &member.coordinates();
    }
    sum /= members.len() as f64;
    Some(sum)
}

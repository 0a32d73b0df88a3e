use serde::Serialize;

use crate::model::Points;

/// Most points a single round can award (3 object + 2 year).
pub const MAX_ROUND_POINTS: Points = Points::whole(5);

const FIRST_TRY_OBJECT_POINTS: Points = Points::whole(3);
const RETRY_OBJECT_POINTS: Points = Points::whole(1);

/// Year tiers as `(max distance, points)`, checked in order.
const YEAR_TIERS: [(u32, Points); 4] = [
    (0, Points::whole(2)),
    (5, Points::from_halves(3)),
    (10, Points::whole(1)),
    (15, Points::from_halves(1)),
];

/// Points awarded for one finalized round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AwardedPoints {
    pub object: Points,
    pub year: Points,
}

impl AwardedPoints {
    #[must_use]
    pub fn total(&self) -> Points {
        self.object + self.year
    }
}

/// Score a finalized round.
///
/// The object bonus is paid only when the first attempt already named the
/// object correctly. Year points are tiered by distance and paid only when
/// the object is correct.
///
/// # Examples
///
/// ```
/// # use relic_core::scoring::score_attempt;
/// # use relic_core::model::Points;
/// let awarded = score_attempt(true, Some(false), 5);
/// assert_eq!(awarded.object, Points::whole(1));
/// assert_eq!(awarded.total(), Points::from_halves(5));
/// ```
#[must_use]
pub fn score_attempt(
    object_correct: bool,
    first_try_object_correct: Option<bool>,
    year_diff: u32,
) -> AwardedPoints {
    if !object_correct {
        return AwardedPoints::default();
    }

    let object = if first_try_object_correct == Some(true) {
        FIRST_TRY_OBJECT_POINTS
    } else {
        RETRY_OBJECT_POINTS
    };

    AwardedPoints {
        object,
        year: year_points(year_diff),
    }
}

/// Tiered year award for a distance in years.
#[must_use]
pub fn year_points(year_diff: u32) -> Points {
    YEAR_TIERS
        .iter()
        .find(|(max_diff, _)| year_diff <= *max_diff)
        .map_or(Points::ZERO, |(_, points)| *points)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incorrect_object_scores_nothing() {
        assert_eq!(score_attempt(false, Some(true), 0).total(), Points::ZERO);
        assert_eq!(score_attempt(false, None, 0).total(), Points::ZERO);
    }

    #[test]
    fn first_try_bonus_requires_latched_true() {
        assert_eq!(score_attempt(true, Some(true), 100).object, Points::whole(3));
        assert_eq!(score_attempt(true, Some(false), 100).object, Points::whole(1));
        assert_eq!(score_attempt(true, None, 100).object, Points::whole(1));
    }

    #[test]
    fn year_tiers_step_down_at_boundaries() {
        assert_eq!(year_points(0), Points::whole(2));
        assert_eq!(year_points(1), Points::from_halves(3));
        assert_eq!(year_points(5), Points::from_halves(3));
        assert_eq!(year_points(6), Points::whole(1));
        assert_eq!(year_points(10), Points::whole(1));
        assert_eq!(year_points(11), Points::from_halves(1));
        assert_eq!(year_points(15), Points::from_halves(1));
        assert_eq!(year_points(16), Points::ZERO);
    }

    #[test]
    fn perfect_first_try_is_the_maximum() {
        assert_eq!(score_attempt(true, Some(true), 0).total(), MAX_ROUND_POINTS);
    }
}

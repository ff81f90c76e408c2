//! Geometric rules for tower placement.

use path_defence_core::{EnemyPath, PlacementError, PlacementRules, Vec2};

/// Checks clearance from the path waypoints and from existing towers.
///
/// Only waypoints are tested, not the segments between them.
pub(crate) fn check_clearance(
    point: Vec2,
    path: &EnemyPath,
    towers: impl IntoIterator<Item = Vec2>,
    rules: &PlacementRules,
) -> Result<(), PlacementError> {
    if path
        .waypoints()
        .iter()
        .any(|waypoint| waypoint.distance(point) < rules.min_path_distance)
    {
        return Err(PlacementError::TooCloseToPath);
    }

    if towers
        .into_iter()
        .any(|tower| tower.distance(point) < rules.min_tower_distance)
    {
        return Err(PlacementError::TooCloseToTower);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> PlacementRules {
        PlacementRules {
            min_path_distance: 40.0,
            min_tower_distance: 35.0,
        }
    }

    fn path() -> EnemyPath {
        EnemyPath::new(vec![Vec2::new(0.0, 300.0), Vec2::new(900.0, 300.0)]).expect("path")
    }

    #[test]
    fn waypoint_clearance_is_exclusive() {
        assert_eq!(
            check_clearance(Vec2::new(0.0, 261.0), &path(), Vec::<Vec2>::new(), &rules()),
            Err(PlacementError::TooCloseToPath)
        );
        assert_eq!(
            check_clearance(Vec2::new(0.0, 260.0), &path(), Vec::<Vec2>::new(), &rules()),
            Ok(())
        );
    }

    #[test]
    fn segment_interiors_are_not_checked() {
        assert_eq!(
            check_clearance(Vec2::new(450.0, 300.0), &path(), Vec::<Vec2>::new(), &rules()),
            Ok(())
        );
    }

    #[test]
    fn towers_keep_their_distance() {
        let towers = [Vec2::new(450.0, 100.0)];
        assert_eq!(
            check_clearance(Vec2::new(480.0, 100.0), &path(), towers, &rules()),
            Err(PlacementError::TooCloseToTower)
        );
        assert_eq!(
            check_clearance(Vec2::new(485.0, 100.0), &path(), towers, &rules()),
            Ok(())
        );
    }
}

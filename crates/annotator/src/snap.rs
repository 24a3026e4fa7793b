//! Angle quantization for interactively drawn lines.
//!
//! `GridSnapper::snap_line` pulls the end point of a line onto the nearest
//! canonical direction. Rules are tried in a fixed order and the first match
//! wins when tolerances overlap:
//! horizontal (0°/180°) → vertical (90°/270°) → 45°/225° → 135°/315° → none.
//! Angle closeness is circular distance, so 359° is 1° away from 0°.

use serde::{Deserialize, Serialize};

use crate::geom2::Point;

/// Snapping configuration, mutated from a settings panel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapSettings {
    pub enabled: bool,
    /// Tolerance in degrees around 0°/90°/180°/270°.
    pub orthogonal_snap_angle: f64,
    /// Tolerance in degrees around the diagonals.
    pub diagonal_snap_angle: f64,
    pub enable_diagonal_snap: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            orthogonal_snap_angle: 15.0,
            diagonal_snap_angle: 10.0,
            enable_diagonal_snap: true,
        }
    }
}

/// Partial update; `None` fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapSettingsPatch {
    pub enabled: Option<bool>,
    pub orthogonal_snap_angle: Option<f64>,
    pub diagonal_snap_angle: Option<f64>,
    pub enable_diagonal_snap: Option<bool>,
}

impl SnapSettings {
    pub fn apply(&mut self, patch: SnapSettingsPatch) {
        if let Some(v) = patch.enabled {
            self.enabled = v;
        }
        if let Some(v) = patch.orthogonal_snap_angle {
            self.orthogonal_snap_angle = v;
        }
        if let Some(v) = patch.diagonal_snap_angle {
            self.diagonal_snap_angle = v;
        }
        if let Some(v) = patch.enable_diagonal_snap {
            self.enable_diagonal_snap = v;
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapType {
    Horizontal,
    Vertical,
    Diagonal45,
    Diagonal135,
}

/// Snapped end point plus metadata for preview rendering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    pub snapped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap_type: Option<SnapType>,
}

impl SnapResult {
    fn unsnapped(end: Point) -> Self {
        Self {
            x: end.x,
            y: end.y,
            snapped: false,
            snap_type: None,
        }
    }

    fn snapped(x: f64, y: f64, kind: SnapType) -> Self {
        Self {
            x,
            y,
            snapped: true,
            snap_type: Some(kind),
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GridSnapper {
    settings: SnapSettings,
}

impl GridSnapper {
    pub fn new(settings: SnapSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SnapSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, patch: SnapSettingsPatch) {
        self.settings.apply(patch);
    }

    pub fn snap_line(&self, start: Point, end: Point) -> SnapResult {
        let s = &self.settings;
        if !s.enabled {
            return SnapResult::unsnapped(end);
        }
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);

        let near = |targets: [f64; 2], tol: f64| {
            targets.iter().any(|&t| is_close_to_angle(angle, t, tol))
        };

        if near([0.0, 180.0], s.orthogonal_snap_angle) {
            return SnapResult::snapped(end.x, start.y, SnapType::Horizontal);
        }
        if near([90.0, 270.0], s.orthogonal_snap_angle) {
            return SnapResult::snapped(start.x, end.y, SnapType::Vertical);
        }
        if s.enable_diagonal_snap {
            let avg = (dx.abs() + dy.abs()) / 2.0;
            if near([45.0, 225.0], s.diagonal_snap_angle) {
                return SnapResult::snapped(
                    start.x + avg * sign(dx),
                    start.y + avg * sign(dy),
                    SnapType::Diagonal45,
                );
            }
            if near([135.0, 315.0], s.diagonal_snap_angle) {
                // y mirrors the x direction so dy = -dx
                return SnapResult::snapped(
                    start.x + avg * sign(dx),
                    start.y - avg * sign(dx),
                    SnapType::Diagonal135,
                );
            }
        }
        SnapResult::unsnapped(end)
    }
}

/// Circular distance between two angles in degrees is within `tolerance`.
fn is_close_to_angle(current: f64, target: f64, tolerance: f64) -> bool {
    let d = current - target;
    d.abs().min((d + 360.0).abs()).min((d - 360.0).abs()) <= tolerance
}

/// Sign with `sign(0) == 0`, unlike `f64::signum`.
#[inline]
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at_angle(deg: f64, len: f64) -> Point {
        let r = deg.to_radians();
        Point::new(len * r.cos(), len * r.sin())
    }

    const O: Point = Point { x: 0.0, y: 0.0 };

    #[test]
    fn ten_degrees_snaps_horizontal() {
        let sn = GridSnapper::new(SnapSettings::default());
        let end = at_angle(10.0, 100.0);
        let r = sn.snap_line(O, end);
        assert_eq!(r.snap_type, Some(SnapType::Horizontal));
        assert_eq!(r.x, end.x);
        assert_eq!(r.y, 0.0);
    }

    #[test]
    fn forty_six_degrees_snaps_diagonal() {
        let sn = GridSnapper::new(SnapSettings::default());
        let end = at_angle(46.0, 100.0);
        let r = sn.snap_line(O, end);
        assert_eq!(r.snap_type, Some(SnapType::Diagonal45));
        assert!((r.x - r.y).abs() < 1e-12);
        assert!(r.x > 0.0);
    }

    #[test]
    fn disabled_passes_through() {
        let mut s = SnapSettings::default();
        s.toggle();
        let end = at_angle(10.0, 100.0);
        let r = GridSnapper::new(s).snap_line(O, end);
        assert!(!r.snapped);
        assert_eq!(r.point(), end);
        assert_eq!(r.snap_type, None);
    }

    #[test]
    fn vertical_and_wraparound() {
        let sn = GridSnapper::new(SnapSettings::default());
        let start = Point::new(5.0, 5.0);
        let r = sn.snap_line(start, Point::new(8.0, 50.0));
        assert_eq!(r.snap_type, Some(SnapType::Vertical));
        assert_eq!((r.x, r.y), (5.0, 50.0));
        // 355° is 5° from 0°
        let end = at_angle(355.0, 10.0);
        let r = sn.snap_line(O, end);
        assert_eq!(r.snap_type, Some(SnapType::Horizontal));
    }

    #[test]
    fn diagonal_135_mirrors_y() {
        let sn = GridSnapper::new(SnapSettings::default());
        // 140°: dx < 0, dy > 0
        let end = at_angle(140.0, 100.0);
        let r = sn.snap_line(O, end);
        assert_eq!(r.snap_type, Some(SnapType::Diagonal135));
        assert!(r.x < 0.0 && r.y > 0.0);
        assert!((r.x + r.y).abs() < 1e-12);
        // 320°: dx > 0, dy < 0
        let r = sn.snap_line(O, at_angle(320.0, 100.0));
        assert_eq!(r.snap_type, Some(SnapType::Diagonal135));
        assert!(r.x > 0.0 && r.y < 0.0);
    }

    #[test]
    fn diagonal_disabled_and_gaps() {
        let mut sn = GridSnapper::new(SnapSettings::default());
        sn.update_settings(SnapSettingsPatch {
            enable_diagonal_snap: Some(false),
            ..Default::default()
        });
        assert!(!sn.snap_line(O, at_angle(45.0, 10.0)).snapped);
        // 30° is outside every default tolerance
        sn.update_settings(SnapSettingsPatch {
            enable_diagonal_snap: Some(true),
            ..Default::default()
        });
        assert!(!sn.snap_line(O, at_angle(30.0, 10.0)).snapped);
    }

    #[test]
    fn overlapping_tolerances_prefer_horizontal() {
        let sn = GridSnapper::new(SnapSettings {
            orthogonal_snap_angle: 30.0,
            diagonal_snap_angle: 30.0,
            ..SnapSettings::default()
        });
        // 25° is within both 0±30 and 45±30
        assert_eq!(
            sn.snap_line(O, at_angle(25.0, 10.0)).snap_type,
            Some(SnapType::Horizontal)
        );
    }

    #[test]
    fn settings_serialize_camel_case() {
        let v = serde_json::to_value(SnapSettings::default()).unwrap();
        assert_eq!(v["orthogonalSnapAngle"], 15.0);
        assert_eq!(v["enableDiagonalSnap"], true);
    }

    proptest! {
        #[test]
        fn snapped_lines_are_canonical(x in -500f64..500.0, y in -500f64..500.0) {
            let sn = GridSnapper::new(SnapSettings::default());
            let r = sn.snap_line(O, Point::new(x, y));
            match r.snap_type {
                Some(SnapType::Horizontal) => prop_assert_eq!(r.y, 0.0),
                Some(SnapType::Vertical) => prop_assert_eq!(r.x, 0.0),
                Some(SnapType::Diagonal45) => prop_assert!((r.x - r.y).abs() < 1e-9),
                Some(SnapType::Diagonal135) => prop_assert!((r.x + r.y).abs() < 1e-9),
                None => {
                    prop_assert!(!r.snapped);
                    prop_assert_eq!((r.x, r.y), (x, y));
                }
            }
        }
    }
}

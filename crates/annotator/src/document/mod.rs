//! Session document: perimeter, scale, zones, antennas and measures.
//!
//! Purpose
//! - One owned aggregate per session; every operation takes it by reference, so
//!   several documents can live side by side (tests, CLI batch runs).
//!
//! Invariants
//! - Zone, antenna and measure ids come from per-document counters that only
//!   grow. Deleted ids are never handed out again; import raises the counters
//!   past every imported id.
//! - Deleting a zone deletes every antenna whose `zone_id` matches.
//! - Missing preconditions (unknown id, unset scale) are no-ops that return
//!   `None`/`false`, not errors. Only import reports errors.
//!
//! Change notification
//! - Each successful mutation bumps `revision()` and queues a `DocumentEvent`.
//!   Renderers either compare revisions or drain `take_events()` after a call.

mod io;
mod types;

pub use io::ImportError;
pub use types::{Antenna, DocumentData, Measure, ScaleLine, Zone};

use std::collections::BTreeSet;

use crate::geom2::{point_in_rect, Perimeter, Point};
use crate::placement::{coverage_radius_for, plan_zone, PlacementPolicy, PlannerCfg};

/// Number of entries in the zone color palette.
pub const ZONE_COLOR_COUNT: usize = 5;
/// Default ceiling height (m) for new zones.
pub const DEFAULT_CEILING_HEIGHT: f64 = 3.0;
/// Default shelf height (m) for new zones.
pub const DEFAULT_SHELF_HEIGHT: f64 = 2.1;

/// What changed in the last mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum DocumentEvent {
    PerimeterChanged,
    ScaleChanged,
    ZoneAdded(u32),
    ZoneUpdated(u32),
    ZoneDeleted { id: u32, antennas_removed: usize },
    ZonePopulated { id: u32, removed: usize, placed: usize },
    AntennaAdded(u32),
    AntennaMoved(u32),
    AntennasDeleted(Vec<u32>),
    MeasureAdded(u32),
    MeasureDeleted(u32),
    SelectionChanged,
    Imported,
}

#[derive(Clone, Debug)]
pub struct Document {
    perimeter: Perimeter,
    scale: ScaleLine,
    zones: Vec<Zone>,
    antennas: Vec<Antenna>,
    measures: Vec<Measure>,
    next_zone_id: u32,
    next_antenna_id: u32,
    next_measure_id: u32,
    selected: BTreeSet<u32>,
    revision: u64,
    events: Vec<DocumentEvent>,
    /// Policy used by `populate_antennas_in_zone`; session config, not exported.
    pub placement_policy: PlacementPolicy,
    pub planner: PlannerCfg,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            perimeter: Perimeter::default(),
            scale: ScaleLine::default(),
            zones: Vec::new(),
            antennas: Vec::new(),
            measures: Vec::new(),
            next_zone_id: 1,
            next_antenna_id: 1,
            next_measure_id: 1,
            selected: BTreeSet::new(),
            revision: 0,
            events: Vec::new(),
            placement_policy: PlacementPolicy::default(),
            planner: PlannerCfg::default(),
        }
    }

    pub fn with_policy(policy: PlacementPolicy) -> Self {
        Self {
            placement_policy: policy,
            ..Self::new()
        }
    }

    // --- read access -------------------------------------------------------

    pub fn perimeter(&self) -> &Perimeter {
        &self.perimeter
    }
    pub fn scale(&self) -> &ScaleLine {
        &self.scale
    }
    pub fn meters_per_pixel(&self) -> Option<f64> {
        self.scale.meters_per_pixel()
    }
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }
    pub fn zone(&self, id: u32) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }
    pub fn antennas(&self) -> &[Antenna] {
        &self.antennas
    }
    pub fn antenna(&self, id: u32) -> Option<&Antenna> {
        self.antennas.iter().find(|a| a.id == id)
    }
    pub fn antennas_in_zone(&self, zone_id: u32) -> impl Iterator<Item = &Antenna> + '_ {
        self.antennas.iter().filter(move |a| a.zone_id == Some(zone_id))
    }
    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }
    pub fn selection(&self) -> &BTreeSet<u32> {
        &self.selected
    }
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drain queued change events (oldest first).
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.events)
    }

    fn notify(&mut self, event: DocumentEvent) {
        self.revision += 1;
        self.events.push(event);
    }

    // --- perimeter ---------------------------------------------------------

    pub fn add_perimeter_point(&mut self, p: Point) -> bool {
        if !p.is_finite() {
            return false;
        }
        self.perimeter.points.push(p);
        self.notify(DocumentEvent::PerimeterChanged);
        true
    }

    pub fn close_perimeter(&mut self) {
        self.perimeter.closed = true;
        self.notify(DocumentEvent::PerimeterChanged);
    }

    pub fn clear_perimeter(&mut self) {
        self.perimeter = Perimeter::default();
        self.notify(DocumentEvent::PerimeterChanged);
    }

    /// Replace the perimeter wholesale (e.g. from a drawing session).
    ///
    /// Non-finite points are dropped so the result can always be exported and
    /// imported again.
    pub fn set_perimeter(&mut self, mut perimeter: Perimeter) {
        perimeter.points.retain(Point::is_finite);
        self.perimeter = perimeter;
        self.notify(DocumentEvent::PerimeterChanged);
    }

    // --- scale -------------------------------------------------------------

    pub fn set_scale_line(&mut self, start: Point, end: Point) -> bool {
        if !(start.is_finite() && end.is_finite()) {
            return false;
        }
        self.scale.start = Some(start);
        self.scale.end = Some(end);
        self.notify(DocumentEvent::ScaleChanged);
        true
    }

    pub fn set_scale_meters(&mut self, meters: f64) -> bool {
        if !meters.is_finite() {
            return false;
        }
        self.scale.meters = Some(meters);
        self.notify(DocumentEvent::ScaleChanged);
        true
    }

    // --- zones -------------------------------------------------------------

    /// Add a zone; negative extents are normalized so `(x, y)` is the top-left corner.
    ///
    /// Returns the new id, or `None` for non-finite input.
    pub fn add_zone(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        ceiling_height: f64,
        shelf_height: f64,
    ) -> Option<u32> {
        if ![x, y, w, h, ceiling_height, shelf_height].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (x, w) = if w < 0.0 { (x + w, -w) } else { (x, w) };
        let (y, h) = if h < 0.0 { (y + h, -h) } else { (y, h) };
        let id = take_id(&mut self.next_zone_id)?;
        self.zones.push(Zone {
            id,
            x,
            y,
            w,
            h,
            label: format!("Zone {}", self.zones.len() + 1),
            ceiling_height,
            shelf_height,
            coverage_radius: coverage_radius_for(ceiling_height, shelf_height),
            show_coverage: false,
            color_index: self.zones.len() % ZONE_COLOR_COUNT,
            max_dist: None,
        });
        self.notify(DocumentEvent::ZoneAdded(id));
        Some(id)
    }

    /// Delete a zone and every antenna it owns. Returns the number of antennas removed.
    pub fn delete_zone(&mut self, id: u32) -> Option<usize> {
        let idx = self.zones.iter().position(|z| z.id == id)?;
        self.zones.remove(idx);
        let removed = self.remove_zone_antennas(id);
        self.notify(DocumentEvent::ZoneDeleted {
            id,
            antennas_removed: removed.len(),
        });
        Some(removed.len())
    }

    /// Step the zone's color by `direction` through the palette (wrapping).
    pub fn change_zone_color(&mut self, id: u32, direction: i32) -> bool {
        let Some(zone) = self.zones.iter_mut().find(|z| z.id == id) else {
            return false;
        };
        let n = ZONE_COLOR_COUNT as i64;
        zone.color_index = (zone.color_index as i64 + direction as i64).rem_euclid(n) as usize;
        self.notify(DocumentEvent::ZoneUpdated(id));
        true
    }

    /// Set ceiling/shelf heights and recompute the coverage radius.
    pub fn update_zone_parameters(&mut self, id: u32, ceiling_height: f64, shelf_height: f64) -> bool {
        if !(ceiling_height.is_finite() && shelf_height.is_finite()) {
            return false;
        }
        let Some(zone) = self.zones.iter_mut().find(|z| z.id == id) else {
            return false;
        };
        zone.ceiling_height = ceiling_height;
        zone.shelf_height = shelf_height;
        zone.coverage_radius = coverage_radius_for(ceiling_height, shelf_height);
        self.notify(DocumentEvent::ZoneUpdated(id));
        true
    }

    /// Set the explicit spacing used by the scored policy (`None` = rule fallback).
    pub fn set_zone_max_dist(&mut self, id: u32, max_dist: Option<f64>) -> bool {
        if max_dist.is_some_and(|d| !(d.is_finite() && d > 0.0)) {
            return false;
        }
        let Some(zone) = self.zones.iter_mut().find(|z| z.id == id) else {
            return false;
        };
        zone.max_dist = max_dist;
        self.notify(DocumentEvent::ZoneUpdated(id));
        true
    }

    pub fn toggle_zone_coverage(&mut self, id: u32) -> bool {
        let Some(zone) = self.zones.iter_mut().find(|z| z.id == id) else {
            return false;
        };
        zone.show_coverage = !zone.show_coverage;
        self.notify(DocumentEvent::ZoneUpdated(id));
        true
    }

    // --- antennas ----------------------------------------------------------

    fn push_antenna(&mut self, x: f64, y: f64, zone_id: Option<u32>) -> Option<u32> {
        let id = take_id(&mut self.next_antenna_id)?;
        self.antennas.push(Antenna {
            id,
            x,
            y,
            label: format!("A{}", self.antennas.len() + 1),
            zone_id,
        });
        Some(id)
    }

    fn remove_zone_antennas(&mut self, zone_id: u32) -> Vec<u32> {
        let mut removed = Vec::new();
        self.antennas.retain(|a| {
            let owned = a.zone_id == Some(zone_id);
            if owned {
                removed.push(a.id);
            }
            !owned
        });
        for id in &removed {
            self.selected.remove(id);
        }
        removed
    }

    pub fn add_antenna(&mut self, x: f64, y: f64, zone_id: Option<u32>) -> Option<u32> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        let id = self.push_antenna(x, y, zone_id)?;
        self.notify(DocumentEvent::AntennaAdded(id));
        Some(id)
    }

    pub fn delete_antenna(&mut self, id: u32) -> bool {
        let Some(idx) = self.antennas.iter().position(|a| a.id == id) else {
            return false;
        };
        self.antennas.remove(idx);
        self.selected.remove(&id);
        self.notify(DocumentEvent::AntennasDeleted(vec![id]));
        true
    }

    pub fn update_antenna_position(&mut self, id: u32, x: f64, y: f64) -> bool {
        if !(x.is_finite() && y.is_finite()) {
            return false;
        }
        let Some(a) = self.antennas.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        a.x = x;
        a.y = y;
        self.notify(DocumentEvent::AntennaMoved(id));
        true
    }

    /// Replace the zone's antennas with a fresh plan from the configured policy.
    ///
    /// Returns the number of antennas placed, or `None` (document untouched) when
    /// the zone does not exist or the scale is unset.
    pub fn populate_antennas_in_zone(&mut self, zone_id: u32) -> Option<usize> {
        self.populate_antennas_in_zone_with(zone_id, self.placement_policy)
    }

    pub fn populate_antennas_in_zone_with(
        &mut self,
        zone_id: u32,
        policy: PlacementPolicy,
    ) -> Option<usize> {
        let Some(zone) = self.zone(zone_id).cloned() else {
            tracing::debug!(zone = zone_id, "populate skipped: unknown zone");
            return None;
        };
        let Some(mpp) = self.meters_per_pixel() else {
            tracing::debug!(zone = zone_id, "populate skipped: scale not set");
            return None;
        };
        tracing::debug!(zone = zone_id, policy = policy.name(), mpp, "populate zone");

        let removed = self.remove_zone_antennas(zone_id);
        let plan = plan_zone(policy, &zone, &self.perimeter, mpp, &self.antennas, &self.planner);
        let mut placed = 0;
        for p in &plan {
            if self.push_antenna(p.x, p.y, Some(zone_id)).is_none() {
                tracing::warn!(zone = zone_id, "antenna ids exhausted, plan truncated");
                break;
            }
            placed += 1;
        }
        tracing::info!(
            zone = zone_id,
            policy = policy.name(),
            removed = removed.len(),
            placed,
            "zone populated"
        );
        self.notify(DocumentEvent::ZonePopulated {
            id: zone_id,
            removed: removed.len(),
            placed,
        });
        Some(placed)
    }

    // --- measures ----------------------------------------------------------

    pub fn add_measure(&mut self, start: Point, end: Point) -> Option<u32> {
        if !(start.is_finite() && end.is_finite()) {
            return None;
        }
        let id = take_id(&mut self.next_measure_id)?;
        self.measures.push(Measure { id, start, end });
        self.notify(DocumentEvent::MeasureAdded(id));
        Some(id)
    }

    pub fn delete_measure(&mut self, id: u32) -> bool {
        let Some(idx) = self.measures.iter().position(|m| m.id == id) else {
            return false;
        };
        self.measures.remove(idx);
        self.notify(DocumentEvent::MeasureDeleted(id));
        true
    }

    /// Measure length in meters, when the scale is set.
    pub fn measure_length_m(&self, id: u32) -> Option<f64> {
        let m = self.measures.iter().find(|m| m.id == id)?;
        Some(m.length_px() * self.meters_per_pixel()?)
    }

    // --- selection ---------------------------------------------------------

    pub fn select_antenna(&mut self, id: u32) -> bool {
        if self.antenna(id).is_none() || !self.selected.insert(id) {
            return false;
        }
        self.notify(DocumentEvent::SelectionChanged);
        true
    }

    pub fn deselect_antenna(&mut self, id: u32) -> bool {
        if !self.selected.remove(&id) {
            return false;
        }
        self.notify(DocumentEvent::SelectionChanged);
        true
    }

    pub fn clear_selection(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.notify(DocumentEvent::SelectionChanged);
        }
    }

    /// Replace the selection with every antenna inside the box spanned by `a` and `b`.
    pub fn select_antennas_in_rect(&mut self, a: Point, b: Point) -> usize {
        self.selected = self
            .antennas
            .iter()
            .filter(|ant| point_in_rect(ant.position(), a, b))
            .map(|ant| ant.id)
            .collect();
        self.notify(DocumentEvent::SelectionChanged);
        self.selected.len()
    }

    pub fn delete_selected_antennas(&mut self) -> usize {
        if self.selected.is_empty() {
            return 0;
        }
        let selected = std::mem::take(&mut self.selected);
        let mut removed = Vec::new();
        self.antennas.retain(|a| {
            let hit = selected.contains(&a.id);
            if hit {
                removed.push(a.id);
            }
            !hit
        });
        let n = removed.len();
        self.notify(DocumentEvent::AntennasDeleted(removed));
        n
    }
}

/// Hand out the counter value and advance it. `u32::MAX` is never issued, so
/// the counter always stays past every id in use.
fn take_id(counter: &mut u32) -> Option<u32> {
    let id = *counter;
    *counter = id.checked_add(1)?;
    Some(id)
}

//! JSON export/import of the document.
//!
//! Export is a straight serde dump of `DocumentData`. Import walks a
//! `serde_json::Value` by hand so that partially filled documents from older
//! versions still load:
//! - numeric fields that are missing, non-numeric or zero take their defaults
//!   (zone `w`/`h` = 100, ceiling 3, shelf 2.1, coverage radius 6, color 0);
//! - labels default to `Zone {n}` / `A{n}`;
//! - entries without a usable id (`u32::MAX` included) get fresh ids above every
//!   explicit id, and the counters end up past the largest id of each kind.
//!
//! Structural problems (non-object root, non-object entries, points without
//! numeric `x`/`y`) fail the whole import and leave the document untouched.

use std::fmt;

use serde_json::{Map, Value};

use super::{Antenna, Document, DocumentData, DocumentEvent, Measure, ScaleLine, Zone};
use crate::geom2::{Perimeter, Point};

const DEFAULT_ZONE_SIZE: f64 = 100.0;
const DEFAULT_COVERAGE_RADIUS: f64 = 6.0;

#[derive(Debug)]
pub enum ImportError {
    NotAnObject,
    Malformed { field: String, reason: String },
    Json(serde_json::Error),
}

impl ImportError {
    fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "invalid data format: expected a JSON object"),
            Self::Malformed { field, reason } => write!(f, "malformed `{field}`: {reason}"),
            Self::Json(e) => write!(f, "invalid JSON: {e}"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl Document {
    /// Snapshot in the exported shape.
    pub fn export(&self) -> DocumentData {
        DocumentData {
            perimeter: self.perimeter.clone(),
            scale: self.scale,
            zones: self.zones.clone(),
            antennas: self.antennas.clone(),
            measures: self.measures.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.export())
    }

    pub fn import_json(&mut self, text: &str) -> Result<(), ImportError> {
        let value: Value = serde_json::from_str(text).inspect_err(|e| {
            tracing::warn!(error = %e, "import rejected");
        })?;
        self.import_value(&value)
    }

    /// Replace the document content with `value`. On error nothing changes.
    ///
    /// Session settings (placement policy, planner config) are kept; the
    /// selection is cleared.
    pub fn import_value(&mut self, value: &Value) -> Result<(), ImportError> {
        let parsed = parse_document(value).inspect_err(|e| {
            tracing::warn!(error = %e, "import rejected");
        })?;
        self.perimeter = parsed.data.perimeter;
        self.scale = parsed.data.scale;
        self.zones = parsed.data.zones;
        self.antennas = parsed.data.antennas;
        self.measures = parsed.data.measures;
        self.next_zone_id = parsed.next_ids[0];
        self.next_antenna_id = parsed.next_ids[1];
        self.next_measure_id = parsed.next_ids[2];
        self.selected.clear();
        tracing::info!(
            zones = self.zones.len(),
            antennas = self.antennas.len(),
            measures = self.measures.len(),
            "document imported"
        );
        self.notify(DocumentEvent::Imported);
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, ImportError> {
        let mut doc = Self::new();
        doc.import_json(text)?;
        doc.take_events();
        Ok(doc)
    }
}

struct Parsed {
    data: DocumentData,
    /// Next zone, antenna, measure ids.
    next_ids: [u32; 3],
}

/// Hands out ids for entries without one, after all explicit ids are known.
struct IdPool {
    next: u32,
}

impl IdPool {
    fn after(explicit: impl Iterator<Item = Option<u32>>) -> Self {
        let max = explicit.flatten().max().unwrap_or(0);
        Self {
            next: max.saturating_add(1),
        }
    }

    fn resolve(&mut self, id: Option<u32>, kind: &str) -> Result<u32, ImportError> {
        match id {
            Some(id) => Ok(id),
            None => super::take_id(&mut self.next)
                .ok_or_else(|| ImportError::malformed(format!("{kind}.id"), "id space exhausted")),
        }
    }
}

fn parse_document(value: &Value) -> Result<Parsed, ImportError> {
    let root = value.as_object().ok_or(ImportError::NotAnObject)?;

    let perimeter = match non_null(root, "perimeter") {
        Some(v) => parse_perimeter(v)?,
        None => Perimeter::default(),
    };
    let scale = match non_null(root, "scale") {
        Some(v) => parse_scale(v)?,
        None => ScaleLine::default(),
    };

    let zone_objs = entries(root, "zones")?;
    let antenna_objs = entries(root, "antennas")?;
    let measure_objs = entries(root, "measures")?;

    let mut zone_ids = IdPool::after(zone_objs.iter().map(|z| id_of(z)));
    let mut zones = Vec::with_capacity(zone_objs.len());
    for z in &zone_objs {
        let zone = parse_zone(z, zone_ids.resolve(id_of(z), "zones")?, zones.len());
        zones.push(zone);
    }

    let mut antenna_ids = IdPool::after(antenna_objs.iter().map(|a| id_of(a)));
    let mut antennas = Vec::with_capacity(antenna_objs.len());
    for a in &antenna_objs {
        let n = antennas.len() + 1;
        antennas.push(Antenna {
            id: antenna_ids.resolve(id_of(a), "antennas")?,
            x: num_or(a, "x", 0.0),
            y: num_or(a, "y", 0.0),
            label: label_or(a, || format!("A{n}")),
            zone_id: a.get("zoneId").and_then(as_id),
        });
    }

    let mut measure_ids = IdPool::after(measure_objs.iter().map(|m| id_of(m)));
    let mut measures = Vec::with_capacity(measure_objs.len());
    for m in &measure_objs {
        let start = match non_null(m, "start") {
            Some(v) => parse_point(v, "measures.start")?,
            None => Point::default(),
        };
        let end = match non_null(m, "end") {
            Some(v) => parse_point(v, "measures.end")?,
            None => Point::default(),
        };
        measures.push(Measure {
            id: measure_ids.resolve(id_of(m), "measures")?,
            start,
            end,
        });
    }

    Ok(Parsed {
        data: DocumentData {
            perimeter,
            scale,
            zones,
            antennas,
            measures,
        },
        next_ids: [zone_ids.next, antenna_ids.next, measure_ids.next],
    })
}

fn parse_zone(z: &Map<String, Value>, id: u32, index: usize) -> Zone {
    Zone {
        id,
        x: num_or(z, "x", 0.0),
        y: num_or(z, "y", 0.0),
        w: num_or(z, "w", DEFAULT_ZONE_SIZE),
        h: num_or(z, "h", DEFAULT_ZONE_SIZE),
        label: label_or(z, || format!("Zone {}", index + 1)),
        ceiling_height: num_or(z, "ceilingHeight", super::DEFAULT_CEILING_HEIGHT),
        shelf_height: num_or(z, "shelfHeight", super::DEFAULT_SHELF_HEIGHT),
        coverage_radius: num_or(z, "coverageRadius", DEFAULT_COVERAGE_RADIUS),
        show_coverage: z.get("showCoverage").and_then(Value::as_bool).unwrap_or(false),
        color_index: z
            .get("colorIndex")
            .and_then(Value::as_u64)
            .map_or(0, |c| c as usize % super::ZONE_COLOR_COUNT),
        max_dist: z
            .get("maxDist")
            .and_then(Value::as_f64)
            .filter(|d| *d > 0.0),
    }
}

fn parse_perimeter(v: &Value) -> Result<Perimeter, ImportError> {
    let obj = v
        .as_object()
        .ok_or_else(|| ImportError::malformed("perimeter", "expected an object"))?;
    let points = match obj.get("points").and_then(Value::as_array) {
        Some(arr) => arr
            .iter()
            .map(|p| parse_point(p, "perimeter.points"))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    let closed = obj.get("closed").and_then(Value::as_bool).unwrap_or(false);
    Ok(Perimeter::new(points, closed))
}

fn parse_scale(v: &Value) -> Result<ScaleLine, ImportError> {
    let obj = v
        .as_object()
        .ok_or_else(|| ImportError::malformed("scale", "expected an object"))?;
    let start = non_null(obj, "start")
        .map(|p| parse_point(p, "scale.start"))
        .transpose()?;
    let end = non_null(obj, "end")
        .map(|p| parse_point(p, "scale.end"))
        .transpose()?;
    let meters = obj
        .get("meters")
        .and_then(Value::as_f64)
        .filter(|m| *m != 0.0);
    Ok(ScaleLine { start, end, meters })
}

fn parse_point(v: &Value, field: &str) -> Result<Point, ImportError> {
    let coord = |k: &str| v.get(k).and_then(Value::as_f64);
    match (coord("x"), coord("y")) {
        (Some(x), Some(y)) => Ok(Point::new(x, y)),
        _ => Err(ImportError::malformed(field, "expected {x, y} with numeric coordinates")),
    }
}

/// Array entries under `key`, each required to be an object. Missing or
/// non-array values count as empty.
fn entries<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<Vec<&'a Map<String, Value>>, ImportError> {
    let Some(arr) = root.get(key).and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    arr.iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_object()
                .ok_or_else(|| ImportError::malformed(format!("{key}[{i}]"), "expected an object"))
        })
        .collect()
}

fn non_null<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

/// Positive integer id below `u32::MAX`; anything else counts as missing.
fn as_id(v: &Value) -> Option<u32> {
    v.as_u64()
        .filter(|id| *id > 0 && *id < u64::from(u32::MAX))
        .and_then(|id| u32::try_from(id).ok())
}

fn id_of(obj: &Map<String, Value>) -> Option<u32> {
    obj.get("id").and_then(as_id)
}

/// Numeric field with the given default for missing, non-numeric or zero values.
fn num_or(obj: &Map<String, Value>, key: &str, default: f64) -> f64 {
    obj.get(key)
        .and_then(Value::as_f64)
        .filter(|v| *v != 0.0)
        .unwrap_or(default)
}

fn label_or(obj: &Map<String, Value>, default: impl FnOnce() -> String) -> String {
    obj.get("label")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map_or_else(default, str::to_string)
}

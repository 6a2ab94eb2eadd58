use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::{
    error::{EvalError, Result},
    types::{Contour, GroundTruthObject, Point},
};

/// Reference outlines for one evaluation run.
///
/// Expects an annotation document shaped like
/// `{"objects": [{"points": {"exterior": [[x, y], ...]}}, ...]}`.
/// Objects without a usable exterior are skipped; a document without an
/// `objects` list yields no objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundTruthStore {
    objects: Vec<GroundTruthObject>,
}

impl GroundTruthStore {
    /// Load annotations from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| EvalError::GroundTruthOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::from_json_str(&content)?;
        info!(path = %path.display(), objects = store.len(), "loaded ground truth");
        Ok(store)
    }

    /// Parse annotations from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(content)?;
        Ok(Self::from_value(&document))
    }

    /// Collect every object with a usable exterior, in document order
    pub fn from_value(document: &Value) -> Self {
        let Some(objects) = document.get("objects").and_then(Value::as_array) else {
            debug!("annotation document has no objects list");
            return Self::default();
        };

        let objects = objects
            .iter()
            .enumerate()
            .filter_map(|(index, object)| {
                let contour = parse_exterior(object);
                if contour.is_none() {
                    debug!(index, "skipping annotation object without a usable exterior");
                }
                contour.map(GroundTruthObject::new)
            })
            .collect();

        Self { objects }
    }

    pub fn objects(&self) -> &[GroundTruthObject] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<GroundTruthObject> {
        self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn parse_exterior(object: &Value) -> Option<Contour> {
    let exterior = object.get("points")?.get("exterior")?.as_array()?;
    if exterior.is_empty() {
        return None;
    }

    exterior
        .iter()
        .map(parse_point)
        .collect::<Option<Vec<Point>>>()
        .map(Contour::new)
}

fn parse_point(value: &Value) -> Option<Point> {
    let pair = value.as_array()?;
    let x = parse_coordinate(pair.first()?)?;
    let y = parse_coordinate(pair.get(1)?)?;
    Some(Point::new(x, y))
}

/// Integer coordinate; fractional values are truncated toward zero
fn parse_coordinate(value: &Value) -> Option<i32> {
    if let Some(v) = value.as_i64() {
        return i32::try_from(v).ok();
    }
    let v = value.as_f64()?;
    if v.is_finite() && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
        Some(v.trunc() as i32)
    } else {
        None
    }
}

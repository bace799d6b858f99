//! Flattened row views over a decoded model.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Model;

/// Which annotation to flatten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    Contour,
    #[serde(alias = "slan")]
    SlicerAngle,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown annotation kind {0:?}, expected \"contour\" or \"slicer_angle\"")]
pub struct UnknownAnnotation(pub String);

impl FromStr for Annotation {
    type Err = UnknownAnnotation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contour" => Ok(Annotation::Contour),
            "slicer_angle" | "slan" => Ok(Annotation::SlicerAngle),
            other => Err(UnknownAnnotation(other.to_string())),
        }
    }
}

/// One contour point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContourRow {
    pub object_id: usize,
    pub contour_id: usize,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One slicer angle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlicerAngleRow {
    pub slan_id: usize,
    pub time: i32,
    pub x_rot: f32,
    pub y_rot: f32,
    pub z_rot: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub center_z: f32,
    pub label: String,
}

/// Rows of a single annotation kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rows {
    Contour(Vec<ContourRow>),
    SlicerAngle(Vec<SlicerAngleRow>),
}

impl Rows {
    pub fn len(&self) -> usize {
        match self {
            Rows::Contour(rows) => rows.len(),
            Rows::SlicerAngle(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The rows as a JSON array of records.
    pub fn to_json(&self) -> serde_json::Value {
        // Rows hold only numbers and strings.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Flattens `model` into rows of the chosen annotation kind.
///
/// Contour rows come one per point in object, contour, point order.
/// Slicer angle rows keep file order.
pub fn project(model: &Model, annotation: Annotation) -> Rows {
    match annotation {
        Annotation::Contour => Rows::Contour(
            model
                .contours()
                .flat_map(|(object_id, contour_id, contour)| {
                    contour.points.iter().map(move |&[x, y, z]| ContourRow {
                        object_id,
                        contour_id,
                        x,
                        y,
                        z,
                    })
                })
                .collect(),
        ),
        Annotation::SlicerAngle => Rows::SlicerAngle(
            model
                .slicer_angles
                .iter()
                .enumerate()
                .map(|(slan_id, slan)| SlicerAngleRow {
                    slan_id,
                    time: slan.time,
                    x_rot: slan.angles[0],
                    y_rot: slan.angles[1],
                    z_rot: slan.angles[2],
                    center_x: slan.center[0],
                    center_y: slan.center[1],
                    center_z: slan.center[2],
                    label: slan.label.as_str(),
                })
                .collect(),
        ),
    }
}

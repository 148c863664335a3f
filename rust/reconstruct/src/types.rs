// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for floor plan reconstruction
//!
//! Pixel-space primitives come in from the detection stages, metric-space
//! entities go out inside a [`BimModel`].

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A 2D point, serialized as `[x, y]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Multiply both coordinates (pixel → meter conversion)
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for [f64; 2] {
    fn from(p: Point2D) -> Self {
        [p.x, p.y]
    }
}

/// Raw line segment in pixel space, serialized as `[x1, y1, x2, y2]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct RawSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl RawSegment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn start(&self) -> Point2D {
        Point2D::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point2D {
        Point2D::new(self.x2, self.y2)
    }

    /// Direction in degrees, `atan2(Δy, Δx)`, range (-180, 180]
    pub fn angle_degrees(&self) -> f64 {
        (self.y2 - self.y1).atan2(self.x2 - self.x1).to_degrees()
    }
}

impl From<[f64; 4]> for RawSegment {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<RawSegment> for [f64; 4] {
    fn from(s: RawSegment) -> Self {
        [s.x1, s.y1, s.x2, s.y2]
    }
}

/// Axis-aligned pixel bounding box, serialized as `[x, y, width, height]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct PixelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

impl From<[f64; 4]> for PixelBox {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self { x, y, width, height }
    }
}

impl From<PixelBox> for [f64; 4] {
    fn from(b: PixelBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

/// Door template match location in pixel space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DoorCandidate {
    pub x: f64,
    pub y: f64,
    /// Normalized match score; `None` when the matcher already thresholded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl DoorCandidate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, score: None }
    }

    pub fn with_score(x: f64, y: f64, score: f64) -> Self {
        Self {
            x,
            y,
            score: Some(score),
        }
    }
}

/// Window line artifacts from the horizontal and vertical morphology passes
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowBoxes {
    pub horizontal: Vec<PixelBox>,
    pub vertical: Vec<PixelBox>,
}

/// Everything the detection collaborators hand over for one floor plan
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FloorPlanPrimitives {
    /// Source image width in pixels
    pub image_width: u32,
    /// Source image height in pixels
    pub image_height: u32,
    pub segments: Vec<RawSegment>,
    /// Closed pixel polygons, in extraction order
    pub contours: Vec<Vec<Point2D>>,
    pub door_candidates: Vec<DoorCandidate>,
    pub window_boxes: WindowBoxes,
}

impl FloorPlanPrimitives {
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            ..Default::default()
        }
    }

    /// Total pixel area of the source image
    pub fn image_area(&self) -> f64 {
        self.image_width as f64 * self.image_height as f64
    }
}

/// Wall centerline in meters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wall {
    pub start_point: Point2D,
    pub end_point: Point2D,
    /// Metres
    pub thickness: f64,
    /// Metres
    pub height: f64,
}

impl Wall {
    pub const DEFAULT_THICKNESS: f64 = 0.2;
    pub const DEFAULT_HEIGHT: f64 = 3.0;

    pub fn length(&self) -> f64 {
        self.start_point.distance_to(&self.end_point)
    }
}

/// Room polygon in meters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub name: String,
    /// Corner ring in source contour winding
    pub corners: Vec<Point2D>,
    /// Square meters
    pub area: f64,
}

/// Door opening
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Door {
    pub position: Point2D,
    pub width: f64,
    /// Index into [`BimModel::walls`]; serialized as -1 when unassociated
    #[serde(with = "wall_index_sentinel", default)]
    pub wall_index: Option<usize>,
}

impl Door {
    pub const DEFAULT_WIDTH: f64 = 0.9;
}

/// Window opening
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Window {
    pub position: Point2D,
    pub width: f64,
    pub height: f64,
    #[serde(with = "wall_index_sentinel", default)]
    pub wall_index: Option<usize>,
}

/// Per-room geometry derived on demand
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomMetrics {
    pub area: f64,
    pub perimeter: f64,
    /// Mean of corner coordinates, not the area-weighted centroid
    pub centroid: Point2D,
    pub corner_count: usize,
}

/// Construction quantity estimate for a finished model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialQuantities {
    pub floor_slab_concrete_m3: f64,
    pub wall_area_m2: f64,
    pub brick_count: u64,
    pub flooring_tiles_m2: f64,
    pub door_count: usize,
    pub window_count: usize,
}

/// Aggregates recorded when the model is assembled
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMetadata {
    /// Metres, rounded to 2 decimals
    pub total_wall_length: f64,
    /// Square meters, rounded to 2 decimals
    pub total_floor_area: f64,
    /// Metres per pixel
    pub scale_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_metrics: Option<BTreeMap<String, RoomMetrics>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_quantities: Option<MaterialQuantities>,
}

/// Reconstructed building
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BimModel {
    pub walls: Vec<Wall>,
    pub rooms: Vec<Room>,
    pub doors: Vec<Door>,
    pub windows: Vec<Window>,
    pub floors: u32,
    pub floor_height: f64,
    pub metadata: ModelMetadata,
}

impl BimModel {
    /// Attach derived analysis; geometry is left untouched
    pub fn with_analysis(
        mut self,
        room_metrics: BTreeMap<String, RoomMetrics>,
        material_quantities: MaterialQuantities,
    ) -> Self {
        self.metadata.room_metrics = Some(room_metrics);
        self.metadata.material_quantities = Some(material_quantities);
        self
    }

    pub fn total_height(&self) -> f64 {
        self.floors as f64 * self.floor_height
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `Option<usize>` ↔ integer with `-1` meaning "no wall"
mod wall_index_sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(index) => serializer.serialize_i64(*index as i64),
            None => serializer.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Ok(usize::try_from(raw).ok())
    }
}

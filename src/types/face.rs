//! Face analysis results as returned by the inference collaborator

use serde::{Deserialize, Serialize};

/// Blendshape names carrying the smile
pub const MOUTH_SMILE_LEFT: &str = "mouthSmileLeft";
pub const MOUTH_SMILE_RIGHT: &str = "mouthSmileRight";

/// One named facial-muscle activation score in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blendshape {
    pub category_name: String,
    pub score: f64,
}

impl Blendshape {
    pub fn new(category_name: impl Into<String>, score: f64) -> Self {
        Self {
            category_name: category_name.into(),
            score,
        }
    }
}

/// Normalized landmark position (0..1 in both axes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned box around the landmarks, normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Scale to pixel coordinates: (x, y, w, h)
    pub fn to_pixels(&self, width: u32, height: u32) -> (f64, f64, f64, f64) {
        let (w, h) = (width as f64, height as f64);
        (self.min_x * w, self.min_y * h, self.width() * w, self.height() * h)
    }
}

/// The single face found in a frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    #[serde(default)]
    pub blendshapes: Vec<Blendshape>,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

impl FaceObservation {
    pub fn new(blendshapes: Vec<Blendshape>) -> Self {
        Self {
            blendshapes,
            landmarks: Vec::new(),
        }
    }

    pub fn with_landmarks(mut self, landmarks: Vec<Landmark>) -> Self {
        self.landmarks = landmarks;
        self
    }

    /// Score of a named blendshape; absent categories score 0
    pub fn blendshape(&self, name: &str) -> f64 {
        self.blendshapes
            .iter()
            .find(|b| b.category_name == name)
            .map(|b| b.score)
            .unwrap_or(0.0)
    }

    /// Mean of the two mouth-smile blendshapes
    pub fn smile_score(&self) -> f64 {
        (self.blendshape(MOUTH_SMILE_LEFT) + self.blendshape(MOUTH_SMILE_RIGHT)) / 2.0
    }

    /// Box around all landmarks, `None` when there are none
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.landmarks.first()?;
        let init = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(self.landmarks.iter().fold(init, |b, p| BoundingBox {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }
}

/// Smile score of an optional face; no face means no score
pub fn smile_score(face: Option<&FaceObservation>) -> Option<f64> {
    face.map(FaceObservation::smile_score)
}

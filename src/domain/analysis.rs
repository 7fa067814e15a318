use serde::{Deserialize, Deserializer, Serialize};

/// Closed set of classification labels returned by the vision service.
///
/// Labels the service invents outside this set decode as `Unknown` rather
/// than failing the whole response.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum FaceShape {
    Oval,
    Round,
    Square,
    Heart,
    Triangle,
    Long,
    Diamond,
    Unknown,
}

impl<'de> Deserialize<'de> for FaceShape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

impl FaceShape {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Oval" => Self::Oval,
            "Round" => Self::Round,
            "Square" => Self::Square,
            "Heart" => Self::Heart,
            "Triangle" => Self::Triangle,
            "Long" => Self::Long,
            "Diamond" => Self::Diamond,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Oval => "Oval",
            Self::Round => "Round",
            Self::Square => "Square",
            Self::Heart => "Heart",
            Self::Triangle => "Triangle",
            Self::Long => "Long",
            Self::Diamond => "Diamond",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Pro,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Pro => "Pro",
        }
    }
}

/// A recommended camera pose. Value object, no identity; order within a
/// result is meaningful.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PoseSuggestion {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub best_angle: String,
    pub tags: Vec<String>,
}

/// One analysis call's structured reply. Immutable once produced; the next
/// analysis replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub face_shape: FaceShape,
    pub reasoning: String,
    pub best_lighting: String,
    pub pose_suggestions: Vec<PoseSuggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_shape_decodes_exact_labels() {
        let shape: FaceShape = serde_json::from_str("\"Heart\"").unwrap();
        assert_eq!(shape, FaceShape::Heart);
    }

    #[test]
    fn unrecognized_face_shape_decodes_as_unknown() {
        let shape: FaceShape = serde_json::from_str("\"Rhombus\"").unwrap();
        assert_eq!(shape, FaceShape::Unknown);
    }

    #[test]
    fn unrecognized_difficulty_is_an_error() {
        assert!(serde_json::from_str::<Difficulty>("\"Expert\"").is_err());
    }

    #[test]
    fn analysis_result_uses_camel_case_wire_fields() {
        let json = r#"{
            "faceShape": "Round",
            "reasoning": "Soft jawline with similar width and height.",
            "bestLighting": "Soft window light from a 45 degree angle.",
            "poseSuggestions": [{
                "title": "Hand on Chin",
                "description": "Rest your chin lightly on your hand.",
                "difficulty": "Easy",
                "bestAngle": "Slightly above eye level",
                "tags": ["classic", "close-up"]
            }]
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.face_shape, FaceShape::Round);
        assert_eq!(result.pose_suggestions.len(), 1);
        assert_eq!(result.pose_suggestions[0].best_angle, "Slightly above eye level");
    }
}

mod analysis;
mod overlay;
mod trending;

pub use analysis::{AnalysisResult, Difficulty, FaceShape, PoseSuggestion};
pub use overlay::Overlay;
pub use trending::TrendingPose;

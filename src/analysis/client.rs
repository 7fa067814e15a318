use async_trait::async_trait;

use crate::capture::EncodedImage;
use crate::domain::AnalysisResult;
use crate::error::AnalysisError;

/// External vision-service boundary: one still in, one structured result
/// out. No retries, no streaming; callers own failure presentation.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, image: &EncodedImage) -> Result<AnalysisResult, AnalysisError>;
}

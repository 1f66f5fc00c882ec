//! Image analysis port
//!
//! The scoring engine never talks to a vision provider directly. Callers obtain
//! [`VisionSignals`] through this trait; concrete provider clients live in the
//! service crates.

use crate::signals::VisionSignals;
use crate::Result;

/// Extracts face, label and color signals from raw image bytes
///
/// Implementations make exactly one attempt. Transport failures, timeouts and provider
/// errors are reported as [`crate::Error::AnalysisUnavailable`]; retry policy belongs to
/// the caller.
///
/// # Example
/// ```rust,ignore
/// use pmatch_common::{VisionAnalyzer, VisionSignals, Result};
///
/// pub struct FixedAnalyzer(VisionSignals);
///
/// #[async_trait::async_trait]
/// impl VisionAnalyzer for FixedAnalyzer {
///     fn name(&self) -> &'static str { "fixed" }
///
///     async fn analyze(&self, _image: &[u8]) -> Result<VisionSignals> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait VisionAnalyzer: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Analyze one image
    async fn analyze(&self, image: &[u8]) -> Result<VisionSignals>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{FaceSignal, Likelihood};
    use crate::Error;

    struct StaticAnalyzer(Option<VisionSignals>);

    #[async_trait::async_trait]
    impl VisionAnalyzer for StaticAnalyzer {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn analyze(&self, _image: &[u8]) -> Result<VisionSignals> {
            self.0
                .clone()
                .ok_or_else(|| Error::AnalysisUnavailable("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_port_is_object_safe() {
        let signals = VisionSignals {
            face: Some(FaceSignal { joy: Likelihood::Likely, ..Default::default() }),
            ..Default::default()
        };
        let analyzer: Box<dyn VisionAnalyzer> = Box::new(StaticAnalyzer(Some(signals.clone())));

        assert_eq!(analyzer.name(), "static");
        assert_eq!(analyzer.analyze(b"jpeg").await.unwrap(), signals);
    }

    #[tokio::test]
    async fn test_port_surfaces_unavailable() {
        let analyzer = StaticAnalyzer(None);
        let err = analyzer.analyze(b"jpeg").await.unwrap_err();
        assert!(matches!(err, Error::AnalysisUnavailable(_)));
    }
}

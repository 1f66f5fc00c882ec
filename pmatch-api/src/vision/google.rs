//! Google Cloud Vision client
//!
//! One `images:annotate` request per image, asking for FACE_DETECTION,
//! LABEL_DETECTION and IMAGE_PROPERTIES. The JSON reply is reduced to
//! [`VisionSignals`]; nothing provider-specific leaks past this module.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pmatch_common::{
    ColorSample, Error, FaceSignal, LabelSignal, Likelihood, Result, VisionAnalyzer, VisionSignals,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANNOTATE_PATH: &str = "/v1/images:annotate";
/// Key travels in a header so it never shows up in request URLs or their errors
const API_KEY_HEADER: &str = "x-goog-api-key";
const USER_AGENT: &str = concat!("pmatch/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent,
    features: &'a [Feature],
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

const FEATURES: [Feature; 3] = [
    Feature { kind: "FACE_DETECTION" },
    Feature { kind: "LABEL_DETECTION" },
    Feature { kind: "IMAGE_PROPERTIES" },
];

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    face_annotations: Vec<FaceAnnotation>,
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    image_properties_annotation: Option<ImageProperties>,
    #[serde(default)]
    error: Option<StatusBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaceAnnotation {
    #[serde(default)]
    joy_likelihood: Likelihood,
    #[serde(default)]
    sorrow_likelihood: Likelihood,
    #[serde(default)]
    anger_likelihood: Likelihood,
    #[serde(default)]
    surprise_likelihood: Likelihood,
    #[serde(default)]
    headwear_likelihood: Likelihood,
}

#[derive(Debug, Deserialize)]
struct LabelAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageProperties {
    #[serde(default)]
    dominant_colors: Option<DominantColors>,
}

#[derive(Debug, Deserialize)]
struct DominantColors {
    #[serde(default)]
    colors: Vec<ColorInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColorInfo {
    #[serde(default)]
    color: Rgb,
    #[serde(default)]
    pixel_fraction: f32,
}

/// Proto3 JSON omits zero-valued channels
#[derive(Debug, Default, Deserialize)]
struct Rgb {
    #[serde(default)]
    red: f32,
    #[serde(default)]
    green: f32,
    #[serde(default)]
    blue: f32,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

impl From<&FaceAnnotation> for FaceSignal {
    fn from(face: &FaceAnnotation) -> Self {
        FaceSignal {
            joy: face.joy_likelihood,
            sorrow: face.sorrow_likelihood,
            anger: face.anger_likelihood,
            surprise: face.surprise_likelihood,
            headwear: face.headwear_likelihood,
        }
    }
}

/// Reduce one image response to provider-neutral signals
///
/// Only the first face is kept.
fn into_signals(response: AnnotateImageResponse) -> Result<VisionSignals> {
    if let Some(status) = response.error {
        return Err(Error::AnalysisUnavailable(format!(
            "Vision API error {}: {}",
            status.code, status.message
        )));
    }

    let face = response.face_annotations.first().map(FaceSignal::from);

    let labels: LabelSignal = response
        .label_annotations
        .iter()
        .map(|l| l.description.as_str())
        .collect();

    let colors = response
        .image_properties_annotation
        .and_then(|p| p.dominant_colors)
        .map(|d| {
            d.colors
                .iter()
                .map(|c| ColorSample::new(c.color.red, c.color.green, c.color.blue, c.pixel_fraction))
                .collect()
        })
        .unwrap_or_default();

    Ok(VisionSignals { face, labels, colors })
}

/// Parse a full `images:annotate` reply body
fn parse_annotate_body(body: &str) -> Result<VisionSignals> {
    let parsed: AnnotateResponse = serde_json::from_str(body)
        .map_err(|e| Error::AnalysisUnavailable(format!("Parse error: {}", e)))?;

    let first = parsed
        .responses
        .into_iter()
        .next()
        .ok_or_else(|| Error::AnalysisUnavailable("Empty response from Vision API".to_string()))?;

    into_signals(first)
}

/// Error text is returned to uploaders and `/health`, so the URL is stripped
fn network_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::AnalysisUnavailable("Vision API request timed out".to_string())
    } else {
        Error::AnalysisUnavailable(format!("Network error: {}", e.without_url()))
    }
}

// ============================================================================
// Client
// ============================================================================

/// Google Cloud Vision REST client (API key authentication)
pub struct GoogleVisionClient {
    http_client: reqwest::Client,
    annotate_url: String,
    api_key: String,
}

impl GoogleVisionClient {
    /// Build a client for `endpoint` (e.g. `https://vision.googleapis.com`)
    pub fn new(api_key: String, endpoint: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http_client,
            annotate_url: format!("{}{}", endpoint.trim_end_matches('/'), ANNOTATE_PATH),
            api_key,
        })
    }

    pub fn annotate_url(&self) -> &str {
        &self.annotate_url
    }
}

#[async_trait::async_trait]
impl VisionAnalyzer for GoogleVisionClient {
    fn name(&self) -> &'static str {
        "google-vision"
    }

    async fn analyze(&self, image: &[u8]) -> Result<VisionSignals> {
        tracing::debug!(image_bytes = image.len(), "Querying Vision API");

        let request = AnnotateRequest {
            requests: [AnnotateImageRequest {
                image: ImageContent { content: BASE64.encode(image) },
                features: &FEATURES,
            }],
        };

        let response = self
            .http_client
            .post(&self.annotate_url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(network_error)?;

        if !status.is_success() {
            return Err(Error::AnalysisUnavailable(format!(
                "Vision API returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let signals = parse_annotate_body(&body)?;

        tracing::info!(
            face = signals.face.is_some(),
            labels = signals.labels.len(),
            colors = signals.colors.len(),
            "Vision analysis complete"
        );

        Ok(signals)
    }
}

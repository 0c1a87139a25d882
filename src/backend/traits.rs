//! Common traits and types for the rendering backend

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A sweep request as submitted by a client
///
/// Every field defaults to zero, so a body missing fields (or one that fails
/// to parse entirely) becomes a single-unit sweep over `s1x = 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// First sweep unit (inclusive)
    #[serde(rename = "s1x_start", default)]
    pub start: i64,

    /// Last sweep unit (inclusive). Less than `start` means an empty sweep.
    #[serde(rename = "s1x_end", default)]
    pub end: i64,

    /// Samples per pixel forwarded to the backend
    #[serde(rename = "samples", default)]
    pub sample_count: i64,
}

impl RenderRequest {
    pub fn new(start: i64, end: i64, sample_count: i64) -> Self {
        Self {
            start,
            end,
            sample_count,
        }
    }

    /// Iterate the sweep units in increasing order
    pub fn units(&self) -> std::ops::RangeInclusive<i64> {
        self.start..=self.end
    }

    /// Number of units the sweep covers
    pub fn unit_count(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            self.end.abs_diff(self.start).saturating_add(1)
        }
    }
}

/// One successfully rendered sweep unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderUnitResult {
    #[serde(rename = "s1x")]
    pub unit_index: i64,

    /// `data:image/png;base64,...`
    #[serde(rename = "img_data")]
    pub image_payload: String,
}

/// Outcome of a single unit render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Backend answered 200 with this body
    Success(Vec<u8>),
    /// Transport failure or non-200 status; the unit is dropped
    Skipped,
}

/// Trait for rendering backends
#[async_trait]
pub trait RenderBackend: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Render one sweep unit.
    ///
    /// Implementations never fail: anything other than a clean 200 is
    /// reported as [`UnitOutcome::Skipped`].
    async fn fetch_unit(&self, unit_index: i64, sample_count: i64) -> UnitOutcome;
}

//! Agent status labels
//!
//! The set of statuses is supplied from outside the engine as an ordered list
//! of labels. Only three labels carry meaning to the engine itself.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::random::RandomSource;

/// Agent can take a call; its absence raises an alert
pub const AVAILABLE: &str = "AVAILABLE";

/// Agent is on a call; entering it counts as an accepted call
pub const TALKING: &str = "TALKING";

/// Agent refused work; entering it counts as a rejected call
pub const NOT_AVAILABLE: &str = "NOT AVAILABLE";

/// Ordered, closed set of status labels agents are drawn from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCatalog(Vec<String>);

impl Default for StatusCatalog {
    fn default() -> Self {
        Self::new([
            AVAILABLE,
            TALKING,
            NOT_AVAILABLE,
            "AFTER CALL WORK",
            "ON HOLD",
            "LOGGED OUT",
        ])
    }
}

impl StatusCatalog {
    /// Build a catalog from any list of labels
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    /// Draw one label uniformly by index
    pub fn pick(&self, rng: &mut dyn RandomSource) -> EngineResult<&str> {
        if self.0.is_empty() {
            return Err(EngineError::EmptyStatusCatalog);
        }
        let index = rng.range_inclusive(0, self.0.len() as u64 - 1) as usize;
        self.0
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| EngineError::internal(format!("status index {} out of range", index)))
    }
}

//! Host availability derived from Graphite host-alive datapoints.
//!
//! Nagios-style `hostalive` perfdata reports `0` while a host answers and a
//! non-zero value while it does not. A window counts as up when at least
//! [`UP_THRESHOLD_PERCENT`] of its points are zero.

use serde::Deserialize;
use serde_json::Value;
use strum::{Display, EnumString};

use crate::error::AppError;
use crate::upstream::UpstreamResponse;

/// Minimum share of up points, in percent, for a window to be up.
pub const UP_THRESHOLD_PERCENT: usize = 70;

/// Availability verdict for a window of datapoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Availability {
    /// Host answered for most of the window.
    Up,
    /// Host was mostly unreachable, or there is no data.
    Down,
}

/// One Graphite `[value, timestamp]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Datapoint(pub Option<f64>, pub i64);

impl Datapoint {
    /// Whether this point reports the host as up.
    pub fn is_up(&self) -> bool {
        self.0 == Some(0.0)
    }
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(default)]
    datapoints: Vec<Datapoint>,
}

/// Pull datapoints out of a Graphite render response.
///
/// An object yields its `datapoints` (empty if absent). An array of series
/// yields every series' points in order. Other JSON shapes yield nothing.
pub fn extract_datapoints(body: &Value) -> Result<Vec<Datapoint>, AppError> {
    match body {
        Value::Object(_) => {
            let series = Series::deserialize(body)?;
            Ok(series.datapoints)
        }
        Value::Array(_) => {
            let series = Vec::<Series>::deserialize(body)?;
            Ok(series.into_iter().flat_map(|s| s.datapoints).collect())
        }
        _ => Ok(Vec::new()),
    }
}

/// Classify a window of datapoints.
pub fn up_or_down(points: &[Datapoint]) -> Availability {
    if points.is_empty() {
        return Availability::Down;
    }

    let up = points.iter().filter(|p| p.is_up()).count();

    if up * 100 >= points.len() * UP_THRESHOLD_PERCENT {
        Availability::Up
    } else {
        Availability::Down
    }
}

/// Classify a relayed upstream response.
///
/// A non-success status or a body that is not a Graphite series is `DOWN`.
pub fn classify_response(response: &UpstreamResponse) -> Availability {
    if !response.status.is_success() {
        return Availability::Down;
    }

    match extract_datapoints(&response.body) {
        Ok(points) => up_or_down(&points),
        Err(e) => {
            tracing::warn!(error = %e, "Upstream body is not a Graphite series");
            Availability::Down
        }
    }
}

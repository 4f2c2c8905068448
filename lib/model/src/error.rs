use thiserror::Error;

/// Raised when a string does not name a known [ChartType](crate::ChartType).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Unknown chart type '{0}'")]
pub struct UnknownChartTypeError(pub String);

/// Raised when a string does not name a known [PatternLabel](crate::PatternLabel).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Unknown pattern label '{0}'")]
pub struct UnknownPatternLabelError(pub String);

//! Column statistics: streaming accumulators, histograms, top values and
//! string pattern detection.

mod computer;
mod patterns;
mod streaming;

pub use computer::StatsComputer;
pub use patterns::detect_pattern;
pub use streaming::StreamingStats;

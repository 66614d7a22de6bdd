//! Runtime knobs shared by parsing and evaluation

use std::fmt;
use std::str::FromStr;

/// How an absolute time that falls into a daylight-saving overlap is resolved.
///
/// Times inside a spring-forward gap never existed locally and are always
/// rejected, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalTimePolicy {
    /// Refuse wall-clock times that map to two instants
    #[default]
    Reject,
    /// Take the first of the two instants
    Earliest,
    /// Take the second of the two instants
    Latest,
}

impl fmt::Display for LocalTimePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LocalTimePolicy::Reject => "reject",
            LocalTimePolicy::Earliest => "earliest",
            LocalTimePolicy::Latest => "latest",
        };
        f.write_str(s)
    }
}

impl FromStr for LocalTimePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(LocalTimePolicy::Reject),
            "earliest" | "first" => Ok(LocalTimePolicy::Earliest),
            "latest" | "last" => Ok(LocalTimePolicy::Latest),
            other => Err(format!(
                "unknown local time policy '{other}' (expected reject, earliest or latest)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub local_time: LocalTimePolicy,
    /// Deepest test-node nesting the evaluator will walk
    pub max_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            local_time: LocalTimePolicy::Reject,
            max_depth: 512,
        }
    }
}

//! Resolution policy: how the aggregator settles dependency closures.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::canonical_hash_hex;
use crate::DEFAULT_RESOLUTION_POLICY_VERSION;

use super::PolicyError;

/// Environment variable selecting [`Propagation`].
pub const PROPAGATION_ENV: &str = "IMPACT_PROPAGATION";

/// Environment variable selecting [`LateInsertPolicy`].
pub const LATE_INSERTS_ENV: &str = "IMPACT_LATE_INSERTS";

/// How completion targets receive the impact of the records they wait on.
///
/// Resolution records form a completion graph that may contain chains and
/// cycles. `FixedPoint` repeats propagation until no impact set grows, which
/// always reaches the closure. `TwoPass` stops after exactly two rounds, the
/// historical behavior, and can leave long completion chains short.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Propagation {
    /// Propagate until no completion target changes.
    #[default]
    FixedPoint,
    /// Propagate in exactly two rounds.
    TwoPass,
}

impl Propagation {
    /// Parse from a configuration string.
    pub fn parse(s: &str) -> Result<Self, PolicyError> {
        match s.trim().to_lowercase().as_str() {
            "fixed_point" | "fixedpoint" | "fixed-point" => Ok(Self::FixedPoint),
            "two_pass" | "twopass" | "two-pass" => Ok(Self::TwoPass),
            other => Err(PolicyError::InvalidPropagation(other.to_string())),
        }
    }

    /// Upper bound on propagation rounds, if any.
    pub fn max_rounds(&self) -> Option<usize> {
        match self {
            Self::FixedPoint => None,
            Self::TwoPass => Some(2),
        }
    }
}

impl fmt::Display for Propagation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedPoint => write!(f, "fixed_point"),
            Self::TwoPass => write!(f, "two_pass"),
        }
    }
}

/// What happens when paths arrive after resolution has started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LateInsertPolicy {
    /// Dependencies are consumed by resolution and cached answers are kept.
    ///
    /// Cheapest; callers must finish inserting before the first query or
    /// resolved answers may be permanently short.
    #[default]
    Trust,
    /// Dependencies are retained and every insert clears the resolved set.
    ///
    /// Answers stay correct under interleaved inserts at the cost of
    /// re-resolving on the next query.
    Invalidate,
}

impl LateInsertPolicy {
    /// Parse from a configuration string.
    pub fn parse(s: &str) -> Result<Self, PolicyError> {
        match s.trim().to_lowercase().as_str() {
            "trust" => Ok(Self::Trust),
            "invalidate" => Ok(Self::Invalidate),
            other => Err(PolicyError::InvalidLateInsertPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for LateInsertPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trust => write!(f, "trust"),
            Self::Invalidate => write!(f, "invalidate"),
        }
    }
}

/// Resolution policy version 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Completion propagation strategy.
    pub propagation: Propagation,
    /// Late insert handling.
    pub late_inserts: LateInsertPolicy,
}

impl ResolutionPolicy {
    /// Create a policy with explicit settings.
    pub fn new(propagation: Propagation, late_inserts: LateInsertPolicy) -> Self {
        Self {
            version: DEFAULT_RESOLUTION_POLICY_VERSION.to_string(),
            propagation,
            late_inserts,
        }
    }

    /// Two propagation rounds with trusted inserts.
    pub fn two_pass() -> Self {
        Self::new(Propagation::TwoPass, LateInsertPolicy::Trust)
    }

    /// Load the policy from `IMPACT_PROPAGATION` and `IMPACT_LATE_INSERTS`.
    ///
    /// Unset variables keep their defaults. Unparseable values are logged and
    /// also fall back to defaults.
    pub fn from_env() -> Self {
        let mut policy = Self::default();

        if let Ok(raw) = std::env::var(PROPAGATION_ENV) {
            match Propagation::parse(&raw) {
                Ok(propagation) => policy.propagation = propagation,
                Err(e) => tracing::warn!(
                    error = %e,
                    default = %policy.propagation,
                    "Ignoring {}", PROPAGATION_ENV
                ),
            }
        }

        if let Ok(raw) = std::env::var(LATE_INSERTS_ENV) {
            match LateInsertPolicy::parse(&raw) {
                Ok(late_inserts) => policy.late_inserts = late_inserts,
                Err(e) => tracing::warn!(
                    error = %e,
                    default = %policy.late_inserts,
                    "Ignoring {}", LATE_INSERTS_ENV
                ),
            }
        }

        policy
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Hash of the policy parameters, for recording alongside results.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self::new(Propagation::default(), LateInsertPolicy::default())
    }
}

use jiff::SignedDuration;
use tracing::warn;

use crate::reoptimize::reoptimize_params::ReoptimizeParams;

pub const OSRM_URL_ENV_VAR: &str = "COURIER_OSRM_URL";
pub const SOLVER_URL_ENV_VAR: &str = "COURIER_SOLVER_URL";
pub const SOLVER_TIMEOUT_ENV_VAR: &str = "COURIER_SOLVER_TIMEOUT";
pub const MAX_PERMUTATIONS_ENV_VAR: &str = "COURIER_MAX_PERMUTATIONS";

#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    /// Optimization model sent to the solver, before any constraint is appended.
    pub base_model: String,
    pub reoptimize: ReoptimizeParams,
}

impl PlannerConfig {
    pub fn new(base_model: String) -> Self {
        PlannerConfig {
            base_model,
            reoptimize: ReoptimizeParams::default(),
        }
    }

    /// Reads the permutation ceiling from `COURIER_MAX_PERMUTATIONS`, `0`
    /// meaning no ceiling. Invalid values are ignored.
    pub fn from_env(base_model: String) -> Self {
        let mut config = PlannerConfig::new(base_model);

        if let Ok(value) = std::env::var(MAX_PERMUTATIONS_ENV_VAR) {
            match value.trim().parse::<usize>() {
                Ok(0) => config.reoptimize.max_permutations = None,
                Ok(max) => config.reoptimize.max_permutations = Some(max),
                Err(error) => warn!(
                    "Ignoring {}={}: {}",
                    MAX_PERMUTATIONS_ENV_VAR, value, error
                ),
            }
        }

        config
    }
}

/// Service locations, all optional: missing services fall back to offline behavior.
#[derive(Debug, Clone, Default)]
pub struct ServiceEndpoints {
    pub osrm_url: Option<String>,
    pub solver_url: Option<String>,
    pub solver_timeout: Option<SignedDuration>,
}

impl ServiceEndpoints {
    pub fn from_env() -> Self {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
        };

        let solver_timeout = read(SOLVER_TIMEOUT_ENV_VAR).and_then(|value| {
            parse_signed_duration(&value)
                .inspect_err(|error| warn!("Ignoring {}={}: {}", SOLVER_TIMEOUT_ENV_VAR, value, error))
                .ok()
        });

        ServiceEndpoints {
            osrm_url: read(OSRM_URL_ENV_VAR),
            solver_url: read(SOLVER_URL_ENV_VAR),
            solver_timeout,
        }
    }
}

/// Accepts ISO 8601 (`PT2M`) and friendly (`2m 30s`) durations.
pub fn parse_signed_duration(value: &str) -> Result<SignedDuration, jiff::Error> {
    value.trim().parse::<SignedDuration>()
}

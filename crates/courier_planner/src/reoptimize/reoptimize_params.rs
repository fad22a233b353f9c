use jiff::SignedDuration;

/// 9!, every ordering of a nine customer route.
pub const DEFAULT_MAX_PERMUTATIONS: usize = 362_880;

#[derive(Debug, Clone, PartialEq)]
pub struct ReoptimizeParams {
    /// Orderings examined before giving up, `None` for no limit.
    pub max_permutations: Option<usize>,
    pub max_duration: Option<SignedDuration>,
    /// Also drop an ordering as soon as a service ends after its window.
    pub prune_on_window_end: bool,
}

impl Default for ReoptimizeParams {
    fn default() -> Self {
        ReoptimizeParams {
            max_permutations: Some(DEFAULT_MAX_PERMUTATIONS),
            max_duration: None,
            prune_on_window_end: false,
        }
    }
}

use composer_core::errors::{ComposeError, ErrorInfo};
use composer_core::{PrimitiveId, RngHandle};
use rand::distributions::{Distribution, WeightedIndex};

/// Draws one primitive index from `probabilities`.
pub fn sample(probabilities: &[f64], rng: &mut RngHandle) -> Result<PrimitiveId, ComposeError> {
    if probabilities.is_empty() {
        return Err(ComposeError::EmptyRegistry(
            ErrorInfo::new("empty-registry", "no primitive available to sample from")
                .with_hint("register at least one primitive"),
        ));
    }
    let distribution = WeightedIndex::new(probabilities).map_err(|err| {
        ComposeError::InvalidSpecification(
            ErrorInfo::new("invalid-distribution", "probabilities cannot be sampled")
                .with_context("reason", err.to_string()),
        )
    })?;
    Ok(PrimitiveId::from_raw(distribution.sample(rng) as u32))
}

use crate::model::params::ResolvedParams;
use crate::model::table::CountSource;
use crate::model::thresholds::ThresholdMap;
use crate::pipeline::ClassifyError;
use crate::stats::quantile_linear;

/// Threshold of each cell type: the `1 - top_fraction` quantile of its
/// counts over the spots of `source`.
pub fn run_stage1<S: CountSource + ?Sized>(
    source: &S,
    params: &ResolvedParams,
    scope: &str,
) -> Result<ThresholdMap, ClassifyError> {
    let n_types = source.cell_types().len();
    let mut thresholds = Vec::with_capacity(n_types);

    for ct in 0..n_types {
        let column = source.column(ct);
        let top_fraction = params.top_fractions[ct];
        let threshold = quantile_linear(&column, 1.0 - top_fraction)
            .ok_or_else(|| ClassifyError::EmptyScope(scope.to_string()))?;
        thresholds.push(threshold);
    }

    Ok(ThresholdMap {
        top_fractions: params.top_fractions.clone(),
        thresholds,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_thresholds.rs"]
mod tests;

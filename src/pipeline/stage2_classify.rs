use crate::model::labels::SpotLabel;
use crate::model::params::ResolvedParams;
use crate::model::table::CountSource;
use crate::model::thresholds::ThresholdMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopTwo {
    pub first: usize,
    pub first_count: f64,
    pub second_count: f64,
}

impl TopTwo {
    /// Dominance ratio; infinite when the runner-up count is zero.
    pub fn ratio(&self) -> f64 {
        if self.second_count > 0.0 {
            self.first_count / self.second_count
        } else {
            f64::INFINITY
        }
    }
}

/// Leader and runner-up of a row. On ties the earlier column leads.
pub fn top_two(row: &[f64]) -> TopTwo {
    let mut first = 0usize;
    let mut first_count = row.first().copied().unwrap_or(0.0);
    let mut second_count = f64::NEG_INFINITY;

    for (idx, &v) in row.iter().enumerate().skip(1) {
        if v > first_count {
            second_count = first_count;
            first = idx;
            first_count = v;
        } else if v > second_count {
            second_count = v;
        }
    }

    TopTwo {
        first,
        first_count,
        second_count: second_count.max(0.0),
    }
}

pub fn classify_spot(
    row: &[f64],
    thresholds: &ThresholdMap,
    params: &ResolvedParams,
) -> SpotLabel {
    let top = top_two(row);
    let ratio = top.ratio();
    let effective_ratio = params.ratio_thresholds[top.first];

    if ratio > effective_ratio && top.first_count >= thresholds.get(top.first) {
        return SpotLabel::Enriched(top.first);
    }

    if (1.0..=params.mix_bound(top.first)).contains(&ratio) {
        return SpotLabel::Mix;
    }

    SpotLabel::Unknown
}

pub fn run_stage2<S: CountSource + ?Sized>(
    source: &S,
    thresholds: &ThresholdMap,
    params: &ResolvedParams,
) -> Vec<SpotLabel> {
    let n_spots = source.n_spots();
    let mut out = Vec::with_capacity(n_spots);

    for spot in 0..n_spots {
        out.push(classify_spot(source.row(spot), thresholds, params));
    }

    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_classify.rs"]
mod tests;

//! Inner join of the two aggregated tables on the grouping key.

use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::schema::GROUP_COLS;

/// Inner-join the two aggregated tables on the seven grouping-key fields.
///
/// Keys must compare equal on all seven fields; a null key component
/// matches only an identical null. Rows unmatched in either input are
/// dropped. An empty result is a valid outcome, not an error.
pub fn merge_datasets(perf_agg: &DataFrame, drop_agg: &DataFrame) -> Result<DataFrame> {
    let key_exprs: Vec<Expr> = GROUP_COLS.iter().map(|key| col(*key)).collect();

    let args = JoinArgs {
        how: JoinType::Inner,
        nulls_equal: true,
        ..Default::default()
    };

    let merged = perf_agg
        .clone()
        .lazy()
        .join(drop_agg.clone().lazy(), key_exprs.clone(), key_exprs, args)
        .collect()?;

    debug!(
        "inner join: {} x {} -> {} rows",
        perf_agg.height(),
        drop_agg.height(),
        merged.height()
    );

    Ok(merged)
}

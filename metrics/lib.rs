/*!
This crate defines the [`StreamingMetric`](trait.StreamingMetric.html) trait and the statistics the explorer computes over columns: [`MeanVariance`](struct.MeanVariance.html), [`quantiles`](fn.quantiles.html) and [`PearsonCorrelation`](struct.PearsonCorrelation.html).
*/

#![allow(clippy::tabs_in_doc_comments)]

mod mean_variance;
mod pearson;
mod quantile;

pub use self::mean_variance::{m2_to_variance, merge_mean_m2, MeanVariance, MeanVarianceOutput};
pub use self::pearson::PearsonCorrelation;
pub use self::quantile::quantiles;

/**
The `StreamingMetric` trait defines a common interface to metrics that can be computed in a streaming manner, where the input is available one value at a time, such as the mean of a column or the correlation between two columns.

After being initialized, a value of type `T` implementing the `StreamingMetric` trait can have `update()` called on it with values of the associated type `Input`. Multiple values of `T` can be merged together by calling `merge()`. When finished aggregating, you can call `finalize()` on the metric to produce the associated type `Output`.

# Examples

Here is a basic example implementation of a `Min` metric, which takes `f64`s as input and produces an `Option<f64>` as output that is the minimum of all the inputs.

```
use explorer_metrics::StreamingMetric;

#[derive(Default)]
struct Min(Option<f64>);

impl StreamingMetric<'_> for Min {
	type Input = f64;
	type Output = Option<f64>;
	fn update(&mut self, input: Self::Input) {
		self.0 = Some(self.0.map_or(input, |min| min.min(input)))
	}
	fn merge(&mut self, other: Self) {
		if let Some(other) = other.0 {
			self.update(other)
		}
	}
	fn finalize(self) -> Self::Output { self.0 }
}
```
*/
pub trait StreamingMetric<'a> {
	/// `Input` is the type to aggregate in calls to `update()`.
	type Input;
	/// `Output` is the return type of `finalize()`.
	type Output;
	/// Update this streaming metric with the `Input` `input`.
	fn update(&mut self, input: Self::Input);
	/// Merge multiple independently computed streaming metrics.
	fn merge(&mut self, other: Self);
	/// When you are done aggregating `Input`s, call `finalize()` to produce an `Output`.
	fn finalize(self) -> Self::Output;
}

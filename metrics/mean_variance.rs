//! https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance#Parallel_algorithm

use super::StreamingMetric;

/// combine two separate means and m2s into a single mean and m2
pub fn merge_mean_m2(
	n_a: u64,
	mean_a: f64,
	m2_a: f64,
	n_b: u64,
	mean_b: f64,
	m2_b: f64,
) -> (f64, f64) {
	let n_a = n_a as f64;
	let n_b = n_b as f64;
	(
		(((n_a * mean_a) + (n_b * mean_b)) / (n_a + n_b)),
		m2_a + m2_b + (mean_b - mean_a) * (mean_b - mean_a) * (n_a * n_b / (n_a + n_b)),
	)
}

/// Convert an m2 into the sample variance, which divides by `n - 1`. The sample variance of fewer than two values is undefined.
pub fn m2_to_variance(m2: f64, n: u64) -> Option<f64> {
	if n < 2 {
		None
	} else {
		Some(m2 / (n - 1) as f64)
	}
}

/// `MeanVariance` computes the mean and the sample variance of a stream of values.
#[derive(Clone, Debug, Default)]
pub struct MeanVariance {
	n: u64,
	mean: f64,
	m2: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeanVarianceOutput {
	pub n: u64,
	/// This is `None` if no values were seen.
	pub mean: Option<f64>,
	/// This is `None` if fewer than two values were seen.
	pub variance: Option<f64>,
}

impl MeanVariance {
	pub fn new() -> Self {
		Self::default()
	}

	/// Update with `count` occurrences of `value`. This is used when aggregating a histogram of unique values.
	pub fn update_with_count(&mut self, value: f64, count: u64) {
		if count == 0 {
			return;
		}
		let (mean, m2) = merge_mean_m2(self.n, self.mean, self.m2, count, value, 0.0);
		self.n += count;
		self.mean = mean;
		self.m2 = m2;
	}
}

impl StreamingMetric<'_> for MeanVariance {
	type Input = f64;
	type Output = MeanVarianceOutput;

	fn update(&mut self, value: f64) {
		self.update_with_count(value, 1)
	}

	fn merge(&mut self, other: Self) {
		if other.n == 0 {
			return;
		}
		let (mean, m2) = merge_mean_m2(self.n, self.mean, self.m2, other.n, other.mean, other.m2);
		self.n += other.n;
		self.mean = mean;
		self.m2 = m2;
	}

	fn finalize(self) -> MeanVarianceOutput {
		MeanVarianceOutput {
			n: self.n,
			mean: if self.n > 0 { Some(self.mean) } else { None },
			variance: m2_to_variance(self.m2, self.n),
		}
	}
}

#[test]
fn test_mean_variance() {
	let mut metric = MeanVariance::new();
	for value in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
		metric.update(*value);
	}
	let output = metric.finalize();
	assert_eq!(output.n, 8);
	assert!((output.mean.unwrap() - 5.0).abs() < 1e-12);
	assert!((output.variance.unwrap() - 32.0 / 7.0).abs() < 1e-12);
}

#[test]
fn test_mean_variance_merge() {
	let mut a = MeanVariance::new();
	let mut b = MeanVariance::new();
	a.update(1.0);
	a.update(2.0);
	b.update_with_count(3.0, 2);
	a.merge(b);
	a.merge(MeanVariance::new());
	let output = a.finalize();
	assert_eq!(output.n, 4);
	assert!((output.mean.unwrap() - 2.25).abs() < 1e-12);
	assert!((output.variance.unwrap() - 2.75 / 3.0).abs() < 1e-12);
}

#[test]
fn test_mean_variance_undefined() {
	assert_eq!(
		MeanVariance::new().finalize(),
		MeanVarianceOutput {
			n: 0,
			mean: None,
			variance: None,
		}
	);
	let mut metric = MeanVariance::new();
	metric.update(3.0);
	let output = metric.finalize();
	assert_eq!(output.mean, Some(3.0));
	assert_eq!(output.variance, None);
}

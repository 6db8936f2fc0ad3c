use super::{merge_mean_m2, StreamingMetric};

/**
`PearsonCorrelation` computes the Pearson correlation coefficient of a stream of `(x, y)` pairs. The caller decides which pairs to feed it, so feeding only the rows where both values are present gives the pairwise-complete correlation.

The output is `None` when the correlation is undefined: fewer than two pairs, or either variable has zero variance.
*/
#[derive(Clone, Debug, Default)]
pub struct PearsonCorrelation {
	n: u64,
	mean_x: f64,
	mean_y: f64,
	m2_x: f64,
	m2_y: f64,
	/// This is the sum of the products of the deviations of x and y from their means.
	c_xy: f64,
}

impl PearsonCorrelation {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn n(&self) -> u64 {
		self.n
	}
}

impl StreamingMetric<'_> for PearsonCorrelation {
	type Input = (f64, f64);
	type Output = Option<f64>;

	fn update(&mut self, (x, y): (f64, f64)) {
		self.n += 1;
		let n = self.n as f64;
		let dx = x - self.mean_x;
		let dy = y - self.mean_y;
		self.mean_x += dx / n;
		self.mean_y += dy / n;
		self.m2_x += dx * (x - self.mean_x);
		self.m2_y += dy * (y - self.mean_y);
		self.c_xy += dx * (y - self.mean_y);
	}

	fn merge(&mut self, other: Self) {
		if other.n == 0 {
			return;
		}
		if self.n == 0 {
			*self = other;
			return;
		}
		let n_a = self.n as f64;
		let n_b = other.n as f64;
		let dx = other.mean_x - self.mean_x;
		let dy = other.mean_y - self.mean_y;
		self.c_xy += other.c_xy + dx * dy * (n_a * n_b / (n_a + n_b));
		let (mean_x, m2_x) =
			merge_mean_m2(self.n, self.mean_x, self.m2_x, other.n, other.mean_x, other.m2_x);
		let (mean_y, m2_y) =
			merge_mean_m2(self.n, self.mean_y, self.m2_y, other.n, other.mean_y, other.m2_y);
		self.mean_x = mean_x;
		self.m2_x = m2_x;
		self.mean_y = mean_y;
		self.m2_y = m2_y;
		self.n += other.n;
	}

	fn finalize(self) -> Option<f64> {
		if self.n < 2 || self.m2_x <= 0.0 || self.m2_y <= 0.0 {
			return None;
		}
		// Scale by the larger m2 so the product cannot overflow. A variable paired with itself still gives exactly 1.
		let scale = self.m2_x.max(self.m2_y);
		let r = (self.c_xy / scale) / ((self.m2_x / scale) * (self.m2_y / scale)).sqrt();
		if r.is_finite() {
			Some(r.max(-1.0).min(1.0))
		} else {
			None
		}
	}
}

#[cfg(test)]
fn correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
	let mut metric = PearsonCorrelation::new();
	for (x, y) in xs.iter().zip(ys.iter()) {
		metric.update((*x, *y));
	}
	metric.finalize()
}

#[test]
fn test_perfect_correlation() {
	let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
	let doubled = [2.0, 4.0, 6.0, 8.0, 10.0];
	let reversed = [5.0, 4.0, 3.0, 2.0, 1.0];
	assert!((correlation(&xs, &doubled).unwrap() - 1.0).abs() < 1e-12);
	assert!((correlation(&xs, &reversed).unwrap() + 1.0).abs() < 1e-12);
}

#[test]
fn test_identical_values_correlate_exactly() {
	let xs = [0.1, 7.3, -2.2, 4.0];
	assert_eq!(correlation(&xs, &xs), Some(1.0));
}

#[test]
fn test_known_correlation() {
	let xs = [1.0, 2.0, 3.0, 4.0];
	let ys = [1.0, 3.0, 2.0, 4.0];
	assert!((correlation(&xs, &ys).unwrap() - 0.8).abs() < 1e-12);
}

#[test]
fn test_undefined_correlation() {
	assert_eq!(correlation(&[], &[]), None);
	assert_eq!(correlation(&[1.0], &[2.0]), None);
	assert_eq!(correlation(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), None);
}

#[test]
fn test_merge_matches_single_pass() {
	let xs = [1.0, 4.0, 2.0, 8.0, 5.0, 7.0];
	let ys = [2.0, 3.0, 1.0, 9.0, 4.0, 8.0];
	let mut a = PearsonCorrelation::new();
	let mut b = PearsonCorrelation::new();
	for (index, (x, y)) in xs.iter().zip(ys.iter()).enumerate() {
		if index < 2 {
			a.update((*x, *y));
		} else {
			b.update((*x, *y));
		}
	}
	a.merge(b);
	assert_eq!(a.n(), 6);
	let merged = a.finalize().unwrap();
	let single = correlation(&xs, &ys).unwrap();
	assert!((merged - single).abs() < 1e-12);
}

#[test]
fn test_large_magnitudes() {
	let xs = [1e100, 2e100, 3e100];
	let ys = [3e100, 2e100, 1e100];
	assert_eq!(correlation(&xs, &xs), Some(1.0));
	assert!((correlation(&xs, &ys).unwrap() + 1.0).abs() < 1e-12);
}

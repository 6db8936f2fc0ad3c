use explorer_util::finite::Finite;
use std::{cmp::Ordering, collections::BTreeMap};

/**
Compute the quantiles `qs` of the values counted in `histogram`, which maps each unique value to its number of occurrences. Quantiles are linearly interpolated between order statistics: the `q`-th quantile of `n` sorted values sits at position `(n - 1) * q`.

Returns `None` if the histogram is empty.
*/
pub fn quantiles(histogram: &BTreeMap<Finite<f64>, usize>, qs: &[f64]) -> Option<Vec<f64>> {
	let total_values_count: usize = histogram.values().sum();
	if total_values_count == 0 {
		return None;
	}
	let position = |q: f64| (total_values_count - 1) as f64 * q;
	// Find the index of each quantile given the total number of values.
	let quantile_indexes: Vec<usize> = qs.iter().map(|q| position(*q).trunc() as usize).collect();
	// This is the fractional part of the position used to interpolate values if the position is not an integer.
	let quantile_fracts: Vec<f64> = qs.iter().map(|q| position(*q).fract()).collect();
	let mut quantiles: Vec<Option<f64>> = vec![None; qs.len()];
	let mut current_count: usize = 0;
	let mut iter = histogram.iter().peekable();
	while let Some((value, count)) = iter.next() {
		let value = value.get();
		current_count += count;
		if current_count == 0 {
			continue;
		}
		let quantiles_iter = quantiles
			.iter_mut()
			.zip(quantile_indexes.iter().zip(quantile_fracts.iter()))
			.filter(|(q, (_, _))| q.is_none());
		for (quantile, (index, fract)) in quantiles_iter {
			match (current_count - 1).cmp(index) {
				Ordering::Equal => {
					if *fract > 0.0 {
						// Interpolate between this value and the next one.
						let next_value = iter.peek().map(|(next, _)| next.get()).unwrap_or(value);
						*quantile = Some(value + (next_value - value) * fract);
					} else {
						*quantile = Some(value);
					}
				}
				Ordering::Greater => *quantile = Some(value),
				Ordering::Less => {}
			}
		}
	}
	quantiles.into_iter().collect()
}

#[cfg(test)]
fn histogram(values: &[f64]) -> BTreeMap<Finite<f64>, usize> {
	let mut histogram = BTreeMap::new();
	for value in values {
		*histogram.entry(Finite::new(*value).unwrap()).or_insert(0) += 1;
	}
	histogram
}

#[test]
fn test_quantiles_interpolate() {
	let histogram = histogram(&[4.0, 1.0, 3.0, 2.0]);
	assert_eq!(
		quantiles(&histogram, &[0.0, 0.25, 0.5, 0.75, 1.0]),
		Some(vec![1.0, 1.75, 2.5, 3.25, 4.0])
	);
}

#[test]
fn test_quantiles_with_repeated_values() {
	let histogram = histogram(&[1.0, 1.0, 1.0, 5.0]);
	assert_eq!(
		quantiles(&histogram, &[0.25, 0.5, 0.75]),
		Some(vec![1.0, 1.0, 2.0])
	);
}

#[test]
fn test_quantiles_single_value() {
	let histogram = histogram(&[7.0]);
	assert_eq!(
		quantiles(&histogram, &[0.25, 0.5, 0.75]),
		Some(vec![7.0, 7.0, 7.0])
	);
}

#[test]
fn test_quantiles_empty() {
	assert_eq!(quantiles(&BTreeMap::new(), &[0.5]), None);
}

/*!
`Finite<T>` wraps a float that is known to be neither NaN nor infinite, which gives it a total order and a hash. This lets floats be used as keys in `BTreeMap`s and `HashSet`s.
*/

use num_traits::Float;
use std::{
	cmp::{Ord, Ordering},
	fmt::Debug,
	hash::{Hash, Hasher},
};
use thiserror::Error;

#[derive(Clone, Copy, Debug)]
pub struct Finite<T>(T)
where
	T: Float;

#[derive(Debug, Error)]
#[error("not finite")]
pub struct NotFiniteError;

impl<T> Finite<T>
where
	T: Float,
{
	pub fn new(value: T) -> Result<Self, NotFiniteError> {
		if value.is_finite() {
			// -0.0 and 0.0 compare equal, so store a single representation to keep `Hash` consistent with `Eq`.
			let value = if value == T::zero() { T::zero() } else { value };
			Ok(Self(value))
		} else {
			Err(NotFiniteError)
		}
	}

	pub fn get(self) -> T {
		self.0
	}
}

impl<T> std::ops::Deref for Finite<T>
where
	T: Float,
{
	type Target = T;
	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<T> std::fmt::Display for Finite<T>
where
	T: Float + std::fmt::Display,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl<T> PartialEq for Finite<T>
where
	T: Float,
{
	#[inline]
	fn eq(&self, other: &Self) -> bool {
		self.0.eq(&other.0)
	}
}

impl<T> Eq for Finite<T> where T: Float {}

impl<T> PartialOrd for Finite<T>
where
	T: Float,
{
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl<T> Ord for Finite<T>
where
	T: Float,
{
	fn cmp(&self, other: &Self) -> Ordering {
		// Both values are finite, so `partial_cmp` never returns `None`.
		self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
	}
}

impl Hash for Finite<f64> {
	#[inline]
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.to_bits().hash(state);
	}
}

pub trait ToFinite<T>
where
	T: Float,
{
	/// If the value is finite, return `Ok(Finite(self))`, otherwise return `Err(NotFiniteError)`.
	fn to_finite(self) -> Result<Finite<T>, NotFiniteError>;
}

impl<T> ToFinite<T> for T
where
	T: Float,
{
	fn to_finite(self) -> Result<Finite<T>, NotFiniteError> {
		Finite::new(self)
	}
}

#[test]
fn test_rejects_non_finite() {
	assert!(f64::NAN.to_finite().is_err());
	assert!(f64::INFINITY.to_finite().is_err());
	assert!(f64::NEG_INFINITY.to_finite().is_err());
	assert_eq!(1.5f64.to_finite().unwrap().get(), 1.5);
}

#[test]
fn test_negative_zero_hashes_like_zero() {
	use std::collections::HashSet;
	let mut set = HashSet::new();
	set.insert(Finite::new(0.0f64).unwrap());
	set.insert(Finite::new(-0.0f64).unwrap());
	set.insert(Finite::new(1.0f64).unwrap());
	assert_eq!(set.len(), 2);
}

#[test]
fn test_total_order() {
	let mut values: Vec<Finite<f64>> = vec![3.0, -1.0, 2.5, 0.0]
		.into_iter()
		.map(|value| Finite::new(value).unwrap())
		.collect();
	values.sort();
	let values: Vec<f64> = values.into_iter().map(|value| value.get()).collect();
	assert_eq!(values, vec![-1.0, 0.0, 2.5, 3.0]);
}

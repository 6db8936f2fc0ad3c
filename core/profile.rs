/*!
This module computes the [`ProfileReport`](struct.ProfileReport.html) for a dataframe: its shape, the number of missing values, metadata for each column and descriptive statistics for each numeric column.
*/

use crate::classify::{classify, ColumnClasses};
use explorer_dataframe::{Column, DataFrame};
use explorer_metrics::{quantiles, MeanVariance, StreamingMetric};
use explorer_util::finite::{Finite, ToFinite};
use fnv::FnvHashSet;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ProfileReport {
	pub row_count: usize,
	pub column_count: usize,
	/// This is the sum of the `null_count` of every column.
	pub total_missing: usize,
	pub columns: Vec<ColumnMeta>,
	/// This is `None` if the dataframe has no numeric columns. Otherwise it has one entry per numeric column, in column order.
	pub numeric_summary: Option<Vec<NumericSummary>>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ColumnMeta {
	pub name: String,
	pub column_type: explorer_dataframe::ColumnType,
	pub non_null_count: usize,
	pub null_count: usize,
	/// This is the number of distinct non-null values.
	pub unique_count: usize,
}

/// Descriptive statistics over the non-null values of a numeric column. Every statistic is `None` when the column has no non-null values, and `std` is also `None` when it has exactly one.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NumericSummary {
	pub column_name: String,
	/// This is the number of non-null values.
	pub count: usize,
	pub mean: Option<f64>,
	/// This is the sample standard deviation.
	pub std: Option<f64>,
	pub min: Option<f64>,
	/// This is the p25, or 25th-percentile value in the column.
	pub p25: Option<f64>,
	/// This is the p50, or 50th-percentile value in the column, i.e. the median.
	pub p50: Option<f64>,
	/// This is the p75, or 75th-percentile value in the column.
	pub p75: Option<f64>,
	pub max: Option<f64>,
}

impl ProfileReport {
	pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
		self.columns.iter().find(|column| column.name == name)
	}

	pub fn numeric_summary_for(&self, name: &str) -> Option<&NumericSummary> {
		self.numeric_summary
			.as_ref()
			.and_then(|summaries| summaries.iter().find(|summary| summary.column_name == name))
	}
}

/// Profile a dataframe, classifying its columns first.
pub fn profile(dataframe: &DataFrame) -> ProfileReport {
	profile_with_classes(dataframe, &classify(dataframe))
}

/// Profile a dataframe whose columns were already classified. The numeric summary covers exactly the columns in `classes.numeric`.
pub fn profile_with_classes(dataframe: &DataFrame, classes: &ColumnClasses) -> ProfileReport {
	let row_count = dataframe.nrows();
	let mut columns = Vec::with_capacity(dataframe.ncols());
	let mut summaries = Vec::new();
	for column in dataframe.columns.iter() {
		if classes.is_numeric(column.name()) {
			let stats = NumberColumnStats::compute(column);
			columns.push(ColumnMeta {
				name: column.name().to_owned(),
				column_type: column.column_type(),
				non_null_count: stats.valid_count,
				null_count: stats.count - stats.valid_count,
				unique_count: match column {
					// Distinct integers above 2^53 share an f64, so count them as integers.
					Column::Integer(_) => unique_count(column),
					_ => stats.histogram.len(),
				},
			});
			summaries.push(stats.finalize());
		} else {
			let null_count = column.null_count();
			columns.push(ColumnMeta {
				name: column.name().to_owned(),
				column_type: column.column_type(),
				non_null_count: column.len() - null_count,
				null_count,
				unique_count: unique_count(column),
			});
		}
	}
	let total_missing = columns.iter().map(|column| column.null_count).sum();
	let numeric_summary = if summaries.is_empty() {
		None
	} else {
		Some(summaries)
	};
	tracing::debug!(
		row_count,
		column_count = columns.len(),
		total_missing,
		"profiled dataframe"
	);
	ProfileReport {
		row_count,
		column_count: columns.len(),
		total_missing,
		columns,
		numeric_summary,
	}
}

fn unique_count(column: &Column) -> usize {
	match column {
		Column::Unknown(_) => 0,
		Column::Integer(column) => column.data.iter().flatten().collect::<FnvHashSet<_>>().len(),
		Column::Float(column) => column
			.data
			.iter()
			.flatten()
			.filter_map(|value| Finite::new(*value).ok())
			.collect::<FnvHashSet<_>>()
			.len(),
		Column::Boolean(column) => column.data.iter().flatten().collect::<FnvHashSet<_>>().len(),
		Column::Text(column) => column
			.data
			.iter()
			.flatten()
			.map(|value| value.as_str())
			.collect::<FnvHashSet<_>>()
			.len(),
	}
}

/// This struct accumulates the values of a numeric column into a histogram mapping each unique value to its number of occurrences.
struct NumberColumnStats {
	column_name: String,
	/// The total number of values, including nulls.
	count: usize,
	/// The total number of non-null values.
	valid_count: usize,
	histogram: BTreeMap<Finite<f64>, usize>,
}

impl NumberColumnStats {
	fn compute(column: &Column) -> Self {
		let mut stats = Self {
			column_name: column.name().to_owned(),
			count: column.len(),
			valid_count: 0,
			histogram: BTreeMap::new(),
		};
		for index in 0..column.len() {
			if let Some(value) = column.number(index).and_then(|value| value.to_finite().ok()) {
				*stats.histogram.entry(value).or_insert(0) += 1;
				stats.valid_count += 1;
			}
		}
		stats
	}

	fn finalize(self) -> NumericSummary {
		let min = self.histogram.keys().next().map(|value| value.get());
		let max = self.histogram.keys().next_back().map(|value| value.get());
		let mut mean_variance = MeanVariance::new();
		for (value, count) in self.histogram.iter() {
			mean_variance.update_with_count(value.get(), *count as u64);
		}
		let mean_variance = mean_variance.finalize();
		let (p25, p50, p75) = match quantiles(&self.histogram, &[0.25, 0.50, 0.75]).as_deref() {
			Some([p25, p50, p75]) => (Some(*p25), Some(*p50), Some(*p75)),
			_ => (None, None, None),
		};
		NumericSummary {
			column_name: self.column_name,
			count: self.valid_count,
			mean: mean_variance.mean,
			std: mean_variance.variance.map(|variance| variance.sqrt()),
			min,
			p25,
			p50,
			p75,
			max,
		}
	}
}

#[cfg(test)]
fn load(csv: &str) -> DataFrame {
	DataFrame::from_bytes(csv.as_bytes(), explorer_dataframe::FromCsvOptions::default()).unwrap()
}

#[test]
fn test_profile() {
	let report = profile(&load("a,b\n1,x\n2,y\n,z\n"));
	assert_eq!(report.row_count, 3);
	assert_eq!(report.column_count, 2);
	assert_eq!(report.total_missing, 1);
	insta::assert_debug_snapshot!(report.columns, @r###"
 [
     ColumnMeta {
         name: "a",
         column_type: Integer,
         non_null_count: 2,
         null_count: 1,
         unique_count: 2,
     },
     ColumnMeta {
         name: "b",
         column_type: Text,
         non_null_count: 3,
         null_count: 0,
         unique_count: 3,
     },
 ]
 "###);
	insta::assert_debug_snapshot!(report.numeric_summary, @r###"
 Some(
     [
         NumericSummary {
             column_name: "a",
             count: 2,
             mean: Some(
                 1.5,
             ),
             std: Some(
                 0.7071067811865476,
             ),
             min: Some(
                 1.0,
             ),
             p25: Some(
                 1.25,
             ),
             p50: Some(
                 1.5,
             ),
             p75: Some(
                 1.75,
             ),
             max: Some(
                 2.0,
             ),
         },
     ],
 )
 "###);
}

#[test]
fn test_describe_statistics() {
	let report = profile(&load("x\n10\n2\n4\n4\n6\n"));
	let summary = report.numeric_summary_for("x").unwrap();
	assert_eq!(summary.count, 5);
	assert_eq!(summary.mean, Some(5.2));
	assert_eq!(summary.min, Some(2.0));
	assert_eq!(summary.p25, Some(4.0));
	assert_eq!(summary.p50, Some(4.0));
	assert_eq!(summary.p75, Some(6.0));
	assert_eq!(summary.max, Some(10.0));
	// The sample variance of 2, 4, 4, 6, 10 is 9.2.
	assert!((summary.std.unwrap() - 9.2f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_unique_count_compares_numbers_by_value() {
	let report = profile(&load("x,t\n1,a\n1.0,a\n2.5,\n-0.0,b\n0,b\n"));
	let x = report.column("x").unwrap();
	assert_eq!(x.column_type, explorer_dataframe::ColumnType::Float);
	assert_eq!(x.unique_count, 3);
	let t = report.column("t").unwrap();
	assert_eq!(t.unique_count, 2);
	assert_eq!(t.null_count, 1);
}

#[test]
fn test_all_null_numeric_column_is_undefined() {
	let mut column_types = std::collections::BTreeMap::new();
	column_types.insert("x".to_owned(), explorer_dataframe::ColumnType::Float);
	let dataframe = DataFrame::from_bytes(
		b"x,y\n,1\n,2\n",
		explorer_dataframe::FromCsvOptions {
			column_types: Some(column_types),
			..Default::default()
		},
	)
	.unwrap();
	let report = profile(&dataframe);
	assert_eq!(
		report.numeric_summary_for("x"),
		Some(&NumericSummary {
			column_name: "x".to_owned(),
			count: 0,
			mean: None,
			std: None,
			min: None,
			p25: None,
			p50: None,
			p75: None,
			max: None,
		})
	);
	let y = report.numeric_summary_for("y").unwrap();
	assert_eq!(y.std, Some(0.7071067811865476));
}

#[test]
fn test_single_value_has_no_std() {
	let report = profile(&load("x\n3\n"));
	let summary = report.numeric_summary_for("x").unwrap();
	assert_eq!(summary.mean, Some(3.0));
	assert_eq!(summary.std, None);
	assert_eq!(summary.p50, Some(3.0));
}

#[test]
fn test_no_numeric_columns() {
	let report = profile(&load("a,b\nx,true\ny,\n"));
	assert_eq!(report.numeric_summary, None);
	assert_eq!(report.total_missing, 1);
}

#[test]
fn test_missing_value_invariants() {
	let inputs = [
		"a,b,c\n1,,x\n,,\n3,2.5,NA\n",
		"a\n\"\"\n1\n",
		"a,b\n",
		"id,flag\n1,true\n2,\n3,False\n",
	];
	for input in inputs.iter() {
		let report = profile(&load(input));
		let sum: usize = report.columns.iter().map(|column| column.null_count).sum();
		assert_eq!(report.total_missing, sum);
		for column in report.columns.iter() {
			assert_eq!(column.non_null_count + column.null_count, report.row_count);
		}
	}
}

#[test]
fn test_unique_count_of_large_integers() {
	let report = profile(&load("x\n9007199254740993\n9007199254740992\n9007199254740993\n"));
	let x = report.column("x").unwrap();
	assert_eq!(x.column_type, explorer_dataframe::ColumnType::Integer);
	assert_eq!(x.unique_count, 2);
	assert_eq!(report.numeric_summary_for("x").unwrap().count, 3);
}

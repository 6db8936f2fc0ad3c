//! This module renders a profile report as plain text tables for the terminal.

use explorer_core::{
	dataframe::{DataFrameView, Value},
	NumericSummary, ProfileReport,
};
use explorer_util::table::Table;
use ndarray::prelude::*;

pub const NO_NUMERIC_COLUMNS_MESSAGE: &str = "No numeric columns found for statistical analysis";

pub fn basic_information(report: &ProfileReport) -> String {
	format!(
		"Rows: {}\nColumns: {}\nMissing values: {}\n",
		report.row_count, report.column_count, report.total_missing
	)
}

/// Null cells are shown as `NaN`.
pub fn preview_table(view: &DataFrameView) -> anyhow::Result<Table> {
	let header = view
		.columns
		.iter()
		.map(|column| column.name().to_owned())
		.collect();
	let mut row = vec![Value::Null; view.ncols()];
	let mut values = Vec::with_capacity(view.nrows() * view.ncols());
	for index in 0..view.nrows() {
		view.read_row(index, &mut row);
		values.extend(row.iter().map(|value| value.to_string()));
	}
	let values = Array2::from_shape_vec((view.nrows(), view.ncols()), values)?;
	Ok(Table::new(header, values))
}

pub fn column_info_table(report: &ProfileReport) -> anyhow::Result<Table> {
	let header = ["column", "type", "non-null", "null", "unique"]
		.iter()
		.map(|name| (*name).to_owned())
		.collect();
	let values = report
		.columns
		.iter()
		.flat_map(|column| {
			vec![
				column.name.clone(),
				column.column_type.to_string(),
				column.non_null_count.to_string(),
				column.null_count.to_string(),
				column.unique_count.to_string(),
			]
		})
		.collect();
	let values = Array2::from_shape_vec((report.columns.len(), 5), values)?;
	Ok(Table::new(header, values))
}

/// One row per statistic and one column per numeric column, like a pandas `describe()`.
pub fn describe_table(summaries: &[NumericSummary]) -> anyhow::Result<Table> {
	let header = std::iter::once(String::new())
		.chain(summaries.iter().map(|summary| summary.column_name.clone()))
		.collect();
	let statistics: [(&str, fn(&NumericSummary) -> Option<f64>); 7] = [
		("mean", |summary| summary.mean),
		("std", |summary| summary.std),
		("min", |summary| summary.min),
		("25%", |summary| summary.p25),
		("50%", |summary| summary.p50),
		("75%", |summary| summary.p75),
		("max", |summary| summary.max),
	];
	let mut values = vec!["count".to_owned()];
	values.extend(summaries.iter().map(|summary| summary.count.to_string()));
	for (label, statistic) in statistics.iter() {
		values.push((*label).to_owned());
		values.extend(
			summaries
				.iter()
				.map(|summary| format_statistic(statistic(summary))),
		);
	}
	let values = Array2::from_shape_vec((statistics.len() + 1, summaries.len() + 1), values)?;
	Ok(Table::new(header, values))
}

fn format_statistic(value: Option<f64>) -> String {
	match value {
		Some(value) => format!("{:.6}", value),
		None => "NaN".to_owned(),
	}
}

#[cfg(test)]
fn sample() -> explorer_core::Session {
	explorer_core::Session::load(
		b"a,b\n1,x\n2,y\n,z\n",
		"csv",
		explorer_core::dataframe::FromCsvOptions::default(),
	)
	.unwrap()
}

#[test]
fn test_basic_information() {
	let report = sample().profile();
	assert_eq!(
		basic_information(&report),
		"Rows: 3\nColumns: 2\nMissing values: 1\n"
	);
}

#[test]
fn test_preview_table() {
	let session = sample();
	let table = preview_table(&session.preview(5)).unwrap();
	assert_eq!(
		table.to_string(),
		"| a   | b |\n|-----|---|\n| 1   | x |\n| 2   | y |\n| NaN | z |\n"
	);
}

#[test]
fn test_column_info_table() {
	let report = sample().profile();
	insta::assert_snapshot!(column_info_table(&report).unwrap().to_string(), @r###"
 | column | type    | non-null | null | unique |
 |--------|---------|----------|------|--------|
 | a      | integer | 2        | 1    | 2      |
 | b      | text    | 3        | 0    | 3      |
 "###);
}

#[test]
fn test_describe_table() {
	let report = sample().profile();
	let summaries = report.numeric_summary.unwrap();
	insta::assert_snapshot!(describe_table(&summaries).unwrap().to_string(), @r###"
 |       | a        |
 |-------|----------|
 | count | 2        |
 | mean  | 1.500000 |
 | std   | 0.707107 |
 | min   | 1.000000 |
 | 25%   | 1.250000 |
 | 50%   | 1.500000 |
 | 75%   | 1.750000 |
 | max   | 2.000000 |
 "###);
}

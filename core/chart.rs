/*!
This module builds [`ChartSpec`](struct.ChartSpec.html)s: rendering-agnostic descriptions of a chart holding the minimal slice of data needed to draw it and its display parameters. Every chart kind operates on numeric columns only.
*/

use crate::classify::ColumnClasses;
use explorer_dataframe::{Column, DataFrame};
use explorer_metrics::{PearsonCorrelation, StreamingMetric};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
	Histogram,
	BoxPlot,
	ScatterPlot,
	CorrelationHeatmap,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChartRequest {
	pub kind: ChartKind,
	/// Histograms and box plots take one column, scatter plots take two distinct columns and correlation heatmaps take none because they always use every numeric column.
	pub columns: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ChartSpec {
	pub kind: ChartKind,
	pub data: ChartData,
	pub parameters: ChartParameters,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
	/// The non-null values of a single column, in row order.
	Values { column: String, values: Vec<f64> },
	/// One point per row where both columns are non-null, in row order.
	Points {
		x_column: String,
		y_column: String,
		points: Vec<ScatterPoint>,
	},
	/// `values[i][j]` is the correlation between `columns[i]` and `columns[j]`, or `None` where it is undefined.
	CorrelationMatrix {
		columns: Vec<String>,
		values: Vec<Vec<Option<f64>>>,
	},
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScatterPoint {
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ChartParameters {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub x_axis_title: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub y_axis_title: Option<String>,
	/// Draw the value of each cell on the chart.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub annotate: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color_scale: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ChartError {
	/// The selected columns cannot be drawn with the selected kind of chart. The user should select again.
	#[error("invalid chart request: {0}")]
	InvalidChartRequest(String),
	/// The request is valid but the data does not support a meaningful chart.
	#[error("insufficient data: {0}")]
	InsufficientData(String),
}

impl std::fmt::Display for ChartKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			ChartKind::Histogram => "Histogram",
			ChartKind::BoxPlot => "Box Plot",
			ChartKind::ScatterPlot => "Scatter Plot",
			ChartKind::CorrelationHeatmap => "Correlation Heatmap",
		};
		write!(f, "{}", s)
	}
}

impl std::str::FromStr for ChartKind {
	type Err = String;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized: String = s
			.chars()
			.filter(|c| !matches!(c, '-' | '_' | ' '))
			.flat_map(|c| c.to_lowercase())
			.collect();
		match normalized.as_str() {
			"histogram" => Ok(ChartKind::Histogram),
			"boxplot" => Ok(ChartKind::BoxPlot),
			"scatterplot" => Ok(ChartKind::ScatterPlot),
			"correlationheatmap" => Ok(ChartKind::CorrelationHeatmap),
			_ => Err(format!("unknown chart kind \"{}\"", s)),
		}
	}
}

impl ChartRequest {
	pub fn histogram(column: &str) -> Self {
		Self {
			kind: ChartKind::Histogram,
			columns: vec![column.to_owned()],
		}
	}

	pub fn box_plot(column: &str) -> Self {
		Self {
			kind: ChartKind::BoxPlot,
			columns: vec![column.to_owned()],
		}
	}

	pub fn scatter_plot(x: &str, y: &str) -> Self {
		Self {
			kind: ChartKind::ScatterPlot,
			columns: vec![x.to_owned(), y.to_owned()],
		}
	}

	pub fn correlation_heatmap() -> Self {
		Self {
			kind: ChartKind::CorrelationHeatmap,
			columns: Vec::new(),
		}
	}
}

/// Build the chart described by `request`. `classes` must be the classification of `dataframe`.
pub fn build_chart(
	dataframe: &DataFrame,
	classes: &ColumnClasses,
	request: &ChartRequest,
) -> Result<ChartSpec, ChartError> {
	let spec = match request.kind {
		ChartKind::Histogram => {
			let column = single_column(dataframe, classes, request)?;
			let name = column.name();
			ChartSpec {
				kind: ChartKind::Histogram,
				data: column_values(column)?,
				parameters: ChartParameters {
					title: Some(format!("Histogram of {}", name)),
					x_axis_title: Some(name.to_owned()),
					y_axis_title: Some("count".to_owned()),
					..Default::default()
				},
			}
		}
		ChartKind::BoxPlot => {
			let column = single_column(dataframe, classes, request)?;
			let name = column.name();
			ChartSpec {
				kind: ChartKind::BoxPlot,
				data: column_values(column)?,
				parameters: ChartParameters {
					title: Some(format!("Box Plot of {}", name)),
					y_axis_title: Some(name.to_owned()),
					..Default::default()
				},
			}
		}
		ChartKind::ScatterPlot => scatter_plot(dataframe, classes, request)?,
		ChartKind::CorrelationHeatmap => correlation_heatmap(dataframe, classes, request)?,
	};
	tracing::debug!(kind = %spec.kind, columns = ?request.columns, "built chart");
	Ok(spec)
}

/// Look up a column by name and check that it is numeric.
fn numeric_column<'a>(
	dataframe: &'a DataFrame,
	classes: &ColumnClasses,
	name: &str,
) -> Result<&'a Column, ChartError> {
	let column = dataframe.column(name).ok_or_else(|| {
		ChartError::InvalidChartRequest(format!("column \"{}\" does not exist", name))
	})?;
	if !classes.is_numeric(name) {
		return Err(ChartError::InvalidChartRequest(format!(
			"column \"{}\" is not numeric",
			name
		)));
	}
	Ok(column)
}

fn single_column<'a>(
	dataframe: &'a DataFrame,
	classes: &ColumnClasses,
	request: &ChartRequest,
) -> Result<&'a Column, ChartError> {
	match request.columns.as_slice() {
		[name] => numeric_column(dataframe, classes, name),
		columns => Err(ChartError::InvalidChartRequest(format!(
			"a {} takes exactly 1 column, but {} were selected",
			request.kind,
			columns.len()
		))),
	}
}

fn column_values(column: &Column) -> Result<ChartData, ChartError> {
	let values: Vec<f64> = (0..column.len())
		.filter_map(|index| column.number(index))
		.collect();
	if values.is_empty() {
		return Err(ChartError::InsufficientData(format!(
			"column \"{}\" has no values",
			column.name()
		)));
	}
	Ok(ChartData::Values {
		column: column.name().to_owned(),
		values,
	})
}

fn scatter_plot(
	dataframe: &DataFrame,
	classes: &ColumnClasses,
	request: &ChartRequest,
) -> Result<ChartSpec, ChartError> {
	let (x_name, y_name) = match request.columns.as_slice() {
		[x, y] if x != y => (x, y),
		[_, _] => {
			return Err(ChartError::InvalidChartRequest(
				"a Scatter Plot takes 2 distinct columns".to_owned(),
			))
		}
		columns => {
			return Err(ChartError::InvalidChartRequest(format!(
				"a Scatter Plot takes exactly 2 columns, but {} were selected",
				columns.len()
			)))
		}
	};
	let x = numeric_column(dataframe, classes, x_name)?;
	let y = numeric_column(dataframe, classes, y_name)?;
	let points: Vec<ScatterPoint> = paired_values(x, y)
		.map(|(x, y)| ScatterPoint { x, y })
		.collect();
	if points.is_empty() {
		return Err(ChartError::InsufficientData(format!(
			"no row has values for both \"{}\" and \"{}\"",
			x_name, y_name
		)));
	}
	Ok(ChartSpec {
		kind: ChartKind::ScatterPlot,
		data: ChartData::Points {
			x_column: x_name.clone(),
			y_column: y_name.clone(),
			points,
		},
		parameters: ChartParameters {
			title: Some(format!("Scatter Plot: {} vs {}", x_name, y_name)),
			x_axis_title: Some(x_name.clone()),
			y_axis_title: Some(y_name.clone()),
			..Default::default()
		},
	})
}

/// Pair the values of two columns by row, skipping rows where either is null.
fn paired_values<'a>(x: &'a Column, y: &'a Column) -> impl Iterator<Item = (f64, f64)> + 'a {
	(0..x.len().min(y.len())).filter_map(move |index| Some((x.number(index)?, y.number(index)?)))
}

fn correlation_heatmap(
	dataframe: &DataFrame,
	classes: &ColumnClasses,
	request: &ChartRequest,
) -> Result<ChartSpec, ChartError> {
	if !request.columns.is_empty() {
		return Err(ChartError::InvalidChartRequest(
			"a Correlation Heatmap uses every numeric column and takes no column selection"
				.to_owned(),
		));
	}
	if classes.numeric.len() < 2 {
		return Err(ChartError::InsufficientData(format!(
			"a Correlation Heatmap needs at least 2 numeric columns, but there {} {}",
			if classes.numeric.len() == 1 { "is" } else { "are" },
			classes.numeric.len()
		)));
	}
	let columns = classes
		.numeric
		.iter()
		.map(|name| numeric_column(dataframe, classes, name))
		.collect::<Result<Vec<_>, _>>()?;
	let n = columns.len();
	let mut values = vec![vec![None; n]; n];
	for i in 0..n {
		for j in i..n {
			let mut correlation = PearsonCorrelation::new();
			for pair in paired_values(columns[i], columns[j]) {
				correlation.update(pair);
			}
			let correlation = correlation.finalize();
			values[i][j] = correlation;
			values[j][i] = correlation;
		}
	}
	Ok(ChartSpec {
		kind: ChartKind::CorrelationHeatmap,
		data: ChartData::CorrelationMatrix {
			columns: classes.numeric.clone(),
			values,
		},
		parameters: ChartParameters {
			annotate: true,
			color_scale: Some("coolwarm".to_owned()),
			..Default::default()
		},
	})
}

#[cfg(test)]
fn build(csv: &str, request: ChartRequest) -> Result<ChartSpec, ChartError> {
	let dataframe =
		DataFrame::from_bytes(csv.as_bytes(), explorer_dataframe::FromCsvOptions::default())
			.unwrap();
	let classes = crate::classify::classify(&dataframe);
	build_chart(&dataframe, &classes, &request)
}

#[test]
fn test_histogram() {
	let spec = build("a,b\n1,x\n2,y\n,z\n", ChartRequest::histogram("a")).unwrap();
	assert_eq!(spec.kind, ChartKind::Histogram);
	assert_eq!(
		spec.data,
		ChartData::Values {
			column: "a".to_owned(),
			values: vec![1.0, 2.0],
		}
	);
	assert_eq!(spec.parameters.title.as_deref(), Some("Histogram of a"));
}

#[test]
fn test_box_plot() {
	let spec = build("v\n3.5\nNA\n1\n", ChartRequest::box_plot("v")).unwrap();
	assert_eq!(
		spec.data,
		ChartData::Values {
			column: "v".to_owned(),
			values: vec![3.5, 1.0],
		}
	);
	assert_eq!(spec.parameters.title.as_deref(), Some("Box Plot of v"));
	assert_eq!(spec.parameters.y_axis_title.as_deref(), Some("v"));
}

#[test]
fn test_non_numeric_column_is_rejected() {
	let csv = "a,b,c\n1,x,true\n2,y,false\n";
	for request in vec![
		ChartRequest::histogram("b"),
		ChartRequest::box_plot("c"),
		ChartRequest::scatter_plot("a", "b"),
	] {
		assert!(matches!(
			build(csv, request),
			Err(ChartError::InvalidChartRequest(_))
		));
	}
}

#[test]
fn test_missing_column_is_rejected() {
	assert_eq!(
		build("a\n1\n", ChartRequest::histogram("z")),
		Err(ChartError::InvalidChartRequest(
			"column \"z\" does not exist".to_owned()
		))
	);
}

#[test]
fn test_arity_is_checked() {
	let csv = "a,b\n1,2\n3,4\n";
	let requests = vec![
		ChartRequest {
			kind: ChartKind::Histogram,
			columns: vec![],
		},
		ChartRequest {
			kind: ChartKind::BoxPlot,
			columns: vec!["a".to_owned(), "b".to_owned()],
		},
		ChartRequest {
			kind: ChartKind::ScatterPlot,
			columns: vec!["a".to_owned()],
		},
		ChartRequest::scatter_plot("a", "a"),
		ChartRequest {
			kind: ChartKind::CorrelationHeatmap,
			columns: vec!["a".to_owned(), "b".to_owned()],
		},
	];
	for request in requests {
		assert!(matches!(
			build(csv, request),
			Err(ChartError::InvalidChartRequest(_))
		));
	}
}

#[test]
fn test_scatter_plot_pairs_rows() {
	let spec = build("A,B\n1,10\n,20\n3,\n", ChartRequest::scatter_plot("A", "B")).unwrap();
	assert_eq!(
		spec.data,
		ChartData::Points {
			x_column: "A".to_owned(),
			y_column: "B".to_owned(),
			points: vec![ScatterPoint { x: 1.0, y: 10.0 }],
		}
	);
	assert_eq!(
		spec.parameters.title.as_deref(),
		Some("Scatter Plot: A vs B")
	);
}

#[test]
fn test_empty_data_is_insufficient() {
	let mut column_types = std::collections::BTreeMap::new();
	column_types.insert("x".to_owned(), explorer_dataframe::ColumnType::Integer);
	let dataframe = DataFrame::from_bytes(
		b"x,y\n,1\n,2\n",
		explorer_dataframe::FromCsvOptions {
			column_types: Some(column_types),
			..Default::default()
		},
	)
	.unwrap();
	let classes = crate::classify::classify(&dataframe);
	assert!(matches!(
		build_chart(&dataframe, &classes, &ChartRequest::histogram("x")),
		Err(ChartError::InsufficientData(_))
	));
	assert!(matches!(
		build_chart(&dataframe, &classes, &ChartRequest::scatter_plot("x", "y")),
		Err(ChartError::InsufficientData(_))
	));
}

#[test]
fn test_correlation_heatmap() {
	let spec = build(
		"a,b,c,label\n1,1,4,x\n2,2,3,y\n3,3,2,z\n4,4,1,w\n",
		ChartRequest::correlation_heatmap(),
	)
	.unwrap();
	assert!(spec.parameters.annotate);
	match spec.data {
		ChartData::CorrelationMatrix { columns, values } => {
			assert_eq!(columns, vec!["a", "b", "c"]);
			assert_eq!(values[0][1], Some(1.0));
			assert_eq!(values[1][0], Some(1.0));
			assert!((values[0][2].unwrap() + 1.0).abs() < 1e-12);
			assert_eq!(values[2][2], Some(1.0));
		}
		data => panic!("unexpected chart data {:?}", data),
	}
}

#[test]
fn test_correlation_heatmap_is_pairwise_complete() {
	// Rows where a or b is null are skipped only for the pairs that include them.
	let spec = build(
		"a,b,c\n1,,2\n2,,4\n3,5,6\n,6,7\n",
		ChartRequest::correlation_heatmap(),
	)
	.unwrap();
	match spec.data {
		ChartData::CorrelationMatrix { values, .. } => {
			// a and b share a single complete row, so their correlation is undefined.
			assert_eq!(values[0][1], None);
			assert_eq!(values[0][2], Some(1.0));
			assert_eq!(values[1][2], Some(1.0));
		}
		data => panic!("unexpected chart data {:?}", data),
	}
}

#[test]
fn test_correlation_heatmap_large_magnitudes() {
	let spec = build(
		"a,b\n1e100,1e100\n2e100,2e100\n3e100,3e100\n",
		ChartRequest::correlation_heatmap(),
	)
	.unwrap();
	match spec.data {
		ChartData::CorrelationMatrix { values, .. } => {
			assert_eq!(
				values,
				vec![vec![Some(1.0), Some(1.0)], vec![Some(1.0), Some(1.0)]]
			);
		}
		data => panic!("unexpected chart data {:?}", data),
	}
}

#[test]
fn test_correlation_heatmap_needs_two_numeric_columns() {
	assert!(matches!(
		build("a,b\n1,x\n2,y\n", ChartRequest::correlation_heatmap()),
		Err(ChartError::InsufficientData(_))
	));
	assert!(matches!(
		build("a,b\nx,y\n", ChartRequest::correlation_heatmap()),
		Err(ChartError::InsufficientData(_))
	));
}

#[test]
fn test_chart_kind_from_str() {
	assert_eq!("histogram".parse::<ChartKind>(), Ok(ChartKind::Histogram));
	assert_eq!("box-plot".parse::<ChartKind>(), Ok(ChartKind::BoxPlot));
	assert_eq!("Scatter Plot".parse::<ChartKind>(), Ok(ChartKind::ScatterPlot));
	assert_eq!(
		"correlation_heatmap".parse::<ChartKind>(),
		Ok(ChartKind::CorrelationHeatmap)
	);
	assert!("pie".parse::<ChartKind>().is_err());
}

#[test]
fn test_serialize_chart_spec() {
	let spec = build("a\n1\n2\n", ChartRequest::histogram("a")).unwrap();
	assert_eq!(
		serde_json::to_value(&spec).unwrap(),
		serde_json::json!({
			"kind": "histogram",
			"data": { "type": "values", "column": "a", "values": [1.0, 2.0] },
			"parameters": {
				"title": "Histogram of a",
				"x_axis_title": "a",
				"y_axis_title": "count",
			},
		})
	);
}

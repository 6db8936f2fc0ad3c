/*!
This crate provides a basic implementation of dataframes, which are two dimensional arrays of data where each column has its own data type, like a spreadsheet. Every cell is either a value of the column's type or null. A dataframe is built once by [`DataFrame::from_bytes`](struct.DataFrame.html#method.from_bytes) and read through shared references afterwards.
*/

#![allow(clippy::tabs_in_doc_comments)]

pub mod export;
pub mod load;

pub use self::load::*;

#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
	pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataFrameView<'a> {
	pub columns: Vec<ColumnView<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
	Unknown(UnknownColumn),
	Integer(IntegerColumn),
	Float(FloatColumn),
	Boolean(BooleanColumn),
	Text(TextColumn),
}

/// An unknown column has no non-null values, so only its length is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownColumn {
	pub name: String,
	pub len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerColumn {
	pub name: String,
	pub data: Vec<Option<i64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatColumn {
	pub name: String,
	pub data: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanColumn {
	pub name: String,
	pub data: Vec<Option<bool>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextColumn {
	pub name: String,
	pub data: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnView<'a> {
	Unknown(UnknownColumnView<'a>),
	Integer(IntegerColumnView<'a>),
	Float(FloatColumnView<'a>),
	Boolean(BooleanColumnView<'a>),
	Text(TextColumnView<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownColumnView<'a> {
	pub name: &'a str,
	pub len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerColumnView<'a> {
	pub name: &'a str,
	pub data: &'a [Option<i64>],
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatColumnView<'a> {
	pub name: &'a str,
	pub data: &'a [Option<f64>],
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanColumnView<'a> {
	pub name: &'a str,
	pub data: &'a [Option<bool>],
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextColumnView<'a> {
	pub name: &'a str,
	pub data: &'a [Option<String>],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
	Unknown,
	Integer,
	Float,
	Boolean,
	Text,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
	Null,
	Integer(i64),
	Float(f64),
	Boolean(bool),
	Text(&'a str),
}

impl ColumnType {
	/// Integer and float columns are numeric.
	pub fn is_numeric(self) -> bool {
		matches!(self, ColumnType::Integer | ColumnType::Float)
	}
}

impl std::fmt::Display for ColumnType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			ColumnType::Unknown => "unknown",
			ColumnType::Integer => "integer",
			ColumnType::Float => "float",
			ColumnType::Boolean => "boolean",
			ColumnType::Text => "text",
		};
		write!(f, "{}", s)
	}
}

/// Format a float so that it always reads back as a float: `1.0` is written as `1.0`, never `1`.
pub fn format_float(value: f64) -> String {
	lexical::to_string(value)
}

/// Booleans are written the way they are most commonly spelled in csv files.
pub fn format_boolean(value: bool) -> &'static str {
	if value {
		"True"
	} else {
		"False"
	}
}

impl DataFrame {
	pub fn new(column_names: Vec<String>, column_types: Vec<ColumnType>) -> Self {
		let columns = column_names
			.into_iter()
			.zip(column_types.into_iter())
			.map(|(column_name, column_type)| match column_type {
				ColumnType::Unknown => Column::Unknown(UnknownColumn::new(column_name)),
				ColumnType::Integer => Column::Integer(IntegerColumn::new(column_name)),
				ColumnType::Float => Column::Float(FloatColumn::new(column_name)),
				ColumnType::Boolean => Column::Boolean(BooleanColumn::new(column_name)),
				ColumnType::Text => Column::Text(TextColumn::new(column_name)),
			})
			.collect();
		Self { columns }
	}

	pub fn ncols(&self) -> usize {
		self.columns.len()
	}

	pub fn nrows(&self) -> usize {
		self.columns.first().map(|column| column.len()).unwrap_or(0)
	}

	pub fn column(&self, name: &str) -> Option<&Column> {
		self.columns.iter().find(|column| column.name() == name)
	}

	pub fn column_names(&self) -> Vec<&str> {
		self.columns.iter().map(|column| column.name()).collect()
	}

	pub fn view(&self) -> DataFrameView {
		let columns = self.columns.iter().map(|column| column.view()).collect();
		DataFrameView { columns }
	}
}

impl Column {
	pub fn len(&self) -> usize {
		match self {
			Self::Unknown(s) => s.len,
			Self::Integer(s) => s.data.len(),
			Self::Float(s) => s.data.len(),
			Self::Boolean(s) => s.data.len(),
			Self::Text(s) => s.data.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn name(&self) -> &str {
		match self {
			Self::Unknown(s) => s.name.as_str(),
			Self::Integer(s) => s.name.as_str(),
			Self::Float(s) => s.name.as_str(),
			Self::Boolean(s) => s.name.as_str(),
			Self::Text(s) => s.name.as_str(),
		}
	}

	pub fn column_type(&self) -> ColumnType {
		match self {
			Self::Unknown(_) => ColumnType::Unknown,
			Self::Integer(_) => ColumnType::Integer,
			Self::Float(_) => ColumnType::Float,
			Self::Boolean(_) => ColumnType::Boolean,
			Self::Text(_) => ColumnType::Text,
		}
	}

	pub fn null_count(&self) -> usize {
		match self {
			Self::Unknown(s) => s.len,
			Self::Integer(s) => s.data.iter().filter(|value| value.is_none()).count(),
			Self::Float(s) => s.data.iter().filter(|value| value.is_none()).count(),
			Self::Boolean(s) => s.data.iter().filter(|value| value.is_none()).count(),
			Self::Text(s) => s.data.iter().filter(|value| value.is_none()).count(),
		}
	}

	/// Return the value at row `index` as an `f64` if this is a numeric column and the value is not null.
	pub fn number(&self, index: usize) -> Option<f64> {
		match self {
			Self::Integer(s) => s.data.get(index).copied().flatten().map(|value| value as f64),
			Self::Float(s) => s.data.get(index).copied().flatten(),
			_ => None,
		}
	}

	pub fn value(&self, index: usize) -> Value {
		self.view().value(index)
	}

	pub fn view(&self) -> ColumnView {
		match self {
			Self::Unknown(column) => ColumnView::Unknown(column.view()),
			Self::Integer(column) => ColumnView::Integer(column.view()),
			Self::Float(column) => ColumnView::Float(column.view()),
			Self::Boolean(column) => ColumnView::Boolean(column.view()),
			Self::Text(column) => ColumnView::Text(column.view()),
		}
	}
}

impl UnknownColumn {
	pub fn new(name: String) -> Self {
		Self { name, len: 0 }
	}

	pub fn view(&self) -> UnknownColumnView {
		UnknownColumnView {
			name: &self.name,
			len: self.len,
		}
	}
}

impl IntegerColumn {
	pub fn new(name: String) -> Self {
		Self {
			name,
			data: Vec::new(),
		}
	}

	pub fn view(&self) -> IntegerColumnView {
		IntegerColumnView {
			name: &self.name,
			data: &self.data,
		}
	}
}

impl FloatColumn {
	pub fn new(name: String) -> Self {
		Self {
			name,
			data: Vec::new(),
		}
	}

	pub fn view(&self) -> FloatColumnView {
		FloatColumnView {
			name: &self.name,
			data: &self.data,
		}
	}
}

impl BooleanColumn {
	pub fn new(name: String) -> Self {
		Self {
			name,
			data: Vec::new(),
		}
	}

	pub fn view(&self) -> BooleanColumnView {
		BooleanColumnView {
			name: &self.name,
			data: &self.data,
		}
	}
}

impl TextColumn {
	pub fn new(name: String) -> Self {
		Self {
			name,
			data: Vec::new(),
		}
	}

	pub fn view(&self) -> TextColumnView {
		TextColumnView {
			name: &self.name,
			data: &self.data,
		}
	}
}

impl<'a> DataFrameView<'a> {
	pub fn ncols(&self) -> usize {
		self.columns.len()
	}

	pub fn nrows(&self) -> usize {
		self.columns.first().map(|column| column.len()).unwrap_or(0)
	}

	pub fn read_row(&self, index: usize, row: &mut [Value<'a>]) {
		for (value, column) in row.iter_mut().zip(self.columns.iter()) {
			*value = column.value(index);
		}
	}

	pub fn split_at_row(&self, index: usize) -> (Self, Self) {
		let iter = self.columns.iter().map(|column| column.split_at_row(index));
		let mut columns_a = Vec::with_capacity(self.columns.len());
		let mut columns_b = Vec::with_capacity(self.columns.len());
		for (column_a, column_b) in iter {
			columns_a.push(column_a);
			columns_b.push(column_b);
		}
		(Self { columns: columns_a }, Self { columns: columns_b })
	}

	/// Return a view of the first `n` rows, or of every row if there are fewer than `n`.
	pub fn head(&self, n: usize) -> Self {
		let (head, _) = self.split_at_row(n.min(self.nrows()));
		head
	}
}

impl<'a> ColumnView<'a> {
	pub fn len(&self) -> usize {
		match self {
			Self::Unknown(s) => s.len,
			Self::Integer(s) => s.data.len(),
			Self::Float(s) => s.data.len(),
			Self::Boolean(s) => s.data.len(),
			Self::Text(s) => s.data.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn name(&self) -> &'a str {
		match self {
			Self::Unknown(s) => s.name,
			Self::Integer(s) => s.name,
			Self::Float(s) => s.name,
			Self::Boolean(s) => s.name,
			Self::Text(s) => s.name,
		}
	}

	/// Return the value at row `index`. Out of range indexes read as null.
	pub fn value(&self, index: usize) -> Value<'a> {
		let value = match self {
			Self::Unknown(_) => None,
			Self::Integer(s) => s.data.get(index).copied().flatten().map(Value::Integer),
			Self::Float(s) => s.data.get(index).copied().flatten().map(Value::Float),
			Self::Boolean(s) => s.data.get(index).copied().flatten().map(Value::Boolean),
			Self::Text(s) => s
				.data
				.get(index)
				.and_then(|value| value.as_deref())
				.map(Value::Text),
		};
		value.unwrap_or(Value::Null)
	}

	pub fn split_at_row(&self, index: usize) -> (Self, Self) {
		match self {
			ColumnView::Unknown(column) => (
				ColumnView::Unknown(UnknownColumnView {
					name: column.name,
					len: index,
				}),
				ColumnView::Unknown(UnknownColumnView {
					name: column.name,
					len: column.len - index,
				}),
			),
			ColumnView::Integer(column) => {
				let (data_a, data_b) = column.data.split_at(index);
				(
					ColumnView::Integer(IntegerColumnView {
						name: column.name,
						data: data_a,
					}),
					ColumnView::Integer(IntegerColumnView {
						name: column.name,
						data: data_b,
					}),
				)
			}
			ColumnView::Float(column) => {
				let (data_a, data_b) = column.data.split_at(index);
				(
					ColumnView::Float(FloatColumnView {
						name: column.name,
						data: data_a,
					}),
					ColumnView::Float(FloatColumnView {
						name: column.name,
						data: data_b,
					}),
				)
			}
			ColumnView::Boolean(column) => {
				let (data_a, data_b) = column.data.split_at(index);
				(
					ColumnView::Boolean(BooleanColumnView {
						name: column.name,
						data: data_a,
					}),
					ColumnView::Boolean(BooleanColumnView {
						name: column.name,
						data: data_b,
					}),
				)
			}
			ColumnView::Text(column) => {
				let (data_a, data_b) = column.data.split_at(index);
				(
					ColumnView::Text(TextColumnView {
						name: column.name,
						data: data_a,
					}),
					ColumnView::Text(TextColumnView {
						name: column.name,
						data: data_b,
					}),
				)
			}
		}
	}
}

impl<'a> std::fmt::Display for Value<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => write!(f, "NaN"),
			Value::Integer(value) => write!(f, "{}", value),
			Value::Float(value) => write!(f, "{}", format_float(*value)),
			Value::Boolean(value) => write!(f, "{}", format_boolean(*value)),
			Value::Text(value) => write!(f, "{}", value),
		}
	}
}

#[cfg(test)]
fn sample() -> DataFrame {
	DataFrame {
		columns: vec![
			Column::Integer(IntegerColumn {
				name: "id".to_owned(),
				data: vec![Some(1), None, Some(3)],
			}),
			Column::Text(TextColumn {
				name: "label".to_owned(),
				data: vec![Some("a".to_owned()), Some("b".to_owned()), None],
			}),
			Column::Unknown(UnknownColumn {
				name: "empty".to_owned(),
				len: 3,
			}),
		],
	}
}

#[test]
fn test_shape_and_nulls() {
	let dataframe = sample();
	assert_eq!(dataframe.nrows(), 3);
	assert_eq!(dataframe.ncols(), 3);
	assert_eq!(dataframe.column_names(), vec!["id", "label", "empty"]);
	let null_counts: Vec<usize> = dataframe
		.columns
		.iter()
		.map(|column| column.null_count())
		.collect();
	assert_eq!(null_counts, vec![1, 1, 3]);
}

#[test]
fn test_values() {
	let dataframe = sample();
	let id = dataframe.column("id").unwrap();
	assert_eq!(id.value(0), Value::Integer(1));
	assert_eq!(id.value(1), Value::Null);
	assert_eq!(id.number(2), Some(3.0));
	assert_eq!(id.number(7), None);
	let label = dataframe.column("label").unwrap();
	assert_eq!(label.value(1), Value::Text("b"));
	assert_eq!(label.number(1), None);
	assert!(dataframe.column("missing").is_none());
}

#[test]
fn test_head() {
	let dataframe = sample();
	let view = dataframe.view();
	let head = view.head(2);
	assert_eq!(head.nrows(), 2);
	assert_eq!(head.ncols(), 3);
	let mut row = vec![Value::Null; 3];
	head.read_row(1, &mut row);
	assert_eq!(row, vec![Value::Null, Value::Text("b"), Value::Null]);
	assert_eq!(view.head(10).nrows(), 3);
}

#[test]
fn test_display_values() {
	assert_eq!(Value::Float(1.0).to_string(), "1.0");
	assert_eq!(Value::Float(2.5).to_string(), "2.5");
	assert_eq!(Value::Integer(-4).to_string(), "-4");
	assert_eq!(Value::Boolean(true).to_string(), "True");
	assert_eq!(Value::Null.to_string(), "NaN");
}

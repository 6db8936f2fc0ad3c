use super::*;
use std::{
	collections::{BTreeMap, HashSet},
	io::{Read, Seek},
};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct FromCsvOptions {
	/// Columns listed here are given the listed type instead of an inferred one.
	pub column_types: Option<BTreeMap<String, ColumnType>>,
	/// Cells whose raw text is exactly one of these values are null.
	pub null_values: Vec<String>,
	pub delimiter: u8,
	/// If set, tables with more than this many cells (rows times columns) are rejected.
	pub max_cells: Option<usize>,
}

impl Default for FromCsvOptions {
	fn default() -> Self {
		Self {
			column_types: None,
			null_values: DEFAULT_NULL_VALUES
				.iter()
				.map(|value| (*value).to_owned())
				.collect(),
			delimiter: b',',
			max_cells: None,
		}
	}
}

/// These values are the default values that are considered null.
pub const DEFAULT_NULL_VALUES: &[&str] = &[
	"", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
	"<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const TRUE_VALUES: &[&str] = &["true", "True", "TRUE"];
const FALSE_VALUES: &[&str] = &["false", "False", "FALSE"];

#[derive(Debug, Error)]
pub enum ParseError {
	#[error("the file is empty")]
	Empty,
	#[error("the file contains a quoted field that is never closed")]
	UnterminatedQuote,
	#[error("line {line} has {found} fields, but the header has {expected}")]
	InconsistentFields {
		line: u64,
		expected: u64,
		found: u64,
	},
	#[error("the file is not valid UTF-8")]
	InvalidUtf8,
	#[error("the table has more than {max_cells} cells")]
	TooLarge { max_cells: usize },
	#[error("unsupported file type \"{0}\", only csv files are supported")]
	UnsupportedFileType(String),
	#[error("failed to parse the csv: {0}")]
	Csv(String),
}

impl From<csv::Error> for ParseError {
	fn from(error: csv::Error) -> Self {
		match error.kind() {
			csv::ErrorKind::UnequalLengths {
				pos,
				expected_len,
				len,
			} => ParseError::InconsistentFields {
				line: pos.as_ref().map(|pos| pos.line()).unwrap_or(0),
				expected: *expected_len,
				found: *len,
			},
			csv::ErrorKind::Utf8 { .. } => ParseError::InvalidUtf8,
			_ => ParseError::Csv(error.to_string()),
		}
	}
}

impl DataFrame {
	/// Parse comma separated text with a header row into a dataframe, inferring the type of each column that does not have its type given in `options`.
	pub fn from_bytes(bytes: &[u8], options: FromCsvOptions) -> Result<Self, ParseError> {
		let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
		if bytes.iter().all(|byte| byte.is_ascii_whitespace()) {
			return Err(ParseError::Empty);
		}
		if has_unterminated_quote(bytes, options.delimiter) {
			return Err(ParseError::UnterminatedQuote);
		}
		let mut reader = csv::ReaderBuilder::new()
			.delimiter(options.delimiter)
			.has_headers(true)
			.flexible(false)
			.from_reader(std::io::Cursor::new(bytes));
		Self::from_csv(&mut reader, options)
	}

	fn from_csv<R>(reader: &mut csv::Reader<R>, options: FromCsvOptions) -> Result<Self, ParseError>
	where
		R: Read + Seek,
	{
		let column_names = unique_column_names(reader.headers()?.iter());
		let n_columns = column_names.len();
		if n_columns == 0 {
			return Err(ParseError::Empty);
		}
		let start_position = reader.position().clone();
		let mut n_rows = None;

		#[derive(Clone, Debug)]
		enum ColumnTypeOrInferStats<'a> {
			ColumnType(ColumnType),
			InferStats(InferStats<'a>),
		}

		// Retrieve any column types present in the options.
		let mut column_types: Vec<ColumnTypeOrInferStats> = column_names
			.iter()
			.map(|column_name| {
				options
					.column_types
					.as_ref()
					.and_then(|column_types| column_types.get(column_name))
					.map(|column_type| ColumnTypeOrInferStats::ColumnType(*column_type))
					.unwrap_or_else(|| {
						ColumnTypeOrInferStats::InferStats(InferStats::new(&options.null_values))
					})
			})
			.collect();

		// Passing over the csv to infer column types is only necessary if one or more columns did not have its type specified.
		let needs_infer = column_types.iter().any(|column_type_or_infer_stats| {
			matches!(
				column_type_or_infer_stats,
				ColumnTypeOrInferStats::InferStats(_)
			)
		});

		if needs_infer {
			let mut infer_stats: Vec<(usize, &mut InferStats)> = column_types
				.iter_mut()
				.enumerate()
				.filter_map(
					|(index, column_type_or_infer_stats)| match column_type_or_infer_stats {
						ColumnTypeOrInferStats::ColumnType(_) => None,
						ColumnTypeOrInferStats::InferStats(infer_stats) => {
							Some((index, infer_stats))
						}
					},
				)
				.collect();
			// Iterate over each record in the csv and update the infer stats for the columns that need to be inferred.
			let mut record = csv::StringRecord::new();
			let mut n_rows_computed: usize = 0;
			while reader.read_record(&mut record)? {
				n_rows_computed += 1;
				check_max_cells(n_rows_computed, n_columns, options.max_cells)?;
				for (index, infer_stats) in infer_stats.iter_mut() {
					if let Some(value) = record.get(*index) {
						infer_stats.update(value);
					}
				}
			}
			n_rows = Some(n_rows_computed);
			// After inference, return back to the beginning of the csv to load the values.
			reader.seek(start_position)?;
		}

		let column_types: Vec<ColumnType> = column_types
			.into_iter()
			.map(
				|column_type_or_infer_stats| match column_type_or_infer_stats {
					ColumnTypeOrInferStats::ColumnType(column_type) => column_type,
					ColumnTypeOrInferStats::InferStats(infer_stats) => infer_stats.finalize(),
				},
			)
			.collect();

		// Create the dataframe.
		let mut dataframe = Self::new(column_names, column_types);
		// If an inference pass was done, reserve storage for the values because we know how many rows are in the csv.
		if let Some(n_rows) = n_rows {
			for column in dataframe.columns.iter_mut() {
				match column {
					Column::Unknown(_) => {}
					Column::Integer(column) => column.data.reserve_exact(n_rows),
					Column::Float(column) => column.data.reserve_exact(n_rows),
					Column::Boolean(column) => column.data.reserve_exact(n_rows),
					Column::Text(column) => column.data.reserve_exact(n_rows),
				}
			}
		}
		// Read each csv record and insert the values into the columns of the dataframe.
		let is_null = |value: &str| options.null_values.iter().any(|null| null == value);
		let mut record = csv::StringRecord::new();
		let mut n_rows_loaded: usize = 0;
		while reader.read_record(&mut record)? {
			n_rows_loaded += 1;
			check_max_cells(n_rows_loaded, n_columns, options.max_cells)?;
			for (column, value) in dataframe.columns.iter_mut().zip(record.iter()) {
				let value = if is_null(value) { None } else { Some(value) };
				match column {
					Column::Unknown(column) => {
						column.len += 1;
					}
					Column::Integer(column) => {
						column.data.push(value.and_then(parse_integer));
					}
					Column::Float(column) => {
						column.data.push(value.and_then(parse_float));
					}
					Column::Boolean(column) => {
						column.data.push(value.and_then(parse_boolean));
					}
					Column::Text(column) => column.data.push(value.map(|value| value.to_owned())),
				}
			}
		}
		tracing::debug!(
			rows = dataframe.nrows(),
			columns = dataframe.ncols(),
			column_types = ?dataframe
				.columns
				.iter()
				.map(|column| column.column_type())
				.collect::<Vec<_>>(),
			"loaded csv"
		);
		Ok(dataframe)
	}
}

/// A quote opens a quoted field only at the start of a field. Inside a quoted field `""` is an escaped quote and a single `"` closes the field. Quotes anywhere else are part of the value.
fn has_unterminated_quote(bytes: &[u8], delimiter: u8) -> bool {
	let mut in_quotes = false;
	let mut at_field_start = true;
	let mut iter = bytes.iter().peekable();
	while let Some(&byte) = iter.next() {
		if in_quotes {
			if byte == b'"' {
				if iter.peek() == Some(&&b'"') {
					iter.next();
				} else {
					in_quotes = false;
				}
			}
			continue;
		}
		match byte {
			b'"' if at_field_start => {
				in_quotes = true;
				at_field_start = false;
			}
			b'\n' | b'\r' => at_field_start = true,
			byte if byte == delimiter => at_field_start = true,
			_ => at_field_start = false,
		}
	}
	in_quotes
}

fn check_max_cells(
	n_rows: usize,
	n_columns: usize,
	max_cells: Option<usize>,
) -> Result<(), ParseError> {
	match max_cells {
		Some(max_cells) if n_rows.saturating_mul(n_columns) > max_cells => {
			Err(ParseError::TooLarge { max_cells })
		}
		_ => Ok(()),
	}
}

/// Empty header names become `Unnamed: <index>` and repeated names get a `.1`, `.2`, ... suffix, so every column can be addressed by name.
fn unique_column_names<'a>(header: impl Iterator<Item = &'a str>) -> Vec<String> {
	let header: Vec<String> = header
		.enumerate()
		.map(|(index, name)| {
			if name.is_empty() {
				format!("Unnamed: {}", index)
			} else {
				name.to_owned()
			}
		})
		.collect();
	let mut seen: HashSet<String> = HashSet::new();
	let mut column_names = Vec::with_capacity(header.len());
	for name in header.iter() {
		let mut candidate = name.clone();
		let mut suffix = 0;
		while seen.contains(&candidate) || (suffix > 0 && header.contains(&candidate)) {
			suffix += 1;
			candidate = format!("{}.{}", name, suffix);
		}
		seen.insert(candidate.clone());
		column_names.push(candidate);
	}
	column_names
}

pub(crate) fn parse_integer(value: &str) -> Option<i64> {
	lexical::parse::<i64, _>(value).ok()
}

pub(crate) fn parse_float(value: &str) -> Option<f64> {
	lexical::parse::<f64, _>(value)
		.ok()
		.filter(|value| value.is_finite())
}

pub(crate) fn parse_boolean(value: &str) -> Option<bool> {
	if TRUE_VALUES.contains(&value) {
		Some(true)
	} else if FALSE_VALUES.contains(&value) {
		Some(false)
	} else {
		None
	}
}

#[derive(Clone, Debug)]
pub struct InferStats<'a> {
	null_values: &'a [String],
	column_type: InferColumnType,
}

#[derive(PartialEq, Clone, Copy, Debug)]
enum InferColumnType {
	Unknown,
	Integer,
	Float,
	Boolean,
	Text,
}

impl<'a> InferStats<'a> {
	pub fn new(null_values: &'a [String]) -> Self {
		Self {
			null_values,
			column_type: InferColumnType::Unknown,
		}
	}

	pub fn update(&mut self, value: &str) {
		if self.null_values.iter().any(|null| null == value) {
			return;
		}
		self.column_type = match self.column_type {
			InferColumnType::Unknown => {
				if parse_integer(value).is_some() {
					InferColumnType::Integer
				} else if parse_float(value).is_some() {
					InferColumnType::Float
				} else if parse_boolean(value).is_some() {
					InferColumnType::Boolean
				} else {
					InferColumnType::Text
				}
			}
			InferColumnType::Integer => {
				if parse_integer(value).is_some() {
					InferColumnType::Integer
				} else if parse_float(value).is_some() {
					InferColumnType::Float
				} else {
					InferColumnType::Text
				}
			}
			InferColumnType::Float => {
				if parse_float(value).is_some() {
					InferColumnType::Float
				} else {
					InferColumnType::Text
				}
			}
			InferColumnType::Boolean => {
				if parse_boolean(value).is_some() {
					InferColumnType::Boolean
				} else {
					InferColumnType::Text
				}
			}
			InferColumnType::Text => InferColumnType::Text,
		};
	}

	pub fn finalize(self) -> ColumnType {
		match self.column_type {
			InferColumnType::Unknown => ColumnType::Unknown,
			InferColumnType::Integer => ColumnType::Integer,
			InferColumnType::Float => ColumnType::Float,
			InferColumnType::Boolean => ColumnType::Boolean,
			InferColumnType::Text => ColumnType::Text,
		}
	}
}

#[cfg(test)]
fn load(csv: &str) -> Result<DataFrame, ParseError> {
	DataFrame::from_bytes(csv.as_bytes(), FromCsvOptions::default())
}

#[test]
fn test_infer() {
	let df = load("int,float,bool,text,empty\n1,1.5,true,hello,\n2,3,False,world,NA\n").unwrap();
	let column_types: Vec<ColumnType> = df.columns.iter().map(|c| c.column_type()).collect();
	assert_eq!(
		column_types,
		vec![
			ColumnType::Integer,
			ColumnType::Float,
			ColumnType::Boolean,
			ColumnType::Text,
			ColumnType::Unknown,
		]
	);
	insta::assert_debug_snapshot!(df.columns[1], @r###"
 Float(
     FloatColumn {
         name: "float",
         data: [
             Some(
                 1.5,
             ),
             Some(
                 3.0,
             ),
         ],
     },
 )
 "###);
}

#[test]
fn test_nulls() {
	let df = load("a,b\n1,x\n2,y\n,z\n").unwrap();
	assert_eq!(df.nrows(), 3);
	assert_eq!(
		df.columns[0],
		Column::Integer(IntegerColumn {
			name: "a".to_owned(),
			data: vec![Some(1), Some(2), None],
		})
	);
	assert_eq!(df.columns[0].null_count(), 1);
	assert_eq!(df.columns[1].null_count(), 0);
}

#[test]
fn test_zero_and_false_are_not_null() {
	let df = load("n,flag\n0,false\n0,False\n").unwrap();
	assert_eq!(df.columns[0].null_count(), 0);
	assert_eq!(df.columns[1].null_count(), 0);
	assert_eq!(df.columns[1].value(0), Value::Boolean(false));
}

#[test]
fn test_mixed_numbers_and_text_is_text() {
	let df = load("a\n1\n2.5\nthree\n").unwrap();
	assert_eq!(df.columns[0].column_type(), ColumnType::Text);
	assert_eq!(df.columns[0].value(0), Value::Text("1"));
}

#[test]
fn test_non_finite_is_text() {
	let df = load("a\n1\ninf\n").unwrap();
	assert_eq!(df.columns[0].column_type(), ColumnType::Text);
}

#[test]
fn test_exponent_is_float() {
	let df = load("a\n1\n2e3\n").unwrap();
	assert_eq!(df.columns[0].column_type(), ColumnType::Float);
	assert_eq!(df.columns[0].number(1), Some(2000.0));
}

#[test]
fn test_header_only() {
	let df = load("a,b\n").unwrap();
	assert_eq!(df.nrows(), 0);
	assert_eq!(df.ncols(), 2);
	assert_eq!(df.columns[0].column_type(), ColumnType::Unknown);
}

#[test]
fn test_quoted_fields() {
	let df = load("name,note\n\"Smith, J\",\"said \"\"hi\"\"\"\n").unwrap();
	assert_eq!(df.columns[0].value(0), Value::Text("Smith, J"));
	assert_eq!(df.columns[1].value(0), Value::Text("said \"hi\""));
}

#[test]
fn test_byte_order_mark() {
	let df = DataFrame::from_bytes(b"\xEF\xBB\xBFa\n1\n", FromCsvOptions::default()).unwrap();
	assert_eq!(df.column_names(), vec!["a"]);
}

#[test]
fn test_column_names() {
	let df = load("a,,a,a\n1,2,3,4\n").unwrap();
	assert_eq!(df.column_names(), vec!["a", "Unnamed: 1", "a.1", "a.2"]);
}

#[test]
fn test_declared_column_types() {
	let mut column_types = BTreeMap::new();
	column_types.insert("code".to_owned(), ColumnType::Text);
	column_types.insert("score".to_owned(), ColumnType::Integer);
	let df = DataFrame::from_bytes(
		b"code,score\n007,10\n008,high\n",
		FromCsvOptions {
			column_types: Some(column_types),
			..Default::default()
		},
	)
	.unwrap();
	assert_eq!(df.columns[0].value(0), Value::Text("007"));
	assert_eq!(df.columns[1].value(0), Value::Integer(10));
	assert_eq!(df.columns[1].value(1), Value::Null);
}

#[test]
fn test_custom_null_values() {
	let df = DataFrame::from_bytes(
		b"a\n1\n-\n",
		FromCsvOptions {
			null_values: vec!["-".to_owned()],
			..Default::default()
		},
	)
	.unwrap();
	assert_eq!(df.columns[0].column_type(), ColumnType::Integer);
	assert_eq!(df.columns[0].null_count(), 1);
}

#[test]
fn test_parse_errors() {
	assert!(matches!(load(""), Err(ParseError::Empty)));
	assert!(matches!(load("\n\n"), Err(ParseError::Empty)));
	assert!(matches!(
		load("a,b\n\"unterminated,1\n"),
		Err(ParseError::UnterminatedQuote)
	));
	assert!(matches!(
		load("a,b\n1\",\"x\n"),
		Err(ParseError::UnterminatedQuote)
	));
	assert!(matches!(
		load("a,b\n\"open,1\n2,3\n4,5\n"),
		Err(ParseError::UnterminatedQuote)
	));
	assert!(matches!(
		load("a,b\n1,2\n3\n"),
		Err(ParseError::InconsistentFields {
			expected: 2,
			found: 1,
			..
		})
	));
	assert!(matches!(
		DataFrame::from_bytes(b"a\n\xff\n", FromCsvOptions::default()),
		Err(ParseError::InvalidUtf8)
	));
}

#[test]
fn test_max_cells() {
	let options = FromCsvOptions {
		max_cells: Some(4),
		..Default::default()
	};
	assert!(DataFrame::from_bytes(b"a,b\n1,2\n3,4\n", options.clone()).is_ok());
	assert!(matches!(
		DataFrame::from_bytes(b"a,b\n1,2\n3,4\n5,6\n", options),
		Err(ParseError::TooLarge { max_cells: 4 })
	));
}

#[test]
fn test_stray_quote_in_unquoted_field() {
	let df = load("item,size\npipe,12\" long\n").unwrap();
	assert_eq!(df.columns[1].value(0), Value::Text("12\" long"));
}

#[test]
fn test_quoted_field_with_newline() {
	let df = load("id,note\n1,\"first line\nsecond \"\"line\"\"\"\n2,plain\n").unwrap();
	assert_eq!(df.nrows(), 2);
	assert_eq!(
		df.columns[1].value(0),
		Value::Text("first line\nsecond \"line\"")
	);
	assert_eq!(df.columns[1].value(1), Value::Text("plain"));
}

#[test]
fn test_unterminated_quote_scan() {
	assert!(!has_unterminated_quote(b"a,b\n\"x\",\"y\"\"z\"\n", b','));
	assert!(!has_unterminated_quote(b"a;b\n1;2\"\n", b';'));
	assert!(has_unterminated_quote(b"a;b\n1;\"2\n", b';'));
	assert!(has_unterminated_quote(b"a\n\"x\"\"\n", b','));
}

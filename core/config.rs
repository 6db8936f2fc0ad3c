/*!
This module defines the `Config` struct, which is used to configure how a csv file is loaded into a [`Session`](../session/struct.Session.html).
*/

use explorer_dataframe::FromCsvOptions;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub column_types: Option<BTreeMap<String, ColumnType>>,
	/// These replace the default null tokens.
	pub null_values: Option<Vec<String>>,
	pub delimiter: Option<char>,
	pub max_cells: Option<usize>,
	pub preview_rows: Option<usize>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ColumnType {
	#[serde(rename = "unknown")]
	Unknown,
	#[serde(rename = "integer")]
	Integer,
	#[serde(rename = "float")]
	Float,
	#[serde(rename = "boolean")]
	Boolean,
	#[serde(rename = "text")]
	Text,
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid config: {0}")]
	Yaml(#[from] serde_yaml::Error),
	#[error("the delimiter must be a single ascii character, but it was {0:?}")]
	InvalidDelimiter(char),
}

impl Config {
	pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
		Ok(serde_yaml::from_str(yaml)?)
	}

	pub fn to_options(&self) -> Result<FromCsvOptions, ConfigError> {
		let mut options = FromCsvOptions::default();
		if let Some(column_types) = self.column_types.as_ref() {
			let column_types = column_types
				.iter()
				.map(|(column_name, column_type)| (column_name.clone(), column_type.into()))
				.collect();
			options.column_types = Some(column_types);
		}
		if let Some(null_values) = self.null_values.as_ref() {
			options.null_values = null_values.clone();
		}
		if let Some(delimiter) = self.delimiter {
			if !delimiter.is_ascii() {
				return Err(ConfigError::InvalidDelimiter(delimiter));
			}
			options.delimiter = delimiter as u8;
		}
		options.max_cells = self.max_cells;
		Ok(options)
	}
}

impl From<&ColumnType> for explorer_dataframe::ColumnType {
	fn from(value: &ColumnType) -> Self {
		match value {
			ColumnType::Unknown => explorer_dataframe::ColumnType::Unknown,
			ColumnType::Integer => explorer_dataframe::ColumnType::Integer,
			ColumnType::Float => explorer_dataframe::ColumnType::Float,
			ColumnType::Boolean => explorer_dataframe::ColumnType::Boolean,
			ColumnType::Text => explorer_dataframe::ColumnType::Text,
		}
	}
}

#[test]
fn test_config() {
	let config = Config::from_yaml(
		"column_types:\n  zip:\n    type: text\n  score:\n    type: float\nnull_values: [\"-\", \"\"]\ndelimiter: \";\"\nmax_cells: 1000\npreview_rows: 20\n",
	)
	.unwrap();
	assert_eq!(config.preview_rows, Some(20));
	let options = config.to_options().unwrap();
	assert_eq!(options.delimiter, b';');
	assert_eq!(options.max_cells, Some(1000));
	assert_eq!(options.null_values, vec!["-".to_owned(), "".to_owned()]);
	let column_types = options.column_types.unwrap();
	assert_eq!(
		column_types.get("zip"),
		Some(&explorer_dataframe::ColumnType::Text)
	);
	assert_eq!(
		column_types.get("score"),
		Some(&explorer_dataframe::ColumnType::Float)
	);
}

#[test]
fn test_empty_config_uses_defaults() {
	let options = Config::default().to_options().unwrap();
	let defaults = FromCsvOptions::default();
	assert_eq!(options.delimiter, defaults.delimiter);
	assert_eq!(options.null_values, defaults.null_values);
	assert!(options.column_types.is_none());
	assert!(options.max_cells.is_none());
}

#[test]
fn test_invalid_config() {
	let config = Config {
		delimiter: Some('é'),
		..Default::default()
	};
	assert!(matches!(
		config.to_options(),
		Err(ConfigError::InvalidDelimiter('é'))
	));
	assert!(matches!(
		Config::from_yaml("column_types:\n  a:\n    type: number\n"),
		Err(ConfigError::Yaml(_))
	));
	assert!(matches!(
		Config::from_yaml("shuffle: true\n"),
		Err(ConfigError::Yaml(_))
	));
}

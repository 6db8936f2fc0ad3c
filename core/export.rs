use explorer_dataframe::DataFrame;
use thiserror::Error;

pub const EXPORT_FILE_NAME: &str = "processed_data.csv";
pub const EXPORT_MEDIA_TYPE: &str = "text/csv";

/// A downloadable csv file.
#[derive(Clone, Debug, PartialEq)]
pub struct Export {
	pub bytes: Vec<u8>,
	pub file_name: &'static str,
	pub media_type: &'static str,
}

#[derive(Debug, Error)]
#[error("failed to write the csv: {0}")]
pub struct ExportError(#[from] csv::Error);

/// Serialize the dataframe as csv with a header row and no index column. Reading the bytes back with the default options yields a dataframe equal to this one.
pub fn export(dataframe: &DataFrame) -> Result<Export, ExportError> {
	let bytes = dataframe.to_csv_bytes()?;
	tracing::debug!(
		n_rows = dataframe.nrows(),
		n_bytes = bytes.len(),
		"exported dataframe"
	);
	Ok(Export {
		bytes,
		file_name: EXPORT_FILE_NAME,
		media_type: EXPORT_MEDIA_TYPE,
	})
}

#[test]
fn test_export() {
	use explorer_dataframe::FromCsvOptions;
	let dataframe = DataFrame::from_bytes(
		b"name,score,passed\nann,90.5,true\nbob,,false\n",
		FromCsvOptions::default(),
	)
	.unwrap();
	let export = export(&dataframe).unwrap();
	assert_eq!(export.file_name, "processed_data.csv");
	assert_eq!(export.media_type, "text/csv");
	assert_eq!(
		String::from_utf8(export.bytes.clone()).unwrap(),
		"name,score,passed\nann,90.5,True\nbob,,False\n"
	);
	let reloaded = DataFrame::from_bytes(&export.bytes, FromCsvOptions::default()).unwrap();
	assert_eq!(reloaded, dataframe);
}

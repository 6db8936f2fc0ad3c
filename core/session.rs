use crate::{
	chart::{build_chart, ChartError, ChartRequest, ChartSpec},
	classify::{classify, ColumnClasses},
	export::{export, Export, ExportError},
	profile::{profile_with_classes, ProfileReport},
};
use explorer_dataframe::{DataFrame, DataFrameView, FromCsvOptions, ParseError};

pub const PREVIEW_ROWS_MIN: usize = 5;
pub const PREVIEW_ROWS_MAX: usize = 50;
pub const PREVIEW_ROWS_DEFAULT: usize = 5;

/**
A `Session` holds the dataframe loaded from a single upload along with its column classification. Every request borrows the dataframe immutably, so a request that fails leaves the session exactly as it was and later requests are unaffected.
*/
#[derive(Clone, Debug)]
pub struct Session {
	dataframe: DataFrame,
	classes: ColumnClasses,
}

impl Session {
	/// Load a session from the bytes of an uploaded file. `extension` is the file's extension, with or without the leading dot, and must be `csv`.
	pub fn load(bytes: &[u8], extension: &str, options: FromCsvOptions) -> Result<Self, ParseError> {
		let extension = extension.trim_start_matches('.');
		if !extension.eq_ignore_ascii_case("csv") {
			return Err(ParseError::UnsupportedFileType(extension.to_owned()));
		}
		let dataframe = DataFrame::from_bytes(bytes, options)?;
		Ok(Self::from_dataframe(dataframe))
	}

	pub fn from_dataframe(dataframe: DataFrame) -> Self {
		let classes = classify(&dataframe);
		Self { dataframe, classes }
	}

	pub fn dataframe(&self) -> &DataFrame {
		&self.dataframe
	}

	pub fn classes(&self) -> &ColumnClasses {
		&self.classes
	}

	pub fn profile(&self) -> ProfileReport {
		profile_with_classes(&self.dataframe, &self.classes)
	}

	pub fn chart(&self, request: &ChartRequest) -> Result<ChartSpec, ChartError> {
		build_chart(&self.dataframe, &self.classes, request).map_err(|error| {
			tracing::warn!(kind = %request.kind, %error, "rejected chart request");
			error
		})
	}

	pub fn export(&self) -> Result<Export, ExportError> {
		export(&self.dataframe)
	}

	/// Return a view of the first `n` rows, with `n` clamped to between `PREVIEW_ROWS_MIN` and `PREVIEW_ROWS_MAX`.
	pub fn preview(&self, n: usize) -> DataFrameView {
		let n = n.max(PREVIEW_ROWS_MIN).min(PREVIEW_ROWS_MAX);
		self.dataframe.view().head(n)
	}
}

#[test]
fn test_session() {
	use crate::chart::{ChartData, ChartKind};
	let session = Session::load(b"a,b\n1,x\n2,y\n,z\n", "csv", FromCsvOptions::default()).unwrap();
	assert_eq!(session.classes().numeric, vec!["a"]);
	assert_eq!(session.classes().non_numeric, vec!["b"]);
	let report = session.profile();
	assert_eq!(report.row_count, 3);
	assert_eq!(report.total_missing, 1);
	let a = report.column("a").unwrap();
	assert_eq!(a.column_type, explorer_dataframe::ColumnType::Integer);
	assert_eq!(a.null_count, 1);
	let b = report.column("b").unwrap();
	assert_eq!(b.column_type, explorer_dataframe::ColumnType::Text);
	assert_eq!(b.null_count, 0);
	assert!(matches!(
		session.chart(&ChartRequest::histogram("b")),
		Err(ChartError::InvalidChartRequest(_))
	));
	let spec = session.chart(&ChartRequest::histogram("a")).unwrap();
	assert_eq!(spec.kind, ChartKind::Histogram);
	assert_eq!(
		spec.data,
		ChartData::Values {
			column: "a".to_owned(),
			values: vec![1.0, 2.0],
		}
	);
	let export = session.export().unwrap();
	assert_eq!(
		String::from_utf8(export.bytes).unwrap(),
		"a,b\n1,x\n2,y\n,z\n"
	);
}

#[test]
fn test_failed_request_leaves_session_usable() {
	let session = Session::load(b"a,b\n1,x\n2,y\n", ".CSV", FromCsvOptions::default()).unwrap();
	let before = session.profile();
	assert!(matches!(
		session.chart(&ChartRequest::histogram("b")),
		Err(ChartError::InvalidChartRequest(_))
	));
	assert!(matches!(
		session.chart(&ChartRequest::correlation_heatmap()),
		Err(ChartError::InsufficientData(_))
	));
	assert_eq!(session.profile(), before);
	assert!(session.chart(&ChartRequest::box_plot("a")).is_ok());
}

#[test]
fn test_unsupported_file_type() {
	assert!(matches!(
		Session::load(b"a\n1\n", "xlsx", FromCsvOptions::default()),
		Err(ParseError::UnsupportedFileType(extension)) if extension == "xlsx"
	));
}

#[test]
fn test_preview_is_clamped() {
	let csv: String = std::iter::once("n\n".to_owned())
		.chain((0..60).map(|i| format!("{}\n", i)))
		.collect();
	let session = Session::load(csv.as_bytes(), "csv", FromCsvOptions::default()).unwrap();
	assert_eq!(session.preview(0).nrows(), PREVIEW_ROWS_MIN);
	assert_eq!(session.preview(20).nrows(), 20);
	assert_eq!(session.preview(1000).nrows(), PREVIEW_ROWS_MAX);
	let small = Session::load(b"n\n1\n2\n", "csv", FromCsvOptions::default()).unwrap();
	assert_eq!(small.preview(10).nrows(), 2);
}

#[test]
fn test_default_preview() {
	let csv: String = std::iter::once("n\n".to_owned())
		.chain((0..20).map(|i| format!("{}\n", i)))
		.collect();
	let session = Session::load(csv.as_bytes(), "csv", FromCsvOptions::default()).unwrap();
	assert_eq!(PREVIEW_ROWS_DEFAULT, PREVIEW_ROWS_MIN);
	assert_eq!(session.preview(PREVIEW_ROWS_DEFAULT).nrows(), 5);
}

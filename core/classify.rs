use explorer_dataframe::{Column, DataFrame};

/// `ColumnClasses` partitions the columns of a dataframe into numeric and non-numeric columns. Both lists keep the dataframe's column order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ColumnClasses {
	pub numeric: Vec<String>,
	pub non_numeric: Vec<String>,
}

impl ColumnClasses {
	pub fn is_numeric(&self, column_name: &str) -> bool {
		self.numeric.iter().any(|name| name == column_name)
	}
}

/// A column is numeric if and only if its type is integer or float. Text, boolean and unknown columns are non-numeric.
pub fn classify(dataframe: &DataFrame) -> ColumnClasses {
	let (numeric, non_numeric) = dataframe
		.columns
		.iter()
		.partition::<Vec<_>, _>(|column| column.column_type().is_numeric());
	ColumnClasses {
		numeric: column_names(numeric),
		non_numeric: column_names(non_numeric),
	}
}

fn column_names(columns: Vec<&Column>) -> Vec<String> {
	columns
		.into_iter()
		.map(|column| column.name().to_owned())
		.collect()
}

#[test]
fn test_classify() {
	use explorer_dataframe::FromCsvOptions;
	let dataframe = DataFrame::from_bytes(
		b"id,name,score,active,notes\n1,a,1.5,true,\n2,b,2,false,\n",
		FromCsvOptions::default(),
	)
	.unwrap();
	let classes = classify(&dataframe);
	assert_eq!(classes.numeric, vec!["id", "score"]);
	assert_eq!(classes.non_numeric, vec!["name", "active", "notes"]);
	assert!(classes.is_numeric("score"));
	assert!(!classes.is_numeric("name"));
	assert!(!classes.is_numeric("missing"));
}

#[test]
fn test_partition_is_disjoint_and_exhaustive() {
	use explorer_dataframe::FromCsvOptions;
	let inputs: &[&[u8]] = &[
		b"a\n1\n",
		b"a,b\nx,\n",
		b"a,b,c\n1,2.5,x\n,,\n",
		b"a,b\n",
	];
	for input in inputs {
		let dataframe = DataFrame::from_bytes(input, FromCsvOptions::default()).unwrap();
		let classes = classify(&dataframe);
		assert_eq!(
			classes.numeric.len() + classes.non_numeric.len(),
			dataframe.ncols()
		);
		for name in dataframe.column_names() {
			let in_numeric = classes.numeric.iter().any(|n| n == name);
			let in_non_numeric = classes.non_numeric.iter().any(|n| n == name);
			assert!(in_numeric != in_non_numeric);
		}
	}
}

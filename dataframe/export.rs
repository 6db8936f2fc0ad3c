use super::*;
use std::io::Write;

impl DataFrame {
	/**
	Write the dataframe as csv with a header row. Nulls are written as empty fields, so the output reads back with the default options into a dataframe with the same shape, column types and values.
	*/
	pub fn to_csv<W>(&self, writer: &mut csv::Writer<W>) -> Result<(), csv::Error>
	where
		W: Write,
	{
		writer.write_record(self.columns.iter().map(|column| column.name()))?;
		let view = self.view();
		let mut row = vec![Value::Null; self.ncols()];
		for index in 0..self.nrows() {
			view.read_row(index, &mut row);
			writer.write_record(row.iter().map(|value| match value {
				Value::Null => String::new(),
				value => value.to_string(),
			}))?;
		}
		writer.flush()?;
		Ok(())
	}

	/// Write the dataframe as csv into a new buffer.
	pub fn to_csv_bytes(&self) -> Result<Vec<u8>, csv::Error> {
		let mut writer = csv::WriterBuilder::new()
			.terminator(csv::Terminator::Any(b'\n'))
			.from_writer(Vec::new());
		self.to_csv(&mut writer)?;
		writer
			.into_inner()
			.map_err(|error| csv::Error::from(error.into_error()))
	}
}

#[cfg(test)]
fn round_trip(csv: &str) -> (DataFrame, DataFrame, String) {
	let dataframe = DataFrame::from_bytes(csv.as_bytes(), FromCsvOptions::default()).unwrap();
	let bytes = dataframe.to_csv_bytes().unwrap();
	let reloaded = DataFrame::from_bytes(&bytes, FromCsvOptions::default()).unwrap();
	(dataframe, reloaded, String::from_utf8(bytes).unwrap())
}

#[test]
fn test_export() {
	let (_, _, csv) = round_trip("a,b,c,d\n1,x,1.0,true\n,\"y, z\",2.5,\n3,,NaN,False\n");
	assert_eq!(
		csv,
		"a,b,c,d\n1,x,1.0,True\n,\"y, z\",2.5,\n3,,,False\n"
	);
}

#[test]
fn test_round_trip() {
	let (dataframe, reloaded, _) = round_trip(
		"int,float,bool,text,empty\n1,1.5,true,\"say \"\"hi\"\"\",\n-2,3,False,plain,\n,1e20,,NA,\n",
	);
	assert_eq!(dataframe, reloaded);
}

#[test]
fn test_export_is_deterministic() {
	let dataframe =
		DataFrame::from_bytes(b"x,y\n0.1,a\n0.2,b\n", FromCsvOptions::default()).unwrap();
	assert_eq!(
		dataframe.to_csv_bytes().unwrap(),
		dataframe.to_csv_bytes().unwrap()
	);
}

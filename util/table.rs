use itertools::izip;
use ndarray::prelude::*;

/// A plain text table. Format it with `{}` to get one line per row with the columns padded to a common width.
pub struct Table {
	padding: usize,
	header: Vec<String>,
	values: Array2<String>,
}

impl Table {
	/// `values` must have one column per header entry.
	pub fn new(header: Vec<String>, values: Array2<String>) -> Self {
		Self {
			padding: 1,
			header,
			values,
		}
	}

	pub fn with_padding(mut self, padding: usize) -> Self {
		self.padding = padding;
		self
	}
}

fn width(value: &str) -> usize {
	value.chars().count()
}

impl std::fmt::Display for Table {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		// update column widths with header
		let mut column_widths: Vec<usize> = self.header.iter().map(|header| width(header)).collect();
		// update column widths with values
		izip!(&mut column_widths, self.values.axis_iter(Axis(1))).for_each(|(column_width, col)| {
			col.iter().for_each(|value| {
				*column_width = usize::max(*column_width, width(value));
			})
		});
		// write header
		let line = Line {
			column_widths: &column_widths,
			padding: self.padding,
		};
		let header: Vec<&str> = self.header.iter().map(|value| value.as_str()).collect();
		let row = Row {
			column_widths: &column_widths,
			padding: self.padding,
			values: &header,
		};
		writeln!(f, "{}", row)?;
		writeln!(f, "{}", line)?;
		// write values
		for values in self.values.rows() {
			let values: Vec<&str> = values.iter().map(|value| value.as_str()).collect();
			let row = Row {
				column_widths: &column_widths,
				padding: self.padding,
				values: &values,
			};
			writeln!(f, "{}", row)?;
		}
		Ok(())
	}
}

struct Line<'a> {
	column_widths: &'a [usize],
	padding: usize,
}

impl<'a> std::fmt::Display for Line<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "|")?;
		for column_width in self.column_widths.iter() {
			write!(f, "{}", "-".repeat(column_width + 2 * self.padding))?;
			write!(f, "|")?;
		}
		Ok(())
	}
}

struct Row<'a> {
	column_widths: &'a [usize],
	padding: usize,
	values: &'a [&'a str],
}

impl<'a> std::fmt::Display for Row<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "|")?;
		for (column_width, value) in self.column_widths.iter().zip(self.values) {
			let fill = column_width + self.padding - width(value);
			write!(
				f,
				"{}{}{}",
				" ".repeat(self.padding),
				value,
				" ".repeat(fill)
			)?;
			write!(f, "|")?;
		}
		Ok(())
	}
}

#[test]
fn test_table() {
	let values = array![
		["1".to_owned(), "x".to_owned()],
		["22".to_owned(), "y".to_owned()],
	];
	let table = Table::new(vec!["a".to_owned(), "bb".to_owned()], values);
	assert_eq!(
		table.to_string(),
		"| a  | bb |\n|----|----|\n| 1  | x  |\n| 22 | y  |\n"
	);
}

#[test]
fn test_table_without_rows() {
	let table = Table::new(vec!["name".to_owned()], Array2::from_elem((0, 1), String::new()))
		.with_padding(0);
	assert_eq!(table.to_string(), "|name|\n|----|\n");
}

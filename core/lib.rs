/*!
This crate turns a csv upload into a profile report and chart specifications. Load a [`Session`](session/struct.Session.html) from the uploaded bytes, then ask it for a [`ProfileReport`](profile/struct.ProfileReport.html), a [`ChartSpec`](chart/struct.ChartSpec.html) or an [`Export`](export/struct.Export.html). A failed request leaves the session untouched.
*/

#![allow(clippy::tabs_in_doc_comments)]

pub mod chart;
pub mod classify;
pub mod config;
pub mod export;
pub mod profile;
pub mod session;

pub use self::{
	chart::{build_chart, ChartData, ChartError, ChartKind, ChartParameters, ChartRequest, ChartSpec},
	classify::{classify, ColumnClasses},
	config::{Config, ConfigError},
	export::{export, Export, ExportError},
	profile::{profile, profile_with_classes, ColumnMeta, NumericSummary, ProfileReport},
	session::Session,
};
pub use explorer_dataframe as dataframe;
pub use explorer_dataframe::ParseError;

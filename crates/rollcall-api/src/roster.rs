//! Roster parsing: uploaded CSV or Excel workbook → [`GuestRow`]s.
//!
//! Column names are trimmed and matched case-insensitively. `name` and `seat`
//! are required; the contact is read from a `contact` or `email` column when
//! one is present. Cells are not validated here; empty names and seats are
//! left for the registry to skip.

use std::{io::Cursor, path::Path};

use calamine::Reader as _;
use rollcall_core::guest::GuestRow;
use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum RosterError {
  #[error("unsupported format: upload a CSV or Excel file")]
  UnsupportedFormat,

  #[error("missing columns: {}", .0.join(", "))]
  MissingColumns(Vec<&'static str>),

  #[error("malformed CSV: {0}")]
  Csv(#[from] csv::Error),

  #[error("unreadable spreadsheet: {0}")]
  Spreadsheet(#[from] calamine::Error),
}

/// The encodings a roster may arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
  Csv,
  /// `.xlsx` or legacy `.xls`; only the first worksheet is read.
  Spreadsheet,
}

/// Work out how an upload is encoded.
///
/// The file name wins over the content type; with neither, CSV is assumed.
pub fn detect_format(
  filename: Option<&str>,
  content_type: Option<&str>,
) -> Result<RosterFormat, RosterError> {
  if let Some(name) = filename {
    let extension = Path::new(name)
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_ascii_lowercase);
    return match extension.as_deref() {
      Some("csv" | "txt") => Ok(RosterFormat::Csv),
      Some("xlsx" | "xls") => Ok(RosterFormat::Spreadsheet),
      _ => Err(RosterError::UnsupportedFormat),
    };
  }

  match content_type.map(|ct| ct.split(';').next().unwrap_or("").trim()) {
    None | Some("text/csv" | "application/csv" | "text/plain") => {
      Ok(RosterFormat::Csv)
    }
    Some(
      "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
      | "application/vnd.ms-excel",
    ) => Ok(RosterFormat::Spreadsheet),
    Some(_) => Err(RosterError::UnsupportedFormat),
  }
}

/// Parse a roster in the given format.
pub fn parse(format: RosterFormat, bytes: &[u8]) -> Result<Vec<GuestRow>, RosterError> {
  match format {
    RosterFormat::Csv => parse_csv(bytes),
    RosterFormat::Spreadsheet => parse_spreadsheet(bytes),
  }
}

// ─── Columns ──────────────────────────────────────────────────────────────────

/// Positions of the roster columns within a header row.
struct Columns {
  name:    usize,
  seat:    usize,
  contact: Option<usize>,
}

impl Columns {
  fn locate<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Self, RosterError> {
    let headers: Vec<String> = headers
      .into_iter()
      .map(|h| h.trim().to_lowercase())
      .collect();
    let column = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));

    match (column(&["name"]), column(&["seat"])) {
      (Some(name), Some(seat)) => Ok(Self {
        name,
        seat,
        contact: column(&["contact", "email"]),
      }),
      (name, seat) => {
        let mut missing = Vec::new();
        if name.is_none() {
          missing.push("name");
        }
        if seat.is_none() {
          missing.push("seat");
        }
        Err(RosterError::MissingColumns(missing))
      }
    }
  }

  /// Build a row from a cell accessor; absent cells read as empty.
  fn row(&self, cell: impl Fn(usize) -> String) -> GuestRow {
    GuestRow {
      name:    cell(self.name),
      contact: self.contact.map(&cell).unwrap_or_default(),
      seat:    cell(self.seat),
    }
  }
}

// ─── CSV ──────────────────────────────────────────────────────────────────────

/// Parse a CSV roster.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<GuestRow>, RosterError> {
  let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .trim(csv::Trim::All)
    .from_reader(bytes);

  let columns = Columns::locate(reader.headers()?.iter())?;

  let mut rows = Vec::new();
  for record in reader.records() {
    let record = record?;
    rows.push(columns.row(|idx| record.get(idx).unwrap_or_default().to_owned()));
  }
  Ok(rows)
}

// ─── Spreadsheet ──────────────────────────────────────────────────────────────

/// Parse the first worksheet of an Excel workbook. The first row holds the
/// headers; numeric cells are rendered as text (`12.0` becomes `"12"`).
pub fn parse_spreadsheet(bytes: &[u8]) -> Result<Vec<GuestRow>, RosterError> {
  let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;
  let Some(range) = workbook.worksheet_range_at(0) else {
    return Err(RosterError::MissingColumns(vec!["name", "seat"]));
  };
  let range = range?;

  let mut records = range.rows();
  let header: Vec<String> = records
    .next()
    .unwrap_or(&[])
    .iter()
    .map(ToString::to_string)
    .collect();
  let columns = Columns::locate(header.iter().map(String::as_str))?;

  Ok(
    records
      .map(|record| {
        columns.row(|idx| {
          record
            .get(idx)
            .map(|cell| cell.to_string().trim().to_owned())
            .unwrap_or_default()
        })
      })
      .collect(),
  )
}

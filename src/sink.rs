//! Row output formats

use std::io::Write;

use crate::collision::Row;
use crate::error::Result;

/// Destination for classified rows
pub trait RowSink {
    fn write_rows(&mut self, rows: &[Row]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn sink<'a, W: Write + 'a>(self, writer: W) -> Box<dyn RowSink + 'a> {
        match self {
            OutputFormat::Csv => Box::new(CsvSink::new(writer)),
            OutputFormat::Json => Box::new(JsonSink::new(writer)),
        }
    }
}

/// `x,y,walkable` table with a header line. Booleans are written as
/// `True`/`False`, the spelling existing consumers of the export expect.
pub struct CsvSink<W: Write> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    pub const HEADER: &'static str = "x,y,walkable";

    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn write_rows(&mut self, rows: &[Row]) -> Result<()> {
        writeln!(self.writer, "{}", Self::HEADER)?;
        for row in rows {
            let walkable = if row.walkable { "True" } else { "False" };
            writeln!(self.writer, "{},{},{}", row.x, row.y, walkable)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// JSON array of `{"x", "y", "walkable"}` objects
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RowSink for JsonSink<W> {
    fn write_rows(&mut self, rows: &[Row]) -> Result<()> {
        serde_json::to_writer(&mut self.writer, rows).map_err(std::io::Error::from)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

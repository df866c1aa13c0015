//! ASCII XYZ point reader
//!
//! One point per line: `x y z [classification]`, separated by whitespace,
//! commas or semicolons. Blank lines and `#` / `//` comments are skipped,
//! and a non-numeric first record is taken as a column header.

use crate::error::{Error, Result};
use crate::point::{Point, PointSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read an XYZ text file into a point set
pub fn read_xyz<P: AsRef<Path>>(path: P) -> Result<PointSet> {
    let file = File::open(path.as_ref())?;
    parse_xyz(BufReader::new(file))
}

/// Parse XYZ text held in memory
pub fn read_xyz_from_str(text: &str) -> Result<PointSet> {
    parse_xyz(text.as_bytes())
}

/// Parse XYZ records from any buffered reader
pub fn parse_xyz<R: BufRead>(reader: R) -> Result<PointSet> {
    let mut points = Vec::new();
    let mut seen_record = false;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let record = line.trim();
        if record.is_empty() || record.starts_with('#') || record.starts_with("//") {
            continue;
        }

        let fields: Vec<&str> = record
            .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
            .filter(|f| !f.is_empty())
            .collect();

        let header = !seen_record && fields.first().is_some_and(|f| f.parse::<f64>().is_err());
        seen_record = true;
        if header {
            continue;
        }

        points.push(parse_record(&fields, line_no)?);
    }

    PointSet::new(points)
}

fn parse_record(fields: &[&str], line: usize) -> Result<Point> {
    if fields.len() < 3 || fields.len() > 4 {
        return Err(Error::Parse {
            line,
            message: format!("expected 3 or 4 columns, found {}", fields.len()),
        });
    }

    let coord = |idx: usize, name: &str| -> Result<f64> {
        let value = fields[idx].parse::<f64>().map_err(|_| Error::Parse {
            line,
            message: format!("invalid {} coordinate '{}'", name, fields[idx]),
        })?;
        if !value.is_finite() {
            return Err(Error::Parse {
                line,
                message: format!("non-finite {} coordinate", name),
            });
        }
        Ok(value)
    };

    let classification = match fields.get(3) {
        Some(code) => Some(code.parse::<u8>().map_err(|_| Error::Parse {
            line,
            message: format!("invalid class code '{}'", code),
        })?),
        None => None,
    };

    Ok(Point {
        x: coord(0, "x")?,
        y: coord(1, "y")?,
        z: coord(2, "z")?,
        classification,
    })
}

//! Device Data Files
//!
//! Extracts what application generation needs from a data file exported
//! by the chip design tool:
//!
//! ```text
//! {Width=756, Height=771}
//! number of control lines: 16
//! number of instructions: 2
//! // BEGIN port locations
//! ...
//! // END port locations
//! // BEGIN instructions
//! {true, false, ...},      <- four lines per instruction,
//! // Pump_0                <- the second one holds the name
//! ...
//! // END instructions
//! // BEGIN instruction pumps   (optional)
//! // END instruction pumps
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;

use crate::template::Anchor;

/// Lines per instruction record in the instructions region.
pub const RECORD_LINES: usize = 4;

/// Line of a record holding the instruction name.
const NAME_LINE: usize = 1;

static IMAGE_SIZE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{Width=(?P<width>\d+), Height=(?P<height>\d+)\}").expect("image size pattern")
});
static CONTROL_LINES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"number of control lines: (?P<n>\d+)").expect("control lines pattern")
});
static INSTRUCTION_COUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"number of instructions: (?P<n>\d+)").expect("instruction count pattern")
});

pub static PORT_LOCATIONS: Lazy<Anchor> = Lazy::new(|| Anchor::comment_region("port locations"));
pub static INSTRUCTIONS: Lazy<Anchor> = Lazy::new(|| Anchor::comment_region("instructions"));
pub static INSTRUCTION_PUMPS: Lazy<Anchor> =
    Lazy::new(|| Anchor::comment_region("instruction pumps"));

#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing field in data file: {0}")]
    MissingField(&'static str),

    #[error("Invalid number for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Instructions region has {lines} lines, expected a multiple of 4")]
    MalformedInstructions { lines: usize },
}

/// Result type for data file operations.
pub type DataFileResult<T> = Result<T, DataFileError>;

/// Everything extracted from a device data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceData {
    pub image_width: u32,
    pub image_height: u32,
    pub control_lines: usize,
    pub instruction_count: usize,
    /// Port locations region, markers included.
    pub port_locations: String,
    /// Instructions region, markers included.
    pub instructions: String,
    /// Pumps region with markers, if the file has one.
    pub instruction_pumps: Option<String>,
    /// Names in declaration order.
    pub instruction_names: Vec<String>,
}

impl DeviceData {
    pub fn load(path: &Path) -> DataFileResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> DataFileResult<Self> {
        let size = IMAGE_SIZE
            .captures(text)
            .ok_or(DataFileError::MissingField("image size"))?;
        let image_width = parse_number("image width", &size["width"])?;
        let image_height = parse_number("image height", &size["height"])?;

        let control_lines = capture_number(&CONTROL_LINES, text, "number of control lines")?;
        let instruction_count = capture_number(&INSTRUCTION_COUNT, text, "number of instructions")?;

        let port_locations =
            region(&PORT_LOCATIONS, text).ok_or(DataFileError::MissingField("port locations"))?;
        let instructions =
            region(&INSTRUCTIONS, text).ok_or(DataFileError::MissingField("instructions"))?;
        let instruction_pumps = region(&INSTRUCTION_PUMPS, text).map(str::to_string);

        let instruction_names = instruction_names(region_body(instructions))?;
        if instruction_names.len() != instruction_count {
            tracing::warn!(
                declared = instruction_count,
                found = instruction_names.len(),
                "instruction count does not match instructions region"
            );
        }

        Ok(DeviceData {
            image_width,
            image_height,
            control_lines,
            instruction_count,
            port_locations: port_locations.to_string(),
            instructions: instructions.to_string(),
            instruction_pumps,
            instruction_names,
        })
    }

    /// Text for the driver's pumps region: the file's own region, or one
    /// `null` per declared instruction.
    pub fn pumps_replacement(&self) -> String {
        match &self.instruction_pumps {
            Some(region) => region.clone(),
            None => vec!["null"; self.instruction_count].join(","),
        }
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> DataFileResult<T> {
    value.parse().map_err(|_| DataFileError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn capture_number(re: &Regex, text: &str, field: &'static str) -> DataFileResult<usize> {
    let caps = re.captures(text).ok_or(DataFileError::MissingField(field))?;
    parse_number(field, &caps["n"])
}

fn region<'a>(anchor: &Anchor, text: &'a str) -> Option<&'a str> {
    anchor.find(text).map(|(start, stop)| &text[start..stop])
}

fn region_body(region: &str) -> &str {
    let inner = region.strip_prefix("// BEGIN instructions").unwrap_or(region);
    inner.strip_suffix("// END instructions").unwrap_or(inner)
}

/// Names from the body of an instructions region. The first line (rest of
/// the begin marker line) and the last (indentation before the end marker)
/// are not part of any record.
pub fn instruction_names(body: &str) -> DataFileResult<Vec<String>> {
    let lines: Vec<&str> = body.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    let records = match lines.len() {
        0..=2 => &[][..],
        n => &lines[1..n - 1],
    };

    if records.len() % RECORD_LINES != 0 {
        return Err(DataFileError::MalformedInstructions {
            lines: records.len(),
        });
    }

    Ok(records
        .chunks(RECORD_LINES)
        .map(|record| {
            let line = record[NAME_LINE].trim();
            line.strip_prefix("//").unwrap_or(line).trim().to_string()
        })
        .collect())
}

//! Task file for the surface visualization. Structure: section titles followed by "key: value"
//! pairs, values may be comma separated lists. Lines starting with //, #, % or ; are comments.
//!
//!```text
//! domain
//!  lo: -2.0
//!  hi: 2.0
//!  samples: 150
//! test_point
//!  x1: 0.0
//!  x2: 0.0
//! output
//!  gnuplot: true
//!  figure: none
//!```
//! Every key is optional, missing keys keep the defaults of `SurfaceTask::default()`.
use crate::numerical::errors::SurfaceError;
use log::LevelFilter;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, map_res, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;

type SectionMap = HashMap<String, Vec<Value>>;
type DocumentMap = HashMap<String, SectionMap>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// integers are accepted where a float is expected
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// identifier: letter or underscore followed by alphanumerics/underscores
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';'));
    let mut value_parser = map_res(value_parser, |s: &str| -> Result<Value, String> {
        let s = s.trim();
        if let Ok(val) = s.parse::<i64>() {
            Ok(Value::Integer(val))
        } else if let Ok(val) = s.parse::<f64>() {
            Ok(Value::Float(val))
        } else if let Ok(val) = s.parse::<bool>() {
            Ok(Value::Boolean(val))
        } else {
            Ok(Value::String(s.to_string()))
        }
    });
    value_parser.parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let separator_coma = delimited(space0, tag(","), space0);
    let mut value_parser = separated_list0(separator_coma, parse_value);
    value_parser.parse(input)
}

fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_identifier, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim_start(), result))
}

fn parse_section(input: &str) -> IResult<&str, (String, Vec<(String, Vec<Value>)>)> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let mut parser = many1(terminated(parse_key_value_pair, space0));
    let (input, pairs) = parser.parse(input)?;
    Ok((input, (title, pairs)))
}

fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the whole (comment-free) document into section -> key -> values
pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    let mut parser = many1(delimited(space0, parse_section, multispace0));
    let (input, sections) = parser.parse(input)?;
    let mut result: DocumentMap = HashMap::new();
    for (title, pairs) in sections {
        let section = result.entry(title).or_default();
        for (key, values) in pairs {
            section.insert(key, values);
        }
    }
    Ok((input, result))
}

/// Comment filtering + parsing + check that nothing is left over
pub fn parse_task_document(input: &str) -> Result<DocumentMap, SurfaceError> {
    let filtered = filter_comments(input);
    if filtered.trim().is_empty() {
        return Ok(HashMap::new());
    }
    match parse_document(&filtered) {
        Ok((remaining, parsed)) => {
            if !remaining.trim().is_empty() {
                return Err(SurfaceError::Config(format!(
                    "failed to parse entire document, remaining: '{}'",
                    remaining
                )));
            }
            Ok(parsed)
        }
        Err(e) => Err(SurfaceError::Config(format!("parsing error: {:?}", e))),
    }
}

/// All tunable constants of a run. `Default` is the canonical configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceTask {
    pub lo: f64,
    pub hi: f64,
    pub samples: usize,
    pub test_x1: f64,
    pub test_x2: f64,
    /// PNG written with plotters, off by default
    pub figure: Option<String>,
    pub width: u32,
    pub height: u32,
    pub gnuplot: bool,
    pub csv: Option<String>,
    pub log_level: LevelFilter,
    pub log_to_file: bool,
}

impl Default for SurfaceTask {
    fn default() -> Self {
        SurfaceTask {
            lo: -2.0,
            hi: 2.0,
            samples: 150,
            test_x1: 0.0,
            test_x2: 0.0,
            figure: None,
            width: 1800,
            height: 1400,
            gnuplot: true,
            csv: None,
            log_level: LevelFilter::Info,
            log_to_file: false,
        }
    }
}

fn single<'a>(section: &str, key: &str, values: &'a [Value]) -> Result<&'a Value, SurfaceError> {
    match values {
        [v] => Ok(v),
        _ => Err(SurfaceError::Config(format!(
            "{}.{} expects exactly one value, got {}",
            section,
            key,
            values.len()
        ))),
    }
}

fn wrong_type(section: &str, key: &str, expected: &str, got: &Value) -> SurfaceError {
    SurfaceError::Config(format!(
        "{}.{} expects {}, got '{}'",
        section, key, expected, got
    ))
}

fn float_of(section: &str, key: &str, values: &[Value]) -> Result<f64, SurfaceError> {
    let v = single(section, key, values)?;
    v.as_float().ok_or_else(|| wrong_type(section, key, "a number", v))
}

fn usize_of(section: &str, key: &str, values: &[Value]) -> Result<usize, SurfaceError> {
    let v = single(section, key, values)?;
    v.as_integer()
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| wrong_type(section, key, "a non-negative integer", v))
}

fn u32_of(section: &str, key: &str, values: &[Value]) -> Result<u32, SurfaceError> {
    let v = single(section, key, values)?;
    v.as_integer()
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| wrong_type(section, key, "an integer in 0..=4294967295", v))
}

fn bool_of(section: &str, key: &str, values: &[Value]) -> Result<bool, SurfaceError> {
    let v = single(section, key, values)?;
    v.as_boolean()
        .ok_or_else(|| wrong_type(section, key, "true or false", v))
}

fn string_of(section: &str, key: &str, values: &[Value]) -> Result<String, SurfaceError> {
    Ok(single(section, key, values)?.to_string())
}

/// a path, or None for the literal `none`
fn path_of(section: &str, key: &str, values: &[Value]) -> Result<Option<String>, SurfaceError> {
    let path = string_of(section, key, values)?;
    Ok(if path == "none" { None } else { Some(path) })
}

fn level_of(section: &str, key: &str, values: &[Value]) -> Result<LevelFilter, SurfaceError> {
    let v = single(section, key, values)?;
    match v.to_string().to_lowercase().as_str() {
        "off" | "none" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        _ => Err(wrong_type(
            section,
            key,
            "off, error, warn, info, debug or trace",
            v,
        )),
    }
}

impl SurfaceTask {
    pub fn from_document(input: &str) -> Result<SurfaceTask, SurfaceError> {
        let document = parse_task_document(input)?;
        let mut task = SurfaceTask::default();
        for (title, section) in document.iter() {
            for (key, values) in section.iter() {
                let (t, k) = (title.as_str(), key.as_str());
                match (t, k) {
                    ("domain", "lo") => task.lo = float_of(t, k, values)?,
                    ("domain", "hi") => task.hi = float_of(t, k, values)?,
                    ("domain", "samples") => task.samples = usize_of(t, k, values)?,
                    ("test_point", "x1") => task.test_x1 = float_of(t, k, values)?,
                    ("test_point", "x2") => task.test_x2 = float_of(t, k, values)?,
                    ("output", "figure") => task.figure = path_of(t, k, values)?,
                    ("output", "width") => task.width = u32_of(t, k, values)?,
                    ("output", "height") => task.height = u32_of(t, k, values)?,
                    ("output", "gnuplot") => task.gnuplot = bool_of(t, k, values)?,
                    ("output", "csv") => task.csv = path_of(t, k, values)?,
                    ("logging", "level") => task.log_level = level_of(t, k, values)?,
                    ("logging", "to_file") => task.log_to_file = bool_of(t, k, values)?,
                    _ => {
                        return Err(SurfaceError::Config(format!(
                            "unknown key '{}' in section '{}'",
                            k, t
                        )));
                    }
                }
            }
        }
        task.validate()?;
        Ok(task)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SurfaceTask, SurfaceError> {
        let content = std::fs::read_to_string(path)?;
        SurfaceTask::from_document(&content)
    }

    pub fn validate(&self) -> Result<(), SurfaceError> {
        if self.samples < 2 {
            return Err(SurfaceError::InvalidSampleCount(self.samples));
        }
        if !self.lo.is_finite() || !self.hi.is_finite() || self.lo >= self.hi {
            return Err(SurfaceError::InvalidDomain {
                lo: self.lo,
                hi: self.hi,
            });
        }
        if !self.test_x1.is_finite() || !self.test_x2.is_finite() {
            return Err(SurfaceError::Config(
                "test point coordinates must be finite".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(SurfaceError::Config(
                "figure size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_sections_and_values() {
        let input = "domain\n lo: -2.0\n hi: 2\n samples: 150\n\
                     output\n figure: out.png\n gnuplot: true\n";
        let (rest, doc) = parse_document(input).unwrap();
        assert!(rest.trim().is_empty());
        assert_eq!(doc.len(), 2);
        assert_eq!(doc["domain"]["lo"], vec![Value::Float(-2.0)]);
        assert_eq!(doc["domain"]["hi"], vec![Value::Integer(2)]);
        assert_eq!(doc["output"]["figure"], vec![Value::String("out.png".to_string())]);
        assert_eq!(doc["output"]["gnuplot"], vec![Value::Boolean(true)]);
    }

    #[test]
    fn test_value_lists() {
        let (_, doc) = parse_document("section\n key: 1, 2.5, abc\n").unwrap();
        assert_eq!(
            doc["section"]["key"],
            vec![
                Value::Integer(1),
                Value::Float(2.5),
                Value::String("abc".to_string())
            ]
        );
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        let task = SurfaceTask::from_document("").unwrap();
        assert_eq!(task, SurfaceTask::default());
        let task = SurfaceTask::from_document("// only a comment\n# another\n").unwrap();
        assert_eq!(task, SurfaceTask::default());
    }

    #[test]
    fn test_default_task_constants() {
        let task = SurfaceTask::default();
        assert_eq!((task.lo, task.hi, task.samples), (-2.0, 2.0, 150));
        assert_eq!((task.test_x1, task.test_x2), (0.0, 0.0));
        assert!(task.gnuplot);
        assert!(task.figure.is_none());
        assert!(task.csv.is_none());
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_full_task_document() {
        let input = "\
// surface task
domain
 lo: -1.5
 hi: 3
 samples: 40
test_point
 x1: 0.5
 x2: -0.25
output
 figure: custom.png
 width: 900
 height: 700
 gnuplot: false
 csv: surface.csv
logging
 level: debug
 to_file: true
";
        let task = SurfaceTask::from_document(input).unwrap();
        assert_eq!(task.lo, -1.5);
        assert_eq!(task.hi, 3.0);
        assert_eq!(task.samples, 40);
        assert_eq!(task.test_x1, 0.5);
        assert_eq!(task.test_x2, -0.25);
        assert_eq!(task.figure.as_deref(), Some("custom.png"));
        assert!(!task.gnuplot);
        assert_eq!((task.width, task.height), (900, 700));
        assert_eq!(task.csv.as_deref(), Some("surface.csv"));
        assert_eq!(task.log_level, LevelFilter::Debug);
        assert!(task.log_to_file);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let task = SurfaceTask::from_document("test_point\n x1: 1.0\n").unwrap();
        assert_eq!(task.test_x1, 1.0);
        assert_eq!(task.test_x2, 0.0);
        assert_eq!(task.samples, 150);
    }

    #[test]
    fn test_invalid_tasks_rejected() {
        assert!(matches!(
            SurfaceTask::from_document("domain\n samples: 1\n"),
            Err(SurfaceError::InvalidSampleCount(1))
        ));
        assert!(matches!(
            SurfaceTask::from_document("domain\n lo: 2.0\n hi: -2.0\n"),
            Err(SurfaceError::InvalidDomain { .. })
        ));
        assert!(matches!(
            SurfaceTask::from_document("domain\n samples: -3\n"),
            Err(SurfaceError::Config(_))
        ));
        assert!(matches!(
            SurfaceTask::from_document("domain\n lo: abc\n"),
            Err(SurfaceError::Config(_))
        ));
        assert!(matches!(
            SurfaceTask::from_document("domain\n colour: red\n"),
            Err(SurfaceError::Config(_))
        ));
        assert!(matches!(
            SurfaceTask::from_document("logging\n level: loud\n"),
            Err(SurfaceError::Config(_))
        ));
    }

    #[test]
    fn test_figure_size_out_of_range_rejected() {
        assert!(matches!(
            SurfaceTask::from_document("output\n width: 4294967297\n"),
            Err(SurfaceError::Config(_))
        ));
        assert!(matches!(
            SurfaceTask::from_document("output\n height: -1\n"),
            Err(SurfaceError::Config(_))
        ));
        let task = SurfaceTask::from_document("output\n width: 4294967295\n").unwrap();
        assert_eq!(task.width, u32::MAX);
    }

    #[test]
    fn test_figure_is_opt_in() {
        let task = SurfaceTask::from_document("output\n figure: none\n").unwrap();
        assert!(task.figure.is_none());
        let doc = "output\n figure: plot.png\n gnuplot: false\n";
        let task = SurfaceTask::from_document(doc).unwrap();
        assert_eq!(task.figure.as_deref(), Some("plot.png"));
        assert!(!task.gnuplot);
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "domain\n samples: 25\n").unwrap();
        drop(file);
        let task = SurfaceTask::from_file(&path).unwrap();
        assert_eq!(task.samples, 25);
        assert!(matches!(
            SurfaceTask::from_file(dir.path().join("missing.txt")),
            Err(SurfaceError::Io(_))
        ));
    }
}

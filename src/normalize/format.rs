//! Extension-based dispatch to the format parsers.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use super::{ini, js, json, xml, yaml, ValidateBlob};
use crate::error::ParseError;

/// The config dialects diagrun can normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    Yaml,
    Xml,
    Json,
    Js,
    Ini,
}

impl ConfigFormat {
    /// Map a file extension to its format.
    ///
    /// Case-insensitive; a leading dot is optional.
    pub fn from_extension(extension: &str) -> Result<Self, ParseError> {
        let normalized = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "yml" | "yaml" => Ok(Self::Yaml),
            "xml" | "config" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            "js" => Ok(Self::Js),
            "ini" | "properties" | "cfg" => Ok(Self::Ini),
            _ => Err(ParseError::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// The format of a file, from its extension.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Js => "js",
            Self::Ini => "ini",
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
    }
}

/// Normalize `reader` as `format`.
///
/// INI and JS are scanned line by line, so bytes that are not UTF-8 are
/// replaced instead of failing the file. The structured formats require UTF-8.
pub fn parse<R: Read>(format: ConfigFormat, mut reader: R) -> Result<ValidateBlob, ParseError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    debug!("Parsing {} bytes as {}", bytes.len(), format);

    let text = match format {
        ConfigFormat::Ini | ConfigFormat::Js => String::from_utf8_lossy(&bytes).into_owned(),
        _ => String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
    };

    match format {
        ConfigFormat::Yaml => yaml::parse(&text),
        ConfigFormat::Xml => xml::parse(&text),
        ConfigFormat::Json => json::parse(&text),
        ConfigFormat::Js => js::parse(&text),
        ConfigFormat::Ini => Ok(ini::parse(&text)),
    }
}

/// Normalize a file, picking the parser from its extension.
pub fn parse_file(path: &Path) -> Result<ValidateBlob, ParseError> {
    let format = ConfigFormat::from_path(path)?;
    let file = File::open(path)?;
    parse(format, BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_dispatch() {
        assert_eq!(ConfigFormat::from_extension("yml").unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_extension(".YAML").unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_extension("config").unwrap(), ConfigFormat::Xml);
        assert_eq!(ConfigFormat::from_extension(".json").unwrap(), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_extension("js").unwrap(), ConfigFormat::Js);
        assert_eq!(ConfigFormat::from_extension("properties").unwrap(), ConfigFormat::Ini);
        assert_eq!(ConfigFormat::from_extension("CFG").unwrap(), ConfigFormat::Ini);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = ConfigFormat::from_extension("toml").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat { ref extension } if extension == "toml"));
    }

    #[test]
    fn path_without_extension_is_unsupported() {
        assert!(ConfigFormat::from_path(Path::new("/etc/newrelic")).is_err());
    }

    #[test]
    fn parse_reads_from_any_reader() {
        let tree = parse(ConfigFormat::Json, "{\"a\": 1}".as_bytes()).unwrap();
        assert_eq!(tree.to_string(), "/a: 1\n");
    }

    #[test]
    fn line_formats_tolerate_invalid_utf8() {
        let tree = parse(ConfigFormat::Ini, &b"license_key = \xff\xfe abc\n"[..]).unwrap();
        let value = tree.find_key("license_key")[0].value();
        assert!(value.ends_with(" abc"));
        assert!(value.starts_with('\u{FFFD}'));

        let tree = parse(ConfigFormat::Js, &b"exports.config = { app_name: 'caf\xe9' }"[..]).unwrap();
        assert_eq!(tree.find_key("app_name")[0].value(), "caf\u{FFFD}");
    }

    #[test]
    fn structured_formats_require_utf8() {
        let err = parse(ConfigFormat::Yaml, &b"app_name: caf\xe9\n"[..]).unwrap_err();
        assert!(matches!(err, ParseError::Read(_)));
    }

    #[test]
    fn parse_file_reports_missing_file() {
        let err = parse_file(Path::new("/definitely/not/here/newrelic.yml")).unwrap_err();
        assert!(matches!(err, ParseError::Read(_)));
        assert!(err.to_string().starts_with("We ran into an error"));
    }

    #[test]
    fn parse_file_uses_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newrelic.ini");
        std::fs::write(&path, "license_key = abc\n").unwrap();
        let tree = parse_file(&path).unwrap();
        assert_eq!(tree.find_key("license_key")[0].value(), "abc");
    }
}

use std::path::Path;

use anyhow::{bail, Context};
use dccalendar::CalendarSettings;

// -----------------------------------------------------------------------------
// Format
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => bail!("Unsupported settings file {:?}. Use .json, .yaml or .yml", path),
        }
    }

    pub fn parse(&self, text: &str) -> anyhow::Result<CalendarSettings> {
        let settings = match self {
            Format::Json => serde_json::from_str(text)?,
            Format::Yaml => serde_yaml::from_str(text)?,
        };
        Ok(settings)
    }
}

/// Settings from `path`, or the defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<CalendarSettings> {
    let Some(path) = path else {
        log::info!("No settings file given. Using defaults");
        return Ok(CalendarSettings::default());
    };
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings at {:?}", path))?;
    let settings = format
        .parse(&text)
        .with_context(|| format!("Invalid settings at {:?}", path))?;
    log::info!(
        "Loaded {} schedule(s) from {:?}",
        settings.schedules().len(),
        path
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a/b.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("b.yaml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("b.yml")).unwrap(), Format::Yaml);
        assert!(Format::from_path(Path::new("b.toml")).is_err());
        assert!(Format::from_path(Path::new("settings")).is_err());
    }

    #[test]
    fn test_parse() {
        let json = Format::Json.parse(r#"{"search_depth": 2}"#).unwrap();
        let yaml = Format::Yaml.parse("search_depth: 2").unwrap();

        assert_eq!(json, yaml);
        assert_eq!(json.search_depth(), 2);
        assert!(Format::Yaml.parse("search_depth: 0").is_err());
    }

    #[test]
    fn test_load_defaults() {
        assert_eq!(load_settings(None).unwrap(), CalendarSettings::default());
    }
}

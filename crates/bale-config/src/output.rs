use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Module system an output artifact conforms to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ModuleFormat {
    /// CommonJS (`require` / `module.exports`)
    Cjs,
    /// ECMAScript modules (`import` / `export`)
    Es,
}

impl ModuleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleFormat::Cjs => "cjs",
            ModuleFormat::Es => "es",
        }
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a format tag is not one of the supported module systems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported module format '{}'", self.0)
    }
}

impl std::error::Error for UnknownFormat {}

impl FromStr for ModuleFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cjs" | "commonjs" => Ok(ModuleFormat::Cjs),
            "es" | "esm" | "module" => Ok(ModuleFormat::Es),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

impl TryFrom<String> for ModuleFormat {
    type Error = UnknownFormat;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModuleFormat> for String {
    fn from(format: ModuleFormat) -> Self {
        format.as_str().to_string()
    }
}

/// One artifact to emit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTarget {
    pub format: ModuleFormat,
    pub file: PathBuf,
}

impl OutputTarget {
    pub fn new(format: ModuleFormat, file: impl Into<PathBuf>) -> Self {
        Self {
            format,
            file: file.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rollup_aliases() {
        assert_eq!("cjs".parse::<ModuleFormat>().unwrap(), ModuleFormat::Cjs);
        assert_eq!("commonjs".parse::<ModuleFormat>().unwrap(), ModuleFormat::Cjs);
        assert_eq!("es".parse::<ModuleFormat>().unwrap(), ModuleFormat::Es);
        assert_eq!("esm".parse::<ModuleFormat>().unwrap(), ModuleFormat::Es);
        assert_eq!("module".parse::<ModuleFormat>().unwrap(), ModuleFormat::Es);
    }

    #[test]
    fn rejects_umd() {
        let err = "umd".parse::<ModuleFormat>().unwrap_err();
        assert_eq!(err, UnknownFormat("umd".to_string()));
        assert!(err.to_string().contains("umd"));
    }

    #[test]
    fn serializes_canonical_tag() {
        let target = OutputTarget::new(ModuleFormat::Es, "dist/index.js");
        let value = serde_json::to_value(&target).unwrap();
        assert_eq!(value["format"], "es");
        assert_eq!(value["file"], "dist/index.js");
    }
}

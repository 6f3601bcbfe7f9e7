use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, anyhow};
use log::debug;
use regex::Regex;
use serde::Deserialize;
use serde_yaml::Deserializer;
use url::Url;

use crate::Cli;
use crate::error::{CheckError, Result};
use crate::models::Price;

pub const DEFAULT_BASE_URL: &str = "https://www.clever-tanken.de";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13.5; rv:116.0) Gecko/20100101 Firefox/116.0";
const CONFIG_PREFIX: &str = env!("CARGO_PKG_NAME");

static STATION_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());
static ALARM_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^:]+?)\s*:\s*(\d+(?:\.\d+)?)\s*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    SingleLine,
    #[default]
    MultiLine,
}

impl OutputMode {
    /// Anything that is not `singleline` means multi-line.
    pub fn from_arg(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "singleline" => OutputMode::SingleLine,
            _ => OutputMode::MultiLine,
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::SingleLine => write!(f, "singleline"),
            OutputMode::MultiLine => write!(f, "multiline"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerfDataStyle {
    Short,
    #[default]
    Long,
}

impl PerfDataStyle {
    /// Anything that is not `short` means long.
    pub fn from_arg(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "short" => PerfDataStyle::Short,
            _ => PerfDataStyle::Long,
        }
    }
}

impl fmt::Display for PerfDataStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerfDataStyle::Short => write!(f, "short"),
            PerfDataStyle::Long => write!(f, "long"),
        }
    }
}

/// Optional defaults read from YAML. Every key may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub alarms: Option<Vec<String>>,
    pub favorite: Option<String>,
    pub outputtype: Option<String>,
    pub perfdatastyle: Option<String>,
    pub hlink: Option<bool>,
}

impl FileConfig {
    /// Load an explicitly named file, or the one in the XDG config dir if it
    /// exists. A missing default file is not an error.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<FileConfig> {
        let path: PathBuf = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let xdg_dirs = xdg::BaseDirectories::with_prefix(CONFIG_PREFIX);
                match xdg_dirs.find_config_file("config.yaml") {
                    Some(path) => path,
                    None => return Ok(FileConfig::default()),
                }
            }
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if raw.trim().is_empty() {
            return Ok(FileConfig::default());
        }

        let deserialized = Deserializer::from_str(&raw);
        let file_config: FileConfig =
            serde_path_to_error::deserialize(deserialized).map_err(|e| {
                anyhow!(
                    "Invalid YAML in {} at `{}`: {}",
                    path.display(),
                    e.path(),
                    e.inner()
                )
            })?;
        debug!("Loaded config file {}", path.display());
        Ok(file_config)
    }
}

/// Everything a check run needs, resolved once and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub station: u32,
    pub alarms: BTreeMap<String, Price>,
    pub favorite: Option<String>,
    pub output_mode: OutputMode,
    pub perfdata_style: PerfDataStyle,
    pub hyperlink: bool,
    pub debug: bool,
    pub base_url: Url,
    pub user_agent: String,
}

impl Config {
    pub fn resolve(cli: &Cli) -> Result<Config> {
        let file = FileConfig::load(cli.config.as_deref())
            .map_err(|e| CheckError::Config(format!("{e:#}")))?;
        Self::from_parts(cli, file)
    }

    pub fn from_parts(cli: &Cli, file: FileConfig) -> Result<Config> {
        let station = parse_station(cli.station.as_deref())?;

        let mut alarms = BTreeMap::new();
        let entries = file.alarms.iter().flatten().chain(cli.alarm.iter());
        for entry in entries {
            match parse_alarm(entry) {
                Some((fuel, limit)) => {
                    alarms.insert(fuel, limit);
                }
                None => debug!("Ignoring malformed alarm entry {:?}", entry),
            }
        }

        let favorite = cli
            .favorite
            .clone()
            .or(file.favorite)
            .filter(|f| !f.is_empty());

        let output_mode = cli
            .outputtype
            .as_deref()
            .or(file.outputtype.as_deref())
            .map(OutputMode::from_arg)
            .unwrap_or_default();

        let perfdata_style = cli
            .perfdatastyle
            .as_deref()
            .or(file.perfdatastyle.as_deref())
            .map(PerfDataStyle::from_arg)
            .unwrap_or_default();

        let base_url = parse_base_url(file.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        Ok(Config {
            station,
            alarms,
            favorite,
            output_mode,
            perfdata_style,
            hyperlink: cli.hlink || file.hlink.unwrap_or(false),
            debug: cli.debug,
            base_url,
            user_agent: file.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }

    /// `<base>/tankstelle_details/<station>`
    pub fn station_url(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("tankstelle_details")
                .push(&self.station.to_string());
        }
        url
    }

    /// Human-readable dump printed with `--debug`.
    pub fn describe(&self) -> String {
        let alarms = if self.alarms.is_empty() {
            "-".to_string()
        } else {
            self.alarms
                .iter()
                .map(|(fuel, limit)| format!("{}: {}", fuel, limit))
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "station: {}\nalarms: {}\nfavorite: {}\noutput type: {}\nperfdata style: {}\nhyperlink: {}\nurl: {}",
            self.station,
            alarms,
            self.favorite.as_deref().unwrap_or("-"),
            self.output_mode,
            self.perfdata_style,
            self.hyperlink,
            self.station_url(),
        )
    }
}

fn parse_station(raw: Option<&str>) -> Result<u32> {
    let Some(raw) = raw else {
        return Err(CheckError::InvalidStation("no station id given".to_string()));
    };
    let raw = raw.trim();

    if !STATION_ID.is_match(raw) {
        return Err(CheckError::InvalidStation(format!("{raw:?} is not a number")));
    }

    match raw.parse::<u32>() {
        Ok(id) if id >= 1 => Ok(id),
        Ok(_) => Err(CheckError::InvalidStation("station id must be at least 1".to_string())),
        Err(e) => Err(CheckError::InvalidStation(format!("{raw}: {e}"))),
    }
}

/// `"<fuel-type>: <threshold>"`; `None` for anything else.
fn parse_alarm(entry: &str) -> Option<(String, Price)> {
    let caps = ALARM_ENTRY.captures(entry)?;
    let fuel = caps[1].trim();
    if fuel.is_empty() {
        return None;
    }
    let limit = caps[2].parse::<Price>().ok()?;
    Some((fuel.to_string(), limit))
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| CheckError::Config(format!("base_url {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(CheckError::Config(format!("base_url {raw:?} is not an http(s) URL")));
    }
    Ok(url)
}

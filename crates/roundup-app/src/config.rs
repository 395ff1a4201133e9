// Configuration loading and parsing (league.toml, credentials.toml).

use chrono::Datelike;
use roundup_core::position::Position;
use roundup_core::report::ReportOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub report: ReportConfig,
    pub espn: EspnConfig,
    pub credentials: CredentialsConfig,
}

impl Config {
    /// Season year, defaulting to the current calendar year.
    pub fn season_year(&self) -> i32 {
        self.league
            .year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// Report assembly options derived from the `[report]` table.
    ///
    /// Position codes are checked by `validate`, so none are dropped here.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            top_players: self.report.top_players,
            boom_bust_positions: self
                .report
                .boom_bust_positions
                .iter()
                .filter_map(|code| Position::from_code(code))
                .collect(),
            leaders_top_n: self.report.leaders_top_n,
            leaders_bottom_n: self.report.leaders_bottom_n,
        }
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    #[serde(default)]
    report: ReportConfig,
    #[serde(default)]
    espn: EspnConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub league_id: u64,
    /// Omitted means the current season.
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub boom_bust_positions: Vec<String>,
    pub top_players: usize,
    /// Best and worst starters kept per position leader row.
    pub leaders_top_n: usize,
    pub leaders_bottom_n: usize,
    /// Lifetime of cached provider responses.
    pub cache_ttl_secs: u64,
    /// Lifetime of finished background jobs.
    pub job_ttl_secs: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            boom_bust_positions: Position::DEFAULT_REPORTED
                .iter()
                .map(|p| p.code().to_string())
                .collect(),
            top_players: 3,
            leaders_top_n: 1,
            leaders_bottom_n: 1,
            cache_ttl_secs: 3600,
            job_ttl_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EspnConfig {
    pub base_url: String,
}

impl Default for EspnConfig {
    fn default() -> Self {
        EspnConfig {
            base_url: "https://lm-api-reads.fantasy.espn.com/apis/v3/games/ffl".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

/// Browser cookies for private leagues. Public leagues need neither.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub espn_swid: Option<String>,
    pub espn_s2: Option<String>,
}

impl CredentialsConfig {
    /// Both cookies present and non-blank.
    pub fn is_complete(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.espn_swid) && present(&self.espn_s2)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// (optionally) `config/credentials.toml` under `base_dir`, then apply
/// `ESPN_LEAGUE_ID`, `ESPN_SWID` and `ESPN_S2` from the process environment.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    load_config_with_env(base_dir, |key| std::env::var(key).ok())
}

/// As [`load_config_from`], reading overrides through `env`.
pub fn load_config_with_env<F>(base_dir: &Path, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let mut config = Config {
        league: league_file.league,
        report: league_file.report,
        espn: league_file.espn,
        credentials,
    };

    apply_env_overrides(&mut config, env)?;
    validate(&config)?;

    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn apply_env_overrides<F>(config: &mut Config, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = env("ESPN_LEAGUE_ID").filter(|v| !v.trim().is_empty()) {
        config.league.league_id =
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::ValidationError {
                    field: "ESPN_LEAGUE_ID".into(),
                    message: format!("must be a positive integer, got {raw:?}"),
                })?;
    }
    if let Some(swid) = env("ESPN_SWID").filter(|v| !v.trim().is_empty()) {
        config.credentials.espn_swid = Some(swid);
    }
    if let Some(s2) = env("ESPN_S2").filter(|v| !v.trim().is_empty()) {
        config.credentials.espn_s2 = Some(s2);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.league_id == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.league_id".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.report.top_players == 0 {
        return Err(ConfigError::ValidationError {
            field: "report.top_players".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.report.boom_bust_positions.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "report.boom_bust_positions".into(),
            message: "must name at least one position".into(),
        });
    }
    for code in &config.report.boom_bust_positions {
        if Position::from_code(code).is_none() {
            return Err(ConfigError::ValidationError {
                field: "report.boom_bust_positions".into(),
                message: "position codes must not be blank".into(),
            });
        }
    }

    let ttl_fields: &[(&str, u64)] = &[
        ("report.cache_ttl_secs", config.report.cache_ttl_secs),
        ("report.job_ttl_secs", config.report.job_ttl_secs),
    ];
    for (name, val) in ttl_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be greater than 0".into(),
            });
        }
    }

    if config.espn.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "espn.base_url".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the roundup-app crate root
    /// (works whether `cargo test` runs from the crate root or repo root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("config/league.toml").exists() {
            cwd
        } else if cwd.join("crates/roundup-app/config/league.toml").exists() {
            cwd.join("crates/roundup-app")
        } else {
            panic!("Cannot locate config/ directory from CWD {:?}", cwd);
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    /// Fresh temp dir with a `config/league.toml` holding `league_toml`.
    fn temp_config(name: &str, league_toml: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/league.toml"), league_toml).unwrap();
        tmp
    }

    #[test]
    fn load_valid_config_from_project_files() {
        let root = project_root();
        let config = load_config_with_env(&root, no_env).expect("should load valid config");

        assert!(config.league.league_id > 0);
        assert_eq!(config.report.top_players, 3);
        assert_eq!(
            config.report.boom_bust_positions,
            vec!["QB", "RB", "WR", "TE", "K", "D/ST"]
        );
        assert_eq!(config.report.cache_ttl_secs, 3600);
        assert!(config.espn.base_url.starts_with("https://"));
        assert_eq!(config.report_options().boom_bust_positions.len(), 6);
    }

    #[test]
    fn missing_tables_fall_back_to_defaults() {
        let tmp = temp_config("roundup_config_defaults", "[league]\nleague_id = 42\n");

        let config = load_config_with_env(&tmp, no_env).expect("should load minimal config");
        assert_eq!(config.league.league_id, 42);
        assert_eq!(config.report.top_players, 3);
        assert_eq!(config.report.job_ttl_secs, 3600);
        assert!(!config.credentials.is_complete());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn explicit_year_wins_over_current_year() {
        let tmp = temp_config(
            "roundup_config_year",
            "[league]\nleague_id = 42\nyear = 2023\n",
        );

        let config = load_config_with_env(&tmp, no_env).unwrap();
        assert_eq!(config.season_year(), 2023);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn credentials_toml_is_read() {
        let tmp = temp_config("roundup_config_creds", "[league]\nleague_id = 42\n");
        fs::write(
            tmp.join("config/credentials.toml"),
            "espn_swid = \"{ABC}\"\nespn_s2 = \"s2-cookie\"\n",
        )
        .unwrap();

        let config = load_config_with_env(&tmp, no_env).unwrap();
        assert_eq!(config.credentials.espn_swid.as_deref(), Some("{ABC}"));
        assert!(config.credentials.is_complete());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn environment_overrides_files() {
        let tmp = temp_config("roundup_config_env", "[league]\nleague_id = 42\n");
        let env = |key: &str| match key {
            "ESPN_LEAGUE_ID" => Some("777".to_string()),
            "ESPN_SWID" => Some("{ENV}".to_string()),
            "ESPN_S2" => Some("env-s2".to_string()),
            _ => None,
        };

        let config = load_config_with_env(&tmp, env).unwrap();
        assert_eq!(config.league.league_id, 777);
        assert_eq!(config.credentials.espn_swid.as_deref(), Some("{ENV}"));
        assert_eq!(config.credentials.espn_s2.as_deref(), Some("env-s2"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_numeric_league_id_override() {
        let tmp = temp_config("roundup_config_bad_env", "[league]\nleague_id = 42\n");
        let env = |key: &str| (key == "ESPN_LEAGUE_ID").then(|| "abc".to_string());

        let err = load_config_with_env(&tmp, env).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "ESPN_LEAGUE_ID"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_league_id_zero() {
        let tmp = temp_config("roundup_config_zero_id", "[league]\nleague_id = 0\n");

        let err = load_config_with_env(&tmp, no_env).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "league.league_id"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn idp_position_codes_are_accepted() {
        let tmp = temp_config(
            "roundup_config_idp_pos",
            "[league]\nleague_id = 1\n[report]\nboom_bust_positions = [\"QB\", \"lb\", \"P\"]\nleaders_top_n = 2\n",
        );

        let config = load_config_with_env(&tmp, no_env).unwrap();
        let options = config.report_options();
        let codes: Vec<&str> = options.boom_bust_positions.iter().map(|p| p.code()).collect();
        assert_eq!(codes, vec!["QB", "LB", "P"]);
        assert_eq!(options.leaders_top_n, 2);
        assert_eq!(options.leaders_bottom_n, 1);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_blank_position_code() {
        let tmp = temp_config(
            "roundup_config_bad_pos",
            "[league]\nleague_id = 1\n[report]\nboom_bust_positions = [\"QB\", \" \"]\n",
        );

        let err = load_config_with_env(&tmp, no_env).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, message } => {
                assert_eq!(field, "report.boom_bust_positions");
                assert!(message.contains("blank"));
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_ttl() {
        let tmp = temp_config(
            "roundup_config_zero_ttl",
            "[league]\nleague_id = 1\n[report]\ncache_ttl_secs = 0\n",
        );

        let err = load_config_with_env(&tmp, no_env).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "report.cache_ttl_secs")
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = std::env::temp_dir().join("roundup_config_missing_league");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_with_env(&tmp, no_env).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with("league.toml"));
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_config("roundup_config_invalid_toml", "this is not valid [[[ toml");

        let err = load_config_with_env(&tmp, no_env).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with("league.toml"));
            }
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}

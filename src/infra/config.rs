use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::{AppContext, InitArgs};
use crate::core::engine::{DEFAULT_FLOOR_RATIO, RecommendOptions};
use crate::core::scoring::ScoringPolicy;

/// Config file names, first match wins
pub const CONFIG_FILES: [&str; 4] = ["lotscout.toml", "lotscout.yaml", "lotscout.json", ".lotscout.toml"];

/// Policy file written by `init --with-policy`
pub const POLICY_FILE: &str = "policy.toml";

/// Log level for commands that run without configuration
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    pub inventory: InventoryConfig,

    pub recommend: RecommendConfig,

    pub scoring: ScoringConfig,

    pub log: LogConfig,

    /// Config file the values were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig
{
    /// Auction export to load
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig
{
    /// Lower edge of the budget window as a fraction of the budget
    pub budget_floor_ratio: f64,

    /// Only admit positively scored listings
    pub strict: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig
{
    /// Optional TOML scoring policy; built-in weights when unset
    pub policy_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig
{
    pub level: String,
}

impl Default for InventoryConfig
{
    fn default() -> Self
    {
        Self { path: PathBuf::from("cars.csv") }
    }
}

impl Default for RecommendConfig
{
    fn default() -> Self
    {
        Self { budget_floor_ratio: DEFAULT_FLOOR_RATIO, strict: false }
    }
}

impl Default for LogConfig
{
    fn default() -> Self
    {
        Self { level: DEFAULT_LOG_LEVEL.to_string() }
    }
}

impl Config
{
    pub fn recommend_options(&self) -> RecommendOptions
    {
        RecommendOptions { floor_ratio: self.recommend.budget_floor_ratio, strict: self.recommend.strict }
    }
}

/// Load from the working directory and `LOTSCOUT_*` environment variables
pub fn load_config() -> Result<Config>
{
    load_config_in(Path::new("."))
}

/// Load with config files resolved relative to `dir`
pub fn load_config_in(dir: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let source = CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists());
    if let Some(path) = &source
    {
        builder = builder.add_source(config::File::from(path.clone()));
    }

    // LOTSCOUT_RECOMMEND__STRICT=true -> recommend.strict
    builder = builder.add_source(
        config::Environment::with_prefix("LOTSCOUT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let mut parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;
    parsed.source = source;

    Ok(parsed)
}

/// The configured scoring policy, or the built-in one
pub fn load_policy(config: &Config) -> Result<ScoringPolicy>
{
    match &config
        .scoring
        .policy_file
    {
        Some(path) =>
        {
            let policy = ScoringPolicy::load(path)
                .with_context(|| format!("Failed to load scoring policy {}", path.display()))?;
            debug!(path = %path.display(), categories = policy.categories.len(), "scoring policy loaded");
            Ok(policy)
        }
        None => Ok(ScoringPolicy::default()),
    }
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join(CONFIG_FILES[0]);
    let policy_path = args
        .path
        .join(POLICY_FILE);

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }
    if args.with_policy && policy_path.exists() && !args.force
    {
        anyhow::bail!(
            "Policy file already exists at {}. Use --force to overwrite.",
            policy_path.display()
        );
    }

    let mut config = Config::default();
    if args.with_policy
    {
        config
            .scoring
            .policy_file = Some(PathBuf::from(POLICY_FILE));
    }

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("DRY RUN: would write {}", config_path.display());
            if args.with_policy
            {
                println!("DRY RUN: would write {}", policy_path.display());
            }
        }
        return Ok(());
    }

    let toml_string = toml::to_string_pretty(&config).context("Failed to serialize default config")?;
    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if args.with_policy
    {
        let policy = ScoringPolicy::default()
            .to_toml_string()
            .context("Failed to serialize default scoring policy")?;
        std::fs::write(&policy_path, policy).context("Failed to write policy file")?;
    }

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
        if args.with_policy
        {
            println!("Created policy file at {}", policy_path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn defaults_without_files()
    {
        let dir = assert_fs::TempDir::new().unwrap();
        let cfg = load_config_in(dir.path()).unwrap();

        assert_eq!(cfg.inventory.path, PathBuf::from("cars.csv"));
        assert_eq!(cfg.recommend.budget_floor_ratio, DEFAULT_FLOOR_RATIO);
        assert!(!cfg.recommend.strict);
        assert_eq!(cfg.log.level, "warn");
        assert!(
            cfg.scoring
                .policy_file
                .is_none()
        );
        assert!(
            cfg.source
                .is_none()
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults()
    {
        let dir = assert_fs::TempDir::new().unwrap();
        std::fs::write(
            dir.path()
                .join("lotscout.toml"),
            "[recommend]\nstrict = true\n\n[inventory]\npath = \"lots/may.csv\"\n",
        )
        .unwrap();

        let cfg = load_config_in(dir.path()).unwrap();
        assert!(cfg.recommend.strict);
        assert_eq!(cfg.recommend.budget_floor_ratio, DEFAULT_FLOOR_RATIO);
        assert_eq!(cfg.inventory.path, PathBuf::from("lots/may.csv"));
        assert_eq!(
            cfg.source,
            Some(
                dir.path()
                    .join("lotscout.toml")
            )
        );
        assert_eq!(
            cfg.recommend_options(),
            RecommendOptions { floor_ratio: DEFAULT_FLOOR_RATIO, strict: true }
        );
    }

    #[test]
    fn toml_wins_over_hidden_file()
    {
        let dir = assert_fs::TempDir::new().unwrap();
        std::fs::write(
            dir.path()
                .join("lotscout.toml"),
            "[log]\nlevel = \"info\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path()
                .join(".lotscout.toml"),
            "[log]\nlevel = \"trace\"\n",
        )
        .unwrap();

        assert_eq!(
            load_config_in(dir.path())
                .unwrap()
                .log
                .level,
            "info"
        );
    }

    #[test]
    fn default_config_serializes_back()
    {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, Config::default());
    }

    #[test]
    fn missing_policy_file_is_an_error()
    {
        let mut cfg = Config::default();
        cfg.scoring
            .policy_file = Some(PathBuf::from("no/such/policy.toml"));
        assert!(load_policy(&cfg).is_err());
        assert_eq!(load_policy(&Config::default()).unwrap(), ScoringPolicy::default());
    }
}

/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rules: RulesConfig,
    pub sound: SoundConfig,
    pub gamepad: GamepadConfig,
    /// Custom maze file; `None` = built-in maze.
    pub level_file: Option<PathBuf>,
    /// Fixed RNG seed for reproducible ghost wandering.
    pub seed: Option<u64>,
    pub log_file: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulesConfig {
    pub tick_rate_ms: u64,
    pub power_mode_ticks: u32,
    pub food_for_power: u32,  // food eaten before power mode kicks in
    pub starting_lives: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            tick_rate_ms: default_tick_rate(),
            power_mode_ticks: default_power_ticks(),
            food_for_power: default_food_for_power(),
            starting_lives: default_lives(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SoundConfig {
    pub enabled: bool,
    pub eat: Option<PathBuf>,
    pub collision: Option<PathBuf>,
    pub game_over: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub pause: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_power_ticks")]
    power_mode_ticks: u32,
    #[serde(default = "default_food_for_power")]
    food_for_power: u32,
    #[serde(default = "default_lives")]
    starting_lives: u32,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_true")]
    enabled: bool,
    eat: Option<String>,
    collision: Option<String>,
    game_over: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    level_file: Option<String>,
    seed: Option<u64>,
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 50 }      // 20 ticks per second
fn default_power_ticks() -> u32 { 250 }   // 12.5s at 50ms
fn default_food_for_power() -> u32 { 70 }
fn default_lives() -> u32 { 3 }
fn default_true() -> bool { true }

fn default_pause() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_log_file() -> String { "maze-chase.log".into() }

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            tick_rate_ms: default_tick_rate(),
            power_mode_ticks: default_power_ticks(),
            food_for_power: default_food_for_power(),
            starting_lives: default_lives(),
        }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: true, eat: None, collision: None, game_over: None }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { pause: default_pause(), quit: default_quit() }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { level_file: None, seed: None, log_file: default_log_file() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    fn from_toml(cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let resolve = |s: Option<String>| s.map(|s| resolve_path(&s, search_dirs));

        GameConfig {
            rules: RulesConfig {
                // A zero tick rate would spin the loop; clamp to 1ms.
                tick_rate_ms: cfg.rules.tick_rate_ms.max(1),
                power_mode_ticks: cfg.rules.power_mode_ticks,
                food_for_power: cfg.rules.food_for_power,
                starting_lives: cfg.rules.starting_lives.max(1),
            },
            sound: SoundConfig {
                enabled: cfg.sound.enabled,
                eat: resolve(cfg.sound.eat),
                collision: resolve(cfg.sound.collision),
                game_over: resolve(cfg.sound.game_over),
            },
            gamepad: GamepadConfig {
                pause: cfg.gamepad.pause,
                quit: cfg.gamepad.quit,
            },
            level_file: resolve(cfg.general.level_file),
            seed: cfg.general.seed,
            log_file: PathBuf::from(cfg.general.log_file),
        }
    }
}

/// Absolute paths pass through; relative ones resolve against the first
/// candidate directory that contains them (default: relative to CWD).
fn resolve_path(s: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let p = Path::new(s);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    search_dirs.iter()
        .map(|d| d.join(p))
        .find(|candidate| candidate.exists())
        .unwrap_or_else(|| p.to_path_buf())
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its data.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
///
/// Runs before logging is set up (the log path lives in here), so problems
/// go to stderr while the terminal is still in normal mode.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match parse_toml(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

fn parse_toml(text: &str) -> Result<TomlConfig, toml::de::Error> {
    toml::from_str::<TomlConfig>(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> GameConfig {
        let cfg = parse_toml(text).expect("valid toml");
        GameConfig::from_toml(cfg, &[])
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = parse("");
        assert_eq!(cfg.rules, RulesConfig::default());
        assert_eq!(cfg.rules.tick_rate_ms, 50);
        assert_eq!(cfg.rules.power_mode_ticks, 250);
        assert_eq!(cfg.rules.food_for_power, 70);
        assert_eq!(cfg.rules.starting_lives, 3);
        assert!(cfg.sound.enabled);
        assert!(cfg.level_file.is_none());
        assert!(cfg.seed.is_none());
        assert_eq!(cfg.gamepad.quit, vec!["Select".to_string()]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = parse(
            "[rules]\npower_mode_ticks = 100\n\n[general]\nseed = 1234\nlevel_file = \"maze.txt\"\n",
        );
        assert_eq!(cfg.rules.power_mode_ticks, 100);
        assert_eq!(cfg.rules.tick_rate_ms, 50);
        assert_eq!(cfg.seed, Some(1234));
        assert_eq!(cfg.level_file, Some(PathBuf::from("maze.txt")));
    }

    #[test]
    fn degenerate_values_are_clamped() {
        let cfg = parse("[rules]\ntick_rate_ms = 0\nstarting_lives = 0\n");
        assert_eq!(cfg.rules.tick_rate_ms, 1);
        assert_eq!(cfg.rules.starting_lives, 1);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(parse_toml("[rules\n").is_err());
    }
}

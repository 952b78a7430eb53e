use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use frogger::storage::atomic_rename;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

#[derive(Parser, Debug)]
#[command(name = "frogger", about = "Cross the road. Mind the trucks.")]
pub(crate) struct Args {
    /// milliseconds between simulation ticks
    #[arg(long)]
    pub(crate) ms: Option<u64>,

    /// lane layout seed (0 picks one from the clock)
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// leaderboard file (defaults to the data directory)
    #[arg(long)]
    pub(crate) scores: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) tick_ms: u64,
    pub(crate) seed: u64,
    pub(crate) theme: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: 33,
            seed: 0,
            theme: 0,
        }
    }
}

impl Settings {
    pub(crate) fn apply_args(&mut self, args: &Args) {
        if let Some(ms) = args.ms {
            self.tick_ms = ms;
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        self.tick_ms = self.tick_ms.clamp(5, 500);
    }

    pub(crate) fn resolve_seed(&self) -> u64 {
        if self.seed != 0 {
            return self.seed;
        }
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        nanos ^ 0xC0FFEE_u64
    }
}

pub(crate) struct Paths {
    pub(crate) scores_path: PathBuf,
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "terminal-toys", "Frogger")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(Paths {
        scores_path: dir.join("scores.json"),
        settings_path: dir.join("settings.json"),
        log_path: dir.join("frogger.log"),
    })
}

fn read_settings(path: &Path) -> Result<Settings> {
    let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let settings =
        serde_json::from_str(&s).with_context(|| format!("parsing {}", path.display()))?;
    Ok(settings)
}

/// Missing or unreadable settings fall back to defaults.
pub(crate) fn load_settings(path: &Path) -> Settings {
    read_settings(path).unwrap_or_else(|e| {
        log::debug!("using default settings: {e:#}");
        Settings::default()
    })
}

pub(crate) fn save_settings_atomic(path: &Path, settings: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(settings).context("encoding settings")?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)
}

/// The alternate screen owns stdout/stderr, so logs go to a file.
/// Filter comes from `RUST_LOG`, default `warn`.
pub(crate) fn init_logging(path: &Path) {
    let file = match fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(_) => return,
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

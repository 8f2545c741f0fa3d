use crate::core::config::data::Config;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::SystemTime;

#[derive(Default)]
pub(crate) struct ConfigCacheState {
    config: Option<Config>,
    modified: Option<SystemTime>,
}

pub(crate) struct ConfigOrchestrator {
    path: PathBuf,
    state: Mutex<ConfigCacheState>,
}

pub(crate) static CONFIG_ORCHESTRATOR: LazyLock<Option<ConfigOrchestrator>> =
    LazyLock::new(|| Config::get_config_path().map(ConfigOrchestrator::new));

type BoxError = Box<dyn std::error::Error>;

impl ConfigOrchestrator {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Mutex::new(ConfigCacheState::default()),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, ConfigCacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn load_with_cache(&self) -> Result<Config, BoxError> {
        let mut state = self.lock();
        let disk_modified = Self::modified_time(&self.path);
        if state.config.is_none() || state.modified != disk_modified {
            let config = Config::load_from_path(&self.path)?;
            state.modified = disk_modified;
            state.config = Some(config);
        }
        Ok(state.config.clone().unwrap_or_default())
    }

    pub(crate) fn persist(&self, config: Config) -> Result<(), BoxError> {
        config.save_to_path(&self.path)?;
        let mut state = self.lock();
        state.modified = Self::modified_time(&self.path);
        state.config = Some(config);
        Ok(())
    }

    pub(crate) fn mutate<F, T>(&self, mutator: F) -> Result<T, BoxError>
    where
        F: FnOnce(&mut Config) -> Result<T, BoxError>,
    {
        let mut working = self.load_with_cache()?;
        let result = mutator(&mut working)?;
        self.persist(working)?;
        Ok(result)
    }

    fn modified_time(path: &Path) -> Option<SystemTime> {
        fs::metadata(path).ok()?.modified().ok()
    }
}

fn with_orchestrator<T>(
    f: impl FnOnce(&ConfigOrchestrator) -> Result<T, BoxError>,
) -> Result<T, BoxError> {
    match CONFIG_ORCHESTRATOR.as_ref() {
        Some(orchestrator) => f(orchestrator),
        None => Err("Failed to determine config directory".into()),
    }
}

impl Config {
    pub fn load() -> Result<Config, BoxError> {
        with_orchestrator(|orchestrator| orchestrator.load_with_cache())
    }

    pub fn save(&self) -> Result<(), BoxError> {
        let config = self.clone();
        with_orchestrator(move |orchestrator| orchestrator.persist(config))
    }

    pub fn mutate<F, T>(mutator: F) -> Result<T, BoxError>
    where
        F: FnOnce(&mut Config) -> Result<T, BoxError>,
    {
        with_orchestrator(move |orchestrator| orchestrator.mutate(mutator))
    }

    pub fn path() -> Result<PathBuf, BoxError> {
        with_orchestrator(|orchestrator| Ok(orchestrator.path().to_path_buf()))
    }
}

use config::Config;
use getopts::Matches;
use serde_derive::Deserialize;
use std::path::{Path, PathBuf};

use fitness_store::{RecordStore, Theme, UserSettings};
use log::{info, warn};

use crate::error::TrackerError;
use crate::navigation::DEFAULT_SPLASH_STEPS;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FileConfig {
    pub data_dir: String,
    pub records_file: String,
    pub workout_file: String,
    pub settings_file: String
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SplashConfig {
    pub steps: u32,
    pub step_millis: u64,
    pub hold_millis: u64,
    pub messages: Vec<String>
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct DefaultSettings {
    pub theme: String,
    pub notifications: bool,
    pub reminders: bool
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WorkoutConfig {
    pub date_format: String
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AssetConfig {
    pub splash_banner: String,
    pub welcome_banner: String
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TrackerConfig {
    pub files: FileConfig,
    pub splash: SplashConfig,
    pub defaults: DefaultSettings,
    pub workouts: WorkoutConfig,
    pub assets: AssetConfig
}

impl FileConfig {
    fn resolve(&self, file: &str) -> PathBuf {
        Path::new(&self.data_dir).join(file)
    }

    /// Builds the flat-file store these paths describe.
    pub fn record_store(&self) -> RecordStore {
        RecordStore::new(
            self.resolve(&self.records_file),
            self.resolve(&self.workout_file),
            self.resolve(&self.settings_file),
        )
    }
}

impl DefaultSettings {
    /// Settings handed to newly registered users.
    pub fn to_settings(&self) -> UserSettings {
        let theme = match self.theme.parse::<Theme>() {
            Ok(theme) => theme,
            Err(e) => {
                warn!("Default theme not usable ({}), falling back to light", e);
                Theme::Light
            }
        };
        UserSettings {
            theme,
            notifications: self.notifications,
            reminders: self.reminders,
        }
    }
}

impl TrackerConfig {
    /// Deserializes the tracker config and applies any command line overrides.
    ///
    /// 'options' parameters:<br />
    ///     &nbsp;&nbsp;&nbsp;&nbsp;"d": "DIR" -> overrides files.data_dir<br />
    ///     &nbsp;&nbsp;&nbsp;&nbsp;"skip-splash" -> sets splash.steps to 0 (the splash screen is not shown)<br />
    pub fn load(config: Config, options: Option<&Matches>) -> Result<TrackerConfig, TrackerError> {
        let mut tracker_config: TrackerConfig = config.try_deserialize()?;

        if tracker_config.splash.steps == 0 {
            tracker_config.splash.steps = DEFAULT_SPLASH_STEPS;
        }

        if let Some(options) = options {
            if let Ok(Some(dir)) = options.opt_get::<String>("d") {
                info!("Overriding data directory with '{}'", dir);
                tracker_config.files.data_dir = dir;
            }
            if options.opt_present("skip-splash") {
                info!("Skipping splash screen");
                tracker_config.splash.steps = 0;
            }
        }
        Ok(tracker_config)
    }

    pub fn show_splash(&self) -> bool {
        self.splash.steps > 0
    }
}

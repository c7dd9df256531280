use log::{debug, error, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub mod auth;
mod error;
pub mod record;
pub mod settings;
mod structs;

pub use crate::auth::{hash_password, is_password_hash, verify_password};
pub use crate::error::{StoreError, StoreResult};
pub use crate::structs::{
    BmiCategory, FitnessGoal, FocusArea, Gender, Measurements, Theme, UnknownVariant, UserRecord,
    UserSettings, WorkoutEntry, WorkoutType,
};

pub const RECORDS_FILE: &str = "FitnessTrackerData.txt";
pub const WORKOUT_FILE: &str = "workout_history.txt";
pub const SETTINGS_FILE: &str = "user_settings.json";

/// The record lookups and appends the tracker screens rely on.
///
/// Every lookup re-reads its file; a file that doesn't exist yet reads as
/// "no records" rather than an error.
pub trait StoreTraits {
    fn authenticate(&self, email: &str, password: &str) -> StoreResult<bool>;
    fn lookup_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;
    fn email_exists(&self, email: &str) -> StoreResult<bool>;
    fn measurement_history(&self, email: &str) -> StoreResult<Vec<UserRecord>>;

    fn append_registration(&self, name: &str, email: &str, password_hash: &str) -> StoreResult<()>;
    fn append_goals(&self, email: &str, goal: FitnessGoal, focus_areas: &[FocusArea]) -> StoreResult<()>;
    fn append_measurements(&self, email: &str, measurements: &Measurements) -> StoreResult<()>;

    fn append_workout(&self, entry: &WorkoutEntry) -> StoreResult<()>;
    fn read_history(&self) -> StoreResult<Option<String>>;
    fn workouts(&self) -> StoreResult<Vec<WorkoutEntry>>;

    fn load_settings(&self, email: &str) -> StoreResult<Option<UserSettings>>;
    fn create_settings(&self, email: &str, defaults: &UserSettings) -> StoreResult<()>;
    fn save_settings(&self, email: &str, settings: &UserSettings) -> StoreResult<()>;
}

/// Flat-file store: one append-only record file shared by registration,
/// goal and measurement fragments, one workout-history file and one JSON
/// settings document.
///
/// Appends never rewrite or de-duplicate earlier lines. Registering the same
/// email twice leaves two lines and lookups keep returning the first one.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records_path: PathBuf,
    workout_path: PathBuf,
    settings_path: PathBuf,
}

impl RecordStore {
    pub fn new(records_path: PathBuf, workout_path: PathBuf, settings_path: PathBuf) -> RecordStore {
        RecordStore {
            records_path,
            workout_path,
            settings_path,
        }
    }

    /// Store using the default file names inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> RecordStore {
        RecordStore::new(
            data_dir.join(RECORDS_FILE),
            data_dir.join(WORKOUT_FILE),
            data_dir.join(SETTINGS_FILE),
        )
    }

    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    pub fn workout_path(&self) -> &Path {
        &self.workout_path
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Creates whichever data files don't exist yet: the text files empty,
    /// the settings document as `{}`.
    pub fn initialize(&self) -> StoreResult<()> {
        let files = [
            (&self.records_path, ""),
            (&self.workout_path, ""),
            (&self.settings_path, "{}"),
        ];
        for (path, contents) in files {
            if path.exists() {
                debug!("Found data file {}", path.display());
                continue;
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
            fs::write(path, contents).map_err(|e| StoreError::io(path, e))?;
            info!("Created new file: {}", path.display());
        }
        Ok(())
    }

    fn open_for_scan(path: &Path) -> StoreResult<Option<BufReader<File>>> {
        match File::open(path) {
            Ok(file) => Ok(Some(BufReader::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                error!("{} not found", path.display());
                Ok(None)
            }
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    /// Walks the record file and returns the first value `pick` produces.
    fn scan_records<T>(&self, mut pick: impl FnMut(&str) -> Option<T>) -> StoreResult<Option<T>> {
        let Some(reader) = RecordStore::open_for_scan(&self.records_path)? else {
            return Ok(None);
        };
        for line in reader.lines() {
            let line = line.map_err(|e| StoreError::io(&self.records_path, e))?;
            if let Some(found) = pick(&line) {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn append_line(path: &Path, line: &str) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| StoreError::io(path, e))?;
        writeln!(file, "{}", line).map_err(|e| StoreError::io(path, e))?;
        debug!("Appended to {}: {}", path.display(), line);
        Ok(())
    }
}

fn check_storable(key: &str, value: &str) -> StoreResult<()> {
    if record::is_storable_value(value) {
        Ok(())
    } else {
        Err(StoreError::InvalidRecord(format!("'{}' contains a field separator or line break", key)))
    }
}

impl StoreTraits for RecordStore {
    fn authenticate(&self, email: &str, password: &str) -> StoreResult<bool> {
        let found = self.scan_records(|line| {
            let fields = record::parse_line(line);
            let matches = record::line_has_email(&fields, email)
                && record::field(&fields, record::KEY_PASSWORD)
                    .map_or(false, |stored| verify_password(password, stored.trim()));
            matches.then_some(())
        })?;
        Ok(found.is_some())
    }

    fn lookup_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        self.scan_records(|line| {
            let fields = record::parse_line(line);
            if record::line_has_email(&fields, email) {
                record::decode_fragment(line)
            } else {
                None
            }
        })
    }

    fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let found = self.scan_records(|line| {
            record::line_has_email(&record::parse_line(line), email).then_some(())
        })?;
        Ok(found.is_some())
    }

    fn measurement_history(&self, email: &str) -> StoreResult<Vec<UserRecord>> {
        let mut history = Vec::new();
        self.scan_records(|line| {
            if let Some(fragment) = record::decode_fragment(line) {
                if fragment.email == email && fragment.weight.is_some() {
                    history.push(fragment);
                }
            }
            None::<()>
        })?;
        Ok(history)
    }

    fn append_registration(&self, name: &str, email: &str, password_hash: &str) -> StoreResult<()> {
        if email.trim().is_empty() {
            return Err(StoreError::InvalidRecord(String::from("registration without an email")));
        }
        check_storable(record::KEY_FULL_NAME, name)?;
        check_storable(record::KEY_EMAIL, email)?;
        if !is_password_hash(password_hash) {
            return Err(StoreError::InvalidRecord(String::from(
                "registration password is not a SHA-256 hex digest",
            )));
        }
        RecordStore::append_line(&self.records_path, &record::format_registration(name, email, password_hash))?;
        info!("Registered {}", email);
        Ok(())
    }

    fn append_goals(&self, email: &str, goal: FitnessGoal, focus_areas: &[FocusArea]) -> StoreResult<()> {
        if focus_areas.is_empty() {
            return Err(StoreError::InvalidRecord(String::from("goals without any focus area")));
        }
        check_storable(record::KEY_EMAIL, email)?;
        RecordStore::append_line(&self.records_path, &record::format_goals(email, goal, focus_areas))?;
        info!("Saved fitness goal '{}' for {}", goal, email);
        Ok(())
    }

    fn append_measurements(&self, email: &str, measurements: &Measurements) -> StoreResult<()> {
        check_storable(record::KEY_EMAIL, email)?;
        RecordStore::append_line(&self.records_path, &record::format_measurements(email, measurements))?;
        info!("Saved measurements for {}", email);
        Ok(())
    }

    fn append_workout(&self, entry: &WorkoutEntry) -> StoreResult<()> {
        RecordStore::append_line(&self.workout_path, &record::format_workout(entry))
    }

    fn read_history(&self) -> StoreResult<Option<String>> {
        match fs::read_to_string(&self.workout_path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("{} not found", self.workout_path.display());
                Ok(None)
            }
            Err(e) => Err(StoreError::io(&self.workout_path, e)),
        }
    }

    fn workouts(&self) -> StoreResult<Vec<WorkoutEntry>> {
        let Some(history) = self.read_history()? else {
            return Ok(Vec::new());
        };
        let mut entries = Vec::new();
        for line in history.lines().filter(|l| !l.trim().is_empty()) {
            match record::parse_workout(line) {
                Some(entry) => entries.push(entry),
                None => warn!("Skipping unreadable workout line: '{}'", line),
            }
        }
        Ok(entries)
    }

    fn load_settings(&self, email: &str) -> StoreResult<Option<UserSettings>> {
        settings::load(&self.settings_path, email)
    }

    fn create_settings(&self, email: &str, defaults: &UserSettings) -> StoreResult<()> {
        settings::upsert(&self.settings_path, email, defaults)
    }

    fn save_settings(&self, email: &str, settings: &UserSettings) -> StoreResult<()> {
        settings::upsert(&self.settings_path, email, settings)
    }
}

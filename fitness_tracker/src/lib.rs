use chrono::Local;
use log::{debug, error, info, warn};

use fitness_store::{
    hash_password, FitnessGoal, FocusArea, Gender, StoreTraits, Theme, UserRecord, UserSettings,
    WorkoutEntry, WorkoutType,
};

pub mod assets;
pub mod bmi;
pub mod dashboard;
mod error;
pub mod navigation;
pub mod tracker_config;
pub mod validation;

pub use crate::error::{TrackerError, ValidationError};
pub use crate::navigation::{DashboardTab, NavEvent, Navigator, Screen, ScreenHost};
pub use crate::tracker_config::TrackerConfig;
pub use crate::validation::{RegistrationForm, StrengthLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Warning,
    Error,
}

/// A message box the front end shows after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

impl Dialog {
    pub fn info(title: &str, message: impl Into<String>) -> Dialog {
        Dialog { kind: DialogKind::Info, title: String::from(title), message: message.into() }
    }

    pub fn warning(title: &str, message: impl Into<String>) -> Dialog {
        Dialog { kind: DialogKind::Warning, title: String::from(title), message: message.into() }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Dialog {
        Dialog { kind: DialogKind::Error, title: String::from(title), message: message.into() }
    }
}

/// Drives the tracker: every user action on every screen is one method here.
///
/// Actions validate their input, write through the `StoreTraits` store and
/// then move the `Navigator` along. Anything the user has to be told comes
/// back as a `Dialog`; failures never escape as panics or errors, so the
/// front end keeps running whatever happens.
///
/// Actions that don't belong to the current screen are ignored.
pub struct TrackerApp<S: StoreTraits, H: ScreenHost> {
    config: TrackerConfig,
    store: S,
    host: H,
    navigator: Navigator,
    settings: UserSettings,
}

impl<S: StoreTraits, H: ScreenHost> TrackerApp<S, H> {
    pub fn new(config: TrackerConfig, store: S, host: H) -> TrackerApp<S, H> {
        let navigator = Navigator::new(config.splash.steps);
        let settings = config.defaults.to_settings();
        TrackerApp { config, store, host, navigator, settings }
    }

    /// Mounts the first screen.
    pub fn start(&mut self) {
        self.navigator.start(&mut self.host);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn screen(&self) -> &Screen {
        self.navigator.screen()
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.navigator.user()
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn splash_progress(&self) -> Option<f32> {
        self.navigator.splash_progress()
    }

    fn dispatch(&mut self, event: NavEvent) -> bool {
        self.navigator.dispatch(event, &mut self.host)
    }

    fn current_email(&self) -> Option<String> {
        self.navigator.user().map(|u| u.email.clone())
    }

    /// Dashboard panes only act while the dashboard is up and no logout prompt is showing.
    fn on_dashboard(&self, action: &str) -> bool {
        let open = matches!(self.screen(), Screen::Dashboard { confirming_logout: false, .. });
        if !open {
            warn!("{} attempted from screen {}", action, self.screen());
        }
        open
    }

    /// Advances the splash animation one step. Returns true while the splash is still up.
    pub fn tick(&mut self) -> bool {
        self.dispatch(NavEvent::Tick);
        matches!(self.screen(), Screen::Splash { .. })
    }

    pub fn open_register(&mut self) {
        self.dispatch(NavEvent::OpenRegister);
    }

    pub fn open_login(&mut self) {
        self.dispatch(NavEvent::OpenLogin);
    }

    /// Unknown email and wrong password get the same message.
    pub fn login(&mut self, email: &str, password: &str) -> Option<Dialog> {
        if *self.screen() != Screen::Login {
            warn!("Login attempted from screen {}", self.screen());
            return None;
        }
        match self.try_login(email, password) {
            Ok(dialog) => dialog,
            Err(e) => {
                error!("Error handling login: {}", e);
                Some(Dialog::error("Error", "An error occurred during login"))
            }
        }
    }

    fn try_login(&mut self, email: &str, password: &str) -> Result<Option<Dialog>, TrackerError> {
        if !self.store.authenticate(email, password)? {
            info!("Failed login for '{}'", email);
            return Ok(Some(Dialog::error("Login Failed", "Invalid email or password")));
        }

        // the session starts from the first fragment on file, nothing else
        let name = self.store.lookup_by_email(email)?.and_then(|record| record.name);
        let user = UserRecord {
            name,
            email: String::from(email),
            ..Default::default()
        };

        self.settings = self.load_settings_or_default(email);
        info!("Logged in {}, theme {}", email, self.settings.theme);

        self.navigator.set_user(user);
        self.dispatch(NavEvent::Authenticated);
        Ok(None)
    }

    fn load_settings_or_default(&self, email: &str) -> UserSettings {
        match self.store.load_settings(email) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                debug!("No saved settings for {}", email);
                self.config.defaults.to_settings()
            }
            Err(e) => {
                error!("Error loading user settings: {}", e);
                self.config.defaults.to_settings()
            }
        }
    }

    /// Always answers, whether or not the email is known; no reset mail is sent.
    pub fn forgot_password(&mut self, email: &str) -> Option<Dialog> {
        if *self.screen() != Screen::Login {
            warn!("Password reset attempted from screen {}", self.screen());
            return None;
        }
        let email = email.trim();
        if email.is_empty() {
            return Some(Dialog::error("Error", ValidationError::MissingEmail.to_string()));
        }
        let dialog = match self.store.email_exists(email) {
            Ok(true) => Dialog::info(
                "Password Reset",
                "Password reset instructions have been sent to your email.",
            ),
            Ok(false) => Dialog::error("Error", "Email not found in our records."),
            Err(e) => {
                error!("Error looking up {}: {}", email, e);
                Dialog::error("Error", "An error occurred")
            }
        };
        Some(dialog)
    }

    pub fn register(&mut self, form: &RegistrationForm) -> Option<Dialog> {
        if *self.screen() != Screen::Register {
            warn!("Registration attempted from screen {}", self.screen());
            return None;
        }
        match self.try_register(form) {
            Ok(dialog) => dialog,
            Err(TrackerError::Validation(e)) => Some(Dialog::error("Error", e.to_string())),
            Err(e) => {
                error!("Error handling registration: {}", e);
                Some(Dialog::error("Error", "An error occurred during registration"))
            }
        }
    }

    fn try_register(&mut self, form: &RegistrationForm) -> Result<Option<Dialog>, TrackerError> {
        validation::validate_registration(form)?;

        match self.store.email_exists(&form.email) {
            Ok(true) => warn!("{} is already registered, appending another registration", form.email),
            Ok(false) => {}
            Err(e) => warn!("Unable to check for existing registration: {}", e),
        }

        self.store
            .append_registration(&form.full_name, &form.email, &hash_password(&form.password))?;

        self.settings = self.config.defaults.to_settings();
        if let Err(e) = self.store.create_settings(&form.email, &self.settings) {
            error!("Error creating user settings: {}", e);
        }

        self.navigator.set_user(UserRecord::new(&form.full_name, &form.email));
        self.dispatch(NavEvent::Registered);
        Ok(None)
    }

    /// "Get started" on the welcome screen.
    pub fn proceed(&mut self) {
        self.dispatch(NavEvent::Proceed);
    }

    pub fn choose_goal(&mut self, goal: FitnessGoal) {
        self.dispatch(NavEvent::ChooseGoal(goal));
    }

    pub fn toggle_focus_area(&mut self, area: FocusArea) {
        self.dispatch(NavEvent::ToggleFocus(area));
    }

    pub fn back_to_goals(&mut self) {
        self.dispatch(NavEvent::BackToGoals);
    }

    pub fn back(&mut self) {
        self.dispatch(NavEvent::Back);
    }

    /// Persists the chosen goal and focus areas, then moves on to measurements.
    pub fn save_goals(&mut self) -> Option<Dialog> {
        let Screen::SetGoals { goal: Some(goal), focus_areas } = self.screen().clone() else {
            warn!("No fitness goal chosen yet");
            return None;
        };
        if let Err(e) = validation::require_focus_areas(&focus_areas) {
            return Some(Dialog::warning("Warning", e.to_string()));
        }
        let Some(email) = self.current_email() else {
            error!("Saving goals without a logged in user");
            return Some(Dialog::error("Error", "An error occurred while saving your goals"));
        };

        if let Err(e) = self.store.append_goals(&email, goal, &focus_areas) {
            error!("Error saving goals: {}", e);
            return Some(Dialog::error("Error", "An error occurred while saving your goals"));
        }
        if let Some(user) = self.navigator.user_mut() {
            user.fitness_goal = Some(goal);
            user.focus_areas = focus_areas;
        }
        self.dispatch(NavEvent::GoalsSaved);
        None
    }

    /// Validates the form, saves the measurements and reports the BMI.
    pub fn submit_measurements(&mut self, weight: &str, height: &str, age: &str, gender: Gender) -> Option<Dialog> {
        if *self.screen() != Screen::Measurements {
            warn!("Measurements submitted from screen {}", self.screen());
            return None;
        }
        let input = match validation::parse_body_input(weight, height, age) {
            Ok(input) => input,
            Err(e) => return Some(Dialog::error("Input Error", format!("Invalid input: {}", e))),
        };
        let measurements = bmi::measure(&input, gender);

        let Some(email) = self.current_email() else {
            error!("Saving measurements without a logged in user");
            return Some(Dialog::error("Error", "An error occurred while saving your measurements"));
        };
        if let Err(e) = self.store.append_measurements(&email, &measurements) {
            error!("Error saving measurements: {}", e);
            return Some(Dialog::error("Error", "An error occurred while saving your measurements"));
        }

        if let Some(user) = self.navigator.user_mut() {
            user.weight = Some(measurements.weight);
            user.height = Some(measurements.height);
            user.bmi = Some(measurements.bmi);
            user.bmi_category = Some(measurements.category);
            user.gender = Some(measurements.gender);
            user.age = Some(measurements.age);
        }
        let dialog = Dialog::info("BMI Result", bmi::result_message(&measurements));
        self.dispatch(NavEvent::MeasurementsSaved);
        Some(dialog)
    }

    pub fn select_tab(&mut self, tab: DashboardTab) {
        self.dispatch(NavEvent::SelectTab(tab));
    }

    pub fn overview(&self) -> Vec<dashboard::Stat> {
        match self.user() {
            Some(user) => dashboard::overview(user),
            None => dashboard::overview(&UserRecord::default()),
        }
    }

    /// Today, in the configured workout date format.
    pub fn default_workout_date(&self) -> String {
        Local::now().format(&self.config.workouts.date_format).to_string()
    }

    pub fn save_workout(&mut self, date: &str, workout_type: WorkoutType, duration: &str) -> Option<Dialog> {
        if !self.on_dashboard("Saving a workout") {
            return None;
        }
        let duration_minutes = match validation::parse_duration(duration) {
            Ok(minutes) => minutes,
            Err(e) => return Some(Dialog::error("Error", e.to_string())),
        };
        if let Err(e) = validation::parse_workout_date(date, &self.config.workouts.date_format) {
            return Some(Dialog::error("Error", e.to_string()));
        }

        let entry = WorkoutEntry {
            date: String::from(date.trim()),
            workout_type,
            duration_minutes,
        };
        let dialog = match self.store.append_workout(&entry) {
            Ok(()) => {
                info!("Logged {} minutes of {}", duration_minutes, workout_type);
                Dialog::info("Success", "Workout saved successfully!")
            }
            Err(e) => {
                error!("Error saving workout: {}", e);
                Dialog::error("Error", "An error occurred while saving your workout")
            }
        };
        Some(dialog)
    }

    pub fn history_text(&self) -> String {
        match self.store.read_history() {
            Ok(raw) => dashboard::history_text(raw),
            Err(e) => {
                error!("Error reading workout history: {}", e);
                dashboard::history_text(None)
            }
        }
    }

    pub fn progress(&self) -> dashboard::Progress {
        let measurements = match self.current_email() {
            Some(email) => self.store.measurement_history(&email).unwrap_or_else(|e| {
                error!("Error reading measurements: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        let workouts = self.store.workouts().unwrap_or_else(|e| {
            error!("Error reading workouts: {}", e);
            Vec::new()
        });
        dashboard::progress(&measurements, &workouts)
    }

    fn persist_settings(&mut self) -> Option<Dialog> {
        let Some(email) = self.current_email() else {
            warn!("Settings changed without a logged in user, not saving");
            return None;
        };
        match self.store.save_settings(&email, &self.settings) {
            Ok(()) => None,
            Err(e) => {
                error!("Error saving user settings: {}", e);
                Some(Dialog::error("Error", "Unable to save your settings"))
            }
        }
    }

    pub fn change_theme(&mut self, theme: Theme) -> Option<Dialog> {
        if !self.on_dashboard("Changing the theme") {
            return None;
        }
        self.settings.theme = theme;
        self.persist_settings()
    }

    pub fn toggle_notifications(&mut self) -> Option<Dialog> {
        if !self.on_dashboard("Toggling notifications") {
            return None;
        }
        self.settings.notifications = !self.settings.notifications;
        self.persist_settings()
    }

    pub fn toggle_reminders(&mut self) -> Option<Dialog> {
        if !self.on_dashboard("Toggling reminders") {
            return None;
        }
        self.settings.reminders = !self.settings.reminders;
        self.persist_settings()
    }

    pub fn request_logout(&mut self) {
        self.dispatch(NavEvent::RequestLogout);
    }

    pub fn cancel_logout(&mut self) {
        self.dispatch(NavEvent::CancelLogout);
    }

    /// Saves the session's settings and returns to Login. A failed save keeps
    /// the user on the dashboard.
    pub fn confirm_logout(&mut self) -> Option<Dialog> {
        if !matches!(self.screen(), Screen::Dashboard { confirming_logout: true, .. }) {
            warn!("Logout confirmed without a pending request");
            return None;
        }
        if let Some(email) = self.current_email() {
            if let Err(e) = self.store.save_settings(&email, &self.settings) {
                error!("Error handling logout: {}", e);
                self.dispatch(NavEvent::CancelLogout);
                return Some(Dialog::error("Error", "An error occurred during logout"));
            }
        }
        self.dispatch(NavEvent::ConfirmLogout);
        self.settings = self.config.defaults.to_settings();
        None
    }
}

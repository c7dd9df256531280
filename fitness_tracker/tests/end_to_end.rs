use std::fs;

use fitness_store::{
    is_password_hash, FitnessGoal, FocusArea, Gender, RecordStore, StoreTraits, Theme, UserRecord, UserSettings,
    WorkoutType,
};
use fitness_tracker::navigation::{DashboardTab, Screen, ScreenHost};
use fitness_tracker::{Dialog, RegistrationForm, TrackerApp, TrackerConfig};

/// Keeps only the name of every screen it is asked to mount.
#[derive(Default)]
struct MountLog {
    mounted: Vec<String>,
}

impl ScreenHost for MountLog {
    fn mount(&mut self, screen: &Screen, _user: Option<&UserRecord>) {
        self.mounted.push(screen.name().to_string());
    }

    fn unmount(&mut self, _screen: &Screen) {}

    fn refresh(&mut self, _screen: &Screen, _user: Option<&UserRecord>) {}
}

fn tracker(store: RecordStore, splash_steps: u32) -> TrackerApp<RecordStore, MountLog> {
    let mut config = TrackerConfig::default();
    config.splash.steps = splash_steps;
    config.workouts.date_format = String::from("%Y-%m-%d");
    config.defaults.theme = String::from("light");
    config.defaults.notifications = true;
    config.defaults.reminders = true;
    let mut app = TrackerApp::new(config, store, MountLog::default());
    app.start();
    app
}

#[test]
fn register_onboard_logout_and_login_again() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::in_dir(dir.path());
    store.initialize().unwrap();

    let mut app = tracker(store.clone(), 3);
    while app.tick() {}
    assert_eq!(app.screen(), &Screen::Login);

    app.open_register();
    let form = RegistrationForm {
        full_name: String::from("Jane Doe"),
        email: String::from("jane@x.com"),
        password: String::from("Abcdef12"),
        confirm_password: String::from("Abcdef12"),
        terms_accepted: true,
    };
    assert_eq!(app.register(&form), None);
    assert_eq!(app.screen(), &Screen::Welcome);

    app.proceed();
    app.choose_goal(FitnessGoal::WeightLoss);
    app.toggle_focus_area(FocusArea::Legs);
    app.toggle_focus_area(FocusArea::Abs);
    assert_eq!(app.save_goals(), None);

    let result = app.submit_measurements("70", "1.75", "30", Gender::Male);
    assert_eq!(result, Some(Dialog::info("BMI Result", "Your BMI is 22.86 (Normal weight)")));
    assert!(matches!(app.screen(), Screen::Dashboard { tab: DashboardTab::Overview, .. }));

    let overview = app.overview();
    assert_eq!(overview[0].value, "70.0 kg");
    assert_eq!(overview[1].value, "22.9");
    assert_eq!(overview[2].value, "Weight Loss");
    assert_eq!(overview[3].value, "Legs, Abs");

    app.select_tab(DashboardTab::Workouts);
    assert_eq!(
        app.save_workout("2026-10-17", WorkoutType::Strength, "40"),
        Some(Dialog::info("Success", "Workout saved successfully!"))
    );
    assert_eq!(app.history_text(), "2026-10-17: Strength - 40 minutes\n");
    assert_eq!(app.progress().weights, vec![70.0]);

    assert_eq!(app.change_theme(Theme::Dark), None);

    app.request_logout();
    app.cancel_logout();
    assert!(matches!(app.screen(), Screen::Dashboard { confirming_logout: false, .. }));
    app.request_logout();
    assert_eq!(app.confirm_logout(), None);
    assert_eq!(app.screen(), &Screen::Login);
    assert!(app.user().is_none());

    let records = fs::read_to_string(store.records_path()).unwrap();
    let lines: Vec<&str> = records.lines().collect();
    assert_eq!(lines.len(), 3);
    let hash = lines[0].strip_prefix("Full Name: Jane Doe, Email: jane@x.com, Password: ").unwrap();
    assert!(is_password_hash(hash));
    assert!(!records.contains("Abcdef12"));
    assert_eq!(lines[1], "Email: jane@x.com, Fitness Goal: Weight Loss, Focus Areas: Legs, Abs");
    assert_eq!(
        lines[2],
        "Email: jane@x.com, Weight: 70.0 kg, Height: 1.75 m, BMI: 22.86, Category: Normal weight, Gender: Male, Age: 30 |"
    );

    assert_eq!(
        app.login("jane@x.com", "Abcdef13"),
        Some(Dialog::error("Login Failed", "Invalid email or password"))
    );
    assert_eq!(app.login("jane@x.com", "Abcdef12"), None);
    assert_eq!(app.screen(), &Screen::Welcome);
    assert_eq!(app.user().and_then(|u| u.name.as_deref()), Some("Jane Doe"));
    assert_eq!(app.settings().theme, Theme::Dark);
    assert_eq!(store.load_settings("jane@x.com").unwrap().map(|s| s.theme), Some(Theme::Dark));

    assert_eq!(
        app.host().mounted,
        vec!["Splash", "Login", "Register", "Welcome", "SetGoals", "Measurements", "Dashboard", "Login", "Welcome"]
    );
}

#[test]
fn restart_sees_earlier_registrations() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::in_dir(dir.path());
    store.initialize().unwrap();

    {
        let mut first = tracker(store.clone(), 0);
        first.open_register();
        let form = RegistrationForm {
            full_name: String::from("Bob"),
            email: String::from("bob@x.com"),
            password: String::from("password1"),
            confirm_password: String::from("password1"),
            terms_accepted: true,
        };
        assert_eq!(first.register(&form), None);
    }

    store.initialize().unwrap();
    let mut second = tracker(RecordStore::in_dir(dir.path()), 0);
    assert_eq!(second.login("bob@x.com", "password1"), None);
    assert_eq!(second.settings(), &UserSettings::default());
}

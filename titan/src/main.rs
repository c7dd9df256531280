use anyhow::{anyhow, Context};
use getopts::{Matches, Options};
use log::{error, info, warn, LevelFilter};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use config::{Config, File, FileFormat};
use fitness_store::{FitnessGoal, FocusArea, Gender, RecordStore, Theme, WorkoutType};
use fitness_tracker::dashboard::NO_HISTORY;
use fitness_tracker::navigation::{DashboardTab, Screen};
use fitness_tracker::{Dialog, DialogKind, RegistrationForm, StrengthLevel, TrackerApp, TrackerConfig};

mod terminal;

use terminal::TerminalHost;

type App = TrackerApp<RecordStore, TerminalHost>;
type Input = Lines<Box<dyn AsyncBufRead + Unpin + Send>>;

const DEFAULT_CONFIG: &str = "config/tracker_config.json";
const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

fn cli_options() -> Options {
    let mut opts = Options::new();
    opts.optopt("c", "config", "tracker configuration file", "FILE");
    opts.optopt("d", "data-dir", "directory holding the record files", "DIR");
    opts.optopt("l", "log-config", "log4rs configuration file", "FILE");
    opts.optflag("", "skip-splash", "start on the login screen");
    opts.optflag("h", "help", "print this help menu");
    opts
}

/// Falls back to warnings on the console when the log4rs file can't be used.
fn init_logging(path: &str) -> anyhow::Result<()> {
    if let Err(e) = log4rs::init_file(path, Default::default()) {
        eprintln!("Unable to load log configuration '{}' ({}), logging to console", path, e);

        use log4rs::append::console::ConsoleAppender;
        use log4rs::config::{Appender, Root};
        use log4rs::encode::pattern::PatternEncoder;

        let stderr = ConsoleAppender::builder()
            .target(log4rs::append::console::Target::Stderr)
            .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {l} {t} - {m}{n}")))
            .build();
        let config = log4rs::Config::builder()
            .appender(Appender::builder().build("stderr", Box::new(stderr)))
            .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
        log4rs::init_config(config)?;
    }
    Ok(())
}

fn load_config(options: &Matches) -> anyhow::Result<TrackerConfig> {
    let path = options.opt_str("c").unwrap_or_else(|| String::from(DEFAULT_CONFIG));
    let config = Config::builder()
        .add_source(File::new(&path, FileFormat::Json))
        .build()
        .with_context(|| format!("reading {}", path))?;
    Ok(TrackerConfig::load(config, Some(options))?)
}

async fn ask(input: &mut Input, prompt: &str) -> anyhow::Result<String> {
    print!("{}: ", prompt);
    std::io::stdout().flush()?;
    match input.next_line().await? {
        Some(line) => Ok(line.trim().to_string()),
        None => Err(anyhow!("input closed")),
    }
}

fn show(dialog: Option<Dialog>) {
    if let Some(dialog) = dialog {
        let tag = match dialog.kind {
            DialogKind::Info => "info",
            DialogKind::Warning => "warning",
            DialogKind::Error => "error",
        };
        println!("[{}] {}: {}", tag, dialog.title, dialog.message);
    }
}

/// 1-based menu pick, or the item's own label.
fn pick<T: Copy + std::str::FromStr>(items: &[T], raw: &str) -> Option<T> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => items.get(n - 1).copied(),
        Ok(_) => None,
        Err(_) => raw.parse::<T>().ok(),
    }
}

async fn run_splash(app: &mut App, step: Duration, hold: Duration) {
    while let Some(progress) = app.splash_progress() {
        let delay = if progress >= 1.0 { hold } else { step };
        tokio::time::sleep(delay).await;
        app.tick();
    }
}

fn show_tab(app: &App) {
    let Screen::Dashboard { tab, confirming_logout: false } = app.screen() else {
        return;
    };
    match tab {
        DashboardTab::Overview => {
            for stat in app.overview() {
                println!("  {:<14} {}", stat.label, stat.value);
            }
        }
        DashboardTab::Workouts => {
            println!("  Workout types: {}", join(WorkoutType::ALL));
            println!("  Use 'log' to record a workout (date defaults to {})", app.default_workout_date());
        }
        DashboardTab::Progress => {
            let progress = app.progress();
            if progress.weights.is_empty() && progress.minutes_by_type.is_empty() {
                println!("  Nothing recorded yet");
            }
            for (i, weight) in progress.weights.iter().enumerate() {
                println!("  Measurement {}: {:?} kg", i + 1, weight);
            }
            if let Some(change) = progress.weight_change() {
                println!("  Weight change: {:+.1} kg", change);
            }
            for (workout_type, minutes) in &progress.minutes_by_type {
                println!("  {:<12} {} minutes", workout_type.as_str(), minutes);
            }
        }
        DashboardTab::History => {
            let history = app.history_text();
            if history == NO_HISTORY {
                println!("  {}", history);
            } else {
                print!("{}", history);
            }
        }
        DashboardTab::Settings => {
            let settings = app.settings();
            println!("  Theme:         {} (choices: {})", settings.theme, join(Theme::ALL));
            println!("  Notifications: {}", on_off(settings.notifications));
            println!("  Reminders:     {}", on_off(settings.reminders));
        }
    }
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items.iter().map(|i| i.to_string()).collect::<Vec<String>>().join(", ")
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

async fn register(app: &mut App, input: &mut Input) -> anyhow::Result<()> {
    let full_name = ask(input, "Full name").await?;
    let email = ask(input, "Email").await?;
    let password = ask(input, "Password").await?;
    let level = StrengthLevel::of(&password);
    println!("Password strength: {:?} ({})", level, level.color());
    let confirm_password = ask(input, "Confirm password").await?;
    let terms = ask(input, "Accept terms and conditions? (yes/no)").await?;

    let form = RegistrationForm {
        full_name,
        email,
        password,
        confirm_password,
        terms_accepted: terms.eq_ignore_ascii_case("yes") || terms.eq_ignore_ascii_case("y"),
    };
    show(app.register(&form));
    Ok(())
}

async fn measurements(app: &mut App, input: &mut Input) -> anyhow::Result<()> {
    let weight = ask(input, "Weight (kg)").await?;
    let height = ask(input, "Height (m)").await?;
    let age = ask(input, "Age").await?;
    let raw_gender = ask(input, "Gender (Male/Female) [Male]").await?;
    let gender = if raw_gender.is_empty() {
        Gender::Male
    } else {
        match pick(Gender::ALL, &raw_gender) {
            Some(gender) => gender,
            None => {
                show(Some(Dialog::error("Input Error", format!("Unknown gender '{}'", raw_gender))));
                return Ok(());
            }
        }
    };
    show(app.submit_measurements(&weight, &height, &age, gender));
    show_tab(app);
    Ok(())
}

async fn log_workout(app: &mut App, input: &mut Input) -> anyhow::Result<()> {
    let today = app.default_workout_date();
    let date = ask(input, &format!("Date [{}]", today)).await?;
    let date = if date.is_empty() { today } else { date };

    println!("{}", join(WorkoutType::ALL));
    let raw_type = ask(input, "Workout type").await?;
    let Some(workout_type) = pick(WorkoutType::ALL, &raw_type) else {
        show(Some(Dialog::error("Error", format!("Unknown workout type '{}'", raw_type))));
        return Ok(());
    };
    let duration = ask(input, "Duration (minutes)").await?;
    show(app.save_workout(&date, workout_type, &duration));
    Ok(())
}

/// Runs one command line against the current screen. Returns false to quit.
async fn handle(app: &mut App, input: &mut Input, line: &str) -> anyhow::Result<bool> {
    let (command, arg) = match line.split_once(' ') {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    if command == "quit" || command == "exit" {
        return Ok(false);
    }

    match (app.screen().clone(), command) {
        (Screen::Login, "login") => {
            let email = ask(input, "Email").await?;
            let password = ask(input, "Password").await?;
            show(app.login(&email, &password));
        }
        (Screen::Login, "register") => app.open_register(),
        (Screen::Login, "forgot") => {
            let email = ask(input, "Email").await?;
            show(app.forgot_password(&email));
        }
        (Screen::Register, "submit") => register(app, input).await?,
        (Screen::Register, "login") => app.open_login(),
        (Screen::Welcome, "start") => app.proceed(),
        (Screen::SetGoals { goal: None, .. }, "goal") => match pick(FitnessGoal::ALL, arg) {
            Some(goal) => app.choose_goal(goal),
            None => println!("Pick a goal between 1 and {}", FitnessGoal::ALL.len()),
        },
        (Screen::SetGoals { goal: Some(_), .. }, "focus") => match pick(FocusArea::ALL, arg) {
            Some(area) => app.toggle_focus_area(area),
            None => println!("Pick a focus area between 1 and {}", FocusArea::ALL.len()),
        },
        (Screen::SetGoals { goal: Some(_), .. }, "save") => show(app.save_goals()),
        (Screen::SetGoals { goal: Some(_), .. }, "back") => app.back_to_goals(),
        (Screen::SetGoals { goal: None, .. }, "back") => app.back(),
        (Screen::Measurements, "submit") => measurements(app, input).await?,
        (Screen::Dashboard { confirming_logout: true, .. }, "yes") => show(app.confirm_logout()),
        (Screen::Dashboard { confirming_logout: true, .. }, "no") => {
            app.cancel_logout();
            show_tab(app);
        }
        (Screen::Dashboard { confirming_logout: false, .. }, _) => match command {
            "overview" => app.select_tab(DashboardTab::Overview),
            "workouts" => app.select_tab(DashboardTab::Workouts),
            "progress" => app.select_tab(DashboardTab::Progress),
            "history" => app.select_tab(DashboardTab::History),
            "settings" => app.select_tab(DashboardTab::Settings),
            "log" => log_workout(app, input).await?,
            "theme" => match arg.parse::<Theme>() {
                Ok(theme) => show(app.change_theme(theme)),
                Err(e) => println!("{}", e),
            },
            "notifications" => show(app.toggle_notifications()),
            "reminders" => show(app.toggle_reminders()),
            "logout" => {
                app.request_logout();
                return Ok(true);
            }
            _ => {
                println!("{}", TerminalHost::help(app.screen()));
                return Ok(true);
            }
        },
        (screen, _) => println!("{}", TerminalHost::help(&screen)),
    }

    show_tab(app);
    Ok(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| String::from("titan"));
    let opts = cli_options();
    let matches = match opts.parse(args.iter().skip(1)) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            print!("{}", opts.usage(&format!("Usage: {} [options]", program)));
            std::process::exit(2);
        }
    };
    if matches.opt_present("h") {
        print!("{}", opts.usage(&format!("Usage: {} [options]", program)));
        return Ok(());
    }

    let log_config = matches.opt_str("l").unwrap_or_else(|| String::from(DEFAULT_LOG_CONFIG));
    init_logging(&log_config)?;

    let tracker_config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to load configuration: {:#}", e);
            return Err(e);
        }
    };

    let store = tracker_config.files.record_store();
    store.initialize()?;
    info!("Records in {}", store.records_path().display());

    let show_splash = tracker_config.show_splash();
    let step = Duration::from_millis(tracker_config.splash.step_millis);
    let hold = Duration::from_millis(tracker_config.splash.hold_millis);
    let host = TerminalHost::new(&tracker_config);
    let mut app = TrackerApp::new(tracker_config, store, host);
    app.start();
    if show_splash {
        run_splash(&mut app, step, hold).await;
    }

    let stdin: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(BufReader::new(tokio::io::stdin()));
    let mut input = stdin.lines();
    command_loop(&mut app, &mut input).await;
    info!("Goodbye");
    Ok(())
}

/// Reads commands until `quit` or until input runs out, even halfway
/// through a multi-prompt command.
async fn command_loop(app: &mut App, input: &mut Input) {
    loop {
        let line = match ask(input, ">").await {
            Ok(line) => line,
            Err(e) => {
                warn!("Stopping: {}", e);
                break;
            }
        };
        if line.is_empty() {
            continue;
        }
        match handle(app, input, &line).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                warn!("Stopping: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_parse() {
        let matches = cli_options()
            .parse(["-c", "my.json", "-d", "/tmp/data", "--skip-splash"])
            .unwrap();
        assert_eq!(matches.opt_str("c").as_deref(), Some("my.json"));
        assert_eq!(matches.opt_str("d").as_deref(), Some("/tmp/data"));
        assert!(matches.opt_present("skip-splash"));
        assert!(!matches.opt_present("h"));
    }

    fn scripted(script: &'static str) -> Input {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(BufReader::new(script.as_bytes()));
        reader.lines()
    }

    fn terminal_app(dir: &std::path::Path) -> App {
        let store = RecordStore::in_dir(dir);
        store.initialize().unwrap();
        let config = TrackerConfig::default();
        let host = TerminalHost::new(&config);
        let mut app = TrackerApp::new(config, store, host);
        app.start();
        app
    }

    #[tokio::test]
    async fn input_ending_mid_form_stops_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = terminal_app(dir.path());
        app.tick();
        assert_eq!(app.screen(), &Screen::Login);

        let mut input = scripted("register\nsubmit\nJane Doe\njane@x.com\n");
        command_loop(&mut app, &mut input).await;

        assert_eq!(app.screen(), &Screen::Register);
        let records = std::fs::read_to_string(app.store().records_path()).unwrap();
        assert_eq!(records, "");
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = terminal_app(dir.path());
        app.tick();
        let mut input = scripted("\nregister\nquit\nlogin\n");
        command_loop(&mut app, &mut input).await;
        assert_eq!(app.screen(), &Screen::Register);
    }

    #[test]
    fn picks_by_number_or_label() {
        assert_eq!(pick(FocusArea::ALL, "1"), Some(FocusArea::ALL[0]));
        assert_eq!(pick(WorkoutType::ALL, "HIIT"), Some(WorkoutType::Hiit));
        assert_eq!(pick(WorkoutType::ALL, "0"), None);
        assert_eq!(pick(WorkoutType::ALL, "99"), None);
        assert_eq!(pick(Gender::ALL, "Female"), Some(Gender::Female));
    }
}

//! Screen flow of the tracker.
//!
//! `Splash -> Login <-> Register -> Welcome -> SetGoals -> Measurements -> Dashboard -> Login`
//!
//! `step` is the pure transition function. `Navigator` applies its result:
//! it owns the current screen plus the user record accumulated along the
//! way, and tells a `ScreenHost` what to unmount, mount or refresh.

use log::{debug, info};
use std::fmt;

use fitness_store::{FitnessGoal, FocusArea, UserRecord};

pub const DEFAULT_SPLASH_STEPS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    Overview,
    Workouts,
    Progress,
    History,
    Settings,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 5] = [
        DashboardTab::Overview,
        DashboardTab::Workouts,
        DashboardTab::Progress,
        DashboardTab::History,
        DashboardTab::Settings,
    ];

    /// Sidebar label.
    pub fn label(&self) -> &'static str {
        match self {
            DashboardTab::Overview => "Overview",
            DashboardTab::Workouts => "Workouts",
            DashboardTab::Progress => "Progress",
            DashboardTab::History => "History",
            DashboardTab::Settings => "Settings",
        }
    }

    /// Heading of the content pane.
    pub fn title(&self) -> &'static str {
        match self {
            DashboardTab::Overview => "Dashboard Overview",
            DashboardTab::Workouts => "Workout Planner",
            DashboardTab::Progress => "Progress Tracking",
            DashboardTab::History => "Workout History",
            DashboardTab::Settings => "Settings",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Splash { step: u32 },
    Login,
    Register,
    Welcome,
    /// `goal` is `None` while the goal menu is showing.
    SetGoals {
        goal: Option<FitnessGoal>,
        focus_areas: Vec<FocusArea>,
    },
    Measurements,
    Dashboard {
        tab: DashboardTab,
        confirming_logout: bool,
    },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Splash { .. } => "Splash",
            Screen::Login => "Login",
            Screen::Register => "Register",
            Screen::Welcome => "Welcome",
            Screen::SetGoals { .. } => "SetGoals",
            Screen::Measurements => "Measurements",
            Screen::Dashboard { .. } => "Dashboard",
        }
    }

    fn goal_menu() -> Screen {
        Screen::SetGoals {
            goal: None,
            focus_areas: Vec::new(),
        }
    }

    fn dashboard() -> Screen {
        Screen::Dashboard {
            tab: DashboardTab::Overview,
            confirming_logout: false,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// User actions (and the splash timer) that can move the flow along.
#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    Tick,
    OpenRegister,
    OpenLogin,
    Authenticated,
    Registered,
    Proceed,
    ChooseGoal(FitnessGoal),
    ToggleFocus(FocusArea),
    BackToGoals,
    Back,
    GoalsSaved,
    MeasurementsSaved,
    SelectTab(DashboardTab),
    RequestLogout,
    ConfirmLogout,
    CancelLogout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Event means nothing on this screen.
    Stay,
    /// Same screen, new local state.
    Update(Screen),
    /// Leave this screen for another one.
    Enter(Screen),
}

fn toggled(focus_areas: &[FocusArea], area: FocusArea) -> Vec<FocusArea> {
    let mut updated = focus_areas.to_vec();
    match updated.iter().position(|a| *a == area) {
        Some(index) => {
            updated.remove(index);
        }
        None => updated.push(area),
    }
    updated
}

/// Pure transition function. `splash_steps` is how many ticks the splash
/// progress bar takes before the next tick leaves it.
pub fn step(screen: &Screen, event: &NavEvent, splash_steps: u32) -> Step {
    match (screen, event) {
        (Screen::Splash { step }, NavEvent::Tick) => {
            if *step < splash_steps {
                Step::Update(Screen::Splash { step: step + 1 })
            } else {
                Step::Enter(Screen::Login)
            }
        }
        (Screen::Login, NavEvent::OpenRegister) => Step::Enter(Screen::Register),
        (Screen::Login, NavEvent::Authenticated) => Step::Enter(Screen::Welcome),
        (Screen::Register, NavEvent::OpenLogin) => Step::Enter(Screen::Login),
        (Screen::Register, NavEvent::Registered) => Step::Enter(Screen::Welcome),
        (Screen::Welcome, NavEvent::Proceed) => Step::Enter(Screen::goal_menu()),

        (Screen::SetGoals { goal: None, .. }, NavEvent::ChooseGoal(goal)) => Step::Update(Screen::SetGoals {
            goal: Some(*goal),
            focus_areas: Vec::new(),
        }),
        // placeholder, the goal menu has nowhere to go back to
        (Screen::SetGoals { goal: None, .. }, NavEvent::Back) => Step::Stay,
        (Screen::SetGoals { goal: Some(goal), focus_areas }, NavEvent::ToggleFocus(area)) => {
            Step::Update(Screen::SetGoals {
                goal: Some(*goal),
                focus_areas: toggled(focus_areas, *area),
            })
        }
        (Screen::SetGoals { goal: Some(_), .. }, NavEvent::BackToGoals) => Step::Update(Screen::goal_menu()),
        (Screen::SetGoals { goal: Some(_), focus_areas }, NavEvent::GoalsSaved) => {
            if focus_areas.is_empty() {
                Step::Stay
            } else {
                Step::Enter(Screen::Measurements)
            }
        }

        (Screen::Measurements, NavEvent::MeasurementsSaved) => Step::Enter(Screen::dashboard()),

        (Screen::Dashboard { confirming_logout: false, .. }, NavEvent::SelectTab(tab)) => {
            Step::Update(Screen::Dashboard {
                tab: *tab,
                confirming_logout: false,
            })
        }
        (Screen::Dashboard { tab, confirming_logout: false }, NavEvent::RequestLogout) => {
            Step::Update(Screen::Dashboard {
                tab: *tab,
                confirming_logout: true,
            })
        }
        (Screen::Dashboard { tab, confirming_logout: true }, NavEvent::CancelLogout) => {
            Step::Update(Screen::Dashboard {
                tab: *tab,
                confirming_logout: false,
            })
        }
        (Screen::Dashboard { confirming_logout: true, .. }, NavEvent::ConfirmLogout) => Step::Enter(Screen::Login),

        _ => Step::Stay,
    }
}

/// Whatever actually draws screens. Exactly one screen is mounted at a time.
pub trait ScreenHost {
    fn mount(&mut self, screen: &Screen, user: Option<&UserRecord>);
    fn unmount(&mut self, screen: &Screen);
    /// Local state of the mounted screen changed (progress, selection, tab).
    fn refresh(&mut self, screen: &Screen, user: Option<&UserRecord>);
}

pub struct Navigator {
    screen: Screen,
    user: Option<UserRecord>,
    splash_steps: u32,
    mounted: bool,
}

impl Navigator {
    /// Starts on the splash screen, or straight on Login when `splash_steps` is 0.
    pub fn new(splash_steps: u32) -> Navigator {
        let screen = if splash_steps == 0 {
            Screen::Login
        } else {
            Screen::Splash { step: 0 }
        };
        Navigator {
            screen,
            user: None,
            splash_steps,
            mounted: false,
        }
    }

    /// Mounts the initial screen. Calling it again is a no-op.
    pub fn start<H: ScreenHost>(&mut self, host: &mut H) {
        if self.mounted {
            return;
        }
        info!("Starting on screen {}", self.screen);
        host.mount(&self.screen, self.user.as_ref());
        self.mounted = true;
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    pub fn user_mut(&mut self) -> Option<&mut UserRecord> {
        self.user.as_mut()
    }

    pub fn set_user(&mut self, user: UserRecord) {
        self.user = Some(user);
    }

    pub fn splash_steps(&self) -> u32 {
        self.splash_steps
    }

    /// Fraction of the splash progress bar filled, if the splash is showing.
    pub fn splash_progress(&self) -> Option<f32> {
        match self.screen {
            Screen::Splash { step } if self.splash_steps > 0 => Some(step as f32 / self.splash_steps as f32),
            _ => None,
        }
    }

    /// Applies `event` and returns whether anything changed.
    pub fn dispatch<H: ScreenHost>(&mut self, event: NavEvent, host: &mut H) -> bool {
        self.start(host);
        match step(&self.screen, &event, self.splash_steps) {
            Step::Stay => {
                debug!("Ignoring {:?} on screen {}", event, self.screen);
                false
            }
            Step::Update(screen) => {
                self.screen = screen;
                host.refresh(&self.screen, self.user.as_ref());
                true
            }
            Step::Enter(screen) => {
                host.unmount(&self.screen);
                info!("Screen {} -> {}", self.screen, screen);
                if screen == Screen::Login {
                    // whoever logs in next starts from a clean record
                    self.user = None;
                }
                self.screen = screen;
                host.mount(&self.screen, self.user.as_ref());
                true
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Host that records what it was asked to do.
    #[derive(Default)]
    pub struct RecordingHost {
        pub calls: Vec<String>,
        pub mounted: Vec<String>,
    }

    impl ScreenHost for RecordingHost {
        fn mount(&mut self, screen: &Screen, _user: Option<&UserRecord>) {
            assert!(self.mounted.is_empty(), "{} mounted over {:?}", screen, self.mounted);
            self.mounted.push(screen.name().to_string());
            self.calls.push(format!("mount {}", screen));
        }

        fn unmount(&mut self, screen: &Screen) {
            assert_eq!(self.mounted.pop().as_deref(), Some(screen.name()));
            self.calls.push(format!("unmount {}", screen));
        }

        fn refresh(&mut self, screen: &Screen, _user: Option<&UserRecord>) {
            self.calls.push(format!("refresh {}", screen));
        }
    }

    #[test]
    fn splash_runs_fixed_steps_then_login() {
        let mut nav = Navigator::new(3);
        let mut host = RecordingHost::default();
        nav.start(&mut host);

        for expected in 1..=3 {
            assert!(nav.dispatch(NavEvent::Tick, &mut host));
            assert_eq!(nav.screen(), &Screen::Splash { step: expected });
        }
        assert_eq!(nav.splash_progress(), Some(1.0));
        nav.dispatch(NavEvent::Tick, &mut host);
        assert_eq!(nav.screen(), &Screen::Login);
        assert_eq!(
            host.calls,
            vec![
                "mount Splash",
                "refresh Splash",
                "refresh Splash",
                "refresh Splash",
                "unmount Splash",
                "mount Login"
            ]
        );
    }

    #[test]
    fn splash_ignores_everything_but_ticks() {
        let splash = Screen::Splash { step: 5 };
        for event in [NavEvent::OpenRegister, NavEvent::Authenticated, NavEvent::ConfirmLogout] {
            assert_eq!(step(&splash, &event, 100), Step::Stay);
        }
    }

    #[test]
    fn zero_splash_starts_on_login() {
        let nav = Navigator::new(0);
        assert_eq!(nav.screen(), &Screen::Login);
        assert_eq!(nav.splash_progress(), None);
    }

    #[test]
    fn login_and_register_swap() {
        assert_eq!(step(&Screen::Login, &NavEvent::OpenRegister, 1), Step::Enter(Screen::Register));
        assert_eq!(step(&Screen::Register, &NavEvent::OpenLogin, 1), Step::Enter(Screen::Login));
        assert_eq!(step(&Screen::Login, &NavEvent::Registered, 1), Step::Stay);
    }

    #[test]
    fn goal_selection_flow() {
        let menu = Screen::goal_menu();
        assert_eq!(step(&menu, &NavEvent::Back, 1), Step::Stay);
        assert_eq!(step(&menu, &NavEvent::GoalsSaved, 1), Step::Stay);

        let Step::Update(chosen) = step(&menu, &NavEvent::ChooseGoal(FitnessGoal::Cardio), 1) else {
            panic!("goal choice should update the screen");
        };
        assert_eq!(step(&chosen, &NavEvent::GoalsSaved, 1), Step::Stay);

        let Step::Update(one) = step(&chosen, &NavEvent::ToggleFocus(FocusArea::Arms), 1) else {
            panic!("toggle should update");
        };
        let Step::Update(two) = step(&one, &NavEvent::ToggleFocus(FocusArea::Legs), 1) else {
            panic!("toggle should update");
        };
        assert_eq!(
            two,
            Screen::SetGoals {
                goal: Some(FitnessGoal::Cardio),
                focus_areas: vec![FocusArea::Arms, FocusArea::Legs]
            }
        );
        let Step::Update(back_to_one) = step(&two, &NavEvent::ToggleFocus(FocusArea::Arms), 1) else {
            panic!("toggle should update");
        };
        assert_eq!(
            back_to_one,
            Screen::SetGoals {
                goal: Some(FitnessGoal::Cardio),
                focus_areas: vec![FocusArea::Legs]
            }
        );

        assert_eq!(step(&two, &NavEvent::BackToGoals, 1), Step::Update(Screen::goal_menu()));
        assert_eq!(step(&two, &NavEvent::GoalsSaved, 1), Step::Enter(Screen::Measurements));
    }

    #[test]
    fn dashboard_tabs_only_refresh() {
        let mut nav = Navigator::new(0);
        let mut host = RecordingHost::default();
        nav.screen = Screen::dashboard();
        nav.start(&mut host);

        nav.dispatch(NavEvent::SelectTab(DashboardTab::History), &mut host);
        assert_eq!(
            nav.screen(),
            &Screen::Dashboard {
                tab: DashboardTab::History,
                confirming_logout: false
            }
        );
        assert_eq!(host.calls, vec!["mount Dashboard", "refresh Dashboard"]);
    }

    #[test]
    fn logout_needs_confirmation() {
        let mut nav = Navigator::new(0);
        let mut host = RecordingHost::default();
        nav.screen = Screen::dashboard();
        nav.set_user(UserRecord::new("Jane Doe", "jane@x.com"));
        nav.start(&mut host);

        assert!(!nav.dispatch(NavEvent::ConfirmLogout, &mut host));
        nav.dispatch(NavEvent::RequestLogout, &mut host);
        assert!(!nav.dispatch(NavEvent::SelectTab(DashboardTab::Settings), &mut host));
        nav.dispatch(NavEvent::CancelLogout, &mut host);
        assert!(matches!(nav.screen(), Screen::Dashboard { confirming_logout: false, .. }));

        nav.dispatch(NavEvent::RequestLogout, &mut host);
        nav.dispatch(NavEvent::ConfirmLogout, &mut host);
        assert_eq!(nav.screen(), &Screen::Login);
        assert!(nav.user().is_none());
        assert_eq!(host.mounted, vec!["Login"]);
    }
}

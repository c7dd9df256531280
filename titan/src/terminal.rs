//! Draws tracker screens as plain text on stdout.

use log::debug;
use rand::seq::SliceRandom;
use std::path::Path;

use fitness_store::{FitnessGoal, FocusArea, UserRecord};
use fitness_tracker::assets;
use fitness_tracker::navigation::{DashboardTab, Screen, ScreenHost};
use fitness_tracker::TrackerConfig;

const APP_TITLE: &str = "Titans Fitness";
const APP_VERSION: &str = "Version 1.0";
const BAR_WIDTH: u32 = 40;
// splash message changes every this many ticks
const MESSAGE_EVERY: u32 = 20;

const WELCOME_TEXT: &str = "SET GOALS.\nLOG WORKOUTS.\nSTAY ON TRACK.";
const WELCOME_BLURB: &str =
    "Easily track your workouts, set training plans,\nand discover new workout routines to crush your goals.";

pub struct TerminalHost {
    splash_banner: Option<String>,
    welcome_banner: Option<String>,
    messages: Vec<String>,
    splash_steps: u32,
    mounted: Option<String>,
}

impl TerminalHost {
    pub fn new(config: &TrackerConfig) -> TerminalHost {
        TerminalHost {
            splash_banner: assets::load_optional(Path::new(&config.assets.splash_banner)),
            welcome_banner: assets::load_optional(Path::new(&config.assets.welcome_banner)),
            messages: config.splash.messages.clone(),
            splash_steps: config.splash.steps,
            mounted: None,
        }
    }

    fn motivational_message(&self) -> &str {
        self.messages
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or("Loading...")
    }

    fn progress_bar(&self, step: u32) -> String {
        let steps = u64::from(self.splash_steps.max(1));
        let done = u64::from(step).min(steps);
        let filled = (done * u64::from(BAR_WIDTH) / steps) as usize;
        format!(
            "[{}{}] {:>3}%",
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH as usize - filled),
            done * 100 / steps
        )
    }

    /// Usage line for the mounted screen.
    pub fn help(screen: &Screen) -> &'static str {
        match screen {
            Screen::Splash { .. } => "",
            Screen::Login => "commands: login | register | forgot | quit",
            Screen::Register => "commands: submit | login | quit",
            Screen::Welcome => "commands: start | quit",
            Screen::SetGoals { goal: None, .. } => "commands: goal <number> | quit",
            Screen::SetGoals { goal: Some(_), .. } => "commands: focus <number> | save | back | quit",
            Screen::Measurements => "commands: submit | quit",
            Screen::Dashboard { confirming_logout: true, .. } => "commands: yes | no",
            Screen::Dashboard { .. } => {
                "commands: overview | workouts | progress | history | settings | log | theme <name> | notifications | reminders | logout | quit"
            }
        }
    }
}

fn numbered<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("  {}. {}", i + 1, item))
        .collect::<Vec<String>>()
        .join("\n")
}

fn show_goals(goal: Option<FitnessGoal>, focus_areas: &[FocusArea]) {
    match goal {
        None => {
            println!("What is your fitness goal?");
            println!("{}", numbered(FitnessGoal::ALL));
        }
        Some(goal) => {
            println!("Goal: {}", goal);
            println!("Select your focus areas:");
            for (i, area) in FocusArea::ALL.iter().enumerate() {
                let mark = if focus_areas.contains(area) { "x" } else { " " };
                println!("  {}. [{}] {}", i + 1, mark, area);
            }
        }
    }
}

impl ScreenHost for TerminalHost {
    fn mount(&mut self, screen: &Screen, user: Option<&UserRecord>) {
        debug!("Mounting {}", screen);
        self.mounted = Some(screen.name().to_string());
        println!();
        match screen {
            Screen::Splash { step } => {
                if let Some(banner) = &self.splash_banner {
                    println!("{}", banner);
                }
                println!("{}\n{}", APP_TITLE, APP_VERSION);
                println!("{}", self.motivational_message());
                println!("{}", self.progress_bar(*step));
            }
            Screen::Login => println!("== Login ==\nWelcome back to {}", APP_TITLE),
            Screen::Register => println!("== Create Account =="),
            Screen::Welcome => {
                if let Some(banner) = &self.welcome_banner {
                    println!("{}", banner);
                }
                if let Some(name) = user.and_then(|u| u.name.as_deref()) {
                    println!("Hello, {}!", name);
                }
                println!("{}\n\n{}\n\n[ GET STARTED ]", WELCOME_TEXT, WELCOME_BLURB);
            }
            Screen::SetGoals { goal, focus_areas } => {
                println!("== Set Your Goals ==");
                show_goals(*goal, focus_areas);
            }
            Screen::Measurements => println!("== Body Measurements =="),
            Screen::Dashboard { tab, .. } => {
                let name = user.and_then(|u| u.name.as_deref()).unwrap_or("Titan");
                println!("== {} ==  Welcome, {}", APP_TITLE, name);
                let tabs: Vec<&str> = DashboardTab::ALL.iter().map(|t| t.label()).collect();
                println!("{}", tabs.join(" | "));
                println!("-- {} --", tab.title());
            }
        }
        let help = TerminalHost::help(screen);
        if !help.is_empty() {
            println!("{}", help);
        }
    }

    fn unmount(&mut self, screen: &Screen) {
        debug!("Unmounting {}", screen);
        if let Screen::Splash { .. } = screen {
            println!();
        }
        self.mounted = None;
    }

    fn refresh(&mut self, screen: &Screen, _user: Option<&UserRecord>) {
        match screen {
            Screen::Splash { step } => {
                if *step > 0 && step % MESSAGE_EVERY == 0 {
                    println!("{}", self.motivational_message());
                }
                println!("{}", self.progress_bar(*step));
            }
            Screen::SetGoals { goal, focus_areas } => show_goals(*goal, focus_areas),
            Screen::Dashboard { tab, confirming_logout } => {
                if *confirming_logout {
                    println!("Are you sure you want to logout? (yes/no)");
                } else {
                    println!("-- {} --", tab.title());
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(steps: u32) -> TerminalHost {
        TerminalHost {
            splash_banner: None,
            welcome_banner: None,
            messages: Vec::new(),
            splash_steps: steps,
            mounted: None,
        }
    }

    #[test]
    fn progress_bar_fills() {
        let host = host(100);
        assert!(host.progress_bar(0).ends_with("]   0%"));
        assert!(host.progress_bar(50).contains(&"#".repeat(20)));
        assert!(host.progress_bar(100).ends_with("] 100%"));
        assert!(host.progress_bar(250).ends_with("] 100%"));
    }

    #[test]
    fn huge_step_counts_do_not_overflow() {
        let host = host(u32::MAX);
        assert!(host.progress_bar(u32::MAX / 2).ends_with("]  49%"));
        assert!(host.progress_bar(u32::MAX).ends_with("] 100%"));
    }

    #[test]
    fn no_messages_still_says_something() {
        assert_eq!(host(10).motivational_message(), "Loading...");
    }

    #[test]
    fn one_screen_at_a_time() {
        let mut host = host(0);
        host.mount(&Screen::Login, None);
        assert_eq!(host.mounted.as_deref(), Some("Login"));
        host.unmount(&Screen::Login);
        assert_eq!(host.mounted, None);
    }
}

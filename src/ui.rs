// UI layer: the interactive menu, built on `dialoguer` prompts. The main
// menu is the hub; every flow does its work and hands back the next screen,
// which is always the main menu unless the user chose to exit.

use crate::api::ProfileApi;
use crate::context::Session;
use crate::error::AppError;
use crate::expiration::parse_until_time;
use crate::templates::StatusTemplate;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::io;
use std::time::Duration;

const BANNER: &str = "Slack Status Manager";
const BACK: &str = "Back to main menu";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    ManualSet,
    UseTemplate,
    ModifyCurrent,
    CreateTemplate,
    DeleteTemplate,
    Exit,
}

/// Main menu entries, in display order.
pub const MAIN_MENU: [(&str, Screen); 6] = [
    ("Set status manually", Screen::ManualSet),
    ("Use a template", Screen::UseTemplate),
    ("Edit current status", Screen::ModifyCurrent),
    ("Create a template", Screen::CreateTemplate),
    ("Delete a template", Screen::DeleteTemplate),
    ("Exit", Screen::Exit),
];

/// Outcome of the last action, shown under the banner on the next redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success(msg) => write!(f, "{}", format!("✓ {msg}").green()),
            Notice::Failure(msg) => write!(f, "{}", format!("✗ {msg}").red()),
        }
    }
}

/// Run the menu until the user exits. Recoverable failures are shown and
/// the user lands back on the main menu; fatal ones are returned.
pub fn run<A: ProfileApi>(session: &Session<A>) -> Result<(), AppError> {
    let mut menu = Menu {
        session,
        notice: None,
    };
    let mut screen = Screen::Main;
    loop {
        let result = match screen {
            Screen::Main => menu.main_menu(),
            Screen::ManualSet => menu.manual_set(),
            Screen::UseTemplate => menu.use_template(),
            Screen::ModifyCurrent => menu.modify_current(),
            Screen::CreateTemplate => menu.create_template(),
            Screen::DeleteTemplate => menu.delete_template(),
            Screen::Exit => return Ok(()),
        };
        screen = next_screen(result, &mut menu.notice)?;
    }
}

/// Route the outcome of a flow: fatal errors end the session, recoverable
/// ones become a notice and send the user back to the main menu.
pub fn next_screen(
    result: Result<Screen, AppError>,
    notice: &mut Option<Notice>,
) -> Result<Screen, AppError> {
    match result {
        Ok(next) => Ok(next),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            log::info!("returning to main menu after: {err}");
            *notice = Some(Notice::Failure(err.to_string()));
            Ok(Screen::Main)
        }
    }
}

struct Menu<'a, A> {
    session: &'a Session<A>,
    notice: Option<Notice>,
}

impl<A: ProfileApi> Menu<'_, A> {
    /// Clear the terminal, show the current status, the banner and the
    /// pending notice, then ask what to do next.
    fn main_menu(&mut self) -> Result<Screen, AppError> {
        clear_screen()?;
        let status = with_spinner("Fetching status...", || {
            self.session.status.current_status_line()
        });
        println!("{status}");
        println!("\n{}", BANNER.blue().bold());
        if let Some(notice) = self.notice.take() {
            println!("{notice}");
        }

        let items: Vec<&str> = MAIN_MENU.iter().map(|(label, _)| *label).collect();
        let selection = Select::new()
            .with_prompt("What would you like to do?")
            .items(&items)
            .default(0)
            .interact()?;
        Ok(MAIN_MENU[selection].1)
    }

    fn manual_set(&mut self) -> Result<Screen, AppError> {
        clear_screen()?;
        if !proceed_or_back("Set status", "Enter a new status")? {
            return Ok(Screen::Main);
        }
        let text = required_input("Status text")?;
        let emoji = required_input("Emoji (e.g. :coffee:)")?;
        let duration = optional_input("Duration in minutes (optional)", minutes_answer)?;
        let until = optional_input("Until time HH:MM (optional)", until_time_answer)?;

        with_spinner("Updating status...", || {
            self.session.status.set_status(
                &text,
                &emoji,
                duration.as_deref().and_then(parse_minutes).map(|m| m as f64),
                until.as_deref(),
            )
        })?;
        self.notice = Some(Notice::Success("Status updated".into()));
        Ok(Screen::Main)
    }

    fn use_template(&mut self) -> Result<Screen, AppError> {
        let templates = self.session.templates.load()?;
        let Some(template) = pick_template("Choose a template", &templates)? else {
            return Ok(Screen::Main);
        };

        with_spinner("Updating status...", || {
            self.session.status.set_status(
                &template.text,
                &template.emoji,
                template.duration_minutes(),
                template.until_time.as_deref(),
            )
        })?;
        self.notice = Some(Notice::Success(format!(
            "Status set from template \"{}\"",
            template.label
        )));
        Ok(Screen::Main)
    }

    /// Edit text and emoji of the current status. No expiration is passed,
    /// so any existing one is cleared.
    fn modify_current(&mut self) -> Result<Screen, AppError> {
        clear_screen()?;
        let profile = with_spinner("Fetching status...", || self.session.status.current())?;
        if !proceed_or_back("Edit status", "Edit the current status")? {
            return Ok(Screen::Main);
        }
        let text = input_with_default("New status text", &profile.status_text)?;
        let emoji = input_with_default("New emoji", &profile.status_emoji)?;

        with_spinner("Updating status...", || {
            self.session.status.set_status(&text, &emoji, None, None)
        })?;
        self.notice = Some(Notice::Success("Status updated".into()));
        Ok(Screen::Main)
    }

    fn create_template(&mut self) -> Result<Screen, AppError> {
        clear_screen()?;
        if !proceed_or_back("Create template", "Create a new template")? {
            return Ok(Screen::Main);
        }
        let label = required_input("Template name")?;
        let text = required_input("Status text")?;
        let emoji = required_input("Emoji")?;
        let duration = optional_input("Duration in minutes (optional)", minutes_answer)?;
        let until = optional_input("Until time HH:MM (optional)", until_time_answer)?;

        let template = build_template(&label, &text, &emoji, duration.as_deref(), until.as_deref());
        self.session.templates.create(template)?;
        self.notice = Some(Notice::Success(format!("Template \"{label}\" created")));
        Ok(Screen::Main)
    }

    fn delete_template(&mut self) -> Result<Screen, AppError> {
        clear_screen()?;
        let templates = self.session.templates.load()?;
        let Some(template) = pick_template("Which template should be deleted?", &templates)? else {
            return Ok(Screen::Main);
        };
        if self.session.config.confirm_delete()
            && !Confirm::new()
                .with_prompt(format!("Delete template \"{}\"?", template.label))
                .default(false)
                .interact()?
        {
            return Ok(Screen::Main);
        }

        let removed = self.session.templates.delete(&template.label)?;
        self.notice = Some(Notice::Success(format!(
            "Deleted {removed} template(s) named \"{}\"",
            template.label
        )));
        Ok(Screen::Main)
    }
}

/// Template labels followed by the back entry.
pub fn template_choices(templates: &[StatusTemplate]) -> Vec<String> {
    templates
        .iter()
        .map(|t| t.label.clone())
        .chain(std::iter::once(BACK.to_string()))
        .collect()
}

/// Reject empty or whitespace-only answers.
pub fn non_empty(input: &str) -> Result<(), &'static str> {
    if input.trim().is_empty() {
        Err("A value is required")
    } else {
        Ok(())
    }
}

/// Blank, or a whole number of minutes greater than zero.
pub fn minutes_answer(input: &str) -> Result<(), &'static str> {
    if input.trim().is_empty() || parse_minutes(input).is_some() {
        Ok(())
    } else {
        Err("Enter a whole number of minutes greater than 0, or leave blank")
    }
}

/// Blank, or a valid `HH:MM` time.
pub fn until_time_answer(input: &str) -> Result<(), &'static str> {
    if input.trim().is_empty() || parse_until_time(input.trim()).is_some() {
        Ok(())
    } else {
        Err("Enter a time as HH:MM, or leave blank")
    }
}

fn parse_minutes(input: &str) -> Option<i64> {
    input.trim().parse().ok().filter(|m: &i64| *m > 0)
}

/// Template from the create prompts. Blank or unusable expiry answers are
/// left out of the template entirely.
pub fn build_template(
    label: &str,
    text: &str,
    emoji: &str,
    duration: Option<&str>,
    until: Option<&str>,
) -> StatusTemplate {
    let mut template = StatusTemplate::new(label, text, emoji);
    if let Some(minutes) = duration.and_then(parse_minutes) {
        template = template.with_duration(minutes);
    }
    if let Some(until) = until.map(str::trim).filter(|u| parse_until_time(u).is_some()) {
        template = template.with_until_time(until);
    }
    template
}

fn pick_template<'t>(
    prompt: &str,
    templates: &'t [StatusTemplate],
) -> Result<Option<&'t StatusTemplate>, AppError> {
    let items = template_choices(templates);
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;
    Ok(templates.get(selection))
}

/// One-step sub-menu: `true` to go ahead, `false` when the user picked back.
fn proceed_or_back(prompt: &str, action: &str) -> Result<bool, AppError> {
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&[action, BACK][..])
        .default(0)
        .interact()?;
    Ok(selection == 0)
}

fn required_input(prompt: &str) -> Result<String, AppError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| non_empty(input))
        .interact_text()?;
    Ok(value)
}

/// Free-form answer that may be left blank (`None`).
fn optional_input(
    prompt: &str,
    check: fn(&str) -> Result<(), &'static str>,
) -> Result<Option<String>, AppError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(move |input: &String| check(input))
        .interact_text()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn input_with_default(prompt: &str, current: &str) -> Result<String, AppError> {
    let mut input = Input::<String>::new();
    input.with_prompt(prompt).allow_empty(true);
    if !current.is_empty() {
        input.default(current.to_string());
    }
    Ok(input.interact_text()?)
}

fn clear_screen() -> io::Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
}

/// Show a spinner on stderr while `f` runs.
fn with_spinner<T>(message: &'static str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let result = f();
    spinner.finish_and_clear();
    result
}

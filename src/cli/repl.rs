//! Interactive terminal session driving the dashboard.
use super::ui::{self, StyleType};
use crate::core::api::InvestmentApi;
use crate::core::record::{InvestmentFields, InvestmentId};
use crate::core::store::SortColumn;
use crate::dashboard::{ConfirmGate, Dashboard, Event, Outcome};
use anyhow::{Context, Result, anyhow};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

/// Typing this at any form field abandons the form.
pub const CANCEL_KEYWORD: &str = ":cancel";

const HELP: &str = "\
Commands:
  list                 Show the investment table
  search <text>        Only show rows containing <text> (empty clears)
  sort <column>        Sort by column, again to flip direction
                       (company, industry, round, amount, score, status, updated)
  add                  Add a new investment
  edit <id>            Edit an investment
  delete <id>          Delete an investment
  report <id>          Request a due-diligence document
  help                 Show this help
  quit                 Leave the dashboard";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Search(String),
    Sort(SortColumn),
    Add,
    Edit(InvestmentId),
    Delete(InvestmentId),
    Report(InvestmentId),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, arg) = match s.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (s, ""),
        };
        match name.to_lowercase().as_str() {
            "list" | "ls" => Ok(Command::List),
            "search" | "find" => Ok(Command::Search(arg.to_string())),
            "sort" => Ok(Command::Sort(arg.parse()?)),
            "add" | "new" => Ok(Command::Add),
            "edit" => Ok(Command::Edit(arg.parse()?)),
            "delete" | "rm" => Ok(Command::Delete(arg.parse()?)),
            "report" => Ok(Command::Report(arg.parse()?)),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(anyhow!(
                "Unknown command: {other}. Type `help` for a list of commands."
            )),
        }
    }
}

/// Line-based prompt over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}").context("Failed to write to terminal")
    }

    /// Shows `prompt` and reads one line. Returns `None` at end of input.
    pub fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}").context("Failed to write to terminal")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from terminal")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead, W: Write> ConfirmGate for Prompter<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.ask(&format!("{prompt} [y/N] "))?;
        Ok(matches!(
            answer.map(|a| a.trim().to_lowercase()).as_deref(),
            Some("y") | Some("yes")
        ))
    }
}

/// Asks for one form field, keeping `current` when the answer is blank.
///
/// Returns `None` when the user cancels or input ends.
fn ask_field<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    label: &str,
    current: &str,
) -> Result<Option<String>> {
    loop {
        let prompt = if current.is_empty() {
            format!("{label}: ")
        } else {
            format!("{label} [{current}]: ")
        };
        let Some(answer) = prompter.ask(&prompt)? else {
            return Ok(None);
        };
        let answer = answer.trim();
        if answer == CANCEL_KEYWORD {
            return Ok(None);
        }
        if !answer.is_empty() {
            return Ok(Some(answer.to_string()));
        }
        if !current.is_empty() {
            return Ok(Some(current.to_string()));
        }
        prompter.say(&ui::style_text(
            &format!("{label} is required"),
            StyleType::Error,
        ))?;
    }
}

fn read_form<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    current: &InvestmentFields,
) -> Result<Option<InvestmentFields>> {
    let Some(company) = ask_field(prompter, "Company Name", &current.company)? else {
        return Ok(None);
    };
    let Some(industry) = ask_field(prompter, "Industry", &current.industry)? else {
        return Ok(None);
    };
    let Some(funding_round) = ask_field(prompter, "Funding Round", &current.funding_round)? else {
        return Ok(None);
    };
    let Some(amount) = ask_field(prompter, "Amount Requested", &current.amount)? else {
        return Ok(None);
    };
    Ok(Some(InvestmentFields {
        company,
        industry,
        funding_round,
        amount,
    }))
}

/// Runs the open form to completion, saving or cancelling it.
async fn complete_form<A, R, W>(
    dashboard: &mut Dashboard<A>,
    prompter: &mut Prompter<R, W>,
) -> Result<Outcome>
where
    A: InvestmentApi,
    R: BufRead,
    W: Write,
{
    if let Some(title) = dashboard.modal().title() {
        prompter.say(&ui::style_text(title, StyleType::Title))?;
        prompter.say(&ui::style_text(
            &format!("(blank keeps the current value, {CANCEL_KEYWORD} abandons the form)"),
            StyleType::Subtle,
        ))?;
    }

    let current = dashboard.modal().form().clone();
    match read_form(prompter, &current)? {
        Some(fields) => dashboard.dispatch(Event::Save(fields), prompter).await,
        None => {
            prompter.say(&ui::style_text("Cancelled", StyleType::Subtle))?;
            dashboard.dispatch(Event::Cancel, prompter).await
        }
    }
}

/// Reads commands until `quit` or end of input.
pub async fn run<A, R, W>(dashboard: &mut Dashboard<A>, prompter: &mut Prompter<R, W>) -> Result<()>
where
    A: InvestmentApi,
    R: BufRead,
    W: Write,
{
    prompter.say(&ui::style_text("Investment Dashboard", StyleType::Title))?;
    prompter.say(&dashboard.render())?;
    prompter.say(&ui::style_text("Type `help` for commands.", StyleType::Subtle))?;

    let prompt = ui::style_text("iai> ", StyleType::Prompt);
    while let Some(line) = prompter.ask(&prompt)? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                prompter.say(&ui::style_text(&e.to_string(), StyleType::Error))?;
                continue;
            }
        };
        debug!(?command, "Read command");

        let outcome = match command {
            Command::Quit => break,
            Command::Help => {
                prompter.say(HELP)?;
                Outcome::Unchanged
            }
            Command::List => Outcome::Rerender,
            Command::Search(query) => dashboard.dispatch(Event::Search(query), prompter).await?,
            Command::Sort(column) => dashboard.dispatch(Event::Sort(column), prompter).await?,
            Command::Add => {
                dashboard.dispatch(Event::OpenAdd, prompter).await?;
                complete_form(dashboard, prompter).await?
            }
            Command::Edit(id) => {
                dashboard.dispatch(Event::OpenEdit(id), prompter).await?;
                if dashboard.modal().is_open() {
                    complete_form(dashboard, prompter).await?
                } else {
                    prompter.say(&ui::style_text(
                        &format!("No investment with id {id}"),
                        StyleType::Error,
                    ))?;
                    Outcome::Unchanged
                }
            }
            Command::Delete(id) => dashboard.dispatch(Event::Delete(id), prompter).await?,
            Command::Report(id) => {
                let message = if dashboard.store().get(id).is_some() {
                    ui::style_text(
                        &format!("Due-diligence document requested for investment {id}"),
                        StyleType::Success,
                    )
                } else {
                    ui::style_text(&format!("No investment with id {id}"), StyleType::Error)
                };
                dashboard
                    .dispatch(Event::RequestDueDiligence(id), prompter)
                    .await?;
                prompter.say(&message)?;
                Outcome::Unchanged
            }
        };

        if outcome == Outcome::Rerender {
            prompter.say(&dashboard.render())?;
        }
    }

    prompter.say(&ui::style_text("Goodbye", StyleType::Subtle))?;
    Ok(())
}

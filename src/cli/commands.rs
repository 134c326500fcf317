use std::path::PathBuf;

use chrono::{DateTime, Utc};

use remind_domain::Locale;

use crate::errors::AppError;

pub const USAGE: &str = "\
Usage: bill_reminders_cli <command> [options]

Commands:
  plan <snapshot.json>   Preview a reminder pass over a JSON snapshot
       --locale <en|ko>  Message language (defaults to the configured locale)
       --user <id>       User identifier recorded in logs (default: local)
       --now <rfc3339>   Evaluate at a fixed instant instead of the system clock
  config                 Show the configuration file and effective values
  version                Show build information
  help                   Show this message";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Plan(PlanArgs),
    Config,
    Version,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanArgs {
    pub snapshot: PathBuf,
    pub locale: Option<Locale>,
    pub user_id: String,
    pub now: Option<DateTime<Utc>>,
}

impl Command {
    pub fn parse<I, S>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let Some(name) = args.next() else {
            return Ok(Command::Help);
        };
        match name.as_str() {
            "plan" => parse_plan(args).map(Command::Plan),
            "config" => Ok(Command::Config),
            "version" | "--version" | "-V" => Ok(Command::Version),
            "help" | "--help" | "-h" => Ok(Command::Help),
            other => Err(AppError::Usage(format!("unknown command `{other}`"))),
        }
    }
}

fn parse_plan(mut args: impl Iterator<Item = String>) -> Result<PlanArgs, AppError> {
    let mut snapshot = None;
    let mut locale = None;
    let mut user_id = String::from("local");
    let mut now = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--locale" => {
                let tag = flag_value(&mut args, "--locale")?;
                let parsed = tag
                    .parse::<Locale>()
                    .map_err(|err| AppError::Usage(err.to_string()))?;
                locale = Some(parsed);
            }
            "--user" => user_id = flag_value(&mut args, "--user")?,
            "--now" => {
                let raw = flag_value(&mut args, "--now")?;
                let parsed = DateTime::parse_from_rfc3339(&raw)
                    .map_err(|err| AppError::Usage(format!("invalid --now `{raw}`: {err}")))?;
                now = Some(parsed.with_timezone(&Utc));
            }
            flag if flag.starts_with("--") => {
                return Err(AppError::Usage(format!("unknown option `{flag}`")));
            }
            path if snapshot.is_none() => snapshot = Some(PathBuf::from(path)),
            extra => return Err(AppError::Usage(format!("unexpected argument `{extra}`"))),
        }
    }

    let snapshot =
        snapshot.ok_or_else(|| AppError::Usage("plan requires a snapshot path".into()))?;
    Ok(PlanArgs {
        snapshot,
        locale,
        user_id,
        now,
    })
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, AppError> {
    args.next()
        .ok_or_else(|| AppError::Usage(format!("{flag} requires a value")))
}

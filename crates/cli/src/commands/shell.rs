//! Interactive shell
//!
//! A line-oriented stand-in for the game screen: every command acts on the
//! shared [`Garage`] and the current view is redrawn afterwards.

use std::io::Write;

use anyhow::Result;
use async_race_client::{Garage, RaceEvents};
use async_race_common::{CarId, SortField, View};
use clap::Args;
use colored::Colorize;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{engine, garage as garage_cmd, race};
use crate::output::{print_error, print_info, print_message, print_success, print_warning, OutputFormat};
use crate::views::render_current;

const DEFAULT_COLOR: &str = "#000000";

const HELP: &str = "\
commands:
  garage | winners            switch view
  next | prev | page N        paginate the current view
  create NAME.. [#color]      add a car
  select ID                   show a car
  update ID NAME.. [#color]   rename or repaint a car
  remove ID                   delete a car and its record
  generate [N]                add random cars
  start ID | stop ID          drive or stop a single car
  race | reset                race the page, stop every engine
  sort wins|time              sort winners, flipping the order
  help | quit";

#[derive(Args)]
pub struct ShellArgs {
    /// Start on the winners view
    #[arg(long)]
    pub winners: bool,
}

/// One parsed shell line
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Next,
    Prev,
    Show(View),
    Page(u32),
    Create { name: String, color: String },
    Select(CarId),
    Update { id: CarId, name: String, color: String },
    Remove(CarId),
    Generate(Option<usize>),
    Start(CarId),
    Stop(CarId),
    Race,
    Reset,
    Sort(SortField),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty line")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{0}' is missing an argument")]
    Missing(&'static str),

    #[error("'{value}' is not a valid {what}")]
    Invalid { what: &'static str, value: String },
}

fn number<T: std::str::FromStr>(what: &'static str, value: Option<&str>) -> Result<T, ParseError> {
    let value = value.ok_or(ParseError::Missing(what))?;
    value.parse().map_err(|_| ParseError::Invalid {
        what,
        value: value.to_string(),
    })
}

/// Split `NAME.. [#color]`; a trailing `#..` word is the color
fn name_and_color(words: &[&str]) -> (String, String) {
    match words.split_last() {
        Some((last, rest)) if last.starts_with('#') && !rest.is_empty() => (rest.join(" "), last.to_string()),
        _ => (words.join(" "), DEFAULT_COLOR.to_string()),
    }
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((command, args)) = words.split_first() else {
            return Err(ParseError::Empty);
        };
        let first = args.first().copied();

        let parsed = match command.to_ascii_lowercase().as_str() {
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "garage" | "g" => Self::Show(View::Garage),
            "winners" | "w" => Self::Show(View::Winners),
            "page" => Self::Page(number("page", first)?),
            "create" | "add" => {
                if args.is_empty() {
                    return Err(ParseError::Missing("create"));
                }
                let (name, color) = name_and_color(args);
                Self::Create { name, color }
            }
            "select" => Self::Select(number("car id", first)?),
            "update" => {
                let id = number("car id", first)?;
                if args.len() < 2 {
                    return Err(ParseError::Missing("update"));
                }
                let (name, color) = name_and_color(&args[1..]);
                Self::Update { id, name, color }
            }
            "remove" | "rm" => Self::Remove(number("car id", first)?),
            "generate" => match first {
                Some(_) => Self::Generate(Some(number("count", first)?)),
                None => Self::Generate(None),
            },
            "start" => Self::Start(number("car id", first)?),
            "stop" => Self::Stop(number("car id", first)?),
            "race" => Self::Race,
            "reset" => Self::Reset,
            "sort" => {
                let field = first.ok_or(ParseError::Missing("sort"))?;
                Self::Sort(field.parse().map_err(|_| ParseError::Invalid {
                    what: "sort column",
                    value: field.to_string(),
                })?)
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(parsed)
    }

    /// Whether the view should be redrawn after running this command
    fn redraws(&self) -> bool {
        !matches!(
            self,
            Self::Help | Self::Quit | Self::Select(_) | Self::Start(_) | Self::Stop(_)
        )
    }
}

pub async fn execute(args: ShellArgs, garage: &mut Garage, format: OutputFormat) -> Result<()> {
    if args.winners {
        garage.show(View::Winners).await?;
    }
    render_current(garage.session(), format);
    print_info("Type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", format!("{}>", garage.session().view()).cyan().bold());
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(e) => {
                print_error(&e.to_string());
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }

        let redraw = command.redraws();
        match run(command, garage, format).await {
            Ok(()) if redraw => render_current(garage.session(), format),
            Ok(()) => {}
            Err(e) => print_error(&e.to_string()),
        }
    }
    Ok(())
}

async fn run(command: ShellCommand, garage: &mut Garage, format: OutputFormat) -> Result<()> {
    match command {
        ShellCommand::Next => {
            if !garage.next().await? {
                print_warning("Already on the last page");
            }
        }
        ShellCommand::Prev => {
            if !garage.prev().await? {
                print_warning("Already on the first page");
            }
        }
        ShellCommand::Show(view) => {
            garage.show(view).await?;
            if view == View::Garage {
                garage.refresh_garage().await?;
            }
        }
        ShellCommand::Page(page) => {
            let landed = garage.go_to(page).await?;
            if landed != page {
                print_warning(&format!("Page {} does not exist, showing page {}", page, landed));
            }
        }
        ShellCommand::Create { name, color } => {
            let car = garage.create_car(&name, &color).await?;
            print_success(&format!("Car '{}' created with id {}", car.name, car.id));
        }
        ShellCommand::Select(id) => {
            let car = garage.select_car(id).await?;
            print_message(&format!("{} {} {}", car.id, car.name, car.color), format);
        }
        ShellCommand::Update { id, name, color } => {
            let car = garage.update_car(id, &name, &color).await?;
            print_success(&format!("Car {} is now '{}'", car.id, car.name));
        }
        ShellCommand::Remove(id) => {
            garage.remove_car(id).await?;
            print_success(&format!("Car {} removed", id));
        }
        ShellCommand::Generate(count) => {
            let count = count.unwrap_or(garage.config().generate_count);
            let created = garage_cmd::generate(garage, count).await?;
            print_success(&format!("Generated {} cars", created));
        }
        ShellCommand::Start(id) => engine::drive(garage, id, format).await?,
        ShellCommand::Stop(id) => {
            garage.stop_car(id, &RaceEvents::none()).await?;
            print_success(&format!("Engine of car {} stopped", id));
        }
        ShellCommand::Race => {
            garage.show(View::Garage).await?;
            race::run(garage, format).await?;
        }
        ShellCommand::Reset => {
            garage.reset(&RaceEvents::none()).await?;
            print_success("All engines stopped");
        }
        ShellCommand::Sort(field) => {
            if garage.session().view() != View::Winners {
                garage.show(View::Winners).await?;
            }
            garage.sort_by(field).await?;
        }
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => {}
    }
    Ok(())
}

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use console::{Term, style};
use inquire::{CustomUserError, InquireError, Text, required, validator::Validation};
use weather_lookup_core::{
    Config, FormInput, HttpLookupService, LookupForm, WeatherLookupService, model::SUBMIT_LABEL,
    render,
};

use crate::display::{TerminalPalette, layout_for};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-lookup",
    version,
    about = "Look up stored weather records by ID"
)]
pub struct Cli {
    /// Weather service address; overrides the configured one for this run.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to the interactive form.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive lookup form; Esc or Ctrl-C quits.
    Form,

    /// Look up a single ID and print the result.
    Show {
        /// Identifier of the stored weather record, e.g. 12.
        #[arg(value_parser = non_empty)]
        id: String,
    },

    /// Set the weather service address and request timeout.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli {
            base_url, command, ..
        } = self;

        match command.unwrap_or(Command::Form) {
            Command::Configure => configure(),
            Command::Show { id } => {
                let form = build_form(base_url.as_deref())?;
                form.set_input(id);
                submit_and_show(&form).await
            }
            Command::Form => {
                let form = build_form(base_url.as_deref())?;
                run_form(&form).await
            }
        }
    }
}

fn non_empty(value: &str) -> Result<String, String> {
    let input = FormInput {
        id: value.to_string(),
    };
    if input.is_submittable() {
        Ok(input.id)
    } else {
        Err("ID must not be empty".to_string())
    }
}

fn build_form(base_url: Option<&str>) -> anyhow::Result<LookupForm<HttpLookupService>> {
    let mut config = Config::load()?;
    if let Some(url) = base_url {
        config.set_base_url(url)?;
    }

    let service = HttpLookupService::from_config(&config)?;
    tracing::debug!(base_url = service.base_url(), "Weather service configured");

    Ok(LookupForm::new(service))
}

async fn run_form<S: WeatherLookupService>(form: &LookupForm<S>) -> anyhow::Result<()> {
    let term = Term::stdout();
    term.write_line(&style("Lookup Weather Data Request").bold().to_string())?;
    term.write_line(
        &style("Submit an ID to retrieve stored weather data")
            .dim()
            .to_string(),
    )?;

    loop {
        let current = form.input();
        let help = format!("Enter: {SUBMIT_LABEL} · Esc: quit");
        let answer = Text::new("ID")
            .with_placeholder("e.g., 0, 12, 15")
            .with_initial_value(&current)
            .with_help_message(&help)
            .with_validator(required!("ID is required"))
            .prompt();

        match answer {
            Ok(id) => form.set_input(id),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read ID"),
        }

        submit_and_show(form).await?;
    }
}

/// Submit the current ID, showing the in-flight label until it resolves.
async fn submit_and_show<S: WeatherLookupService>(form: &LookupForm<S>) -> anyhow::Result<()> {
    let term = Term::stdout();
    let mut state = form.subscribe();
    state.borrow_and_update();

    let progress = async {
        let mut shown = false;
        while state.changed().await.is_ok() {
            let current = state.borrow_and_update().clone();
            if !current.submitting {
                break;
            }
            if !shown {
                term.write_line(&style(current.submit_label()).dim().to_string())?;
                shown = true;
            }
        }
        if shown && term.is_term() {
            term.clear_last_lines(1)?;
        }
        Ok::<_, std::io::Error>(())
    };

    let (_, progress) = tokio::join!(form.submit(), progress);
    progress?;

    if let Some(view) = render(form.result().as_ref()) {
        let mut out = String::new();
        view.write_to(&mut out, &TerminalPalette, layout_for(&term))?;
        term.write_str(&out)?;
        term.write_line("")?;
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let base_url = Text::new("Weather service URL")
        .with_initial_value(config.base_url())
        .with_validator(required!("URL is required"))
        .prompt()
        .context("Failed to read weather service URL")?;
    config.set_base_url(&base_url)?;

    let current_timeout = config
        .request_timeout_secs
        .map(|secs| secs.to_string())
        .unwrap_or_default();
    let timeout = Text::new("Request timeout in seconds")
        .with_initial_value(&current_timeout)
        .with_help_message("Leave blank to wait for the service indefinitely")
        .with_validator(|input: &str| {
            let validation = match parse_timeout(input) {
                Ok(_) => Validation::Valid,
                Err(msg) => Validation::Invalid(msg.into()),
            };
            Ok::<_, CustomUserError>(validation)
        })
        .prompt()
        .context("Failed to read request timeout")?;
    config.request_timeout_secs = parse_timeout(&timeout).map_err(anyhow::Error::msg)?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

fn parse_timeout(input: &str) -> Result<Option<u64>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    match input.parse::<u64>() {
        Ok(0) => Err("Timeout must be at least 1 second".to_string()),
        Ok(secs) => Ok(Some(secs)),
        Err(_) => Err(format!("'{input}' is not a whole number of seconds")),
    }
}

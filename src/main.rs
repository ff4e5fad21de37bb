use std::process::ExitCode;
use std::time::Duration;

use calnotify_auth::{GoogleOAuth2Provider, OAuth2Provider, SecureStorage};
use calnotify_calendar::CalendarClient;
use calnotify_core::{AppError, AuthError, Config, ConfigError};
use calnotify_pack::{invoke, pack, FormulaDef, InvokeOptions};

mod cli;
use cli::{parse_args, Command, USAGE};

#[tokio::main]
async fn main() -> ExitCode {
    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("Error: {}", err);
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), AppError> {
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let (config, validation) = Config::load_validated().map_err(app_error)?;
    calnotify_core::init_with_level(&config.logging.level).map_err(app_error)?;
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    let storage = SecureStorage::new(config.config_dir.join("tokens"));

    match command {
        Command::Help => Ok(()),
        Command::Formulas => {
            for formula in &pack().formulas {
                println!("{}", describe_formula(formula));
            }
            Ok(())
        }
        Command::Auth => {
            let provider = GoogleOAuth2Provider::from_config(&config.google).map_err(app_error)?;
            provider.authenticate(&storage).await.map_err(app_error)?;
            println!("Signed in. Token stored in {}", storage.dir().display());
            Ok(())
        }
        Command::Logout => {
            let provider = GoogleOAuth2Provider::from_config(&config.google).map_err(app_error)?;
            provider.sign_out(&storage).map_err(app_error)?;
            println!("Signed out.");
            Ok(())
        }
        Command::Status => {
            let provider = GoogleOAuth2Provider::from_config(&config.google).map_err(app_error)?;
            if provider.is_authenticated(&storage) {
                println!("Signed in.");
            } else if storage.has_token(provider.service_id()) {
                println!("Token expired; it will be refreshed on the next call.");
            } else {
                println!("Not signed in. Run `calnotify auth`.");
            }
            Ok(())
        }
        Command::Invoke { formula, args } => {
            let provider = GoogleOAuth2Provider::from_config(&config.google).map_err(app_error)?;
            let access_token = provider
                .valid_access_token(&storage)
                .await
                .map_err(app_error)?;

            let client = CalendarClient::new(&access_token)
                .with_base_url(&config.calendar.api_base_url)
                .with_timeout(Duration::from_secs(config.calendar.timeout_secs))
                .map_err(calnotify_pack::error_mapping::calendar_error_to_app)?;
            let options = InvokeOptions {
                default_calendar: config.calendar.default_calendar.clone(),
            };

            match invoke(&client, &formula, &args, &options).await {
                Ok(result) => {
                    println!("{}", result);
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}

/// Recover the typed error behind an `anyhow` chain so it renders with a
/// friendly message.
fn app_error(err: anyhow::Error) -> AppError {
    let err = match err.downcast::<AuthError>() {
        Ok(auth) => return AppError::Auth(auth),
        Err(err) => err,
    };
    match err.downcast::<ConfigError>() {
        Ok(config) => AppError::Config(config),
        Err(err) => AppError::Other(err),
    }
}

fn describe_formula(formula: &FormulaDef) -> String {
    let mut params: Vec<String> = formula
        .parameters
        .iter()
        .map(|p| {
            if p.optional {
                format!("[{}]", p.name)
            } else {
                p.name.to_string()
            }
        })
        .collect();
    if !formula.vararg_parameters.is_empty() {
        let group: Vec<_> = formula.vararg_parameters.iter().map(|p| p.name).collect();
        params.push(format!("[{}]...", group.join(" ")));
    }
    format!(
        "{} {}\n    {}",
        formula.name,
        params.join(" "),
        formula.description
    )
}

use std::{path::Path, sync::Arc};

use auth::Outcome;
use clap::Parser;
use cli::{Args, Commands};
use error::{CliError, CliResult};
use fxd4_client::{http_client::ClientConfig, RemoteClient, UreqTransport};
use fxd4_config::config::Config;
use logging::setup_logging;
use nu_ansi_term::Color::{Cyan, Green};
use tracing::{debug, info, warn};
use ureq::{
    http::{HeaderMap, HeaderName, HeaderValue},
    Proxy,
};
use utils::{set_color, to_json, Colored};

mod auth;
mod cli;
mod error;
mod logging;
mod records;
mod utils;

fn parse_headers(headers: &[String]) -> CliResult<HeaderMap> {
    let mut map = HeaderMap::new();
    for header in headers {
        let (key, value) = header
            .split_once(':')
            .ok_or_else(|| CliError::invalid_argument(header, "expected 'Name: value'"))?;
        let name = HeaderName::try_from(key.trim())
            .map_err(|err| CliError::invalid_argument(header, err.to_string()))?;
        let value = HeaderValue::try_from(value.trim())
            .map_err(|err| CliError::invalid_argument(header, err.to_string()))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn create_client(
    config: &Config,
    proxy: Option<&str>,
    headers: Option<&[String]>,
    user_agent: Option<String>,
) -> CliResult<RemoteClient> {
    let credentials = config.credentials()?;

    let mut client_config = ClientConfig::from_config(config);
    if let Some(proxy) = proxy {
        let proxy =
            Proxy::new(proxy).map_err(|err| CliError::invalid_argument(proxy, err.to_string()))?;
        client_config.proxy = Some(proxy);
    }
    if let Some(user_agent) = user_agent {
        client_config.user_agent = Some(user_agent);
    }
    if let Some(headers) = headers {
        client_config.headers = Some(parse_headers(headers)?);
    }

    debug!("using project at {}", credentials.url);
    let transport = UreqTransport::new(&client_config);
    Ok(RemoteClient::new(
        credentials.url,
        credentials.key,
        Arc::new(transport),
    )?)
}

fn print_outcome(outcome: Outcome) {
    match outcome {
        Outcome::Message(message) => info!("{}", message),
        Outcome::Redirect {
            location,
            cookies,
        } => {
            info!("{} {}", Colored(Green, "Redirect:"), location);
            for cookie in cookies {
                info!("{} {}", Colored(Cyan, "Set-Cookie:"), cookie);
            }
        }
    }
}

/// Runs one command. The remote client is only built for commands that
/// talk to the server.
fn run<F>(command: Commands, config: &Config, client: F) -> CliResult<()>
where
    F: Fn() -> CliResult<RemoteClient>,
{
    match command {
        Commands::Config => {
            info!("{}", config.to_redacted_toml()?);
        }
        Commands::Register {
            name,
            email,
            password,
            password_confirmation,
        } => {
            print_outcome(auth::register(
                &client()?,
                config,
                name,
                email,
                password,
                password_confirmation,
            )?);
        }
        Commands::Login {
            email,
            password,
        } => {
            print_outcome(auth::login(&client()?, config, email, password)?);
        }
        Commands::Logout {
            session,
        } => {
            print_outcome(auth::logout(&client()?, config, session.as_deref())?);
        }
        Commands::Whoami {
            session,
        } => {
            let user = auth::whoami(&client()?, config, &session)?;
            info!("{}", to_json(&user)?);
        }
        Commands::Query(query) => {
            let rows = records::query_records(&client()?, &query)?;
            if query.first {
                match rows.first() {
                    Some(row) => info!("{}", to_json(row)?),
                    None => warn!("No rows in '{}' match the query", query.table),
                }
            } else {
                info!("{}", to_json(&rows)?);
            }
        }
        Commands::Find {
            table,
            value,
            by,
        } => {
            match records::find_record(&client()?, &table, &value, by.as_deref())? {
                Some(record) => info!("{}", to_json(&record)?),
                None => warn!("No row in '{}' matches {}", table, value),
            }
        }
        Commands::Create {
            table,
            payload,
        } => {
            let record = records::create_record(&client()?, &table, &payload)?;
            info!("{}", to_json(&record)?);
        }
        Commands::Update {
            table,
            id,
            payload,
        } => {
            let record = records::update_record(&client()?, &table, &id, &payload)?;
            info!("{}", to_json(&record)?);
        }
        Commands::Delete {
            table,
            id,
        } => {
            records::delete_record(&client()?, &table, &id)?;
            info!("Deleted {} from '{}'", Colored(Cyan, &id), table);
        }
    }

    Ok(())
}

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        set_color(false);
    }

    let config = Config::load(args.config.as_deref().map(Path::new))?;

    run(args.command, &config, || {
        create_client(
            &config,
            args.proxy.as_deref(),
            args.header.as_deref(),
            args.user_agent.clone(),
        )
    })
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}

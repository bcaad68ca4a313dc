use anyhow::{Context, bail};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vet_console::{
    ConsoleState, Resource, Role,
    config::Config,
    constants::DEFAULT_LOG_FILTER,
    dashboard,
    models::{Animal, AnimalDiagnosis, Appointment, Contact, Medicine, Sale, User},
    portal,
    purchase::{ReconcileAction, reconcile},
};

const USAGE: &str = "usage: vet-console <command>

commands:
  summary                                   dashboard counters
  list <collection> [search] [page]         users | medicines | sales | patients |
                                            diagnoses | appointments | contacts
  services                                  clinic service catalog
  login <email> <password> [--admin]
  register <full_name> <email> <password> [--admin]
  logout
  whoami
  reconcile [retry|restock]                 resolve purchases left without a sale";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("Configuration error")?;
    let state = ConsoleState::new(config);
    let session = state.session().await.context("failed to restore session")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let admin = args.iter().any(|a| a == "--admin");
    let args: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--admin")
        .collect();
    let role = if admin { Role::Admin } else { Role::Customer };

    match args.as_slice() {
        ["summary"] => {
            let summary = dashboard::fetch_summary(&state.api).await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        ["list", collection, rest @ ..] => {
            let search = rest.first().copied().unwrap_or("");
            let page = match rest.get(1) {
                Some(raw) => raw
                    .parse::<usize>()
                    .with_context(|| format!("invalid page '{}'", raw))?,
                None => 1,
            };
            match *collection {
                "users" => print_page::<User>(&state, search, page).await?,
                "medicines" => print_page::<Medicine>(&state, search, page).await?,
                "sales" => print_page::<Sale>(&state, search, page).await?,
                "patients" => print_page::<Animal>(&state, search, page).await?,
                "diagnoses" => print_page::<AnimalDiagnosis>(&state, search, page).await?,
                "appointments" => print_page::<Appointment>(&state, search, page).await?,
                "contacts" => print_page::<Contact>(&state, search, page).await?,
                other => bail!("unknown collection '{}'\n\n{}", other, USAGE),
            }
        }
        ["services"] => {
            for service in portal::SERVICES {
                println!(
                    "{:>2}  {:<22} {:<12} {}",
                    service.id, service.name, service.duration, service.description
                );
            }
        }
        ["login", email, password] => {
            let stored = session.login(email, password, role).await?;
            println!("logged in as {} ({:?})", stored.email, stored.role);
        }
        ["register", full_name, email, password] => {
            let stored = session
                .register(full_name, email, password, password, role)
                .await?;
            println!("registered {} ({:?})", stored.email, stored.role);
        }
        ["logout"] => {
            session.logout().await?;
            println!("logged out");
        }
        ["whoami"] => match session.current().await {
            Some(stored) => println!("{} ({:?})", stored.email, stored.role),
            None => println!("not logged in"),
        },
        ["reconcile", rest @ ..] => {
            let action = match rest.first().copied() {
                None | Some("retry") => ReconcileAction::RetrySale,
                Some("restock") => ReconcileAction::Restock,
                Some(other) => bail!("unknown reconcile action '{}'", other),
            };
            let mut ledger = state.open_ledger().await?;
            let report = reconcile(
                &mut ledger,
                &state.collection::<Medicine>(),
                &state.collection::<Sale>(),
                action,
            )
            .await?;
            println!(
                "completed: {}, compensated: {}, discarded: {}, still failing: {}",
                report.completed.len(),
                report.compensated.len(),
                report.discarded.len(),
                report.still_failing.len()
            );
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

async fn print_page<R>(state: &ConsoleState, search: &str, page: usize) -> anyhow::Result<()>
where
    R: Resource + Serialize,
{
    let mut view = state.list_view::<R>();
    view.load().await?;
    view.set_search_term(search);
    view.set_page(page);

    for record in view.current_items() {
        println!("{}", serde_json::to_string(record)?);
    }
    println!(
        "page {}/{} ({} matching, {} total)",
        view.current_page(),
        view.total_pages().max(1),
        view.filtered().len(),
        view.len()
    );
    Ok(())
}

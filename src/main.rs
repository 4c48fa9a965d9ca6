mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use freelancer_crm::aggregation::{dashboard_totals, revenue_series, upcoming_tasks, Snapshot};
use freelancer_crm::config::Config;
use freelancer_crm::models::{format_amount, DueDate};
use freelancer_crm::storage::{SqliteStore, Storage};

use crate::ui::{
    calendar::{CalendarAction, CalendarState, handle_input as handle_calendar_input, render_calendar},
    client_wizard::{ClientWizardAction, ClientWizardState, handle_input as handle_client_wizard_input, render_client_wizard},
    clients::{ClientAction, ClientsState, handle_input as handle_clients_input, render_clients},
    dashboard::{DashboardAction, DashboardState, handle_input as handle_dashboard_input, render_dashboard},
    event_wizard::{EventWizardAction, EventWizardState, handle_input as handle_event_wizard_input, render_event_wizard},
    invoice_wizard::{InvoiceWizardAction, InvoiceWizardState, handle_input as handle_invoice_wizard_input, render_invoice_wizard},
    invoices::{InvoiceAction, InvoicesState, handle_input as handle_invoices_input, render_invoices},
    project_wizard::{ProjectWizardAction, ProjectWizardState, handle_input as handle_project_wizard_input, render_project_wizard},
    projects::{ProjectAction, ProjectsState, handle_input as handle_projects_input, render_projects},
    Tab,
};

#[derive(Parser)]
#[command(name = "freelancer-crm", version, about = "Clients, projects, invoices and events for freelancers")]
struct Cli {
    /// Store to open, overriding DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the terminal dashboard (default)
    Tui,
    /// Create the empty collections and exit
    Init,
    /// Print the dashboard figures and exit
    Summary,
}

// Represents the current screen in the app
enum AppScreen {
    Dashboard,
    Clients,
    ClientWizard,
    Projects,
    ProjectWizard,
    Invoices,
    InvoiceWizard,
    Calendar,
    EventWizard,
}

// Main application state
struct AppState {
    storage: Storage<SqliteStore>,
    config: Config,
    screen: AppScreen,
    dashboard_state: Option<DashboardState>,
    clients_state: Option<ClientsState>,
    client_wizard_state: Option<ClientWizardState>,
    projects_state: Option<ProjectsState>,
    project_wizard_state: Option<ProjectWizardState>,
    invoices_state: Option<InvoicesState>,
    invoice_wizard_state: Option<InvoiceWizardState>,
    calendar_state: Option<CalendarState>,
    event_wizard_state: Option<EventWizardState>,
}

impl AppState {
    fn new(storage: Storage<SqliteStore>, config: Config) -> Self {
        Self {
            storage,
            config,
            screen: AppScreen::Dashboard,
            dashboard_state: None,
            clients_state: None,
            client_wizard_state: None,
            projects_state: None,
            project_wizard_state: None,
            invoices_state: None,
            invoice_wizard_state: None,
            calendar_state: None,
            event_wizard_state: None,
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn init_tracing(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("could not open log file {}", config.log_file))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?.with_database_url(cli.database_url);
    init_tracing(&config)?;

    let store = SqliteStore::new(&config)
        .await
        .with_context(|| format!("could not open store at {}", config.database_url()))?;
    let storage = Storage::new(store);
    storage.seed_collections().await;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Init => {
            println!("Collections ready in {}", config.database_url());
            Ok(())
        }
        Command::Summary => {
            print_summary(&storage, &config).await;
            Ok(())
        }
        Command::Tui => run_tui(AppState::new(storage, config)).await,
    }
}

async fn print_summary(storage: &Storage<SqliteStore>, config: &Config) {
    let today = today();
    let snapshot = Snapshot::load(storage).await;
    let totals = dashboard_totals(&snapshot, config.hours_fallback);

    println!("Total clients:     {}", totals.clients);
    println!("Active projects:   {}", totals.active_projects);
    println!("Pending invoices:  {}", format_amount(totals.pending_invoices));
    println!("Hours tracked:     {}h", totals.hours_tracked);

    println!();
    println!("Upcoming tasks:");
    for task in upcoming_tasks(&snapshot, today) {
        let due = match task.due {
            DueDate::On(date) => date.format("%Y-%m-%d").to_string(),
            DueDate::Unset => DueDate::SENTINEL.to_string(),
        };
        println!("  {:<10}  {:<40} {}", due, task.title, task.status.label());
    }

    println!();
    println!("Revenue:");
    for point in revenue_series(&snapshot.invoices, today) {
        println!("  {} {}  {}", point.name, point.year, format_amount(point.revenue));
    }
}

async fn run_tui(mut app_state: AppState) -> Result<()> {
    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    load_tab(&mut app_state, Tab::Dashboard).await;
    info!("terminal UI started");

    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "terminal UI stopped");
    }
    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| match app_state.screen {
            AppScreen::Dashboard => {
                if let Some(state) = &app_state.dashboard_state {
                    render_dashboard(f, state);
                }
            }
            AppScreen::Clients => {
                if let Some(state) = &mut app_state.clients_state {
                    render_clients(f, state);
                }
            }
            AppScreen::ClientWizard => {
                if let Some(state) = &app_state.client_wizard_state {
                    render_client_wizard(f, state);
                }
            }
            AppScreen::Projects => {
                if let Some(state) = &mut app_state.projects_state {
                    render_projects(f, state);
                }
            }
            AppScreen::ProjectWizard => {
                if let Some(state) = &app_state.project_wizard_state {
                    render_project_wizard(f, state);
                }
            }
            AppScreen::Invoices => {
                if let Some(state) = &mut app_state.invoices_state {
                    render_invoices(f, state);
                }
            }
            AppScreen::InvoiceWizard => {
                if let Some(state) = &app_state.invoice_wizard_state {
                    render_invoice_wizard(f, state);
                }
            }
            AppScreen::Calendar => {
                if let Some(state) = &mut app_state.calendar_state {
                    render_calendar(f, state);
                }
            }
            AppScreen::EventWizard => {
                if let Some(state) = &app_state.event_wizard_state {
                    render_event_wizard(f, state);
                }
            }
        })?;

        // Handle input for current screen
        let should_quit = match app_state.screen {
            AppScreen::Dashboard => handle_dashboard_screen(app_state).await?,
            AppScreen::Clients => handle_clients_screen(app_state).await?,
            AppScreen::ClientWizard => handle_client_wizard_screen(app_state).await?,
            AppScreen::Projects => handle_projects_screen(app_state).await?,
            AppScreen::ProjectWizard => handle_project_wizard_screen(app_state).await?,
            AppScreen::Invoices => handle_invoices_screen(app_state).await?,
            AppScreen::InvoiceWizard => handle_invoice_wizard_screen(app_state).await?,
            AppScreen::Calendar => handle_calendar_screen(app_state).await?,
            AppScreen::EventWizard => handle_event_wizard_screen(app_state).await?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

/// Re-read everything a tab shows and switch to it
async fn load_tab(app_state: &mut AppState, tab: Tab) {
    let storage = &app_state.storage;
    match tab {
        Tab::Dashboard => {
            let snapshot = Snapshot::load(storage).await;
            app_state.dashboard_state = Some(DashboardState::new(
                &snapshot,
                app_state.config.hours_fallback,
                today(),
            ));
            app_state.screen = AppScreen::Dashboard;
        }
        Tab::Clients => {
            let clients = storage.clients().load_all().await;
            app_state.clients_state = Some(ClientsState::new(clients, String::new()));
            app_state.screen = AppScreen::Clients;
        }
        Tab::Projects => {
            let projects = storage.projects().load_all().await;
            app_state.projects_state = Some(ProjectsState::new(projects));
            app_state.screen = AppScreen::Projects;
        }
        Tab::Invoices => {
            let invoices = storage.invoices().load_all().await;
            app_state.invoices_state = Some(InvoicesState::new(invoices, String::new()));
            app_state.screen = AppScreen::Invoices;
        }
        Tab::Calendar => {
            let events = storage.events().load_all().await;
            app_state.calendar_state = Some(CalendarState::new(events, today()));
            app_state.screen = AppScreen::Calendar;
        }
    }
}

async fn handle_dashboard_screen(app_state: &mut AppState) -> Result<bool> {
    match handle_dashboard_input()? {
        Some(DashboardAction::Quit) => return Ok(true),
        Some(DashboardAction::Refresh) => load_tab(app_state, Tab::Dashboard).await,
        Some(DashboardAction::SwitchTab(tab)) => load_tab(app_state, tab).await,
        None => {}
    }

    Ok(false)
}

async fn handle_clients_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.clients_state {
        match handle_clients_input(state)? {
            Some(ClientAction::Quit) => return Ok(true),
            Some(ClientAction::SwitchTab(tab)) => load_tab(app_state, tab).await,
            Some(ClientAction::Search(query)) => {
                let clients = app_state.storage.clients().search(&query).await;
                state.set_clients(clients);
            }
            Some(ClientAction::NewClient) => {
                app_state.client_wizard_state = Some(ClientWizardState::new());
                app_state.screen = AppScreen::ClientWizard;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_client_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.client_wizard_state {
        match handle_client_wizard_input(state)? {
            Some(ClientWizardAction::Cancel) => load_tab(app_state, Tab::Clients).await,
            Some(ClientWizardAction::Save(client)) => {
                let clients = app_state.storage.clients().add(client).await;
                app_state.clients_state = Some(ClientsState::new(clients, String::new()));
                app_state.client_wizard_state = None;
                app_state.screen = AppScreen::Clients;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_projects_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.projects_state {
        match handle_projects_input(state)? {
            Some(ProjectAction::Quit) => return Ok(true),
            Some(ProjectAction::SwitchTab(tab)) => load_tab(app_state, tab).await,
            Some(ProjectAction::NewProject) => {
                let names = app_state.storage.clients().names().await;
                app_state.project_wizard_state = Some(ProjectWizardState::new(names, today()));
                app_state.screen = AppScreen::ProjectWizard;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_project_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.project_wizard_state {
        match handle_project_wizard_input(state)? {
            Some(ProjectWizardAction::Cancel) => load_tab(app_state, Tab::Projects).await,
            Some(ProjectWizardAction::Save(project)) => {
                let projects = app_state.storage.projects().add(project).await;
                app_state.projects_state = Some(ProjectsState::new(projects));
                app_state.project_wizard_state = None;
                app_state.screen = AppScreen::Projects;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_invoices_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.invoices_state {
        match handle_invoices_input(state)? {
            Some(InvoiceAction::Quit) => return Ok(true),
            Some(InvoiceAction::SwitchTab(tab)) => load_tab(app_state, tab).await,
            Some(InvoiceAction::Search(query)) => {
                let invoices = app_state.storage.invoices().search(&query).await;
                state.set_invoices(invoices);
            }
            Some(InvoiceAction::NewInvoice) => {
                match app_state.storage.invoices().next_id().await {
                    Some(id) => {
                        let names = app_state.storage.clients().names().await;
                        app_state.invoice_wizard_state = Some(InvoiceWizardState::new(id, names, today()));
                        app_state.screen = AppScreen::InvoiceWizard;
                    }
                    None => {
                        warn!("invoice numbers exhausted");
                        state.set_notice("No invoice numbers left to assign");
                    }
                }
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_invoice_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.invoice_wizard_state {
        match handle_invoice_wizard_input(state)? {
            Some(InvoiceWizardAction::Cancel) => load_tab(app_state, Tab::Invoices).await,
            Some(InvoiceWizardAction::Save(invoice)) => {
                let invoices = app_state.storage.invoices().add(invoice).await;
                app_state.invoices_state = Some(InvoicesState::new(invoices, String::new()));
                app_state.invoice_wizard_state = None;
                app_state.screen = AppScreen::Invoices;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_calendar_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.calendar_state {
        match handle_calendar_input(state)? {
            Some(CalendarAction::Quit) => return Ok(true),
            Some(CalendarAction::SwitchTab(tab)) => load_tab(app_state, tab).await,
            Some(CalendarAction::NewEvent) => {
                app_state.event_wizard_state = Some(EventWizardState::new(today()));
                app_state.screen = AppScreen::EventWizard;
            }
            Some(CalendarAction::DeleteEvent(id)) => {
                let events = app_state.storage.events().remove(id).await;
                app_state.calendar_state = Some(CalendarState::new(events, today()));
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_event_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.event_wizard_state {
        match handle_event_wizard_input(state)? {
            Some(EventWizardAction::Cancel) => load_tab(app_state, Tab::Calendar).await,
            Some(EventWizardAction::Save(event)) => {
                let events = app_state.storage.events().add(event).await;
                app_state.calendar_state = Some(CalendarState::new(events, today()));
                app_state.event_wizard_state = None;
                app_state.screen = AppScreen::Calendar;
            }
            None => {}
        }
    }

    Ok(false)
}

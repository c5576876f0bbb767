//! Command-line console over the client library

use std::sync::Arc;
use std::time::Duration;
use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use vip_transfer::{
    config::Settings,
    models::{
        AuditRange, DriverDraft, DriverStatus, EventForm, GuestForm, GuestStatus, User, UserDraft,
        UserRole, VehicleType,
    },
    session::{AuthContext, FileStorage, Landing},
    utils::helpers::truncate_text,
    views::{
        AuthFlows, DashboardView, DriverPortalView, DriversView, EventDetailView, EventsView,
        GuestsView, HasBadge, Notice, NoticeLevel, Notifier, ReportsView, SettingsView, SortOrder,
        UsersView, ViewContext, DECLINE_REASON_KEYS,
    },
    Visibility,
};

#[derive(Parser, Debug)]
#[command(name = "vip-transfer", version, about = "VIP transfer admin console and driver portal")]
pub struct Cli {
    /// Interface language (az, en, ru, tr); saved for later runs
    #[arg(long, global = true)]
    pub lang: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        role: Option<UserRole>,
        /// Keep the token in memory only
        #[arg(long)]
        session_only: bool,
    },
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Create the first administrator
    Setup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        repeat: String,
    },
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        repeat: String,
    },
    #[command(subcommand)]
    Events(EventsCommand),
    #[command(subcommand)]
    Guests(GuestsCommand),
    /// Assign a driver to a guest of an event
    Assign {
        #[arg(long)]
        event: String,
        #[arg(long)]
        guest: String,
        #[arg(long)]
        driver: String,
    },
    /// Remove a guest's driver
    Unassign {
        #[arg(long)]
        event: String,
        #[arg(long)]
        guest: String,
    },
    #[command(subcommand)]
    Drivers(DriversCommand),
    #[command(subcommand)]
    Users(UsersCommand),
    /// The signed-in driver's tasks
    Tasks {
        #[arg(long)]
        watch: bool,
    },
    #[command(subcommand)]
    Task(TaskCommand),
    /// Go offline with a reason (index into the reason list, 1-9)
    Busy {
        #[arg(default_value_t = 1)]
        reason: usize,
    },
    /// Become available again
    Free,
    Reports,
    Dashboard,
    /// List login sessions, or terminate one
    Sessions {
        #[arg(long)]
        terminate: Option<String>,
    },
    AuditLogs {
        #[arg(long)]
        limit: Option<u32>,
        /// Export instead of listing: today, week, month or all
        #[arg(long)]
        export: Option<AuditRange>,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum EventsCommand {
    List(ListArgs),
    Show {
        id: String,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<GuestStatus>,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete {
        id: String,
    },
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum GuestsCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<GuestStatus>,
    },
    Add {
        #[arg(long)]
        event: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        pickup: String,
        #[arg(long)]
        dropoff: String,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DriversCommand {
    List(ListArgs),
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        repeat: String,
        #[arg(long, default_value = "sedan")]
        vehicle_type: VehicleType,
        #[arg(long)]
        vehicle_model: String,
        #[arg(long)]
        plate: String,
    },
    Delete {
        id: String,
    },
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        repeat: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, default_value = "user")]
        role: UserRole,
        #[arg(long)]
        inactive: bool,
    },
    /// Activate or deactivate an account
    Toggle {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Move a task to its next status
    Advance { id: String },
    /// Decline a pending task (reason index 1-9)
    Decline {
        id: String,
        #[arg(long, default_value_t = 1)]
        reason: usize,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub search: Option<String>,
    /// newest, a-z or z-a
    #[arg(long, default_value = "newest")]
    pub sort: SortOrder,
}

/// Prints notices the way the web console shows toasts
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("[ok] {}", notice.message),
            NoticeLevel::Error => eprintln!("[error] {}", notice.message),
            NoticeLevel::Info => println!("[info] {}", notice.message),
        }
    }
}

/// Everything a command needs, wired from settings
pub struct App {
    pub settings: Settings,
    pub ctx: ViewContext,
    pub auth: Arc<AuthContext>,
    pub storage: Arc<FileStorage>,
}

impl App {
    /// Restore the stored session or fail with a hint to log in
    async fn require_user(&self) -> anyhow::Result<User> {
        self.auth
            .restore()
            .await?
            .ok_or_else(|| anyhow!("Not signed in. Run `vip-transfer login` first."))
    }

    async fn require_driver(&self) -> anyhow::Result<User> {
        let user = self.require_user().await?;
        if Landing::for_role(user.role) != Landing::DriverPortal {
            bail!("This command is for drivers; {} is signed in as {}", user.email, user.role);
        }
        Ok(user)
    }

    fn status_label(&self, badge: impl HasBadge) -> String {
        badge.badge().label(&self.ctx.i18n, &self.ctx.language())
    }
}

pub async fn run(cli: Cli, app: App) -> anyhow::Result<()> {
    if let Some(lang) = cli.lang.as_deref() {
        app.ctx.i18n.save_language(app.storage.as_ref(), lang)?;
        app.ctx.set_language(lang);
    }

    match cli.command {
        Command::Login {
            email,
            password,
            role,
            session_only,
        } => {
            let flows = AuthFlows::new(app.ctx.clone(), app.auth.clone());
            let (user, landing) = flows.login(&email, &password, role, !session_only).await?;
            let destination = match landing {
                Landing::AdminConsole => "admin console",
                Landing::DriverPortal => "driver portal",
            };
            println!("Signed in as {} ({}), {}", user.name, user.role, destination);
        }
        Command::Logout => {
            app.auth.logout()?;
            println!("Signed out");
        }
        Command::Whoami => {
            let user = app.require_user().await?;
            println!("{} <{}> role={} active={}", user.name, user.email, user.role, user.active());
        }
        Command::Setup {
            name,
            email,
            password,
            repeat,
        } => {
            let flows = AuthFlows::new(app.ctx.clone(), app.auth.clone());
            if flows.setup_status().await {
                bail!("Setup is already complete");
            }
            let user = flows.setup(&name, &email, &password, &repeat).await?;
            println!("Administrator {} created", user.email);
        }
        Command::ForgotPassword { email } => {
            AuthFlows::new(app.ctx.clone(), app.auth.clone())
                .forgot_password(&email)
                .await?;
        }
        Command::ResetPassword {
            token,
            password,
            repeat,
        } => {
            AuthFlows::new(app.ctx.clone(), app.auth.clone())
                .reset_password(&token, &password, &repeat)
                .await?;
        }
        Command::Events(command) => {
            app.require_user().await?;
            run_events(&app, command).await?;
        }
        Command::Guests(command) => {
            app.require_user().await?;
            run_guests(&app, command).await?;
        }
        Command::Assign { event, guest, driver } => {
            app.require_user().await?;
            let view = EventDetailView::new(app.ctx.clone(), event);
            view.reload().await?;
            let sms = view.assign_driver(&guest, &driver).await?;
            println!("SMS preview:\n{}", sms);
        }
        Command::Unassign { event, guest } => {
            app.require_user().await?;
            let view = EventDetailView::new(app.ctx.clone(), event);
            view.reload().await?;
            view.unassign_driver(&guest).await?;
        }
        Command::Drivers(command) => {
            app.require_user().await?;
            run_drivers(&app, command).await?;
        }
        Command::Users(command) => {
            app.require_user().await?;
            run_users(&app, command).await?;
        }
        Command::Tasks { watch } => {
            let driver = app.require_driver().await?;
            let view = DriverPortalView::new(app.ctx.clone(), driver.id);
            if watch {
                let visibility = Visibility::new(true);
                let subscription = view.mount(&visibility);
                watch_until_ctrl_c(app.settings.poll_interval(), || print_tasks(&app, &view)).await?;
                subscription.unsubscribe();
            } else {
                view.reload().await?;
                print_tasks(&app, &view);
            }
        }
        Command::Task(command) => {
            let driver = app.require_driver().await?;
            let view = DriverPortalView::new(app.ctx.clone(), driver.id);
            view.reload().await?;
            match command {
                TaskCommand::Advance { id } => {
                    let status = view.advance(&id).await?;
                    println!("{} -> {}", id, app.status_label(status));
                }
                TaskCommand::Decline { id, reason } => {
                    view.decline(&id, reason_key(reason)?).await?;
                }
            }
        }
        Command::Busy { reason } => {
            let driver = app.require_driver().await?;
            DriverPortalView::new(app.ctx.clone(), driver.id)
                .set_busy(reason_key(reason)?)
                .await?;
        }
        Command::Free => {
            let driver = app.require_driver().await?;
            DriverPortalView::new(app.ctx.clone(), driver.id).set_free().await?;
        }
        Command::Reports => {
            app.require_user().await?;
            let view = ReportsView::new(app.ctx.clone());
            let report = view.load().await?;
            println!("Completed transfers this week: {}", report.completed_transfers);
            println!("Guests served: {}", report.total_guests_served);
            println!(
                "Events: {} active, {} completed, {} in progress, {} planning",
                report.active_events,
                report.completed_events,
                report.in_progress_events,
                report.planning_events
            );
            println!(
                "Drivers: {} working today, {} available",
                report.drivers_working_today, report.available_drivers
            );
            for bar in &report.weekly {
                println!("  {:<12} {}", bar.label, bar.transfers);
            }
            for slice in &report.vehicles {
                println!("  {:<12} {}", view.vehicle_label(slice.vehicle_type), slice.count);
            }
            for guest in &report.recent_guests {
                println!("  {} {}", guest.name, app.status_label(guest.status));
            }
        }
        Command::Dashboard => {
            app.require_user().await?;
            let snapshot = DashboardView::new(app.ctx.clone()).load().await?;
            let stats = &snapshot.stats;
            println!(
                "Events: {} total, {} today | Guests: {} | Active transfers: {} | Drivers on route: {}",
                stats.total_events,
                stats.today_events,
                stats.total_guests,
                stats.active_transfers,
                stats.drivers_on_route
            );
            for event in &snapshot.today_events {
                println!("  {} {} {}", event.time, event.name, app.status_label(event.status));
            }
            for driver in &snapshot.drivers_on_trip {
                println!("  {} ({})", driver.name, driver.license_plate);
            }
        }
        Command::Sessions { terminate } => {
            app.require_user().await?;
            let view = SettingsView::new(app.ctx.clone());
            match terminate {
                Some(id) => view.terminate_session(&id).await?,
                None => {
                    for session in view.sessions().await? {
                        println!("{}  {}  {}", session.id, session.device, session.last_active);
                    }
                }
            }
        }
        Command::AuditLogs { limit, export } => {
            app.require_user().await?;
            let view = SettingsView::new(app.ctx.clone());
            match export {
                Some(range) => println!("{}", view.export(range).await?),
                None => {
                    for log in view.audit_logs(limit).await? {
                        println!("{}  {}  {}", log.timestamp, log.user, log.action);
                    }
                }
            }
        }
        Command::Config => {
            let rendered = toml::to_string_pretty(&app.settings).context("Failed to render settings")?;
            println!("# api base url: {}\n{}", app.settings.api_base_url(), rendered);
        }
    }

    Ok(())
}

async fn run_events(app: &App, command: EventsCommand) -> anyhow::Result<()> {
    match command {
        EventsCommand::List(args) => {
            let view = EventsView::new(app.ctx.clone());
            view.reload().await?;
            view.set_search(args.search.as_deref().unwrap_or_default());
            view.set_sort(args.sort);
            print_events(app, &view);
        }
        EventsCommand::Watch => {
            let view = EventsView::new(app.ctx.clone());
            let subscription = view.mount();
            watch_until_ctrl_c(app.settings.poll_interval(), || print_events(app, &view)).await?;
            subscription.unsubscribe();
        }
        EventsCommand::Show { id, search, status } => {
            let view = EventDetailView::new(app.ctx.clone(), id);
            view.reload().await?;
            view.set_search(search.as_deref().unwrap_or_default());
            view.set_status_filter(status);
            let state = view.state();
            if let Some(event) = &state.event {
                println!("{} | {} {} | {} | {}", event.name, event.date, event.time, event.address, app.status_label(event.status));
            }
            for guest in view.visible_guests() {
                let driver = guest
                    .assigned_driver()
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {:<24} {:<16} {:<14} {}",
                    guest.id,
                    truncate_text(&guest.name, 16),
                    app.status_label(guest.status),
                    driver
                );
            }
            println!("Available drivers: {}", state.drivers.len());
        }
        EventsCommand::Create {
            name,
            date,
            time,
            address,
            notes,
        } => {
            let event = EventsView::new(app.ctx.clone())
                .create_event(EventForm {
                    name,
                    date,
                    time,
                    address,
                    notes,
                })
                .await?;
            println!("{}", event.id);
        }
        EventsCommand::Delete { id } => {
            EventsView::new(app.ctx.clone()).delete_event(&id).await?;
        }
    }
    Ok(())
}

async fn run_guests(app: &App, command: GuestsCommand) -> anyhow::Result<()> {
    let view = GuestsView::new(app.ctx.clone());
    match command {
        GuestsCommand::List { search, status } => {
            view.load().await?;
            view.set_search(search.as_deref().unwrap_or_default());
            view.set_status_filter(status);
            for guest in view.visible_guests() {
                println!(
                    "{:<24} {:<20} {:<16} {:<14} {}",
                    guest.id,
                    truncate_text(&guest.name, 20),
                    guest.phone,
                    app.status_label(guest.status),
                    view.event_name(&guest).unwrap_or_default()
                );
            }
        }
        GuestsCommand::Add {
            event,
            name,
            phone,
            pickup,
            dropoff,
            notes,
        } => {
            let guest = view
                .add_guest(GuestForm {
                    name,
                    phone,
                    pickup_address: pickup,
                    dropoff_address: dropoff,
                    notes,
                    event_id: Some(event),
                })
                .await?;
            println!("{}", guest.id);
        }
        GuestsCommand::Delete { id } => view.delete_guest(&id).await?,
    }
    Ok(())
}

async fn run_drivers(app: &App, command: DriversCommand) -> anyhow::Result<()> {
    let view = DriversView::new(app.ctx.clone());
    match command {
        DriversCommand::List(args) => {
            view.reload().await?;
            view.set_search(args.search.as_deref().unwrap_or_default());
            view.set_sort(args.sort);
            print_drivers(app, &view);
        }
        DriversCommand::Watch => {
            let subscription = view.mount();
            watch_until_ctrl_c(app.settings.poll_interval(), || print_drivers(app, &view)).await?;
            subscription.unsubscribe();
        }
        DriversCommand::Add {
            name,
            phone,
            email,
            password,
            repeat,
            vehicle_type,
            vehicle_model,
            plate,
        } => {
            let driver = view
                .add_driver(DriverDraft {
                    name,
                    phone,
                    email,
                    password,
                    repeat_password: repeat,
                    vehicle_type,
                    vehicle_model,
                    license_plate: plate,
                })
                .await?;
            println!("{}", driver.id);
        }
        DriversCommand::Delete { id } => view.delete_driver(&id).await?,
    }
    Ok(())
}

async fn run_users(app: &App, command: UsersCommand) -> anyhow::Result<()> {
    let view = UsersView::new(app.ctx.clone());
    match command {
        UsersCommand::List { search } => {
            view.load().await?;
            view.set_search(search.as_deref().unwrap_or_default());
            for user in view.visible_users() {
                println!(
                    "{:<24} {:<20} {:<28} {:<6} {}",
                    user.id,
                    truncate_text(&user.name, 20),
                    user.email,
                    user.role,
                    if user.active() { "active" } else { "inactive" }
                );
            }
        }
        UsersCommand::Create {
            name,
            email,
            password,
            repeat,
            phone,
            role,
            inactive,
        } => {
            let user = view
                .create_user(UserDraft {
                    name,
                    email,
                    password,
                    repeat_password: repeat,
                    phone,
                    role,
                    is_active: !inactive,
                    module_access: None,
                })
                .await?;
            println!("{}", user.id);
        }
        UsersCommand::Toggle { id } => {
            view.load().await?;
            let active = view.toggle_active(&id).await?;
            println!("{} is now {}", id, if active { "active" } else { "inactive" });
        }
    }
    Ok(())
}

fn print_events(app: &App, view: &EventsView) {
    for event in view.visible_events() {
        println!(
            "{:<24} {:<28} {} {} {:<14} {} guests",
            event.id,
            truncate_text(&event.name, 28),
            event.date,
            event.time,
            app.status_label(event.status),
            event.guest_count
        );
    }
}

fn print_drivers(app: &App, view: &DriversView) {
    let state = view.state();
    println!(
        "{} available, {} on trip, {} offline",
        state.count_with_status(DriverStatus::Available),
        state.count_with_status(DriverStatus::OnTrip),
        state.count_with_status(DriverStatus::Offline)
    );
    for driver in view.visible_drivers() {
        println!(
            "{:<24} {:<20} {:<16} {:<10} {:<14} {}",
            driver.id,
            truncate_text(&driver.name, 20),
            driver.phone,
            driver.license_plate,
            app.status_label(driver.status),
            driver.busy_reason.as_deref().unwrap_or_default()
        );
    }
}

fn print_tasks(app: &App, view: &DriverPortalView) {
    for transfer in view.active_tasks() {
        let guest = transfer.guest().map(|g| g.name.as_str()).unwrap_or("-");
        println!(
            "{:<24} {:<20} {:<14} {:<16} {}",
            transfer.id,
            truncate_text(guest, 20),
            app.status_label(transfer.status),
            view.action_label(&transfer).unwrap_or_default(),
            view.navigation_link(&transfer).unwrap_or_default()
        );
    }
    let completed = view.completed_tasks().len();
    if completed > 0 {
        println!("{} completed", completed);
    }
}

fn reason_key(index: usize) -> anyhow::Result<&'static str> {
    index
        .checked_sub(1)
        .and_then(|i| DECLINE_REASON_KEYS.get(i))
        .copied()
        .ok_or_else(|| anyhow!("Reason must be between 1 and {}", DECLINE_REASON_KEYS.len()))
}

/// Re-render at the poll interval until Ctrl-C
async fn watch_until_ctrl_c<F: Fn()>(interval: Duration, render: F) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                println!("--- {}", chrono::Local::now().format("%H:%M:%S"));
                render();
            }
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl-C")?;
                return Ok(());
            }
        }
    }
}


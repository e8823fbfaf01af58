use std::{future::IntoFuture, process, sync::Arc};

use bulletin::{
    application::{
        admin::{audit::AdminAuditService, contacts::AdminContactService},
        contact_form::ContactFormService,
        error::AppError,
        news::NewsService,
        repos::{
            AuditRepo, CategoriesRepo, ContactQueryFilter, ContactSort, ContactsRepo,
            ContactsWriteRepo, HealthRepo, NewsRepo,
        },
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, PublicState},
        telemetry,
    },
};
use tokio::{sync::watch, try_join};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::ExportContacts(args) => run_export_contacts(settings, args).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let app = build_application_context(repositories, &settings);
    serve_http(&settings, app.public_state, app.admin_state).await
}

async fn run_export_contacts(
    settings: config::Settings,
    args: config::ExportContactsArgs,
) -> Result<(), AppError> {
    let filter = ContactQueryFilter::from_params(
        args.status.as_deref(),
        args.search.as_deref(),
        args.month.as_deref(),
    )?;
    let sort = ContactSort::from_param(Some(&args.sort))?;

    let repositories = init_repositories(&settings).await?;
    let app = build_application_context(repositories, &settings);
    let bytes = app.admin_state.contacts.export(&filter, sort).await?;

    tokio::fs::write(&args.file, &bytes)
        .await
        .map_err(|err| AppError::from(InfraError::Io(err)))?;

    info!(
        target = "bulletin::export",
        path = %args.file.display(),
        bytes = bytes.len(),
        "contact export written"
    );
    Ok(())
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    init_repositories(&settings).await?;
    info!(target = "bulletin::migrate", "database migrations applied");
    Ok(())
}

struct ApplicationContext {
    public_state: PublicState,
    admin_state: AdminState,
}

/// Connect, apply pending migrations and wrap the pool.
async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool =
        PostgresRepositories::connect(database_url, settings.database.max_connections.get())
            .await
            .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> ApplicationContext {
    let contacts_repo: Arc<dyn ContactsRepo> = repositories.clone();
    let contacts_write_repo: Arc<dyn ContactsWriteRepo> = repositories.clone();
    let categories_repo: Arc<dyn CategoriesRepo> = repositories.clone();
    let news_repo: Arc<dyn NewsRepo> = repositories.clone();
    let audit_repo: Arc<dyn AuditRepo> = repositories.clone();
    let health_repo: Arc<dyn HealthRepo> = repositories;

    let audit = AdminAuditService::new(audit_repo);
    let contacts = Arc::new(AdminContactService::new(
        contacts_repo,
        contacts_write_repo.clone(),
        audit.clone(),
        settings.admin.page_size.get(),
    ));
    let contact_form = Arc::new(ContactFormService::new(contacts_write_repo, audit));
    let news = Arc::new(NewsService::new(categories_repo, news_repo));

    ApplicationContext {
        public_state: PublicState {
            health: health_repo.clone(),
            news,
            contact_form,
        },
        admin_state: AdminState {
            health: health_repo,
            contacts,
        },
    }
}

async fn serve_http(
    settings: &config::Settings,
    public_state: PublicState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_public_router(public_state);
    let admin_router = http::build_admin_router(admin_state);

    let public_addr = settings.server.public_addr;
    let admin_addr = settings.server.admin_addr;
    let public_listener = tokio::net::TcpListener::bind(public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::bind(public_addr, err)))?;
    let admin_listener = tokio::net::TcpListener::bind(admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::bind(admin_addr, err)))?;

    info!(
        target = "bulletin::serve",
        public = %public_addr,
        admin = %admin_addr,
        "listeners bound"
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let public_server = axum::serve(public_listener, public_router.into_make_service())
        .with_graceful_shutdown(wait_for_stop(stop_rx.clone()))
        .into_future();
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service())
        .with_graceful_shutdown(wait_for_stop(stop_rx))
        .into_future();

    let servers = async { try_join!(public_server, admin_server) };
    tokio::pin!(servers);

    let result = tokio::select! {
        result = &mut servers => result,
        () = shutdown_signal() => {
            info!(target = "bulletin::serve", "shutdown requested, draining connections");
            let _ = stop_tx.send(true);
            match tokio::time::timeout(settings.server.graceful_shutdown, &mut servers).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        target = "bulletin::serve",
                        timeout_secs = settings.server.graceful_shutdown.as_secs(),
                        "graceful shutdown timed out"
                    );
                    Ok(((), ()))
                }
            }
        }
    };

    result
        .map(|_| ())
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}

async fn wait_for_stop(mut stop: watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

use std::{process, sync::Arc};

use folio::{
    application::{
        bootstrap::Bootstrap,
        contact::ContactService,
        content::{ContentStore, ContentSummary},
        error::AppError,
        lightbox::LightboxService,
        site,
    },
    config,
    infra::{
        assets::{SiteAssets, public_bundle},
        content_source,
        error::InfraError,
        http::{self, HttpState},
        relay::HttpContactRelay,
        telemetry,
    },
};
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
        config::Command::Build(args) => run_build(settings, args).await,
        config::Command::Check(_) => run_check(settings).await,
    }
}

fn content_store(settings: &config::Settings) -> Result<Arc<ContentStore>, AppError> {
    let source = content_source::source_for(&settings.site.content)?;
    Ok(Arc::new(ContentStore::new(source)))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let store = content_store(&settings)?;

    // A broken document is reported per request; serving still starts.
    if let Err(err) = store.load().await {
        warn!(
            target = "folio::serve",
            error = %err,
            "content not available at startup"
        );
    }

    let relay = HttpContactRelay::new(settings.contact.endpoint.clone(), settings.contact.timeout)?;
    let state = HttpState {
        bootstrap: Arc::new(Bootstrap::new(store.clone())),
        lightbox: Arc::new(LightboxService::new(store)),
        contact: Arc::new(ContactService::new(Arc::new(relay))),
        site_assets: SiteAssets::new(&settings.site.root),
    };

    serve_http(&settings, state).await
}

async fn run_build(settings: config::Settings, args: config::BuildArgs) -> Result<(), AppError> {
    let store = content_store(&settings)?;
    let bootstrap = Bootstrap::new(store);

    info!(
        target = "folio::build",
        out_dir = %args.out_dir.display(),
        site_root = %settings.site.root.display(),
        "Starting static export"
    );

    let summary = site::export_site(
        &bootstrap,
        public_bundle(),
        &settings.site.root,
        &args.out_dir,
        &settings.contact.endpoint,
    )
    .await?;
    info!(
        target = "folio::build",
        pages = summary.pages,
        "Export completed"
    );
    Ok(())
}

async fn run_check(settings: config::Settings) -> Result<(), AppError> {
    let store = content_store(&settings)?;
    let document = store.load().await?;
    let summary = ContentSummary::of(&document);

    info!(
        target = "folio::check",
        social_links = summary.social_links,
        experiences = summary.experiences,
        institutions = summary.institutions,
        skills = summary.skills,
        articles = summary.articles,
        gallery_images = summary.gallery_images,
        contact_form = summary.has_contact,
        "content document is valid"
    );
    if summary.gallery_skipped > 0 {
        warn!(
            target = "folio::check",
            skipped = summary.gallery_skipped,
            "gallery entries without a usable image were skipped"
        );
    }
    Ok(())
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "folio::serve",
        addr = %settings.server.addr,
        "Listening"
    );

    let mut server = tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    tokio::select! {
        joined = &mut server => return server_result(joined),
        () = shutdown_signal() => {}
    }

    info!(
        target = "folio::serve",
        grace_seconds = settings.server.graceful_shutdown.as_secs(),
        "Shutting down"
    );
    match tokio::time::timeout(settings.server.graceful_shutdown, server).await {
        Ok(joined) => server_result(joined),
        Err(_) => {
            warn!(
                target = "folio::serve",
                "connections still open after grace period; exiting"
            );
            Ok(())
        }
    }
}

fn server_result(
    joined: Result<Result<(), std::io::Error>, tokio::task::JoinError>,
) -> Result<(), AppError> {
    match joined {
        Ok(result) => result.map_err(|err| AppError::unexpected(format!("server error: {err}"))),
        Err(err) => Err(AppError::unexpected(format!("server task failed: {err}"))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(target = "folio::serve", error = %err, "ctrl-c handler unavailable");
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
                warn!(target = "folio::serve", error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

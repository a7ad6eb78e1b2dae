pub mod db;
pub mod email;
pub mod model;
pub mod services;
pub mod utils;

use db::mongo;
use dotenv::dotenv;
use std::sync::Arc;
use utils::errors::DoormanError;
use utils::context::ServiceContext;
use utils::config::{Configuration, self};
use email::senders::smtp::SmtpSender;
use tracing_subscriber::{prelude::__tracing_subscriber_SubscriberExt, Registry, util::SubscriberInitExt};

const APP_NAME: &str = "Doorman";

///
/// Wire the service up against its real collaborators: MongoDB for the OTP
/// and user records, an SMTP relay for delivery.
///
/// The embedding application calls this once at start-up and shares the
/// returned context across requests. Tests skip this and build a context
/// over the in-memory stores instead.
///
pub async fn connect() -> Result<Arc<ServiceContext>, DoormanError> {

    // A .env file can supply local dev settings.
    dotenv().ok();

    // INFO unless the environment says otherwise.
    config::default_env("RUST_LOG", "INFO");

    init_tracing();

    let config = Configuration::from_env()?;

    tracing::info!("{}\n{}", APP_NAME, config.fmt_console()?);

    // Connect and ping MongoDB before anything else - there is no point
    // building the rest if the store isn't there.
    let db = mongo::get_mongo_db(APP_NAME, &config).await?;

    // Ensure the indexes we rely on exist before we take traffic.
    mongo::update_mongo(&db).await?;

    // The mailer is built last - it reads its credentials from disk too.
    let mailer = SmtpSender::from_config(&config)?;

    Ok(Arc::new(ServiceContext::new(
        config,
        Arc::new(db::otp::MongoOtpStore::new(db.clone())),
        Arc::new(db::user::MongoUserStore::new(db)),
        Arc::new(mailer))))
}

///
/// Plain console tracing, filtered by the RUST_LOG env variable.
///
pub fn init_tracing() {
    let result = Registry::default()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_test_writer().with_ansi(true))
        .try_init();

    if let Err(err) = result {
        // Tests call this repeatedly - only the first call can win.
        tracing::debug!("Tracing already initialised: {}", err.to_string());
    }
}

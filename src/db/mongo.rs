use std::fs;
use tracing::info;
use crate::db::prelude::*;
use crate::utils::errors::DoormanError;
use crate::utils::config::Configuration;
use mongodb::{Client, Database, bson::{Document, doc}, options::{ClientOptions, UpdateOptions}};

///
/// Bring the database up to the shape the stores expect.
///
pub async fn update_mongo(db: &Database) -> Result<(), DoormanError> {
    create_init_indexes(db).await?;
    Ok(())
}

///
/// The unique index on the email field is what enforces the one-pending-code
/// -per-address invariant, so it must exist before any traffic is taken.
///
async fn create_init_indexes(db: &Database) -> Result<(), DoormanError> {
    // This driver version has no createIndexes helper on collections - the raw
    // dbcommand is used instead.
    // https://docs.mongodb.com/manual/reference/command/createIndexes/#createindexes
    db.run_command(doc! { "createIndexes": OTP_CODES, "indexes": [
        { "key": { EMAIL: 1 }, "name": "idx_email", "unique": true }] }, None).await?;

    db.run_command(doc! { "createIndexes": USERS, "indexes": [
        { "key": { USER_ID: 1 }, "name": "idx_user_id", "unique": true },
        { "key": { EMAIL: 1 }, "name": "idx_email", "unique": true }] }, None).await?;

    Ok(())
}

///
/// Build a client from the configured uri and prove the server is reachable
/// with a ping before handing the database out.
///
pub async fn get_mongo_db(app_name: &str, config: &Configuration) -> Result<Database, DoormanError> {
    let username = read_secret("secrets/mongodb_username")?;
    let password = read_secret("secrets/mongodb_password")?;

    let uri = config.mongo_uri
        .replace("$USERNAME", &username)
        .replace("$PASSWORD", &password);

    let mut client_options = ClientOptions::parse(&uri).await?;
    client_options.app_name = Some(app_name.to_string());

    let client = Client::with_options(client_options)?;

    info!("Connecting to MongoDB...");

    let db = client.database(&config.db_name);
    ping(&db).await?;

    info!("Connected to MongoDB");
    Ok(db)
}

pub async fn ping(db: &Database) -> Result<Document, DoormanError> {
    Ok(db.run_command(doc! { "ping": 1 }, None).await?)
}

///
/// Credentials are mounted as individual files under secrets/ - they are never
/// carried in the config struct or the environment.
///
fn read_secret(filename: &str) -> Result<String, DoormanError> {
    let value = fs::read_to_string(filename)
        .map_err(|err| DoormanError::Internal(format!("Unable to read credentials from {}: {}", filename, err)))?;

    Ok(value.trim().to_string())
}

pub fn upsert() -> UpdateOptions {
    UpdateOptions::builder().upsert(true).build()
}

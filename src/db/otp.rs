use async_trait::async_trait;
use bson::{Document, doc};
use mongodb::Database;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use crate::db::{mongo, OtpStore};
use crate::db::prelude::*;
use crate::model::otp::OtpRecord;
use crate::utils::errors::DoormanError;

///
/// Pending codes persisted in the OtpCodes collection.
///
/// The unique index on the email field (created at start-up) is what enforces
/// the one-record-per-address invariant; everything here updates through
/// single-document operations, which MongoDB applies atomically.
///
pub struct MongoOtpStore {
    db: Database,
}

impl MongoOtpStore {
    pub fn new(db: Database) -> Self {
        MongoOtpStore { db }
    }
}

#[async_trait]
impl OtpStore for MongoOtpStore {
    async fn find(&self, email: &str) -> Result<Option<OtpRecord>, DoormanError> {
        let filter = doc!{ EMAIL: email };

        Ok(self.db.collection::<OtpRecord>(OTP_CODES).find_one(filter, None).await?)
    }

    async fn upsert(&self, record: &OtpRecord) -> Result<(), DoormanError> {
        let filter = doc!{ EMAIL: &record.email };

        let update = doc!{
            "$set": {
                EMAIL: &record.email,
                CODE_PHC: &record.code_phc,
                EXPIRES_AT: bson::DateTime::from_chrono(record.expires_at),
                ATTEMPTS: record.attempts as i32,
                VERIFIED: record.verified,
                LAST_SENT_AT: bson::DateTime::from_chrono(record.last_sent_at),
            }
        };

        self.db.collection::<Document>(OTP_CODES).update_one(filter, update, mongo::upsert())
            .await?;

        Ok(())
    }

    async fn increment_attempts(&self, email: &str) -> Result<u32, DoormanError> {
        let filter = doc!{ EMAIL: email };
        let update = doc!{ "$inc": { ATTEMPTS: 1 } };

        // Increment-and-read in one document operation so two concurrent
        // verifies cannot observe the same count.
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        match self.db.collection::<OtpRecord>(OTP_CODES).find_one_and_update(filter, update, options).await? {
            Some(record) => Ok(record.attempts),
            None => Err(DoormanError::NotFound),
        }
    }

    async fn mark_verified(&self, email: &str) -> Result<(), DoormanError> {
        let filter = doc!{ EMAIL: email };
        let update = doc!{ "$set": { VERIFIED: true } };

        let result = self.db.collection::<Document>(OTP_CODES).update_one(filter, update, None)
            .await?;

        match result.matched_count {
            0 => Err(DoormanError::NotFound),
            _ => Ok(()),
        }
    }

    async fn delete(&self, email: &str) -> Result<(), DoormanError> {
        let filter = doc!{ EMAIL: email };

        self.db.collection::<Document>(OTP_CODES).delete_one(filter, None)
            .await?;

        Ok(())
    }
}

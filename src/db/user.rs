use async_trait::async_trait;
use bson::doc;
use mongodb::Database;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use crate::db::UserStore;
use crate::db::prelude::*;
use crate::model::user::User;
use crate::utils::errors::DoormanError;

///
/// The user records live in a collection owned by the registration flow -
/// this store only ever reads them and flips the verified flag.
///
pub struct MongoUserStore {
    db: Database,
}

impl MongoUserStore {
    pub fn new(db: Database) -> Self {
        MongoUserStore { db }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DoormanError> {
        let filter = doc!{ EMAIL: email };

        Ok(self.db.collection::<User>(USERS).find_one(filter, None).await?)
    }

    async fn mark_email_verified(&self, user_id: &str) -> Result<User, DoormanError> {
        let filter = doc!{ USER_ID: user_id };
        let update = doc!{ "$set": { EMAIL_VERIFIED: true } };

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        match self.db.collection::<User>(USERS).find_one_and_update(filter, update, options).await? {
            Some(user) => Ok(user),
            None => Err(DoormanError::UserNotFound),
        }
    }
}

use tracing::debug;

use crate::app::error::{ServiceError, ServiceResult};
use crate::app::guard::{ensure_owner, parse_id, require_content};
use crate::domain::id::ObjectId;
use crate::domain::page::{Page, PageRequest};
use crate::domain::tweet::{NewTweet, Tweet};
use crate::infra::store::SharedStore;

#[derive(Clone)]
pub struct TweetService {
    store: SharedStore,
}

impl TweetService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn create_tweet(&self, content: &str, caller: &ObjectId) -> ServiceResult<Tweet> {
        let content = require_content(content, "tweet")?;

        let tweet = self
            .store
            .insert_tweet(NewTweet {
                owner: caller.clone(),
                content,
            })
            .await?
            .ok_or_else(|| ServiceError::internal("failed to create tweet"))?;

        debug!(tweet_id = %tweet.id, owner_id = %caller, "tweet created");
        Ok(tweet)
    }

    pub async fn update_tweet(
        &self,
        tweet_id: &str,
        content: &str,
        caller: &ObjectId,
    ) -> ServiceResult<Tweet> {
        let tweet_id = parse_id(tweet_id, "tweet")?;
        let content = require_content(content, "tweet")?;

        let existing = self
            .store
            .find_tweet(&tweet_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("tweet not found"))?;
        ensure_owner(
            &existing.owner,
            Some(caller),
            "you do not have permission to edit this tweet",
        )?;

        let updated = self
            .store
            .update_tweet_content(&tweet_id, &content)
            .await?
            .ok_or_else(|| ServiceError::not_found("tweet not found"))?;

        debug!(tweet_id = %updated.id, "tweet updated");
        Ok(updated)
    }

    pub async fn delete_tweet(&self, tweet_id: &str, caller: &ObjectId) -> ServiceResult<()> {
        let tweet_id = parse_id(tweet_id, "tweet")?;

        let existing = self
            .store
            .find_tweet(&tweet_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("tweet not found"))?;
        ensure_owner(
            &existing.owner,
            Some(caller),
            "you do not have permission to delete this tweet",
        )?;

        if !self.store.delete_tweet(&tweet_id).await? {
            return Err(ServiceError::not_found("tweet not found"));
        }

        debug!(tweet_id = %tweet_id, "tweet deleted");
        Ok(())
    }

    pub async fn list_user_tweets(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> ServiceResult<Page<Tweet>> {
        let user_id = parse_id(user_id, "user")?;
        let (tweets, total) = self.store.tweets_by_owner(&user_id, page).await?;
        Ok(Page::new(tweets, total, page))
    }
}

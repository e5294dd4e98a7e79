use tracing::debug;

use crate::app::error::ServiceResult;
use crate::app::guard::parse_id;
use crate::domain::id::ObjectId;
use crate::domain::like::{LikeState, LikeTarget, TargetKind};
use crate::domain::video::LikedVideo;
use crate::infra::store::SharedStore;

#[derive(Clone)]
pub struct LikeService {
    store: SharedStore,
}

impl LikeService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Likes the target if the caller has not, otherwise removes the like.
    /// Whether the target exists is left to the store's references.
    pub async fn toggle_like(
        &self,
        kind: TargetKind,
        target_id: &str,
        caller: &ObjectId,
    ) -> ServiceResult<LikeState> {
        let target_id = parse_id(target_id, kind.as_str())?;
        let target = LikeTarget::new(kind, target_id);

        let state = self.store.toggle_like(&target, caller).await?;

        debug!(
            kind = %target.kind,
            target_id = %target.id,
            user_id = %caller,
            liked = state.is_liked(),
            "like toggled"
        );
        Ok(state)
    }

    pub async fn liked_videos(&self, caller: &ObjectId) -> ServiceResult<Vec<LikedVideo>> {
        Ok(self.store.liked_videos(caller).await?)
    }
}

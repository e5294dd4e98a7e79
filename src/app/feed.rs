//! Comment feed composition.
//!
//! A video's feed is built in stages: filter to the video, order oldest
//! first, cut the requested page, left-join the commenter profile (at most
//! one), left-join the likes on each comment, derive the per-viewer fields and
//! drop the raw likes. Filter, order and window run in the store; the joins
//! keep one row per comment and preserve order, so windowing first returns
//! the same page as windowing last.

use std::collections::{HashMap, HashSet};

use crate::domain::comment::{Comment, CommentView};
use crate::domain::id::ObjectId;
use crate::domain::like::{Like, TargetKind};
use crate::domain::page::{Page, PageRequest};
use crate::domain::user::Profile;
use crate::infra::store::{Store, StoreResult};

/// A comment with its joins applied, before the like set is reduced.
#[derive(Debug, Clone)]
pub struct FeedRow {
    pub comment: Comment,
    pub commenter: Option<Profile>,
    pub likes: Vec<Like>,
}

pub struct CommentFeedQuery<'a> {
    video_id: &'a ObjectId,
    viewer: Option<&'a ObjectId>,
    page: PageRequest,
}

impl<'a> CommentFeedQuery<'a> {
    pub fn new(video_id: &'a ObjectId) -> Self {
        Self {
            video_id,
            viewer: None,
            page: PageRequest::default(),
        }
    }

    pub fn viewer(mut self, viewer: Option<&'a ObjectId>) -> Self {
        self.viewer = viewer;
        self
    }

    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    pub async fn run(self, store: &dyn Store) -> StoreResult<Page<CommentView>> {
        let (comments, total) = store.comments_for_video(self.video_id, self.page).await?;
        if comments.is_empty() {
            return Ok(Page::new(Vec::new(), total, self.page));
        }

        let owner_ids = distinct(comments.iter().map(|comment| &comment.owner));
        let profiles = store.profiles(&owner_ids).await?;

        let comment_ids: Vec<ObjectId> = comments.iter().map(|comment| comment.id.clone()).collect();
        let likes = store.likes_on_comments(&comment_ids).await?;

        let rows = join_likes(join_commenters(comments, profiles), likes);
        let items = derive_viewer_fields(rows, self.viewer);
        Ok(Page::new(items, total, self.page))
    }
}

/// Attaches each comment's owner profile. A missing owner leaves `None`.
pub fn join_commenters(comments: Vec<Comment>, profiles: Vec<Profile>) -> Vec<FeedRow> {
    let mut by_id: HashMap<ObjectId, Profile> = HashMap::with_capacity(profiles.len());
    for profile in profiles {
        by_id.entry(profile.id.clone()).or_insert(profile);
    }

    comments
        .into_iter()
        .map(|comment| FeedRow {
            commenter: by_id.get(&comment.owner).cloned(),
            comment,
            likes: Vec::new(),
        })
        .collect()
}

/// Attaches every like that targets each row's comment. Likes on other
/// targets are ignored.
pub fn join_likes(rows: Vec<FeedRow>, likes: Vec<Like>) -> Vec<FeedRow> {
    let mut by_comment: HashMap<ObjectId, Vec<Like>> = HashMap::new();
    for like in likes {
        if like.target.kind == TargetKind::Comment {
            by_comment.entry(like.target.id.clone()).or_default().push(like);
        }
    }

    rows.into_iter()
        .map(|mut row| {
            row.likes = by_comment.remove(&row.comment.id).unwrap_or_default();
            row
        })
        .collect()
}

/// Computes `likes_count` and `is_liked`, then drops the like set.
pub fn derive_viewer_fields(rows: Vec<FeedRow>, viewer: Option<&ObjectId>) -> Vec<CommentView> {
    rows.into_iter()
        .map(|row| {
            let is_liked = viewer
                .map(|viewer| row.likes.iter().any(|like| &like.liked_by == viewer))
                .unwrap_or(false);
            CommentView {
                likes_count: row.likes.len() as u64,
                is_liked,
                commenter: row.commenter,
                comment: row.comment,
            }
        })
        .collect()
}

fn distinct<'a>(ids: impl Iterator<Item = &'a ObjectId>) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).cloned().collect()
}

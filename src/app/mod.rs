pub mod comments;
pub mod error;
pub mod feed;
pub mod guard;
pub mod identity;
pub mod likes;
pub mod tweets;

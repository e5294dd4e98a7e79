pub mod comment;
pub mod id;
pub mod like;
pub mod page;
pub mod tweet;
pub mod user;
pub mod video;

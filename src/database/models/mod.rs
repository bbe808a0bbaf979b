pub mod post;
pub mod user;

pub use post::{AuthorView, BlogView, NewPost, Page, PostUpdate};
pub use user::User;

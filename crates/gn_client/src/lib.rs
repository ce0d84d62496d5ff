pub mod api;
pub mod article_view;
pub mod error;
pub mod feed;
pub mod view;

pub use api::{DetailQuery, HttpNewsApi, NewsApi};
pub use article_view::{ArticleParams, ArticleViewController, ArticleViewState};
pub use error::ClientError;
pub use feed::{FeedController, FeedState};
pub use view::{FeedView, ViewConfig};

pub mod prelude {
    pub use super::{ArticleViewController, FeedController, HttpNewsApi, NewsApi, ViewConfig};
    pub use gn_core::{Article, NewsCategory};
}

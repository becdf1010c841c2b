pub mod date;
pub mod listing;
pub mod navigation;
pub mod post;
pub mod reading_time;
pub mod view;

pub mod prelude {
    pub use crate::date::{DateFormatter, Locale};
    pub use crate::listing::PostListing;
    pub use crate::navigation::{NavLink, PostNavigation};
    pub use crate::post::{ContentSection, Post as PostEntity, PostSummary};
    pub use crate::reading_time::ReadingTime;
    pub use crate::view::{PostSummaryView, PostView};
}

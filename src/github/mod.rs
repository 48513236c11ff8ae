pub mod client;
pub mod error;
pub mod reviews;
pub mod search;
pub mod types;

pub use client::{create_client, create_client_with_base};
pub use error::FetchError;
pub use reviews::fetch_reviews;
pub use search::{search_prs, SearchOptions};
pub use types::{Label, PrInfoGroups, PrState, PullRequest, Review};

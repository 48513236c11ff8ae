//! xbar plugin that lists the pull requests you authored and reports what
//! changed since the previous poll.

pub mod config;
pub mod credentials;
pub mod diff;
pub mod fetch;
pub mod github;
pub mod output;
pub mod run;
pub mod snapshot;

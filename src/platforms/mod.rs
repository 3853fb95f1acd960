pub mod adapter;
pub mod client;
pub mod fields;
pub mod leetcode;
pub mod github;
pub mod codeforces;
pub mod codechef;

pub use adapter::{adapter_for, PlatformAdapter};
pub use client::{Payload, UpstreamClient};
pub use leetcode::LeetCodeAdapter;
pub use github::GitHubAdapter;
pub use codeforces::CodeforcesAdapter;
pub use codechef::CodechefAdapter;

// Summarization provider layer

pub mod google;
pub mod provider;

pub use google::GoogleAdapter;
pub use provider::*;

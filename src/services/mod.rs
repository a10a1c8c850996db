pub mod droid;
pub mod enrichment_client;
pub mod fetcher;
pub mod field_extractor;
pub mod paginator;
pub mod pipeline;
pub mod result_sink;
pub mod scrape_job;
pub mod url_input;

pub use droid::*;
pub use enrichment_client::*;
pub use fetcher::*;
pub use field_extractor::*;
pub use paginator::*;
pub use pipeline::*;
pub use result_sink::*;
pub use scrape_job::*;
pub use url_input::*;

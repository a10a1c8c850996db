pub mod company_record;
pub mod errors;
pub mod extraction_config;
pub mod run_options;
pub mod us_state;
pub mod web_domain;

pub use company_record::*;
pub use errors::*;
pub use extraction_config::*;
pub use run_options::*;
pub use us_state::*;
pub use web_domain::*;

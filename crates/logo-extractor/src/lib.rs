//! Logo extractor — discover, validate and download brand logos from websites.
//!
//! The pipeline per site is: normalize the site string, scan its landing
//! page for logo candidates, then download candidates in order until one
//! passes the image checks. [`batch`] fans this out over a Parquet site list.

pub mod batch;
pub mod config;
pub mod domain;
pub mod fetcher;
pub mod http;
pub mod processor;
pub mod scanner;
pub mod source;
pub mod types;
pub mod validator;

pub use batch::{dispatch, run};
pub use config::ExtractorConfig;
pub use domain::{domain_of, normalize};
pub use fetcher::LogoFetcher;
pub use http::{FetchedResponse, HttpClient, HttpFetch};
pub use processor::{LogoPipeline, ProcessSite};
pub use scanner::{scan_html, Scanner};
pub use source::load_sites;
pub use types::*;
pub use validator::LogoValidator;

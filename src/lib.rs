pub mod auth;
pub mod cli {
    pub mod parser;
}
pub mod config;
pub mod github {
    pub mod client;
    pub mod issues;
    pub mod request;
}
pub mod logging;
pub mod output;
pub mod run;
pub mod suite;

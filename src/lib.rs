//! webstrap: single-host web server provisioning
//!
//! Installs nginx, Node.js and certbot, writes a reverse-proxy vhost for
//! one hardcoded domain, requests a TLS certificate best-effort, and leaves
//! an instruction file for the operator.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

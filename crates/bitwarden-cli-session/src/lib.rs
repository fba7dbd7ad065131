#![doc = include_str!("../README.md")]

mod auth;
mod client;
pub mod command;
mod config;
mod error;
mod item;
mod session;
mod status;

pub use auth::AuthPlan;
pub use client::VaultSession;
pub use command::{CommandOutput, CommandRunner, Invocation, ProcessRunner};
pub use config::{BwConfig, CLI_PATH_ENV, CLIENT_ID_ENV, CLIENT_SECRET_ENV, PASSWORD_ENV};
pub use error::BwError;
pub use item::{
    CipherRepromptType, CipherType, Field, FieldType, Item, Login, LoginUri, UriMatchType,
};
pub use session::Session;
pub use status::{LockStatus, VaultStatus};

//! Deciding which `bw` commands turn the current lock state into an unlocked vault.

use crate::{
    BwConfig, BwError, LockStatus,
    command::Invocation,
    config::{CLIENT_ID_ENV, CLIENT_SECRET_ENV},
};

/// How to get from the reported [LockStatus] to an unlocked vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPlan {
    /// The vault is already unlocked.
    Ready,
    /// Run each command in order with the terminal attached, stopping at the first failure. The
    /// concatenated standard output of all of them is the session token.
    Authenticate(Vec<Invocation>),
}

impl AuthPlan {
    /// Pick the commands for `status`. Depends on nothing but its arguments.
    pub fn for_status(status: &LockStatus, config: &BwConfig) -> Result<Self, BwError> {
        Ok(match status {
            LockStatus::Unlocked => AuthPlan::Ready,
            LockStatus::Locked => AuthPlan::Authenticate(vec![unlock(config)]),
            LockStatus::Unauthenticated => match config.api_key() {
                Some((client_id, client_secret)) => AuthPlan::Authenticate(vec![
                    Invocation::new(&config.program, ["login", "--apikey", "--raw"])
                        .env(CLIENT_ID_ENV, client_id)
                        .env(CLIENT_SECRET_ENV, client_secret),
                    unlock(config),
                ]),
                None => AuthPlan::Authenticate(vec![Invocation::new(
                    &config.program,
                    ["login", "--raw"],
                )]),
            },
            LockStatus::Unknown(s) => return Err(BwError::UnknownStatus(s.clone())),
        })
    }
}

fn unlock(config: &BwConfig) -> Invocation {
    let mut args = vec!["unlock".to_string(), "--raw".to_string()];
    if let Some(var) = &config.password_env {
        args.push("--passwordenv".to_string());
        args.push(var.clone());
    }
    Invocation::new(&config.program, args)
}

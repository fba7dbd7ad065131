use log::{debug, info, warn};

use crate::{
    BwConfig, BwError, Item, LockStatus, Session, VaultStatus,
    auth::AuthPlan,
    command::{CommandRunner, Invocation, ProcessRunner, check_output, run, run_json},
};

/// An unlocked `bw` vault.
///
/// Constructing one checks `bw status` and, when needed, runs `bw unlock` or `bw login` with the
/// terminal attached so the user can answer prompts. Every later query carries the resulting
/// session token.
///
/// ```no_run
/// use bitwarden_cli_session::{BwConfig, VaultSession};
///
/// # fn main() -> Result<(), bitwarden_cli_session::BwError> {
/// let vault = VaultSession::new(BwConfig::from_env())?;
/// for item in vault.get_items(["--search", "github"])? {
///     println!("{}", item.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct VaultSession<R: CommandRunner = ProcessRunner> {
    config: BwConfig,
    runner: R,
    session: Session,
}

impl<R: CommandRunner> std::fmt::Debug for VaultSession<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl VaultSession<ProcessRunner> {
    /// Authenticate against the `bw` executable named in `config`.
    pub fn new(config: BwConfig) -> Result<Self, BwError> {
        Self::with_runner(config, ProcessRunner)
    }
}

impl<R: CommandRunner> VaultSession<R> {
    /// Authenticate using a custom [CommandRunner].
    pub fn with_runner(config: BwConfig, runner: R) -> Result<Self, BwError> {
        let mut vault = Self::unauthenticated(config, runner);

        let status = vault.status()?.status;
        debug!("vault status is {status}");

        match AuthPlan::for_status(&status, &vault.config)? {
            AuthPlan::Ready => {}
            AuthPlan::Authenticate(steps) => {
                vault.session = vault.authenticate(&steps)?;

                match vault.status()?.status {
                    LockStatus::Unlocked => info!("vault unlocked"),
                    LockStatus::Unknown(s) => return Err(BwError::UnknownStatus(s)),
                    status => {
                        warn!("vault is still {status} after authenticating");
                        return Err(BwError::AuthenticationFailed(status.to_string()));
                    }
                }
            }
        }

        if vault.config.sync_on_unlock {
            vault.sync().map_err(|e| BwError::Sync(Box::new(e)))?;
        }

        Ok(vault)
    }

    /// A handle that issues queries without a session. Only `status` is expected to succeed.
    pub fn unauthenticated(config: BwConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            session: Session::default(),
        }
    }

    fn authenticate(&self, steps: &[Invocation]) -> Result<Session, BwError> {
        let mut stdout = Vec::new();
        for step in steps {
            debug!("running {step} interactively");
            stdout.extend(check_output(step, self.runner.interactive(step))?);
        }
        Ok(Session::from_stdout(&stdout))
    }

    fn command<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new(&self.config.program, args).with_session(&self.session)
    }

    /// The session token obtained while constructing this handle, empty if the vault was
    /// already unlocked.
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &BwConfig {
        &self.config
    }

    /// Query `bw status`.
    pub fn status(&self) -> Result<VaultStatus, BwError> {
        run_json(&self.runner, &self.command(["status"]))
    }

    /// Pull the latest vault data from the server with `bw sync`.
    pub fn sync(&self) -> Result<(), BwError> {
        run(&self.runner, &self.command(["sync"]))?;
        info!("vault synced");
        Ok(())
    }

    /// Fetch a single item by id (or any term `bw get item` accepts).
    pub fn get_item(&self, id: &str) -> Result<Item, BwError> {
        run_json(&self.runner, &self.command(["get", "item", id]))
    }

    /// List items. `args` are passed through after `list items` unchanged, e.g.
    /// `["--folderid", "null"]` or `["--search", "github"]`.
    pub fn get_items<I, S>(&self, args: I) -> Result<Vec<Item>, BwError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = ["list".to_string(), "items".to_string()]
            .into_iter()
            .chain(args.into_iter().map(Into::<String>::into));
        run_json(&self.runner, &self.command(args))
    }
}

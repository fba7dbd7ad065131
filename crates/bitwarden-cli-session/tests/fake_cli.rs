//! Runs [VaultSession] against a shell script standing in for the `bw` executable.
#![cfg(unix)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    sync::Mutex,
};

use bitwarden_cli_session::{BwConfig, BwError, LockStatus, VaultSession};
use tempfile::TempDir;

// Writing an executable while another test forks can fail with ETXTBSY, so these run one at a time.
static SERIAL: Mutex<()> = Mutex::new(());

const ITEM_ID: &str = "0f8d6d4a-2c67-4a5e-8a8e-1c3a5b7e9d01";

const ITEM: &str = r#"{"object":"item","id":"0f8d6d4a-2c67-4a5e-8a8e-1c3a5b7e9d01","organizationId":null,"folderId":null,"type":1,"reprompt":0,"name":"GitHub","notes":null,"favorite":false,"fields":[],"login":{"uris":[{"match":null,"uri":"https://github.com"}],"username":"octocat","password":"pw","totp":null,"passwordRevisionDate":null},"collectionIds":[],"revisionDate":"2023-11-02T18:30:00.000Z"}"#;

const SCRIPT: &str = r#"#!/bin/sh
dir="$(dirname "$0")"
printf '%s\n' "$*" >> "$dir/calls.log"

prev=""
last=""
for a in "$@"; do prev="$last"; last="$a"; done
state="$(cat "$dir/state")"
if [ "$prev" = "--session" ] && [ "$last" = "tok" ]; then state=unlocked; fi

case "$1" in
  status)
    printf '{"serverUrl":null,"lastSync":null,"userEmail":"alice@example.com","userId":"u1","status":"%s"}' "$state"
    ;;
  unlock)
    printf 'tok'
    ;;
  login)
    if [ "$2" = "--apikey" ]; then
      if [ "$BW_CLIENTID" != "user.1234" ] || [ "$BW_CLIENTSECRET" != "s3cr3t" ]; then
        echo "client_id or client_secret is incorrect" >&2
        exit 1
      fi
      exit 0
    fi
    printf 'tok'
    ;;
  sync)
    [ "$state" = unlocked ] || { echo "Vault is locked." >&2; exit 1; }
    echo "Syncing complete."
    ;;
  get)
    [ "$state" = unlocked ] || { echo "Vault is locked." >&2; exit 1; }
    if [ "$3" = "@ITEM_ID@" ]; then printf '%s' '@ITEM@'; else echo "Not found." >&2; exit 1; fi
    ;;
  list)
    [ "$state" = unlocked ] || { echo "Vault is locked." >&2; exit 1; }
    printf '[%s]' '@ITEM@'
    ;;
  *)
    echo "unknown command $1" >&2
    exit 1
    ;;
esac
"#;

struct FakeCli {
    dir: TempDir,
}

impl FakeCli {
    fn new(initial_state: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script = SCRIPT.replace("@ITEM_ID@", ITEM_ID).replace("@ITEM@", ITEM);
        let path = dir.path().join("bw");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(dir.path().join("state"), initial_state).unwrap();
        Self { dir }
    }

    fn program(&self) -> PathBuf {
        self.dir.path().join("bw")
    }

    fn config(&self) -> BwConfig {
        BwConfig {
            program: self.program().to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        read_lines(&self.dir.path().join("calls.log"))
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn locked_vault_unlocks_and_reads_items() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let cli = FakeCli::new("locked");

    let vault = VaultSession::new(cli.config()).unwrap();
    assert_eq!(vault.session().expose(), "tok");

    let item = vault.get_item(ITEM_ID).unwrap();
    assert_eq!(item.name, "GitHub");
    assert_eq!(
        item.login.unwrap().uris[0].uri.as_deref(),
        Some("https://github.com")
    );

    let items = vault.get_items(["--search", "git hub"]).unwrap();
    assert_eq!(items.len(), 1);

    assert_eq!(
        cli.calls(),
        [
            "status".to_string(),
            "unlock --raw".to_string(),
            "status --session tok".to_string(),
            "sync --session tok".to_string(),
            format!("get item {ITEM_ID} --session tok"),
            "list items --search git hub --session tok".to_string(),
        ]
    );
}

#[test]
fn unlocked_vault_queries_without_session() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let cli = FakeCli::new("unlocked");

    let vault = VaultSession::new(cli.config()).unwrap();

    assert!(vault.session().is_empty());
    assert_eq!(vault.status().unwrap().status, LockStatus::Unlocked);
    assert_eq!(cli.calls(), ["status", "sync", "status"]);
}

#[test]
fn api_key_login_then_unlock() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let cli = FakeCli::new("unauthenticated");
    let config = BwConfig {
        client_id: Some("user.1234".to_string()),
        client_secret: Some("s3cr3t".to_string()),
        password_env: Some("BW_PASSWORD".to_string()),
        sync_on_unlock: false,
        ..cli.config()
    };

    let vault = VaultSession::new(config).unwrap();

    assert_eq!(vault.session().expose(), "tok");
    assert_eq!(
        cli.calls(),
        [
            "status",
            "login --apikey --raw",
            "unlock --raw --passwordenv BW_PASSWORD",
            "status --session tok",
        ]
    );
}

#[test]
fn wrong_api_key_fails_construction() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let cli = FakeCli::new("unauthenticated");
    let config = BwConfig {
        client_id: Some("user.1234".to_string()),
        client_secret: Some("wrong".to_string()),
        ..cli.config()
    };

    let err = VaultSession::new(config).unwrap_err();

    assert!(matches!(err, BwError::CommandFailed { .. }), "{err:?}");
    assert_eq!(cli.calls(), ["status", "login --apikey --raw"]);
}

#[test]
fn missing_item_reports_stderr_and_redacted_command() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let cli = FakeCli::new("locked");
    let vault = VaultSession::new(cli.config()).unwrap();

    let err = vault.get_item("nope").unwrap_err();

    assert_eq!(err.stderr(), Some("Not found.\n"));
    let message = err.to_string();
    assert!(message.contains("get item nope --session [REDACTED]"), "{message}");
    assert!(!message.contains("--session tok"), "{message}");
}

#[test]
fn unknown_status_fails_before_authenticating() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let cli = FakeCli::new("weird");

    let err = VaultSession::new(cli.config()).unwrap_err();

    assert_eq!(err.to_string(), "unknown vault status `weird`");
    assert_eq!(cli.calls(), ["status"]);
}

#[test]
fn missing_executable_is_a_spawn_error() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let config = BwConfig {
        program: dir.path().join("no-such-bw").to_string_lossy().into_owned(),
        ..Default::default()
    };

    let err = VaultSession::new(config).unwrap_err();

    assert!(matches!(err, BwError::Spawn { .. }), "{err:?}");
}

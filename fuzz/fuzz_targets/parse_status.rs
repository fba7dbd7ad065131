#![no_main]

use bitwarden_cli_session::{AuthPlan, BwConfig, VaultStatus};
use libfuzzer_sys::fuzz_target;

// Any decoded status either maps to a plan or to an error, never a panic
fuzz_target!(|data: &[u8]| {
    if let Ok(status) = serde_json::from_slice::<VaultStatus>(data) {
        let _ = AuthPlan::for_status(&status.status, &BwConfig::default());
    }
});

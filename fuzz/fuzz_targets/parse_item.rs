#![no_main]

use bitwarden_cli_session::Item;
use libfuzzer_sys::fuzz_target;

// Decoding `bw list items` output should never panic
fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<Vec<Item>>(data);
    let _ = serde_json::from_slice::<Item>(data);
});

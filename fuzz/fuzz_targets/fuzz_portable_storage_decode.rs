// Copyright (c) 2026 Amunchain
// Licensed under the Apache-2.0 License.

#![no_main]
#![forbid(unsafe_code)]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Best-effort: ensure the portable-storage decoder never panics on
    // arbitrary bytes, including truncated headers and malformed tags.
    let _ = levinode::wire::storage::decode_payload(data);
});

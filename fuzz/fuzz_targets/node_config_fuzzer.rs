//! Fuzz target for node configuration
//!
//! Prevent out-of-range ports from ever reaching the listener.
//!
//! # Invariants
//!
//! - `validate_port` accepts a string iff it parses as a signed integer no
//!   greater than 65535
//! - `bind_address` never succeeds when `validate_port` fails
//! - Exactly one leading `http://` is stripped from the bind address
//! - NEVER panic on arbitrary input

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lockey_server::{normalize_ip, validate_port, NodeConfig, MAX_PORT};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    ip: String,
    port: String,
    with_scheme: bool,
}

fuzz_target!(|input: FuzzInput| {
    let expected = input.port.parse::<i64>().ok().filter(|port| *port <= MAX_PORT);
    let validated = validate_port(&input.port);
    assert_eq!(validated.as_ref().ok().copied(), expected);

    let ip = if input.with_scheme { format!("http://{}", input.ip) } else { input.ip.clone() };
    let config = NodeConfig::new(ip.clone(), input.port.clone());

    match config.bind_address() {
        Ok(addr) => {
            assert!(validated.is_ok(), "bind address produced for rejected port");
            let host = normalize_ip(&ip);
            let host = if host.is_empty() { "0.0.0.0" } else { host };
            assert_eq!(addr, format!("{host}:{}", input.port));
        },
        Err(_) => assert!(validated.is_err()),
    }
});

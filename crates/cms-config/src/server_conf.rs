//! Tolerant reader for the cms-server.conf settings file.

use crate::{ConnectionMode, DEFAULT_HOST, ServerLayout};

use std::path::Path;

use tracing::debug;

const PROPERTY_HOST: &str = "HOST";

/// Host name the server binds to, according to its settings file.
///
/// Any read problem falls back to localhost; a stopped or half-installed
/// server must never make the scan fail.
pub fn host_from_conf(layout: &ServerLayout) -> String {
    property_from_conf(&layout.server_conf(), PROPERTY_HOST)
        .unwrap_or_else(|| String::from(DEFAULT_HOST))
}

/// Admin port for the given mode, according to the settings file.
///
/// Falls back to the mode's default port when the file, the key or the
/// numeric value is unusable.
pub fn port_from_conf(layout: &ServerLayout, mode: ConnectionMode) -> u16 {
    let conf = layout.server_conf();

    let Some(value) = property_from_conf(&conf, mode.port_property()) else {
        return mode.default_port();
    };

    match value.parse() {
        Ok(port) => port,
        Err(_) => {
            debug!(
                "Ignoring unparseable {} value '{}' in {}",
                mode.port_property(),
                value,
                conf.display()
            );
            mode.default_port()
        }
    }
}

/// Minimal properties-format lookup: `#`/`!` comment lines, `KEY=VALUE` or
/// `KEY: VALUE`, whitespace trimmed on both sides.
pub(crate) fn property_from_conf(path: &Path, key: &str) -> Option<String> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!("Could not read {}: {}", path.display(), e);
            return None;
        }
    };

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let Some((name, value)) = line.split_once(['=', ':']) else {
            continue;
        };

        if name.trim() == key {
            return Some(value.trim().to_string());
        }
    }

    None
}

use std::path::{Path, PathBuf};

const FILE_SERVER_LOCK: &str = ".cms.lock";
const FILE_LICENSE: &str = "cms-license.conf";
const FILE_SERVER_CONF: &str = "cms-server.conf";
const FILE_WRAPPER_EXECUTABLE: &str = "cms-wrapper";
const FILE_SERVER_EXECUTABLE: &str = "cms-server";
const FILE_WRAPPER_ERROR: &str = "WRAPPER_ERROR.txt";
const FILE_LEGACY_JAR: &str = "cms-server.jar";
const DIR_CONF: &str = "conf";
const DIR_BIN: &str = "bin";
const DIR_SERVER: &str = "server";
const DIR_LIB: &str = "lib";

/// File and directory layout of a local server installation.
#[derive(Debug, Clone)]
pub struct ServerLayout {
    root: PathBuf,
}

impl ServerLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lock file marking a running server bound to this installation.
    pub fn lock_file(&self) -> PathBuf {
        self.root.join(FILE_SERVER_LOCK)
    }

    pub fn lock_file_exists(&self) -> bool {
        self.lock_file().exists()
    }

    pub fn license_file(&self) -> PathBuf {
        self.root.join(DIR_CONF).join(FILE_LICENSE)
    }

    pub fn license_file_exists(&self) -> bool {
        self.license_file().exists()
    }

    /// Server settings file, see [`crate::host_from_conf`] and [`crate::port_from_conf`].
    pub fn server_conf(&self) -> PathBuf {
        self.root.join(DIR_CONF).join(FILE_SERVER_CONF)
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(DIR_BIN)
    }

    /// Wrapper launch script, preferred over the plain server executable.
    pub fn wrapper_executable(&self) -> PathBuf {
        self.bin_dir().join(FILE_WRAPPER_EXECUTABLE)
    }

    pub fn server_executable(&self) -> PathBuf {
        self.bin_dir().join(FILE_SERVER_EXECUTABLE)
    }

    /// Sentinel the wrapper writes when it fails to execute.
    pub fn wrapper_error_file(&self) -> PathBuf {
        self.root.join(FILE_WRAPPER_ERROR)
    }

    pub fn legacy_server_jar(&self) -> PathBuf {
        self.root.join(DIR_SERVER).join(DIR_LIB).join(FILE_LEGACY_JAR)
    }

    /// True when the installation still ships the legacy server archive.
    pub fn runs_legacy_server(&self) -> bool {
        self.legacy_server_jar().exists()
    }
}

/// Startup progress stages reported by the server's admin interface.
///
/// The variants are ordered, so a reported level can be compared against a
/// target with plain `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunLevel {
    /// Process not reachable or not yet booted.
    Offline,
    /// Core is up, services still starting.
    Booting,
    /// Internal services answer, web applications still deploying.
    ServicesReady,
    /// Fully operational.
    Started,
}

impl RunLevel {
    /// Numeric level as reported by the admin interface.
    pub const fn level(self) -> u8 {
        match self {
            RunLevel::Offline => 0,
            RunLevel::Booting => 10,
            RunLevel::ServicesReady => 50,
            RunLevel::Started => 100,
        }
    }
}

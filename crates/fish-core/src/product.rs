//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to define its identity and which template
//! package backs each dynamic command.

/// Configuration trait for the CLI product
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for log filters, headings)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Directory name of the CLI home, created under the user's home
    fn home_dir_name(&self) -> &'static str;

    /// Registry package that backs a dynamic command, if any
    fn command_package(&self, command: &str) -> Option<&'static str>;

    /// Registry package name of the CLI itself (for the update advisory)
    fn package_name(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}

use miette::Result;

/// A settings table that is validated ("resolved") after deserialization.
///
/// Resolution needs the directory relative paths in the table are anchored to,
/// which is the directory of the settings file.
pub trait ResolvableConfigurationWithContext {
    type Context;
    type Resolved;

    /// Resolve the table into its `Resolved` type.
    /// Return `Err` to indicate that the table is invalid.
    fn resolve(self, context: Self::Context) -> Result<Self::Resolved>;
}

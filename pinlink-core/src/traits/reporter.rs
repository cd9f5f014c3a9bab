/// Sink for user-facing progress messages.
///
/// Services report each step once at the point it finishes or fails; the front
/// end decides how lines are rendered.
pub trait Reporter: Send + Sync {
    /// A step is starting
    fn step(&self, message: &str);

    /// A step completed and produced something worth showing
    fn success(&self, message: &str);

    /// A step failed; the service aborts or skips the rest of it
    fn failure(&self, message: &str);
}

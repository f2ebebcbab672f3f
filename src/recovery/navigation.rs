/// Where the wizard sends the user when it is done, with an optional message
/// for the destination page. The message is handed out once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    target: String,
    flash: Option<String>,
}

impl Redirect {
    pub fn new(target: impl Into<String>, flash: Option<String>) -> Self {
        Self {
            target: target.into(),
            flash,
        }
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn flash(&self) -> Option<&str> {
        self.flash.as_deref()
    }

    /// Consumes the flash message; later calls return `None`.
    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }
}

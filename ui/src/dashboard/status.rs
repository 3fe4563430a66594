/// Progress and failure notice shown above the chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryStatus {
    pub error: Option<String>,
    pub loading: bool,
}

impl QueryStatus {
    /// A control changed. Any earlier failure or pending answer belongs to
    /// the old selection.
    pub fn selected(&mut self) {
        self.error = None;
        self.loading = false;
    }

    pub fn started(&mut self) {
        self.loading = true;
    }

    pub fn answered(&mut self) {
        self.error = None;
        self.loading = false;
    }

    pub fn failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

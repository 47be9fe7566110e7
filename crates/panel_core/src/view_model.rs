/// Everything a host needs to draw the panel. Each field replaces its region whole.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelViewModel {
    pub list_html: String,
    pub current_page: u32,
    pub ticker_active: bool,
    pub run_button_enabled: bool,
    pub run_result_html: Option<String>,
    pub modal: Option<ModalView>,
    /// Prompt text while a destructive action awaits confirmation.
    pub confirmation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub title: String,
    pub body_html: String,
}

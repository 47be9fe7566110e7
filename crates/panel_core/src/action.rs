use std::collections::BTreeMap;

use crate::JobId;

pub const CLEAR_HISTORY_ID: &str = "btnClearHistory";
pub const MODAL_CLOSE_ID: &str = "modalClose";

/// What the host knows about the element an interaction landed on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementInfo {
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// `data-*` attributes without the `data-` prefix, e.g. `job-id`.
    pub data: BTreeMap<String, String>,
    /// True when the element is, or sits inside, a navigational link.
    pub inside_link: bool,
}

impl ElementInfo {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_classes(classes: &[&str]) -> Self {
        Self {
            classes: classes.iter().map(|class| (*class).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn data(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn job(self, job_id: &JobId) -> Self {
        self.data("job-id", job_id.as_str())
    }

    pub fn in_link(mut self) -> Self {
        self.inside_link = true;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|candidate| candidate == class)
    }

    fn job_id(&self) -> Option<JobId> {
        self.data
            .get("job-id")
            .filter(|id| !id.is_empty())
            .map(|id| JobId::new(id.as_str()))
    }

    fn page(&self) -> Option<u32> {
        self.data.get("page")?.trim().parse().ok()
    }
}

/// A user interaction the dispatcher knows how to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Cancel(JobId),
    Delete(JobId),
    ViewImages(JobId),
    CopyError(JobId),
    ToggleError(JobId),
    Paginate(u32),
    ClearHistory,
    CloseModal,
}

/// Maps an element to the action it stands for.
///
/// Order matters: copy and delete controls share the `btn-sm` base class with
/// the view-images control, and the log link carries it too, so those are
/// ruled out before an element is read as "view images".
pub fn classify(element: &ElementInfo) -> Option<Action> {
    match element.id.as_deref() {
        Some(CLEAR_HISTORY_ID) => return Some(Action::ClearHistory),
        Some(MODAL_CLOSE_ID) => return Some(Action::CloseModal),
        _ => {}
    }

    if element.has_class("btn-page") {
        return element.page().filter(|page| *page > 0).map(Action::Paginate);
    }
    if element.has_class("btn-error-toggle") {
        return element.job_id().map(Action::ToggleError);
    }

    let job_id = element.job_id()?;
    if element.has_class("btn-cancel") {
        return Some(Action::Cancel(job_id));
    }
    if element.has_class("btn-delete") {
        return Some(Action::Delete(job_id));
    }
    if element.has_class("btn-copy") {
        return Some(Action::CopyError(job_id));
    }
    if element.has_class("btn-sm") && !element.inside_link {
        return Some(Action::ViewImages(job_id));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> JobId {
        JobId::new("j-1")
    }

    #[test]
    fn delete_is_not_mistaken_for_view_images() {
        let element = ElementInfo::with_classes(&["btn-delete", "btn-sm"]).job(&id());
        assert_eq!(classify(&element), Some(Action::Delete(id())));
    }

    #[test]
    fn copy_is_not_mistaken_for_view_images() {
        let element = ElementInfo::with_classes(&["btn-copy", "btn-sm"]).job(&id());
        assert_eq!(classify(&element), Some(Action::CopyError(id())));
    }

    #[test]
    fn log_link_is_ignored() {
        let element = ElementInfo::with_classes(&["btn-sm"]).job(&id()).in_link();
        assert_eq!(classify(&element), None);
    }

    #[test]
    fn plain_small_button_views_images() {
        let element = ElementInfo::with_classes(&["btn-sm"]).job(&id());
        assert_eq!(classify(&element), Some(Action::ViewImages(id())));
    }

    #[test]
    fn job_controls_need_a_job_id() {
        assert_eq!(classify(&ElementInfo::with_classes(&["btn-cancel"])), None);
        let blank = ElementInfo::with_classes(&["btn-cancel"]).data("job-id", "");
        assert_eq!(classify(&blank), None);
    }

    #[test]
    fn pagination_reads_the_page_number() {
        let element = ElementInfo::with_classes(&["btn-page"]).data("page", "3");
        assert_eq!(classify(&element), Some(Action::Paginate(3)));
        let bad = ElementInfo::with_classes(&["btn-page"]).data("page", "next");
        assert_eq!(classify(&bad), None);
    }

    #[test]
    fn static_controls_match_by_id() {
        assert_eq!(
            classify(&ElementInfo::with_id(CLEAR_HISTORY_ID)),
            Some(Action::ClearHistory)
        );
        assert_eq!(
            classify(&ElementInfo::with_id(MODAL_CLOSE_ID)),
            Some(Action::CloseModal)
        );
        assert_eq!(classify(&ElementInfo::with_id("somethingElse")), None);
    }
}

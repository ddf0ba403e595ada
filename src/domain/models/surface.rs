/// Whatever renders a filing on screen. The highlight engine only needs to
/// find its marker element, bring it into view and strip it again.
pub trait HighlightSurface {
    /// False once the hosting view has gone away.
    fn is_attached(&self) -> bool;

    /// Centres the element in the viewport. Returns false when the element
    /// is not present in the live document.
    fn scroll_into_view(&self, element_id: &str) -> bool;

    /// Replaces the element with its inner content.
    fn unwrap_element(&self, element_id: &str);
}

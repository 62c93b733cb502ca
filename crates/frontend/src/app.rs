use crate::domain::a001_memorial::ui::details::MemorialDetails;
use crate::domain::a001_memorial::ui::list::MemorialList;
use contracts::domain::a001_memorial::aggregate::MemorialId;
use contracts::domain::common::AggregateId;
use leptos::prelude::*;

/// Memorial page paths look like `/memorials/{uuid}/`
pub fn memorial_id_from_path(path: &str) -> Option<MemorialId> {
    let rest = path.strip_prefix("/memorials/")?;
    let id = rest.trim_end_matches('/');
    if id.is_empty() || id.contains('/') {
        return None;
    }
    MemorialId::from_string(id).ok()
}

#[component]
pub fn App() -> impl IntoView {
    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default();

    match memorial_id_from_path(&path) {
        Some(id) => view! { <MemorialDetails id=id /> }.into_any(),
        None => view! { <MemorialList /> }.into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_memorial_paths() {
        let id = MemorialId::new_v4();
        let path = format!("/memorials/{}/", id.as_string());
        assert_eq!(memorial_id_from_path(&path), Some(id));
        assert_eq!(
            memorial_id_from_path(&format!("/memorials/{}", id.as_string())),
            Some(id)
        );
    }

    #[test]
    fn other_paths_fall_back_to_list() {
        assert_eq!(memorial_id_from_path("/"), None);
        assert_eq!(memorial_id_from_path("/memorials/"), None);
        assert_eq!(memorial_id_from_path("/memorials/not-a-uuid/"), None);
    }
}

//! URLs and datastar actions rendered into pages.

use url::form_urlencoded;

use crate::application::filters::CATEGORY_PARAM;
use crate::application::session::ViewId;

pub fn home_load(view: ViewId) -> String {
    format!("/ui/views/{view}/load")
}

pub fn toggle_filter(view: ViewId, name: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("name", name)
        .finish();
    format!("/ui/views/{view}/filters/toggle?{query}")
}

pub fn clear_filters(view: ViewId) -> String {
    format!("/ui/views/{view}/filters/clear")
}

pub fn reset_filters(view: ViewId) -> String {
    format!("/ui/views/{view}/filters/reset")
}

pub fn load_more(view: ViewId) -> String {
    format!("/ui/views/{view}/more")
}

pub fn sync_location(view: ViewId) -> String {
    format!("/ui/views/{view}/location")
}

/// Action reporting the browser's current search after a history move.
pub fn sync_location_action(view: ViewId) -> String {
    format!(
        "@post('{}?search=' + encodeURIComponent(window.location.search))",
        sync_location(view)
    )
}

pub fn unmount(view: ViewId) -> String {
    format!("/ui/views/{view}/unmount")
}

pub fn detail_page(id: &str) -> String {
    format!("/detail/{}", path_segment(id))
}

pub fn detail_load(id: &str) -> String {
    format!("/ui/detail/{}", path_segment(id))
}

/// Bookmarkable list URL for a set of categories.
pub fn home_with_categories<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for name in names {
        serializer.append_pair(CATEGORY_PARAM, name);
    }
    let query = serializer.finish();
    if query.is_empty() {
        "/".to_string()
    } else {
        format!("/?{query}")
    }
}

pub fn post_action(url: &str) -> String {
    format!("@post('{url}')")
}

pub fn get_action(url: &str) -> String {
    format!("@get('{url}')")
}

fn path_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

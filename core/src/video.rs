//! Embeddable video id extraction for the detail screen.

use once_cell::sync::Lazy;
use regex::Regex;

const VIDEO_ID_LEN: usize = 11;

static VIDEO_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*((youtu.be/)|(v/)|(/u/\w/)|(embed/)|(watch\?))\??v?=?([^#&?]*).*")
        .expect("video link pattern is valid")
});

/// The 11-character video id in a youtu.be / youtube.com link, if any.
pub fn youtube_video_id(link: &str) -> Option<&str> {
    if link.is_empty() {
        return None;
    }
    let id = VIDEO_LINK_RE.captures(link)?.get(7)?.as_str();
    (id.len() == VIDEO_ID_LEN).then_some(id)
}

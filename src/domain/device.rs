//! User-Agent based device classification.

use crate::domain::entities::DeviceType;

/// Markers that identify a tablet. Checked before the phone markers because
/// tablet User-Agents frequently also carry a phone OS name.
const TABLET_MARKERS: &[&str] = &["ipad", "tablet"];

const MOBILE_MARKERS: &[&str] = &["iphone", "android"];

const DESKTOP_MARKERS: &[&str] = &["windows", "macintosh", "linux"];

/// Classifies a User-Agent string into a [`DeviceType`].
///
/// Matching is case-insensitive substring search. Never fails: anything not
/// recognized, including the empty string, is [`DeviceType::Other`].
///
/// # Examples
///
/// ```
/// use url_shortener_core::domain::device::classify_device;
/// use url_shortener_core::domain::entities::DeviceType;
///
/// let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X)";
/// assert_eq!(classify_device(ua), DeviceType::Mobile);
/// assert_eq!(classify_device(""), DeviceType::Other);
/// ```
pub fn classify_device(user_agent: &str) -> DeviceType {
    let ua = user_agent.to_ascii_lowercase();
    let has_any = |markers: &[&str]| markers.iter().any(|m| ua.contains(m));

    if has_any(TABLET_MARKERS) {
        DeviceType::Tablet
    } else if has_any(MOBILE_MARKERS) {
        DeviceType::Mobile
    } else if has_any(DESKTOP_MARKERS) {
        DeviceType::Desktop
    } else {
        DeviceType::Other
    }
}

use super::*;

const IOS_KAKAO: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 KAKAOTALK 10.4.5";
const ANDROID_KAKAO: &str = "Mozilla/5.0 (Linux; Android 14) Chrome/120.0 Mobile Safari/537.36 KAKAOTALK/10.4.5";
const DESKTOP_CHROME: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";

#[test]
fn ordinary_browser_is_left_alone() {
    assert_eq!(escape_plan(DESKTOP_CHROME), None);
}

#[test]
fn ios_webview_closes_with_kakaoweb_scheme() {
    let plan = escape_plan(IOS_KAKAO).expect("kakao");
    assert!(plan.ios);
    assert_eq!(plan.close_url(), "kakaoweb://closeBrowser");
}

#[test]
fn android_webview_closes_with_inappbrowser_scheme() {
    let plan = escape_plan(ANDROID_KAKAO).expect("kakao");
    assert!(!plan.ios);
    assert_eq!(plan.close_url(), "kakaotalk://inappbrowser/close");
}

#[test]
fn open_external_embeds_encoded_url() {
    let plan = escape_plan(ANDROID_KAKAO).expect("kakao");
    assert_eq!(
        plan.open_external_url("https%3A%2F%2Fexample.com%2F"),
        "kakaotalk://web/openExternal?url=https%3A%2F%2Fexample.com%2F"
    );
}

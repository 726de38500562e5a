//! KakaoTalk in-app browser escape.
//!
//! The KakaoTalk webview blocks file downloads, so the app hands the page off
//! to the system browser and closes the webview instead of starting.

#[cfg(test)]
#[path = "inapp_test.rs"]
mod inapp_test;

/// How to leave the in-app browser on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapePlan {
    pub ios: bool,
}

impl EscapePlan {
    /// Scheme URL that reopens `encoded_url` (already URI-component encoded)
    /// in the external browser.
    #[must_use]
    pub fn open_external_url(self, encoded_url: &str) -> String {
        format!("kakaotalk://web/openExternal?url={encoded_url}")
    }

    /// Scheme URL that closes the webview.
    #[must_use]
    pub fn close_url(self) -> &'static str {
        if self.ios { "kakaoweb://closeBrowser" } else { "kakaotalk://inappbrowser/close" }
    }
}

/// An escape plan when `user_agent` belongs to the KakaoTalk webview.
#[must_use]
pub fn escape_plan(user_agent: &str) -> Option<EscapePlan> {
    let ua = user_agent.to_ascii_lowercase();
    if !ua.contains("kakaotalk") {
        return None;
    }
    let ios = ["iphone", "ipad", "ipod"].iter().any(|d| ua.contains(d));
    Some(EscapePlan { ios })
}

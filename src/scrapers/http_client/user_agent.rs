//! User agent selection.
//!
//! Marketplace search pages often serve a reduced layout (or a captcha) to
//! unknown clients, so the `impersonate` setting picks a desktop browser
//! string instead of the crawler's own.

use rand::Rng;

pub const USER_AGENT: &str = "snapprice/0.3 (price history crawler)";

/// Setting value selecting a browser user agent.
const IMPERSONATE: &str = "impersonate";

/// Desktop browser user agents used in impersonate mode.
const BROWSER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64; rv:140.0) Gecko/20100101 Firefox/140.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.5 Safari/605.1.15",
];

/// How the `user_agent` setting is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
enum UserAgentMode<'a> {
    Crawler,
    Browser,
    Custom(&'a str),
}

impl<'a> UserAgentMode<'a> {
    fn from_setting(setting: Option<&'a str>) -> Self {
        match setting.map(str::trim) {
            None | Some("") => Self::Crawler,
            Some(value) if value.eq_ignore_ascii_case(IMPERSONATE) => Self::Browser,
            Some(value) => Self::Custom(value),
        }
    }
}

/// Resolve the `user_agent` setting: unset means the crawler's own agent,
/// `impersonate` picks a browser agent, anything else is sent verbatim.
pub fn resolve_user_agent(setting: Option<&str>) -> String {
    match UserAgentMode::from_setting(setting) {
        UserAgentMode::Crawler => USER_AGENT.to_string(),
        UserAgentMode::Browser => {
            BROWSER_AGENTS[rand::rng().random_range(0..BROWSER_AGENTS.len())].to_string()
        }
        UserAgentMode::Custom(value) => value.to_string(),
    }
}

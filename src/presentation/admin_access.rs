use crate::application::services::AdminPanel;
use reqwest::Url;
use tracing::{info, warn};

/// 物理キー（配列に依存しない）と修飾キーの組
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// `KeyA` のような物理キーコード
    pub code: &'static str,
}

impl KeyChord {
    pub const fn new(ctrl: bool, alt: bool, code: &'static str) -> Self {
        Self {
            ctrl,
            alt,
            shift: false,
            code,
        }
    }

    fn is_admin_shortcut(&self) -> bool {
        self.ctrl && self.alt && self.code == ADMIN_SHORTCUT_CODE
    }
}

const ADMIN_SHORTCUT_CODE: &str = "KeyA";
const ADMIN_QUERY_KEY: &str = "admin";

/// 管理 UI を表示してよいかどうか。一度許可されたらセッション中は戻らない。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminAccess {
    authorized: bool,
}

impl AdminAccess {
    /// 起動 URL のクエリに `admin=true` があれば許可する
    pub fn from_launch_url(url: &str) -> Self {
        let authorized = match Url::parse(url) {
            Ok(url) => url
                .query_pairs()
                .any(|(key, value)| key == ADMIN_QUERY_KEY && value == "true"),
            Err(err) => {
                warn!("Ignoring unparseable launch URL '{url}': {err}");
                false
            }
        };
        if authorized {
            info!("Admin access granted via launch URL");
        }
        Self { authorized }
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Ctrl+Alt+A で許可し、パネルの開閉を切り替える。処理した場合 true。
    pub fn handle_key_chord(&mut self, chord: KeyChord, panel: &mut AdminPanel) -> bool {
        if !chord.is_admin_shortcut() {
            return false;
        }
        self.authorized = true;
        panel.toggle();
        info!("Admin shortcut triggered, panel open: {}", panel.is_open());
        true
    }

    /// 許可済みのときだけパネルを開く
    pub fn open_panel(&self, panel: &mut AdminPanel) -> bool {
        if !self.authorized {
            return false;
        }
        panel.open();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_query_parameter_authorizes() {
        assert!(AdminAccess::from_launch_url("https://map.example.com/?admin=true").is_authorized());
        assert!(
            AdminAccess::from_launch_url("https://map.example.com/?lang=en&admin=true")
                .is_authorized()
        );
    }

    #[test]
    fn other_values_do_not_authorize() {
        assert!(!AdminAccess::from_launch_url("https://map.example.com/").is_authorized());
        assert!(!AdminAccess::from_launch_url("https://map.example.com/?admin=1").is_authorized());
        assert!(!AdminAccess::from_launch_url("not a url").is_authorized());
    }

    #[test]
    fn shortcut_authorizes_and_toggles_panel() {
        let mut access = AdminAccess::default();
        let mut panel = AdminPanel::new();

        assert!(access.handle_key_chord(KeyChord::new(true, true, "KeyA"), &mut panel));
        assert!(access.is_authorized());
        assert!(panel.is_open());

        assert!(access.handle_key_chord(KeyChord::new(true, true, "KeyA"), &mut panel));
        assert!(!panel.is_open());
    }

    #[test]
    fn unrelated_chords_are_ignored() {
        let mut access = AdminAccess::default();
        let mut panel = AdminPanel::new();

        assert!(!access.handle_key_chord(KeyChord::new(true, false, "KeyA"), &mut panel));
        assert!(!access.handle_key_chord(KeyChord::new(true, true, "KeyB"), &mut panel));
        assert!(!access.is_authorized());
        assert!(!access.open_panel(&mut panel));
        assert!(!panel.is_open());
    }
}

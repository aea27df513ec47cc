//! Browser automation driver seam.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::DriverError;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A single browser session, used serially by one test case at a time.
#[async_trait]
pub trait AutomationDriver: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Runs `script` immediately, without waiting for the page to load.
    async fn execute_raw(&self, script: &str, args: &[Value]) -> Result<Value, DriverError>;

    /// Types `text` into the element with DOM id `element_id`.
    async fn send_keys(&self, element_id: &str, text: &str) -> Result<(), DriverError>;

    /// PNG bytes of the current viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, DriverError>;

    async fn close(&self) -> Result<(), DriverError>;

    /// Waits for `document.readyState == "complete"`, then runs `script`.
    ///
    /// Readiness is polled every 100 ms and at least once, even for a zero
    /// timeout.
    async fn execute_script(
        &self,
        script: &str,
        timeout: Duration,
        args: &[Value],
    ) -> Result<Value, DriverError> {
        let started = Instant::now();
        loop {
            let state = self.execute_raw("return document.readyState;", &[]).await?;
            if state.as_str() == Some("complete") {
                break;
            }
            if started.elapsed() >= timeout {
                return Err(DriverError::PageNotReady {
                    timeout_secs: timeout.as_secs(),
                });
            }
            debug!(?state, "Page not ready yet");
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
        self.execute_raw(script, args).await
    }
}

/// W3C WebDriver special keys, plus [`WebDriverKey::Wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebDriverKey {
    Null,
    Cancel,
    Help,
    Backspace,
    Tab,
    Clear,
    Return,
    Enter,
    Shift,
    Control,
    Alt,
    Pause,
    Escape,
    Space,
    PageUp,
    PageDown,
    End,
    Home,
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Insert,
    Delete,
    Semicolon,
    Equals,
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    Multiply,
    Add,
    Separator,
    Subtract,
    Decimal,
    Divide,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    #[serde(alias = "Command")]
    Meta,
    ZenkakuHankaku,
    /// Not a key: flushes the keys typed so far and pauses for one second.
    Wait,
}

impl WebDriverKey {
    /// The private-use code point the WebDriver protocol assigns this key.
    pub fn code_point(self) -> Option<char> {
        use WebDriverKey::*;
        let code: u32 = match self {
            Null => 0xE000,
            Cancel => 0xE001,
            Help => 0xE002,
            Backspace => 0xE003,
            Tab => 0xE004,
            Clear => 0xE005,
            Return => 0xE006,
            Enter => 0xE007,
            Shift => 0xE008,
            Control => 0xE009,
            Alt => 0xE00A,
            Pause => 0xE00B,
            Escape => 0xE00C,
            Space => 0xE00D,
            PageUp => 0xE00E,
            PageDown => 0xE00F,
            End => 0xE010,
            Home => 0xE011,
            ArrowLeft => 0xE012,
            ArrowUp => 0xE013,
            ArrowRight => 0xE014,
            ArrowDown => 0xE015,
            Insert => 0xE016,
            Delete => 0xE017,
            Semicolon => 0xE018,
            Equals => 0xE019,
            Numpad0 => 0xE01A,
            Numpad1 => 0xE01B,
            Numpad2 => 0xE01C,
            Numpad3 => 0xE01D,
            Numpad4 => 0xE01E,
            Numpad5 => 0xE01F,
            Numpad6 => 0xE020,
            Numpad7 => 0xE021,
            Numpad8 => 0xE022,
            Numpad9 => 0xE023,
            Multiply => 0xE024,
            Add => 0xE025,
            Separator => 0xE026,
            Subtract => 0xE027,
            Decimal => 0xE028,
            Divide => 0xE029,
            F1 => 0xE031,
            F2 => 0xE032,
            F3 => 0xE033,
            F4 => 0xE034,
            F5 => 0xE035,
            F6 => 0xE036,
            F7 => 0xE037,
            F8 => 0xE038,
            F9 => 0xE039,
            F10 => 0xE03A,
            F11 => 0xE03B,
            F12 => 0xE03C,
            Meta => 0xE03D,
            ZenkakuHankaku => 0xE040,
            Wait => return None,
        };
        char::from_u32(code)
    }

    /// Reverse of [`WebDriverKey::code_point`].
    pub fn from_code_point(c: char) -> Option<Self> {
        ALL_KEYS.iter().copied().find(|k| k.code_point() == Some(c))
    }
}

const ALL_KEYS: &[WebDriverKey] = {
    use WebDriverKey::*;
    &[
        Null, Cancel, Help, Backspace, Tab, Clear, Return, Enter, Shift, Control, Alt, Pause,
        Escape, Space, PageUp, PageDown, End, Home, ArrowLeft, ArrowUp, ArrowRight, ArrowDown,
        Insert, Delete, Semicolon, Equals, Numpad0, Numpad1, Numpad2, Numpad3, Numpad4, Numpad5,
        Numpad6, Numpad7, Numpad8, Numpad9, Multiply, Add, Separator, Subtract, Decimal, Divide,
        F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12, Meta, ZenkakuHankaku,
    ]
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SlowPage {
        polls: AtomicUsize,
        ready_after: usize,
    }

    #[async_trait]
    impl AutomationDriver for SlowPage {
        async fn navigate(&self, _url: &str) -> Result<(), DriverError> {
            Ok(())
        }

        async fn execute_raw(&self, script: &str, _args: &[Value]) -> Result<Value, DriverError> {
            if script.contains("readyState") {
                let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
                let state = if n >= self.ready_after { "complete" } else { "loading" };
                return Ok(Value::from(state));
            }
            Ok(Value::from("ran"))
        }

        async fn send_keys(&self, _id: &str, _text: &str) -> Result<(), DriverError> {
            Ok(())
        }

        async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
            Ok(Vec::new())
        }

        async fn close(&self) -> Result<(), DriverError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn execute_script_waits_for_ready_state() {
        let page = SlowPage { polls: AtomicUsize::new(0), ready_after: 3 };
        let out = page
            .execute_script("return 1;", Duration::from_secs(5), &[])
            .await
            .unwrap();
        assert_eq!(out, Value::from("ran"));
        assert_eq!(page.polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_timeout_still_polls_once() {
        let ready = SlowPage { polls: AtomicUsize::new(0), ready_after: 1 };
        assert!(ready.execute_script("x", Duration::ZERO, &[]).await.is_ok());
        assert_eq!(ready.polls.load(Ordering::SeqCst), 1);

        let never = SlowPage { polls: AtomicUsize::new(0), ready_after: usize::MAX };
        let err = never.execute_script("x", Duration::ZERO, &[]).await.unwrap_err();
        assert!(matches!(err, DriverError::PageNotReady { timeout_secs: 0 }));
    }

    #[test]
    fn key_code_points() {
        assert_eq!(WebDriverKey::Null.code_point(), Some('\u{E000}'));
        assert_eq!(WebDriverKey::Enter.code_point(), Some('\u{E007}'));
        assert_eq!(WebDriverKey::F12.code_point(), Some('\u{E03C}'));
        assert_eq!(WebDriverKey::ZenkakuHankaku.code_point(), Some('\u{E040}'));
        assert_eq!(WebDriverKey::Wait.code_point(), None);
        assert_eq!(WebDriverKey::from_code_point('\u{E004}'), Some(WebDriverKey::Tab));
    }
}

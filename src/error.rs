//! Error codes shared by every component error type.
//!
//! DESIGN
//! ======
//! Each component owns its own `thiserror` enum. The HTTP surface does not
//! match on those enums directly for the response body; it asks for a
//! grepable code and a retryable flag through this trait instead.

pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

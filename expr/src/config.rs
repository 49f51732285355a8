//! Rendering configuration.
//!
//! The cached `Display` and TeX forms of every expression use
//! [`PrintConfig::global`], which is read from the environment once.
//! Renderers can also be called with an explicit config; those results are
//! not cached.

use std::sync::OnceLock;

use bon::bon;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintConfig {
    /// Use unicode glyphs (`ℌ`, `⊗`) instead of ASCII fallbacks.
    pub unicode: bool,
    /// Indentation width of the indented structural repr.
    pub indent: usize,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self { unicode: true, indent: 4 }
    }
}

static GLOBAL_PRINT_CONFIG: OnceLock<PrintConfig> = OnceLock::new();

#[bon]
impl PrintConfig {
    #[builder]
    pub fn new(#[builder(default = true)] unicode: bool, #[builder(default = 4)] indent: usize) -> Self {
        Self { unicode, indent }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `QALG_ASCII` - Render with ASCII glyphs if set
    /// * `QALG_SREPR_INDENT` - Indentation width of the indented repr (default: 4)
    pub fn from_env() -> Self {
        let unicode = std::env::var("QALG_ASCII").is_err();
        let indent = std::env::var("QALG_SREPR_INDENT").ok().and_then(|s| s.parse().ok()).unwrap_or(4);

        Self { unicode, indent }
    }

    /// Process-wide configuration, initialized from the environment on first use.
    pub fn global() -> &'static PrintConfig {
        GLOBAL_PRINT_CONFIG.get_or_init(Self::from_env)
    }
}
